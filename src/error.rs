//! Failure kinds for a split run and the exit status each one maps to.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

const HELP_HINT: &str = "Run pdfsp -h for help.";

#[derive(Error, Debug)]
pub enum Error {
    /// The settings file exists but could not be read or parsed
    #[error("failed to load config file {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("pdftk is not installed")]
    ToolNotPresent,

    #[error("source file does not exist: {path}")]
    InvalidSource { path: PathBuf },

    #[error("not a valid destination directory: {path}")]
    InvalidDestinationDirectory { path: PathBuf },

    #[error("--destdir and --cloudfile both set the destination directory")]
    ConflictingDestinations,

    #[error("invalid page list: {reason}")]
    InvalidPageList { reason: String },

    #[error("cloudfile directory is not configured")]
    CloudDirectoryNotConfigured,

    #[error("cloudfile directory is not a directory: {path}")]
    InvalidCloudDirectory { path: PathBuf },

    #[error("page list contains duplicate page {page}")]
    DuplicateCutPoints { page: u32, pages: Vec<u32> },

    #[error("page {page} exceeds the page count {total}")]
    CutPointExceedsPageCount {
        page: u32,
        total: u32,
        pages: Vec<u32>,
    },

    /// pdftk ran but its output had no usable `NumberOfPages` line
    #[error("could not determine the page count of {path}")]
    PageCountUnavailable { path: PathBuf, output: String },

    #[error("command failed: {command}")]
    CommandExecutionFailed { command: String, output: String },
}

impl Error {
    /// Process exit status for this failure. Success is 0 and never comes from here.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidSource { .. } => 66,
            Error::InvalidDestinationDirectory { .. } => 67,
            Error::ConflictingDestinations => 69,
            Error::InvalidPageList { .. } => 70,
            Error::ConfigLoad { .. } => 71,
            Error::ToolNotPresent => 72,
            Error::InvalidCloudDirectory { .. } => 73,
            Error::CloudDirectoryNotConfigured => 74,
            Error::DuplicateCutPoints { .. } => 75,
            Error::CutPointExceedsPageCount { .. } => 76,
            Error::PageCountUnavailable { .. } => 77,
            Error::CommandExecutionFailed { .. } => 80,
        }
    }

    /// Multi-line explanation printed to stderr before exiting.
    pub fn report(&self) -> Vec<String> {
        match self {
            Error::ConfigLoad { path, reason } => vec![
                "There was a problem loading the config file".to_string(),
                path.display().to_string(),
                "It should be formatted in TOML, e.g. cloudfile = \"~/Dropbox\"".to_string(),
                "(YAML settings such as cloudfile: ~/Dropbox need converting)".to_string(),
                reason.clone(),
            ],
            Error::ToolNotPresent => vec![
                "This application requires pdftk to be installed on the system.".to_string(),
                "It does not appear to be present.".to_string(),
            ],
            Error::InvalidSource { path } => vec![
                "You have passed a non-existent filename as an argument".to_string(),
                format!("{} does not exist", path.display()),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::InvalidDestinationDirectory { path } => vec![
                "The destination directory should be a valid directory".to_string(),
                format!("{} is not a valid directory", path.display()),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::ConflictingDestinations => vec![
                "The destdir and cloudfile options both set the destination directory".to_string(),
                "Please use just one of them to define the destination directory".to_string(),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::InvalidPageList { reason } => vec![
                "The arguments after the source file should be the list of pages to split after"
                    .to_string(),
                format!("They should all be positive integers: {}", reason),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::CloudDirectoryNotConfigured => vec![
                "The cloudfile directory has not been set in the .pdfsprc file".to_string(),
                "or there is no .pdfsprc file in your home directory".to_string(),
            ],
            Error::InvalidCloudDirectory { path } => vec![
                "The cloudfile directory should be a valid directory".to_string(),
                format!("{} is not a valid directory", path.display()),
            ],
            Error::DuplicateCutPoints { pages, .. } => vec![
                "Your list of pages contains duplicates".to_string(),
                join_pages(pages),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::CutPointExceedsPageCount { total, pages, .. } => vec![
                "Your list of pages contains numbers higher than the number of pages in the pdf."
                    .to_string(),
                format!("The page list is {}", join_pages(pages)),
                format!("The number of pages in the pdf is {}", total),
                String::new(),
                HELP_HINT.to_string(),
            ],
            Error::PageCountUnavailable { path, output } => vec![
                format!("Could not read the number of pages in {}", path.display()),
                "pdftk did not report a NumberOfPages value. Its output was:".to_string(),
                output.trim_end().to_string(),
            ],
            Error::CommandExecutionFailed { command, output } => vec![
                "pdftk failed while splitting the file.".to_string(),
                format!("The command was: {}", command),
                output.trim_end().to_string(),
            ],
        }
    }
}

fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
