use crate::commands::split::Options;
use crate::destination::Destination;
use crate::error::{Error, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdfsp")]
#[command(about = "Split a PDF into several files after the given pages, using pdftk")]
#[command(version)]
pub struct Cli {
    /// Destination dir for the output files
    #[arg(short, long, value_name = "DIR", conflicts_with = "cloudfile")]
    pub destdir: Option<PathBuf>,

    /// Write the output files to the cloudfile directory set in ~/.pdfsprc
    #[arg(short, long)]
    pub cloudfile: bool,

    /// Archive the source PDF once it has been split
    #[arg(short, long)]
    pub archive: bool,

    /// Settings file to read instead of ~/.pdfsprc
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log each pdftk command as it runs
    #[arg(short, long)]
    pub verbose: bool,

    /// PDF file to split
    pub source: PathBuf,

    /// Pages to split after (e.g. "3 7 12")
    #[arg(required = true)]
    pub pages: Vec<String>,
}

impl Cli {
    /// Check the arguments against the filesystem and build the run options.
    pub fn into_options(self) -> Result<Options> {
        if !self.source.is_file() {
            return Err(Error::InvalidSource { path: self.source });
        }
        let source = absolute(&self.source);

        let destination = match self.destdir {
            Some(dir) if dir.is_dir() => Destination::Dir(absolute(&dir)),
            Some(dir) => return Err(Error::InvalidDestinationDirectory { path: dir }),
            None if self.cloudfile => Destination::Cloudfile,
            None => Destination::CurrentDir,
        };

        Ok(Options {
            source,
            pages: parse_pages(&self.pages)?,
            destination,
            archive: self.archive,
        })
    }
}

/// Turn a clap failure that has its own exit status into an `Error`.
/// Anything else is handed back for clap to print and exit with.
pub fn usage_error(err: clap::Error) -> std::result::Result<Error, clap::Error> {
    match err.kind() {
        ErrorKind::ArgumentConflict => Ok(Error::ConflictingDestinations),
        _ => Err(err),
    }
}

/// Parse page arguments as positive integers, sorted ascending.
pub fn parse_pages(args: &[String]) -> Result<Vec<u32>> {
    let mut pages = args
        .iter()
        .map(|arg| match arg.trim().parse::<u32>() {
            Ok(page) if page > 0 => Ok(page),
            _ => Err(Error::InvalidPageList {
                reason: format!("'{}' is not a page number", arg),
            }),
        })
        .collect::<Result<Vec<u32>>>()?;
    pages.sort_unstable();
    Ok(pages)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
