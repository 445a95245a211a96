use crate::command::Runner;
use crate::error::Error;
use crate::page_range::PageRange;
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const PDFTK: &str = "pdftk";

/// pdftk driven through a command runner.
pub struct Pdftk<'a> {
    runner: &'a dyn Runner,
}

impl<'a> Pdftk<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        Pdftk { runner }
    }

    /// True when `which pdftk` exits with 0.
    pub fn is_present(&self) -> Result<bool> {
        Ok(self.runner.run(&format!("which {}", PDFTK))?.success)
    }

    /// Ask `pdftk dump_data` for the number of pages in `source`.
    pub fn page_count(&self, source: &Path) -> Result<u32> {
        let output = self
            .runner
            .run(&format!("{} {} dump_data", PDFTK, shell_escape(source)))?;

        match parse_page_count(&output.text) {
            Some(total) => {
                tracing::debug!(source = %source.display(), total, "page count");
                Ok(total)
            }
            None => Err(Error::PageCountUnavailable {
                path: source.to_path_buf(),
                output: output.text,
            }
            .into()),
        }
    }

    pub fn run(&self, command_line: &str) -> Result<()> {
        let output = self.runner.run(command_line)?;
        if !output.success {
            return Err(Error::CommandExecutionFailed {
                command: command_line.to_string(),
                output: output.text,
            }
            .into());
        }
        Ok(())
    }
}

/// Pull the integer out of the `NumberOfPages: <n>` line of `dump_data` output.
pub fn parse_page_count(dump: &str) -> Option<u32> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^\s*NumberOfPages:\s*(\d+)\s*$").expect("valid NumberOfPages pattern")
    });

    pattern
        .captures(dump)
        .and_then(|caps| caps[1].parse().ok())
}

/// Backslash-escape everything but plain filename characters so the path
/// reaches pdftk as one word through `sh -c`.
pub fn shell_escape(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' => escaped.push(c),
            '_' | '.' | '/' | ',' | ':' | '+' | '=' | '@' | '%' | '-' => escaped.push(c),
            // backslash-newline is a line continuation in sh
            '\n' => escaped.push_str("'\n'"),
            _ => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }
    escaped
}

/// Where the file for `range` is written: `{destdir}/{stem}_{range}.pdf`.
pub fn output_path(source: &Path, range: &PageRange, destdir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".pdf").unwrap_or(&name);
    destdir.join(format!("{}_{}.pdf", stem, range))
}

/// The pdftk invocation that extracts `range` of `source` into `destdir`.
pub fn cat_command(source: &Path, range: &PageRange, destdir: &Path) -> String {
    format!(
        "{} {} cat {} output {}",
        PDFTK,
        shell_escape(source),
        range,
        shell_escape(&output_path(source, range, destdir))
    )
}
