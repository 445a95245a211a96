use anyhow::{Context, Result};
use std::process::Command;

/// Combined stdout/stderr of a finished command and whether it exited with 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

/// Runs one flat shell command line to completion.
pub trait Runner {
    fn run(&self, command_line: &str) -> Result<Output>;
}

/// Hands command lines to `sh -c`, so escaped spaces in paths are honoured.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl Runner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<Output> {
        tracing::debug!(command = command_line, "running");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .output()
            .with_context(|| format!("Failed to spawn shell for: {}", command_line))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(Output {
            text,
            success: output.status.success(),
        })
    }
}
