//! What happens to the source PDF after a successful split.

pub mod s3;

use crate::settings::{ArchiverSettings, Settings};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Archiver: Send + Sync {
    async fn archive(&self, source: &Path) -> Result<()>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// Leaves the source where it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullArchiver;

#[async_trait]
impl Archiver for NullArchiver {
    async fn archive(&self, source: &Path) -> Result<()> {
        tracing::debug!(source = %source.display(), "no archiver configured");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Build the archiver named by the `[archiver]` table.
pub fn from_settings(settings: &Settings) -> Box<dyn Archiver> {
    match &settings.archiver {
        Some(ArchiverSettings::S3(s3)) => Box::new(s3::S3Archiver::new(s3.clone())),
        Some(ArchiverSettings::Null) | None => Box::new(NullArchiver),
    }
}
