//! The `~/.pdfsprc` settings file.
//!
//! The file is TOML. Older YAML files (`cloudfile: ~/Dropbox`) are rejected
//! with a config error and must be rewritten as `cloudfile = "~/Dropbox"`.
//!
//! ```toml
//! cloudfile = "~/Dropbox/scans"
//!
//! [archiver]
//! type = "s3"
//! access_key_id = "AKIA..."
//! secret_access_key = "..."
//! bucket = "scans-archive"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const RC_FILE_NAME: &str = ".pdfsprc";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Directory used by `--cloudfile`
    #[serde(default)]
    pub cloudfile: Option<String>,
    #[serde(default)]
    pub archiver: Option<ArchiverSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArchiverSettings {
    Null,
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct S3Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint; path-style addressing is used when set
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub prefix: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Settings {
    /// `~/.pdfsprc`, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(RC_FILE_NAME))
    }

    /// Load settings from `path`. A missing file yields empty settings.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no settings file");
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_str(&content).map_err(|reason| Error::ConfigLoad {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_str(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// The configured cloudfile directory with a leading `~` expanded.
    pub fn cloudfile_dir(&self) -> Option<PathBuf> {
        self.cloudfile.as_deref().map(expand_home)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}
