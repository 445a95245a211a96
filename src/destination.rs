use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::PathBuf;

/// How the user asked for the output directory to be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// `--cloudfile`: the directory named in the settings file
    Cloudfile,
    /// `--destdir`: already checked to be a directory
    Dir(PathBuf),
    #[default]
    CurrentDir,
}

/// Pick the directory split files are written to.
pub fn resolve(destination: &Destination, settings: &Settings) -> Result<PathBuf> {
    match destination {
        Destination::Cloudfile => {
            let dir = settings
                .cloudfile_dir()
                .ok_or(Error::CloudDirectoryNotConfigured)?;
            let dir = std::path::absolute(&dir).unwrap_or(dir);
            if !dir.is_dir() {
                return Err(Error::InvalidCloudDirectory { path: dir });
            }
            Ok(dir)
        }
        Destination::Dir(dir) => Ok(dir.clone()),
        Destination::CurrentDir => {
            std::env::current_dir().map_err(|_| Error::InvalidDestinationDirectory {
                path: PathBuf::from("."),
            })
        }
    }
}
