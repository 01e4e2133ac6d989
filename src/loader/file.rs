//! INI files as loader layers.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::source::IniSource;
use crate::ini::{IniError, IniStore};

/// An INI file merged into the store with [`IniStore::read_more`].
///
/// A missing required file fails the load with [`IniError::FileNotFound`];
/// a missing optional one contributes nothing. Format errors carry the path.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn required(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    pub fn optional(path: impl AsRef<Path>) -> Self {
        Self {
            required: false,
            ..Self::required(path)
        }
    }
}

impl IniSource for FileSource {
    fn apply(&self, store: &mut IniStore, ignore_errors: bool) -> Result<(), IniError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.required => {
                debug!(path = %self.path.display(), "optional ini file not found, skipping");
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IniError::FileNotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(IniError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        store
            .read_more(BufReader::new(file), ignore_errors)
            .map_err(|e| IniError::Parse {
                path: self.path.clone(),
                source: Box::new(e),
            })
    }
}
