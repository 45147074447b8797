//! File-backed loadout storage. A slot is a path on disk.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use lootrun_core::{LoadoutStorage, SaveDocument};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize loadout")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl FileStorage {
    /// Write `document` as pretty JSON to `path`, creating parent directories.
    pub fn write_document(path: &Path, document: &SaveDocument) -> Result<(), WorkspaceError> {
        let json = document.to_json_pretty()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| WorkspaceError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl LoadoutStorage for FileStorage {
    type Error = WorkspaceError;

    fn save_document(&self, slot: &str, document: &SaveDocument) -> Result<(), Self::Error> {
        Self::write_document(Path::new(slot), document)
    }

    fn load_bytes(&self, slot: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        match fs::read(slot) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(WorkspaceError::Read {
                path: PathBuf::from(slot),
                source,
            }),
        }
    }

    fn delete_slot(&self, slot: &str) -> Result<(), Self::Error> {
        match fs::remove_file(slot) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(WorkspaceError::Write {
                path: PathBuf::from(slot),
                source: err,
            }),
            _ => Ok(()),
        }
    }
}
