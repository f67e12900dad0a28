//! JSON file storage backend.
//!
//! The whole ledger is stored as one pretty-printed JSON document. Saves go
//! through a temp file and rename so an interrupted write never leaves a
//! truncated document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::LedgerStore;
use super::types::LedgerDocument;
use crate::error::{LedgerError, Result};

/// Ledger document stored in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerDocument>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            // A file standing in for a parent directory also means no document.
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Ok(None)
            }
            Err(err) => {
                return Err(LedgerError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        let document = serde_json::from_str(&contents).map_err(|e| {
            LedgerError::Serialization(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(document))
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LedgerError::Storage(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let mut contents = serde_json::to_string_pretty(document)?;
        contents.push('\n');
        crate::fs::write_atomic(&self.path, contents.as_bytes()).map_err(|e| {
            LedgerError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
