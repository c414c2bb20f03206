//! The emitted graph document on disk.
//!
//! Writes replace the whole file through a temp-file rename, so a reader
//! sees either the previous document or the new one. Reads run the
//! structural check and never repair a malformed document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use tagraph_core::GraphDocument;

use crate::error::StorageError;

/// Handle to a graph document file.
#[derive(Debug, Clone)]
pub struct GraphFile {
    path: PathBuf,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GraphFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes an empty document if the file does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if self.exists() {
            return Ok(());
        }
        self.write(&GraphDocument::empty())
    }

    /// Replaces the file with `doc`, pretty-printed.
    pub fn write(&self, doc: &GraphDocument) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(doc.to_json_pretty()?.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            nodes = doc.nodes.len(),
            links = doc.links.len(),
            "wrote graph document"
        );
        Ok(())
    }

    /// Reads and structurally checks the document.
    ///
    /// A missing file is [`StorageError::NotFound`]; a document without
    /// `nodes`/`links` arrays is [`StorageError::MalformedGraph`].
    pub fn read(&self) -> Result<GraphDocument, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| StorageError::MalformedGraph {
                reason: format!("not valid JSON: {}", e),
            })?;
        tagraph_core::graph::check_structure(&value)?;
        serde_json::from_value(value).map_err(|e| StorageError::MalformedGraph {
            reason: e.to_string(),
        })
    }
}
