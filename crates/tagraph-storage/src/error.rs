//! Storage error types for tagraph-storage.
//!
//! [`StorageError`] covers every failure the store and the graph document
//! file can report: backend I/O, rejected input batches, missing files,
//! schema drift and malformed graph documents.

use std::path::PathBuf;

use tagraph_core::{CoreError, RejectedRecord};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing the CSV store failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// An SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// One or more input records were malformed; nothing was written.
    #[error("{} record(s) rejected: {}", .rejected.len(), join_rejected(.rejected))]
    Validation { rejected: Vec<RejectedRecord> },

    /// A raw batch contained no records.
    #[error("batch contains no records")]
    EmptyBatch,

    /// The store or graph file does not exist.
    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// An existing store does not carry the expected columns.
    #[error("schema mismatch in {}: expected [{expected}], found [{found}]", .path.display())]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A stored row could not be decoded into an entry.
    #[error("corrupt row {row}: {reason}")]
    CorruptRow { row: u64, reason: String },

    /// A graph document failed the structural check.
    #[error("malformed graph document: {reason}")]
    MalformedGraph { reason: String },
}

fn join_rejected(rejected: &[RejectedRecord]) -> String {
    rejected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedGraph { reason } => StorageError::MalformedGraph { reason },
            CoreError::Serialization(e) => StorageError::Serialization(e),
            other => StorageError::MalformedGraph {
                reason: other.to_string(),
            },
        }
    }
}
