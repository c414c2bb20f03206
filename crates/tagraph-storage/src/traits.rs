//! The [`EntryStore`] trait defining the storage contract for entries.
//!
//! Backends only implement three primitives: `initialize`, `append_validated`
//! and `read_all`. Validation, raw batch parsing and hierarchy replay are
//! provided methods so every backend rejects the same input the same way.
//!
//! All backends (CsvStore, SqliteStore, InMemoryStore) implement this trait,
//! ensuring they are fully swappable without changing core logic.

use chrono::NaiveDate;

use tagraph_core::entry::{parse_batch, partition_batch};
use tagraph_core::{Entry, RejectedRecord, TagHierarchy};

use crate::error::StorageError;

/// The storage contract for knowledge-base entries.
///
/// The trait is synchronous; callers that share a store across tasks are
/// responsible for serializing access.
pub trait EntryStore {
    // -------------------------------------------------------------------
    // Backend primitives
    // -------------------------------------------------------------------

    /// Creates an empty store with the four-column schema if none exists.
    ///
    /// Leaves an existing store untouched.
    fn initialize(&mut self) -> Result<(), StorageError>;

    /// Writes an already-validated batch in one atomic step, preserving order.
    fn append_validated(&mut self, entries: &[Entry]) -> Result<(), StorageError>;

    /// Returns every entry in insertion order.
    ///
    /// A store that does not exist yet reads as empty.
    fn read_all(&self) -> Result<Vec<Entry>, StorageError>;

    // -------------------------------------------------------------------
    // Provided methods
    // -------------------------------------------------------------------

    /// Validates every entry, then appends the whole batch.
    ///
    /// If any entry is malformed nothing is written.
    fn append(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        let rejected: Vec<RejectedRecord> = entries
            .iter()
            .filter_map(|e| {
                e.validate().err().map(|reason| RejectedRecord {
                    raw: format!("{}, {}, {}, {}", e.title, e.tag_path, e.link, e.date_added),
                    reason,
                })
            })
            .collect();
        if !rejected.is_empty() {
            return Err(StorageError::Validation { rejected });
        }
        if entries.is_empty() {
            return Ok(());
        }
        self.append_validated(entries)
    }

    /// Parses a raw `;`/`,` batch and appends it.
    ///
    /// `today` resolves the `today` date token. Returns the appended entries.
    fn append_raw(&mut self, raw: &str, today: NaiveDate) -> Result<Vec<Entry>, StorageError> {
        let entries = partition_batch(parse_batch(raw, today))
            .map_err(|rejected| StorageError::Validation { rejected })?;
        self.append(&entries)?;
        Ok(entries)
    }

    /// Replays the whole store into a fresh tag hierarchy.
    fn load_hierarchy(&self) -> Result<TagHierarchy, StorageError> {
        let entries = self.read_all()?;
        Ok(TagHierarchy::from_entries(&entries))
    }

    /// Number of stored entries.
    fn entry_count(&self) -> Result<usize, StorageError> {
        Ok(self.read_all()?.len())
    }
}
