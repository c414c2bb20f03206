//! In-memory implementation of [`EntryStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and anywhere
//! persistence isn't needed. Semantics match the file-backed stores.

use tagraph_core::Entry;

use crate::error::StorageError;
use crate::traits::EntryStore;

/// Vec-backed entry store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Vec<Entry>,
    initialized: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `initialize` or an append has happened.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl EntryStore for InMemoryStore {
    fn initialize(&mut self) -> Result<(), StorageError> {
        self.initialized = true;
        Ok(())
    }

    fn append_validated(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        self.initialized = true;
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Entry>, StorageError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()
    }

    #[test]
    fn scenario_one_record_then_hierarchy() {
        let mut store = InMemoryStore::new();
        store
            .append_raw("Paper X, FIN/RISK, http://x, today", day())
            .unwrap();
        assert_eq!(store.entry_count().unwrap(), 1);

        let hierarchy = store.load_hierarchy().unwrap();
        assert_eq!(hierarchy.usage_count("FIN"), 1);
        assert_eq!(hierarchy.usage_count("FIN/RISK"), 1);
    }

    #[test]
    fn shared_tag_counts_twice() {
        let mut store = InMemoryStore::new();
        store
            .append_raw("Paper X, FIN/RISK, http://x; Paper Y, FIN/RISK, http://y", day())
            .unwrap();
        let hierarchy = store.load_hierarchy().unwrap();
        assert_eq!(hierarchy.usage_count("FIN/RISK"), 2);
        assert_eq!(hierarchy.counts().len(), 2);
    }

    #[test]
    fn blank_title_is_rejected_and_nothing_stored() {
        let mut store = InMemoryStore::new();
        store.append_raw("Paper X, FIN, http://x", day()).unwrap();
        let err = store.append_raw(" , FIN/RISK, http://x, today", day()).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
        assert_eq!(store.entry_count().unwrap(), 1);
    }

    #[test]
    fn empty_append_is_noop() {
        let mut store = InMemoryStore::new();
        store.append(&[]).unwrap();
        assert!(!store.is_initialized());
        store.initialize().unwrap();
        assert!(store.is_initialized());
        assert!(store.read_all().unwrap().is_empty());
    }
}
