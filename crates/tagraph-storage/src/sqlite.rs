//! SQLite implementation of [`EntryStore`].
//!
//! [`SqliteStore`] keeps entries in a single `entries` table whose
//! autoincrement key preserves insertion order. Every batch is written inside
//! one transaction, so a failed append leaves no rows behind.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use tagraph_core::entry::DATE_FORMAT;
use tagraph_core::Entry;

use crate::error::StorageError;
use crate::traits::EntryStore;

/// SQLite-backed implementation of [`EntryStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

impl EntryStore for SqliteStore {
    /// The schema is created when the connection is opened.
    fn initialize(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn append_validated(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (name, tag, link, date_added) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.title,
                    entry.tag_path,
                    entry.link,
                    entry.date_added.format(DATE_FORMAT).to_string(),
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(count = entries.len(), "appended entries");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Entry>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, tag, link, date_added FROM entries ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, name, tag, link, date) = row?;
            let date_added = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
                StorageError::CorruptRow {
                    row: id as u64,
                    reason: format!("bad date '{}': {}", date, e),
                }
            })?;
            entries.push(Entry::new(name, tag, link, date_added));
        }
        Ok(entries)
    }
}
