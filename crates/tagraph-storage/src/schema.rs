//! SQLite layout for [`crate::sqlite::SqliteStore`].
//!
//! One `entries` table mirrors the CSV columns (`name`, `tag`, `link`,
//! `date_added`) plus an autoincrement `id` that fixes read order. Dates are
//! stored as ISO text, not SQLite date values, so both backends hand
//! `chrono` the same string to parse. Versioning goes through
//! `rusqlite_migration` and the `user_version` pragma.

use std::path::Path;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// Creates `entries` and its tag index.
const ENTRIES_TABLE: &str = include_str!("migrations/001_initial_schema.sql");

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(ENTRIES_TABLE)])
}

/// Opens the entry database at `path`, creating the file and table on first
/// use.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path.as_ref())?;
    // WAL: a rebuild reading the table does not block an append.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    migrate(&mut conn)?;
    Ok(conn)
}

/// An entry database that lives only as long as the connection.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    migrate(&mut conn)?;
    Ok(conn)
}

fn migrate(conn: &mut Connection) -> Result<(), StorageError> {
    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))
}
