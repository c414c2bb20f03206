//! Storage layer for tagraph entries and graph documents.
//!
//! Provides the [`EntryStore`] trait defining the storage contract that all
//! backends implement, plus [`CsvStore`], [`SqliteStore`] and
//! [`InMemoryStore`] as first-class backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: EntryStore trait definition
//! - [`csv_store`]: flat-file CsvStore (default backend)
//! - [`sqlite`]: SqliteStore implementation
//! - [`schema`]: SQL schema and migration setup
//! - [`memory`]: InMemoryStore implementation
//! - [`graph_file`]: the emitted graph document on disk
//! - [`ops`]: path-level operations shared by the CLI and the server

pub mod csv_store;
pub mod error;
pub mod graph_file;
pub mod memory;
pub mod ops;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use csv_store::CsvStore;
pub use error::StorageError;
pub use graph_file::GraphFile;
pub use memory::InMemoryStore;
pub use ops::{
    append_entries, ensure_store_exists, open_store, read_graph, rebuild_graph,
    rebuild_graph_with, tag_counts, tags_used, Rebuild,
};
pub use sqlite::SqliteStore;
pub use traits::EntryStore;
