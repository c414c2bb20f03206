//! Path-level operations used by the CLI and the HTTP wrapper.
//!
//! Every operation opens the store fresh and rebuilds derived state from a
//! full snapshot; nothing is cached between calls. Callers that run these
//! concurrently against one store must serialize them.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use tagraph_core::{
    parse_batch, CompileSummary, Entry, GraphCompiler, GraphDocument, IdentifierGenerator,
    Md5Identifier,
};

use crate::csv_store::CsvStore;
use crate::error::StorageError;
use crate::graph_file::GraphFile;
use crate::sqlite::SqliteStore;
use crate::traits::EntryStore;

/// File extensions that select the SQLite backend.
const SQLITE_EXTENSIONS: [&str; 3] = ["db", "sqlite", "sqlite3"];

/// Result of a graph rebuild.
#[derive(Debug, Clone)]
pub struct Rebuild {
    pub document: GraphDocument,
    pub summary: CompileSummary,
    pub entries: usize,
}

/// The current local calendar date, used to resolve `today`.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Opens the backend matching the path's extension.
pub fn open_store(path: &Path) -> Result<Box<dyn EntryStore>, StorageError> {
    let is_sqlite = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SQLITE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if is_sqlite {
        Ok(Box::new(SqliteStore::new(&path.to_string_lossy())?))
    } else {
        Ok(Box::new(CsvStore::new(path)))
    }
}

/// Creates an empty store at `path` if there is none.
pub fn ensure_store_exists(path: &Path) -> Result<(), StorageError> {
    open_store(path)?.initialize()
}

/// Parses and appends a raw `;`/`,` batch, resolving `today` to the
/// current date. Returns the appended entries.
pub fn append_entries(path: &Path, raw_batch: &str) -> Result<Vec<Entry>, StorageError> {
    append_entries_on(path, raw_batch, today())
}

/// [`append_entries`] with an explicit date for the `today` token.
///
/// A batch with no records at all is [`StorageError::EmptyBatch`]; the store
/// is not touched.
pub fn append_entries_on(
    path: &Path,
    raw_batch: &str,
    today: NaiveDate,
) -> Result<Vec<Entry>, StorageError> {
    if parse_batch(raw_batch, today).is_empty() {
        return Err(StorageError::EmptyBatch);
    }
    let mut store = open_store(path)?;
    store.initialize()?;
    let added = store.append_raw(raw_batch, today)?;
    for entry in &added {
        tracing::info!(
            title = %entry.title,
            tag_path = %entry.tag_path,
            link = %entry.link,
            date_added = %entry.date_added,
            "added entry"
        );
    }
    Ok(added)
}

/// Rebuilds the graph document with the default MD5 identifiers.
pub fn rebuild_graph(store_path: &Path, output_path: &Path) -> Result<GraphDocument, StorageError> {
    Ok(rebuild_graph_with(store_path, output_path, &Md5Identifier)?.document)
}

/// Reads the whole store, compiles it, replaces the output document, then
/// reads the document back through the structural check.
pub fn rebuild_graph_with(
    store_path: &Path,
    output_path: &Path,
    ids: &dyn IdentifierGenerator,
) -> Result<Rebuild, StorageError> {
    let store = open_store(store_path)?;
    let entries = store.read_all()?;
    let hierarchy = tagraph_core::TagHierarchy::from_entries(&entries);

    let (graph, summary) = GraphCompiler::new(ids).build(&entries, &hierarchy);

    let out = GraphFile::new(output_path);
    out.write(&graph.to_document())?;
    let document = out.read()?;

    tracing::info!(
        store = %store_path.display(),
        output = %output_path.display(),
        entries = entries.len(),
        nodes = document.nodes.len(),
        links = document.links.len(),
        skipped = summary.skipped.len(),
        "rebuilt graph"
    );

    Ok(Rebuild {
        document,
        summary,
        entries: entries.len(),
    })
}

/// Every expanded tag with its usage count.
pub fn tag_counts(path: &Path) -> Result<BTreeMap<String, u64>, StorageError> {
    Ok(open_store(path)?.load_hierarchy()?.counts().clone())
}

/// Raw tags exactly as stored, first-seen order.
pub fn tags_used(path: &Path) -> Result<Vec<String>, StorageError> {
    let hierarchy = open_store(path)?.load_hierarchy()?;
    Ok(hierarchy.distinct_leaf_tags().map(str::to_string).collect())
}

/// Reads a previously emitted graph document.
pub fn read_graph(path: &Path) -> Result<GraphDocument, StorageError> {
    GraphFile::new(path).read()
}
