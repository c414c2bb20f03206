//! Flat-file CSV implementation of [`EntryStore`].
//!
//! [`CsvStore`] keeps entries in a CSV file with the header
//! `Name,Tag,Link,Date Added`. Writes are append-only: each batch is encoded
//! into one buffer and written with a single `write_all` followed by
//! `sync_data`, so readers never see half a batch boundary from this
//! process. A missing file reads as an empty store. Field values are read
//! back exactly as written; only the header and the date are trimmed.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use tagraph_core::entry::DATE_FORMAT;
use tagraph_core::Entry;

use crate::error::StorageError;
use crate::traits::EntryStore;

/// Column names, in persisted order.
pub const CSV_HEADER: [&str; 4] = ["Name", "Tag", "Link", "Date Added"];

/// One persisted row.
#[derive(Debug, Serialize, Deserialize)]
struct EntryRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Tag")]
    tag: String,
    #[serde(rename = "Link")]
    link: String,
    #[serde(rename = "Date Added")]
    date_added: String,
}

impl EntryRow {
    fn from_entry(entry: &Entry) -> Self {
        EntryRow {
            name: entry.title.clone(),
            tag: entry.tag_path.clone(),
            link: entry.link.clone(),
            date_added: entry.date_added.format(DATE_FORMAT).to_string(),
        }
    }

    fn into_entry(self, row: u64) -> Result<Entry, StorageError> {
        let date_added = NaiveDate::parse_from_str(self.date_added.trim(), DATE_FORMAT).map_err(|e| {
            StorageError::CorruptRow {
                row,
                reason: format!("bad date '{}': {}", self.date_added, e),
            }
        })?;
        Ok(Entry::new(self.name, self.tag, self.link, date_added))
    }
}

/// CSV-file-backed implementation of [`EntryStore`].
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Binds the store to `path`. Nothing is touched on disk until
    /// [`EntryStore::initialize`] or the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Size of the store file, or `None` if it does not exist.
    fn file_len(&self) -> Result<Option<u64>, StorageError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn check_header(&self, found: &csv::StringRecord) -> Result<(), StorageError> {
        if found.iter().eq(CSV_HEADER.iter().copied()) {
            return Ok(());
        }
        Err(StorageError::SchemaMismatch {
            path: self.path.clone(),
            expected: CSV_HEADER.join(","),
            found: found.iter().collect::<Vec<_>>().join(","),
        })
    }

    /// Reads and checks the header of a non-empty store file.
    fn verify_existing_header(&self) -> Result<(), StorageError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        self.check_header(&headers)
    }

    /// Whether the file ends without a record terminator (hand-edited files).
    fn missing_trailing_newline(&self) -> Result<bool, StorageError> {
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn encode(entries: &[Entry], with_header: bool) -> Result<Vec<u8>, StorageError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        if with_header {
            writer.write_record(CSV_HEADER)?;
        }
        for entry in entries {
            writer.serialize(EntryRow::from_entry(entry))?;
        }
        writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))
    }
}

impl EntryStore for CsvStore {
    fn initialize(&mut self) -> Result<(), StorageError> {
        if self.file_len()?.is_some() {
            return Ok(());
        }

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Header goes to a sibling temp file first; the rename is the only
        // step that makes the store visible.
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&Self::encode(&[], true)?)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&self.path) {
            Ok(_) => {
                tracing::info!(path = %self.path.display(), "created entry store");
                Ok(())
            }
            // Someone else created it in the meantime.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.error.into()),
        }
    }

    fn append_validated(&mut self, entries: &[Entry]) -> Result<(), StorageError> {
        let with_header = match self.file_len()? {
            None => {
                self.initialize()?;
                false
            }
            Some(0) => true,
            Some(_) => {
                self.verify_existing_header()?;
                false
            }
        };

        let mut bytes = Self::encode(entries, with_header)?;
        if !with_header && self.file_len()?.unwrap_or(0) > 0 && self.missing_trailing_newline()? {
            bytes.insert(0, b'\n');
        }

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(&bytes)?;
        file.sync_data()?;

        tracing::info!(
            path = %self.path.display(),
            count = entries.len(),
            "appended entries"
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Entry>, StorageError> {
        match self.file_len()? {
            None | Some(0) => return Ok(Vec::new()),
            Some(_) => {}
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        self.check_header(&headers)?;

        let mut entries = Vec::new();
        for (i, row) in reader.deserialize::<EntryRow>().enumerate() {
            entries.push(row?.into_entry(i as u64 + 1)?);
        }
        Ok(entries)
    }
}
