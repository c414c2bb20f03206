//! Request/response types for `POST /entries`.

use serde::{Deserialize, Serialize};

use tagraph_core::Entry;

/// Request body for `POST /entries`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppendEntriesRequest {
    /// Semicolon-separated records of `title, tag, link[, date|today]`.
    pub raw: String,
}

/// Response body for `POST /entries`.
#[derive(Debug, Clone, Serialize)]
pub struct AppendEntriesResponse {
    pub count: usize,
    pub added: Vec<EntryView>,
}

/// An entry as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub title: String,
    pub tag: String,
    pub link: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date_added: String,
}

impl From<Entry> for EntryView {
    fn from(entry: Entry) -> Self {
        EntryView {
            date_added: entry.date_added.to_string(),
            title: entry.title,
            tag: entry.tag_path,
            link: entry.link,
        }
    }
}
