//! Response types for the tag listing endpoints.

use serde::Serialize;

/// Response body for `GET /tags`.
#[derive(Debug, Clone, Serialize)]
pub struct TagCountsResponse {
    /// Every expanded tag, ascending lexical order.
    pub tags: Vec<TagCountView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagCountView {
    pub tag: String,
    pub count: u64,
    pub depth: usize,
}

/// Response body for `GET /tags/used`.
#[derive(Debug, Clone, Serialize)]
pub struct TagsUsedResponse {
    /// Tags exactly as stored, first-seen order.
    pub tags: Vec<String>,
}
