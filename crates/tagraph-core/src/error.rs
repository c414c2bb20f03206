//! Core error types for tagraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the graph model. Blank identifiers are not
//! represented here: the compiler absorbs them and logs a warning.

use thiserror::Error;

/// Core errors produced by the tagraph-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A graph document failed the structural check.
    #[error("malformed graph document: {reason}")]
    MalformedGraph { reason: String },

    /// A link referenced a node id that is not in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    /// JSON serialization or deserialization of a graph document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
