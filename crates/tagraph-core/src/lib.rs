//! Core model for tagraph: reference entries, the tag hierarchy derived from
//! them, content-addressed identifiers, and the compiler that turns all of it
//! into a node/link graph document.
//!
//! # Modules
//!
//! - [`entry`]: Entry record and the raw `;`/`,` batch parser
//! - [`hierarchy`]: tag path expansion and usage counts
//! - [`id`]: NodeKey and the pluggable IdentifierGenerator
//! - [`graph`]: GraphNode/GraphLink/GraphDocument and the petgraph-backed TagGraph
//! - [`compiler`]: GraphCompiler
//! - [`error`]: CoreError

pub mod compiler;
pub mod entry;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod id;

// Re-export commonly used types
pub use compiler::{CompileSummary, GraphCompiler, SkippedItem};
pub use entry::{parse_batch, parse_record, Entry, ParsedRecord, RejectReason, RejectedRecord};
pub use error::CoreError;
pub use graph::{GraphDocument, GraphLink, GraphNode, LinkKind, NodeKind, TagGraph};
pub use hierarchy::{expand, TagHierarchy};
pub use id::{Blake3Identifier, DigestKind, IdentifierGenerator, Md5Identifier, NodeKey};
