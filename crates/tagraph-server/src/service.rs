//! KnowledgeService: the single coordinator between HTTP handlers and the
//! store/compiler crates.
//!
//! The service holds paths and the digest choice, nothing else. Each call
//! reopens the store and recomputes derived state from a full snapshot.

use std::path::{Path, PathBuf};

use tagraph_core::hierarchy::depth_of;
use tagraph_core::{DigestKind, GraphDocument};
use tagraph_storage::ops;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::schema::entries::{AppendEntriesResponse, EntryView};
use crate::schema::tags::{TagCountView, TagCountsResponse, TagsUsedResponse};

/// Store and graph operations exposed over HTTP.
#[derive(Debug, Clone)]
pub struct KnowledgeService {
    store_path: PathBuf,
    graph_path: PathBuf,
    digest: DigestKind,
}

impl KnowledgeService {
    pub fn new(config: &ServerConfig) -> Self {
        KnowledgeService {
            store_path: config.store_path.clone(),
            graph_path: config.graph_path.clone(),
            digest: config.digest,
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    /// Recompiles the graph from the store and returns the written document.
    ///
    /// A store that does not exist is a client error here: there is nothing
    /// the caller could have meant to visualize.
    pub fn rebuild_graph(&self) -> Result<GraphDocument, ApiError> {
        if !self.store_path.is_file() {
            return Err(ApiError::BadRequest(format!(
                "entry store not found at {}",
                self.store_path.display()
            )));
        }
        let ids = self.digest.generator();
        let rebuild = ops::rebuild_graph_with(&self.store_path, &self.graph_path, ids.as_ref())?;
        Ok(rebuild.document)
    }

    /// Returns the last emitted graph document.
    pub fn current_graph(&self) -> Result<GraphDocument, ApiError> {
        Ok(ops::read_graph(&self.graph_path)?)
    }

    /// Appends a raw batch, creating the store on first use.
    pub fn append_entries(&self, raw: &str) -> Result<AppendEntriesResponse, ApiError> {
        let added = ops::append_entries(&self.store_path, raw)?;
        Ok(AppendEntriesResponse {
            count: added.len(),
            added: added.into_iter().map(EntryView::from).collect(),
        })
    }

    pub fn tag_counts(&self) -> Result<TagCountsResponse, ApiError> {
        let counts = ops::tag_counts(&self.store_path)?;
        Ok(TagCountsResponse {
            tags: counts
                .into_iter()
                .map(|(tag, count)| TagCountView {
                    depth: depth_of(&tag),
                    tag,
                    count,
                })
                .collect(),
        })
    }

    pub fn tags_used(&self) -> Result<TagsUsedResponse, ApiError> {
        Ok(TagsUsedResponse {
            tags: ops::tags_used(&self.store_path)?,
        })
    }
}
