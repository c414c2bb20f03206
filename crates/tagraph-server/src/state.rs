//! Application state with a shared `KnowledgeService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>`. Holding the
//! lock for the whole of a request is what serializes rebuilds against
//! appends to the same store.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::KnowledgeService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<KnowledgeService>>,
}

impl AppState {
    /// Creates the state and makes sure the store and graph files exist.
    pub fn new(config: ServerConfig) -> Result<Self, ApiError> {
        tagraph_storage::ensure_store_exists(&config.store_path)?;
        tagraph_storage::GraphFile::new(&config.graph_path).ensure_exists()?;
        Ok(Self::without_init(config))
    }

    /// Creates the state without touching the filesystem.
    pub fn without_init(config: ServerConfig) -> Self {
        tracing::info!(
            store = %config.store_path.display(),
            graph = %config.graph_path.display(),
            digest = %config.digest,
            "configured knowledge service"
        );
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(KnowledgeService::new(&config))),
        }
    }
}
