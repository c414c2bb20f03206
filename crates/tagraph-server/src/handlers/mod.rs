//! HTTP handler modules.
//!
//! Each handler parses the request, acquires the service lock, delegates to
//! [`crate::service::KnowledgeService`] and returns JSON. No business logic
//! lives in handlers.

pub mod entries;
pub mod graph;
pub mod health;
pub mod tags;
