//! HTTP/JSON wrapper around the tagraph store and graph compiler.
//!
//! Exposes "rebuild graph" and a handful of store operations as REST
//! endpoints. Handlers are thin; every operation goes through
//! [`service::KnowledgeService`], which delegates to `tagraph_storage::ops`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
