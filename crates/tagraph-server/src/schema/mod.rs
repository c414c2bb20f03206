//! API schema types for request/response definitions.
//!
//! Graph endpoints return [`tagraph_core::GraphDocument`] directly; the
//! modules here cover the store endpoints.

pub mod entries;
pub mod tags;
