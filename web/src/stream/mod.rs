//! Event-stream HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the `/events` endpoint.
//! The core infrastructure (Manager, ClientRegistry, wire message types)
//! lives in the `sse` crate to avoid circular dependencies.

pub(crate) mod handler;
