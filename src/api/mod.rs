//! HTTP transport layer.
//!
//! Thin adapters over the review service: route handlers, error mapping to
//! stable codes, and server lifecycle.

pub mod routes;
pub mod server;

pub use server::AppState;
