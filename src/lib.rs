//! Review Rota - reviewer assignment service for pull requests.
//!
//! Assigns reviewers to new pull requests at random from the author's team,
//! replaces reviewers mid-review without breaking assignment invariants, and
//! reports per-user review statistics. The library exposes the data model,
//! database layer, and service logic; the binary wires them to an axum HTTP
//! API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
