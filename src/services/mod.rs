//! Business logic services.
//!
//! The selection engine is pure logic; the review service composes it with
//! the database layer into the PR lifecycle operations. Both are independent
//! of the HTTP layer.

pub mod review;
pub mod selection;

pub use review::{ReviewService, ReviewStats};
