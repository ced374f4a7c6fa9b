//! Service configuration from environment variables.

use crate::error::AppError;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Reviewer-slot cap applied at PR creation.
    pub max_reviewers: usize,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let db_path = PathBuf::from(env_or("REVIEW_ROTA_DB", "review-rota.db"));

        let addr = env_or("REVIEW_ROTA_ADDR", "0.0.0.0:8080");
        let bind_addr: SocketAddr = addr.parse().map_err(|_| {
            AppError::invalid_input_field(
                format!("invalid bind address: {}", addr),
                "REVIEW_ROTA_ADDR",
            )
        })?;

        let max = env_or("REVIEW_ROTA_MAX_REVIEWERS", "2");
        let max_reviewers: usize = max.parse().map_err(|_| {
            AppError::invalid_input_field(
                format!("invalid reviewer count: {}", max),
                "REVIEW_ROTA_MAX_REVIEWERS",
            )
        })?;

        Ok(Self {
            db_path,
            bind_addr,
            max_reviewers,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
