//! Server binary: config, database, HTTP API.

use review_rota::api::{server, AppState};
use review_rota::config::Config;
use review_rota::db;
use review_rota::services::ReviewService;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::initialize(&config.db_path).await?;
    log::info!("database ready at {}", config.db_path.display());

    let service = ReviewService::new(pool, config.max_reviewers);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    server::serve(config.bind_addr, AppState { service }, shutdown).await?;
    Ok(())
}
