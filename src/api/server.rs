//! HTTP server setup and lifecycle.
//!
//! Builds the axum application and serves it until the shutdown token
//! fires, at which point in-flight requests are drained gracefully.

use crate::api::routes::api_routes;
use crate::services::ReviewService;
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

/// Shared state for the API routes.
#[derive(Clone)]
pub struct AppState {
    pub service: ReviewService,
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind `addr` and serve the API until `shutdown` is cancelled.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("server listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;

    log::info!("server stopped");
    Ok(())
}
