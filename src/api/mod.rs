//! REST query surface over live state, alerts, and history.
//!
//! This is the only component external consumers talk to. Every endpoint
//! is read-only: handlers read already-materialized state and never block
//! on the ingestion loops.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/agents` - Latest reading per agent with liveness status
//! - `GET /api/v1/alerts` - Most recent alerts
//! - `GET /api/v1/history` - Most recent history records
//! - `GET /api/v1/history/range` - History records in a time range
//! - `GET /api/v1/statistics` - Aggregates over recent history
//! - `GET /api/v1/statistics/range` - Aggregates over a time range

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g. "127.0.0.1:9878")
    pub bind_addr: SocketAddr,

    /// Enable CORS for external dashboards
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9878)),
            enable_cors: true,
        }
    }
}

/// Build the router. Exposed separately so tests can drive it directly.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/agents", get(routes::agents::list_agents))
        .route("/api/v1/alerts", get(routes::alerts::recent_alerts))
        .route("/api/v1/history", get(routes::history::get_history))
        .route(
            "/api/v1/history/range",
            get(routes::history::get_history_range),
        )
        .route("/api/v1/statistics", get(routes::stats::get_statistics))
        .route(
            "/api/v1/statistics/range",
            get(routes::stats::get_statistics_range),
        )
        .with_state(state)
}

/// Spawn the API server in a background task, returning its local address.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    info!("starting API server on {}", config.bind_addr);

    let mut app = router(state).layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind API server on {}: {e}", config.bind_addr))?;
    let addr = listener.local_addr()?;

    info!("API server listening on {addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {e}");
        }
    });

    Ok(addr)
}
