//! API Server Module
//! 
//! Builds the axum router over the validator service and serves it.

use super::handlers;
use crate::{config::Config, service::ValidatorService};
use axum::{
    routing::{get, patch},
    Router,
};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

/// Shared application state accessible from every handler
///
/// - `service`: validator business logic
/// - `pool`: database handle, used directly only by the health check
/// - `request_timeout`: bound on each service call
#[derive(Clone)]
pub struct AppState {
    pub service: ValidatorService,
    pub pool: SqlitePool,
    pub request_timeout: Duration,
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/validators",
            get(handlers::list_validators).post(handlers::create_validator),
        )
        .route("/validators/:pubkey", get(handlers::get_validator))
        .route(
            "/validators/:pubkey/status",
            patch(handlers::update_validator_status),
        )
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The HTTP server
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    pub fn new(config: Config, service: ValidatorService, pool: SqlitePool) -> Self {
        let state = AppState {
            service,
            pool,
            request_timeout: Duration::from_millis(config.api.request_timeout_ms),
        };

        Self { config, state }
    }

    /// Bind to the configured address and serve until the process exits
    pub async fn start(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
