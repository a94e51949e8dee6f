//! Router assembly and the serve loop.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use taskgate_verification::Orchestrator;

use crate::auth::{self, AuthMode};
use crate::error::RpcError;
use crate::metrics::GateMetrics;
use crate::routes;

/// Shared state behind every handler.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub metrics: GateMetrics,
    pub auth: AuthMode,
}

/// Build the full application router.
///
/// Health, the root banner, and the metrics exposition stay outside the
/// auth layer; everything under `/api/verify` except health requires the
/// shared secret.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/api/verify/farcaster/user/:fid",
            get(routes::farcaster_user),
        )
        .route(
            "/api/verify/farcaster/:action",
            post(routes::farcaster_verify),
        )
        .route("/api/verify/twitter/link", post(routes::twitter_link))
        .route("/api/verify/twitter/:action", post(routes::twitter_verify))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_secret,
        ));

    Router::new()
        .route("/", get(routes::root))
        .route("/api/verify/health", get(routes::health))
        .route("/metrics", get(routes::metrics))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.http_requests.inc();
    next.run(request).await
}

/// The HTTP server, configured with a port and shared state.
pub struct RpcServer {
    pub port: u16,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(port: u16, state: Arc<AppState>) -> Self {
        Self { port, state }
    }

    /// Start serving. Runs until ctrl-c.
    pub async fn start(&self) -> Result<(), RpcError> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        self.state.auth.announce();
        info!("verification API listening on {addr}");

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
