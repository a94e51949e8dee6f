//! Shared-secret authentication for the verification routes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::server::AppState;

/// Header carrying the shared secret.
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// How the verification routes are protected.
///
/// Fail-open is an explicit operator choice, never an implicit fallback:
/// the daemon refuses to start with no secret unless
/// `insecure_allow_unauthenticated` was set, and [`AuthMode::Insecure`]
/// announces itself loudly at startup.
#[derive(Clone, Debug)]
pub enum AuthMode {
    /// Every protected route requires `X-API-SECRET` to equal this value.
    Secret(String),
    /// All requests pass. For local development only.
    Insecure,
}

impl AuthMode {
    /// Log the active mode at startup.
    pub fn announce(&self) {
        match self {
            AuthMode::Secret(_) => debug!("api secret auth enabled"),
            AuthMode::Insecure => warn!(
                "INSECURE MODE: api secret auth disabled, all requests accepted"
            ),
        }
    }
}

/// Middleware gating every verification route.
pub async fn require_api_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match &state.auth {
        AuthMode::Insecure => {
            debug!("insecure mode: accepting unauthenticated request");
            next.run(request).await
        }
        AuthMode::Secret(secret) => {
            let provided = request
                .headers()
                .get(API_SECRET_HEADER)
                .and_then(|v| v.to_str().ok());
            if provided == Some(secret.as_str()) {
                next.run(request).await
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "error": "invalid or missing X-API-SECRET header",
                    })),
                )
                    .into_response()
            }
        }
    }
}
