//! Route handlers and the wire-level request/response types.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use taskgate_types::{Fid, TaskId, TwitterUserId, WalletAddress};
use taskgate_verification::{
    FarcasterActionSpec, LinkResult, SocialAction, TwitterActionSpec, VerifyRequest,
    VerifyResult,
};

use crate::server::AppState;

// ── Responses ────────────────────────────────────────────────────────────

/// The JSON shape every verification route responds with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_linkage: Option<bool>,
}

impl VerifyResponse {
    fn verified(tx_hash: String, block_number: u64) -> Self {
        Self {
            success: true,
            verified: Some(true),
            tx_hash: Some(tx_hash),
            block_number: Some(block_number),
            error: None,
            requires_linkage: None,
        }
    }

    fn rejected(error: String, requires_linkage: bool) -> Self {
        Self {
            success: false,
            verified: None,
            tx_hash: None,
            block_number: None,
            error: Some(error),
            requires_linkage: requires_linkage.then_some(true),
        }
    }
}

/// Input-validation and routing failures, mapped onto HTTP error codes.
/// Everything else the handlers return travels as a 200 with a structured
/// body — a quirk of the frontend contract this service preserves.
#[derive(Debug)]
pub enum ApiError {
    MissingFields(Vec<&'static str>),
    InvalidField { name: &'static str, detail: String },
    UnknownAction(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                format!("missing required fields: {}", fields.join(", ")),
            ),
            ApiError::InvalidField { name, detail } => {
                (StatusCode::BAD_REQUEST, format!("invalid {name}: {detail}"))
            }
            ApiError::UnknownAction(action) => {
                (StatusCode::NOT_FOUND, format!("unknown action: {action}"))
            }
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

// ── Request bodies ───────────────────────────────────────────────────────

/// Body of every `POST /api/verify/farcaster/{action}` call. Fields are
/// optional at the serde level so validation can report all missing ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterBody {
    pub user_address: Option<String>,
    pub task_id: Option<u64>,
    pub fid: Option<u64>,
    pub target_fid: Option<u64>,
    pub cast_hash: Option<String>,
}

/// Body of every `POST /api/verify/twitter/{action}` call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterBody {
    pub user_address: Option<String>,
    pub task_id: Option<u64>,
    pub user_id: Option<String>,
    pub target_user_id: Option<String>,
    pub tweet_id: Option<String>,
}

/// Body of `POST /api/verify/twitter/link`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBody {
    pub user_id: Option<String>,
    pub user_address: Option<String>,
    pub verification_code: Option<String>,
}

fn parse_wallet(raw: &str) -> Result<WalletAddress, ApiError> {
    WalletAddress::parse(raw).map_err(|e| ApiError::InvalidField {
        name: "userAddress",
        detail: e.to_string(),
    })
}

impl FarcasterBody {
    /// Validate the fields the given action requires and build the
    /// orchestrator request.
    fn into_request(self, action: &str) -> Result<VerifyRequest, ApiError> {
        let mut missing = Vec::new();
        if self.user_address.is_none() {
            missing.push("userAddress");
        }
        if self.task_id.is_none() {
            missing.push("taskId");
        }
        if self.fid.is_none() {
            missing.push("fid");
        }
        match action {
            "follow" => {
                if self.target_fid.is_none() {
                    missing.push("targetFid");
                }
            }
            "like" | "recast" | "quote" | "comment" => {
                if self.cast_hash.is_none() {
                    missing.push("castHash");
                }
            }
            other => return Err(ApiError::UnknownAction(format!("farcaster {other}"))),
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let user_address = parse_wallet(&self.user_address.unwrap())?;
        let fid = Fid(self.fid.unwrap());
        let action_spec = match action {
            "follow" => FarcasterActionSpec::Follow {
                target_fid: Fid(self.target_fid.unwrap()),
            },
            "like" => FarcasterActionSpec::Like {
                cast_hash: self.cast_hash.unwrap(),
            },
            "recast" => FarcasterActionSpec::Recast {
                cast_hash: self.cast_hash.unwrap(),
            },
            "quote" => FarcasterActionSpec::Quote {
                cast_hash: self.cast_hash.unwrap(),
            },
            _ => FarcasterActionSpec::Comment {
                cast_hash: self.cast_hash.unwrap(),
            },
        };

        Ok(VerifyRequest {
            user_address,
            task_id: TaskId(self.task_id.unwrap()),
            action: SocialAction::Farcaster { fid, action: action_spec },
        })
    }
}

impl TwitterBody {
    fn into_request(self, action: &str) -> Result<VerifyRequest, ApiError> {
        let mut missing = Vec::new();
        if self.user_address.is_none() {
            missing.push("userAddress");
        }
        if self.task_id.is_none() {
            missing.push("taskId");
        }
        if self.user_id.is_none() {
            missing.push("userId");
        }
        match action {
            "follow" => {
                if self.target_user_id.is_none() {
                    missing.push("targetUserId");
                }
            }
            "like" | "retweet" | "quote" | "comment" => {
                if self.tweet_id.is_none() {
                    missing.push("tweetId");
                }
            }
            other => return Err(ApiError::UnknownAction(format!("twitter {other}"))),
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let user_address = parse_wallet(&self.user_address.unwrap())?;
        let user_id = TwitterUserId::new(self.user_id.unwrap());
        let action_spec = match action {
            "follow" => TwitterActionSpec::Follow {
                target_user_id: TwitterUserId::new(self.target_user_id.unwrap()),
            },
            "like" => TwitterActionSpec::Like {
                tweet_id: self.tweet_id.unwrap(),
            },
            "retweet" => TwitterActionSpec::Retweet {
                tweet_id: self.tweet_id.unwrap(),
            },
            "quote" => TwitterActionSpec::Quote {
                tweet_id: self.tweet_id.unwrap(),
            },
            _ => TwitterActionSpec::Comment {
                tweet_id: self.tweet_id.unwrap(),
            },
        };

        Ok(VerifyRequest {
            user_address,
            task_id: TaskId(self.task_id.unwrap()),
            action: SocialAction::Twitter { user_id, action: action_spec },
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "taskgate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&state.metrics.registry.gather(), &mut buf) {
        return ApiError::Internal(format!("metrics encoding failed: {e}")).into_response();
    }
    (
        [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
        buf,
    )
        .into_response()
}

pub async fn farcaster_verify(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
    Json(body): Json<FarcasterBody>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request = body.into_request(&action)?;
    run_verification(&state, request).await
}

pub async fn twitter_verify(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
    Json(body): Json<TwitterBody>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request = body.into_request(&action)?;
    run_verification(&state, request).await
}

async fn run_verification(
    state: &AppState,
    request: VerifyRequest,
) -> Result<Json<VerifyResponse>, ApiError> {
    state.metrics.verify_attempts.inc();
    let started = Instant::now();
    let result = state.orchestrator.verify_and_mark_task(&request).await;
    state
        .metrics
        .verify_latency_ms
        .observe(started.elapsed().as_millis() as f64);

    match result {
        Ok(VerifyResult::Verified {
            tx_hash,
            block_number,
        }) => {
            state.metrics.verify_confirmed.inc();
            Ok(Json(VerifyResponse::verified(tx_hash, block_number)))
        }
        Ok(VerifyResult::Rejected(failure)) => {
            state.metrics.verify_rejected.inc();
            Ok(Json(VerifyResponse::rejected(
                failure.message(),
                failure.requires_linkage(),
            )))
        }
        Err(e) => {
            state.metrics.verify_errors.inc();
            error!(error = %e, "verification failed unexpectedly");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

pub async fn twitter_link(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LinkBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut missing = Vec::new();
    if body.user_id.is_none() {
        missing.push("userId");
    }
    if body.user_address.is_none() {
        missing.push("userAddress");
    }
    if body.verification_code.is_none() {
        missing.push("verificationCode");
    }
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let user_id = TwitterUserId::new(body.user_id.unwrap());
    let wallet = parse_wallet(&body.user_address.unwrap())?;
    let code = body.verification_code.unwrap();

    match state.orchestrator.link_twitter(&user_id, &wallet, &code).await {
        Ok(LinkResult::Linked) => {
            state.metrics.linkages_created.inc();
            Ok(Json(json!({ "success": true, "linked": true })))
        }
        Ok(LinkResult::Rejected(failure)) => Ok(Json(json!({
            "success": false,
            "error": failure.message(),
        }))),
        Err(e) => {
            error!(error = %e, "twitter linking failed unexpectedly");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

pub async fn farcaster_user(
    State(state): State<Arc<AppState>>,
    Path(fid): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.orchestrator.farcaster_profile(Fid(fid)).await {
        Ok(profile) => Ok(Json(json!({ "success": true, "user": profile }))),
        Err(e) => {
            error!(fid, error = %e, "profile lookup failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farcaster_body_reports_every_missing_field() {
        let body = FarcasterBody {
            user_address: None,
            task_id: None,
            fid: None,
            target_fid: None,
            cast_hash: None,
        };
        match body.into_request("follow") {
            Err(ApiError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["userAddress", "taskId", "fid", "targetFid"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn farcaster_like_requires_cast_hash_not_target_fid() {
        let body = FarcasterBody {
            user_address: Some("0xabc0000000000000000000000000000000000abc".into()),
            task_id: Some(1),
            fid: Some(1000),
            target_fid: None,
            cast_hash: None,
        };
        match body.into_request("like") {
            Err(ApiError::MissingFields(fields)) => assert_eq!(fields, vec!["castHash"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn unknown_farcaster_action_is_rejected() {
        let body = FarcasterBody {
            user_address: Some("0xabc0000000000000000000000000000000000abc".into()),
            task_id: Some(1),
            fid: Some(1000),
            target_fid: None,
            cast_hash: Some("0xcast".into()),
        };
        assert!(matches!(
            body.into_request("boost"),
            Err(ApiError::UnknownAction(_))
        ));
    }

    #[test]
    fn invalid_wallet_is_a_400_not_a_missing_field() {
        let body = TwitterBody {
            user_address: Some("garbage".into()),
            task_id: Some(1),
            user_id: Some("55".into()),
            target_user_id: Some("66".into()),
            tweet_id: None,
        };
        assert!(matches!(
            body.into_request("follow"),
            Err(ApiError::InvalidField { name: "userAddress", .. })
        ));
    }

    #[test]
    fn valid_twitter_body_builds_a_request() {
        let body = TwitterBody {
            user_address: Some("0xABC0000000000000000000000000000000000abc".into()),
            task_id: Some(9),
            user_id: Some("55".into()),
            target_user_id: None,
            tweet_id: Some("777".into()),
        };
        let request = body.into_request("retweet").unwrap();
        assert_eq!(request.task_id, TaskId(9));
        assert_eq!(request.action.describe(), "twitter retweet");
        // Address was normalized on the way in.
        assert_eq!(
            request.user_address.as_str(),
            "0xabc0000000000000000000000000000000000abc"
        );
    }

    #[test]
    fn success_response_serializes_camel_case_without_nulls() {
        let resp = VerifyResponse::verified("0xaa".into(), 7);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["txHash"], "0xaa");
        assert_eq!(json["blockNumber"], 7);
        assert!(json.get("error").is_none());
        assert!(json.get("requiresLinkage").is_none());
    }

    #[test]
    fn rejection_response_includes_requires_linkage_only_when_set() {
        let resp = VerifyResponse::rejected("no wallet linked".into(), true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["requiresLinkage"], true);

        let resp = VerifyResponse::rejected("not verified".into(), false);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("requiresLinkage").is_none());
    }
}
