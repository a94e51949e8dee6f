//! HTTP API for the taskgate verification oracle.
//!
//! All verification routes live under `/api/verify` and speak the JSON
//! contract the rewards frontend expects: camelCase fields, a `success`
//! boolean, and structured `success:false` payloads for expected
//! rejections. Only health, the root banner, and the metrics exposition
//! are reachable without the shared `X-API-SECRET`.

pub mod auth;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;

pub use auth::AuthMode;
pub use error::RpcError;
pub use metrics::GateMetrics;
pub use server::{AppState, RpcServer};
