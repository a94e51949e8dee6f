//! Verification orchestration — the one multi-step operation in taskgate.
//!
//! `verify_and_mark_task` sequences the idempotence check, the
//! wallet-to-social-identity linkage check, the platform action
//! verification, and the on-chain write, in that order, with no retries
//! and no partial state except the idempotence record written on full
//! success.

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod request;

pub use error::VerificationError;
pub use gateway::{FarcasterGateway, FarcasterProfile, TaskMarker, TwitterGateway};
pub use orchestrator::{LinkResult, Orchestrator, VerifyFailure, VerifyResult};
pub use request::{FarcasterActionSpec, SocialAction, TwitterActionSpec, VerifyRequest};
