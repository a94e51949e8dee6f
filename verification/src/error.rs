//! Unexpected failures crossing the orchestrator's seams.
//!
//! Expected rejections (not linked, action not performed, already
//! verified) are not errors — they are [`VerifyFailure`] values returned
//! in the success channel.
//!
//! [`VerifyFailure`]: crate::orchestrator::VerifyFailure

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("farcaster verifier error: {0}")]
    Farcaster(#[from] taskgate_farcaster::NeynarError),

    #[error("twitter verifier error: {0}")]
    Twitter(#[from] taskgate_twitter::TwitterError),

    #[error("chain error: {0}")]
    Chain(#[from] taskgate_chain::ChainError),

    #[error("store error: {0}")]
    Store(#[from] taskgate_store::StoreError),

    #[error("{0}")]
    Other(String),
}
