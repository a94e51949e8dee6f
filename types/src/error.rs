//! Parse errors for the core types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid task id: {0}")]
    InvalidTaskId(String),

    #[error("invalid social id: {0}")]
    InvalidSocialId(String),
}
