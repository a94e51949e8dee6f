use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid chain configuration: {0}")]
    Config(String),

    #[error("verifier wallet {0} does not hold VERIFIER_ROLE")]
    MissingVerifierRole(String),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("transaction dropped from mempool before confirmation")]
    TransactionDropped,

    #[error("rpc provider error: {0}")]
    Provider(String),
}
