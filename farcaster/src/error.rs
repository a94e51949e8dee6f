use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeynarError {
    #[error("Neynar unreachable: {0}")]
    Unreachable(String),

    #[error("Neynar request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from Neynar: {0}")]
    InvalidResponse(String),

    #[error("unknown fid {0}")]
    UnknownFid(u64),

    #[error("failed to verify {action}: {source}")]
    Verify {
        action: &'static str,
        #[source]
        source: Box<NeynarError>,
    },
}

impl NeynarError {
    /// Wrap an error with the action being verified, matching the
    /// "failed to verify follow: …" surface the callers report.
    pub fn verifying(action: &'static str) -> impl FnOnce(NeynarError) -> NeynarError {
        move |source| NeynarError::Verify {
            action,
            source: Box::new(source),
        }
    }
}
