use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Twitter API unreachable: {0}")]
    Unreachable(String),

    #[error("Twitter request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from Twitter: {0}")]
    InvalidResponse(String),

    #[error("failed to verify {action}: {source}")]
    Verify {
        action: &'static str,
        #[source]
        source: Box<TwitterError>,
    },
}

impl TwitterError {
    pub fn verifying(action: &'static str) -> impl FnOnce(TwitterError) -> TwitterError {
        move |source| TwitterError::Verify {
            action,
            source: Box::new(source),
        }
    }
}
