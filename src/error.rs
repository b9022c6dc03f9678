use reqwest::StatusCode;

/// Failure of a single outbound fetch. There is no retry; the next
/// scheduled tick is the retry.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}
