use thiserror::Error;

/// Failures while talking to a lyrics store.
///
/// Lookups fold these into `StoreLookup::Unavailable`; only writes surface them.
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("server rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
