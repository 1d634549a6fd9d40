use reqwest::StatusCode;
use thiserror::Error;

/// A single failed acquisition attempt. Every variant is retried from a
/// fresh token bootstrap until the attempt ceiling is reached.
#[derive(Debug, Error)]
pub enum TransientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("session token missing from portal page")]
    TokenMissing,

    #[error("challenge image fetch failed: {0}")]
    ChallengeFetch(String),

    #[error("challenge produced no usable text")]
    ChallengeUnsolved,

    #[error("lookup returned HTTP {0}")]
    Status(StatusCode),

    #[error("portal rejected the lookup: {0}")]
    Rejected(String),

    #[error("result page malformed: {0}")]
    MalformedPage(String),
}

impl TransientError {
    pub fn is_malformed_page(&self) -> bool {
        matches!(self, Self::MalformedPage(_))
    }
}

/// Permanent acquisition failure for one candidate in one run. A not-found
/// result is not an error and is reported as a lookup outcome instead.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("{attempts} attempts exhausted for {cnr}, last failure: {last}")]
    Exhausted {
        cnr: String,
        attempts: u32,
        last: TransientError,
    },

    #[error("result page for {cnr} stayed malformed across all retries: {reason}")]
    MalformedPage { cnr: String, reason: String },
}
