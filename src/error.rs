use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("extraction error: {0}")]
    Extraction(String),
    #[error("network error: {message}")]
    Network {
        status: Option<u16>,
        message: String,
    },
    #[error("rate limited: {0}")]
    RateLimit(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<PublishError>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Transient remote failures are worth another attempt; bad credentials
    /// or bad input never get better by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PublishError::Network { .. } | PublishError::RateLimit(_)
        )
    }

    /// Remote status code, when the failure came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PublishError::Network { status, .. } => *status,
            PublishError::RetriesExhausted { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
