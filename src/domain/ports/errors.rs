use thiserror::Error;

/// Errors raised by external model backends (embedding and synthesis ports).
///
/// Services convert these into [`RagError`](crate::domain::RagError) kinds at
/// the pipeline boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Call timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether retrying the same call may succeed
    ///
    /// Timeouts, network errors, rate limits and 5xx responses are transient;
    /// configuration problems, 4xx responses and malformed payloads are not.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::NotConfigured(_) | Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(0)
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
