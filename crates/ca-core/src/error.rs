//! Error types for the compliance agent

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the compliance agent
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Coarse grouping of errors for callers that render user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The model provider refused the call because the quota is spent
    QuotaExhausted,
    Timeout,
    Configuration,
    Generic,
}

impl Error {
    /// Whether the provider rejected the call with a rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited(_))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::RateLimited(_) => ErrorCategory::QuotaExhausted,
            Error::Timeout(_) => ErrorCategory::Timeout,
            Error::Configuration(_) | Error::Authentication(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Generic,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_distinguishable() {
        let err = Error::RateLimited("429 Too Many Requests".to_string());
        assert!(err.is_rate_limited());
        assert_eq!(err.category(), ErrorCategory::QuotaExhausted);

        let err = Error::LlmProvider("500 Internal Server Error".to_string());
        assert!(!err.is_rate_limited());
        assert_eq!(err.category(), ErrorCategory::Generic);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::Timeout("grade".to_string()).category(),
            ErrorCategory::Timeout
        );
        assert_eq!(
            Error::Authentication("bad key".to_string()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            Error::Configuration("missing key".to_string()).category(),
            ErrorCategory::Configuration
        );
    }
}
