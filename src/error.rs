//! Error types for the dashboard worker
//!
//! Uses thiserror for ergonomic error definitions.
//! All errors are non-panicking; handlers convert them to JSON payloads
//! at the boundary so nothing escapes as a worker fault.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, MarketError>;

/// Market data and analysis errors
#[derive(Error, Debug)]
pub enum MarketError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure or timeout reaching an upstream API
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the exchange
    #[error("Upstream error: HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body does not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Language-model call failed (network, auth, quota)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Bad request parameters from the dashboard
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl MarketError {
    /// Stable machine-readable tag so the UI can distinguish failure
    /// classes without matching on message text.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::Config(_) => "config",
            MarketError::Transport(_) => "transport",
            MarketError::Upstream { .. } => "upstream",
            MarketError::Parse(_) => "parse",
            MarketError::Analysis(_) => "analysis",
            MarketError::BadRequest(_) => "bad_request",
            MarketError::Json(_) => "json",
            MarketError::Worker(_) => "worker",
        }
    }
}

impl From<worker::Error> for MarketError {
    fn from(err: worker::Error) -> Self {
        MarketError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Transport(err.to_string())
    }
}

impl From<MarketError> for worker::Error {
    fn from(err: MarketError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::Upstream {
            status: 500,
            message: "internal".into(),
        };
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(MarketError::Transport("x".into()).kind(), "transport");
        assert_eq!(
            MarketError::Upstream {
                status: 404,
                message: String::new()
            }
            .kind(),
            "upstream"
        );
        assert_eq!(MarketError::Analysis("x".into()).kind(), "analysis");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: MarketError = json_err.into();
        assert!(matches!(err, MarketError::Json(_)));
    }
}
