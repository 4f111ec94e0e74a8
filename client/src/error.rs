//! Error handling for the dashboard client
//!
//! Every failure path returns the dashboard to its pre-action state; nothing
//! here is fatal to the process and no operation is retried automatically.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Caught before any network call; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// HTTP error response from the backend, carrying its message when present.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Sell rejected by the backend for lack of stock.
    #[error("Not enough quantity: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// Transport-level failure (connection refused, timeout, bad TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_carries_counts() {
        let err = AppError::InsufficientStock {
            available: 1,
            requested: 5,
        };
        let text = err.to_string();
        assert!(text.contains("1 available"));
        assert!(text.contains("5 requested"));
    }

    #[test]
    fn test_validation_from_static_rule_message() {
        let err = AppError::validation("Please enter a bay location");
        assert_eq!(err.to_string(), "Please enter a bay location");
    }
}
