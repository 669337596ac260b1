// Error handling module
// Defines the error type shared across the library

use thiserror::Error;

/// Errors that can occur while setting up or driving a load-test run.
///
/// Per-request failures are deliberately not represented here: a failed
/// request is printed and counted, never propagated.
#[derive(Error, Debug)]
pub enum LoadGenError {
    /// Run configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The shared HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type alias for load generator operations
pub type Result<T> = std::result::Result<T, LoadGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LoadGenError::InvalidConfig("rate must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: rate must be at least 1"
        );
    }
}
