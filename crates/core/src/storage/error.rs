use thiserror::Error;

/// Errors that can occur during strategy construction or operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// Missing or invalid setup. Raised before any network activity.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Failure reported by the backing store or its client.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },
    /// The key listing response did not have the expected shape.
    #[error("Could not resolve keys: {0}")]
    Enumeration(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StrategyError {
    /// Builds a transport error for the given operation.
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }
}

/// Result type for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;
