// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::domain::ConfigError),

    #[error("Agent panicked: {0}")]
    AgentPanicked(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeliveryError {
    /// Configuration errors are reported before any agent starts
    pub fn is_config(&self) -> bool {
        matches!(self, DeliveryError::Config(_))
    }
}

/// Result type alias using DeliveryError
pub type Result<T> = std::result::Result<T, DeliveryError>;
