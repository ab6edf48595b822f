//! Error types for ghostpace
//!
//! The delay pipeline itself never fails — invalid numerics are sanitized to
//! safe defaults at the point of failure (see `dist::sanitize`). Errors only
//! exist on the configuration surface.

use thiserror::Error;

/// Result type for ghostpace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ghostpace
#[derive(Debug, Error)]
pub enum Error {
    /// Device profile name not in the catalog
    #[error("Unknown device profile: {0}")]
    UnknownDeviceProfile(String),

    /// Personality profile name not in the catalog
    #[error("Unknown personality profile: {0}")]
    UnknownPersonalityProfile(String),

    /// A configuration knob is outside its valid range
    #[error("Invalid config value for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// Config (de)serialization error
    #[error("Config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Typing-indicator callback failure, surfaced for logging only
    #[error("Indicator callback failed: {0}")]
    Indicator(String),
}

impl Error {
    /// Create an invalid-config error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}
