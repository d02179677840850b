//! Error handling module
//!
//! Centralized error type for settings assembly.

/// Settings-wide Result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is missing.")]
    MissingRequired(&'static str),

    #[error("Invalid value for environment variable {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        reason: String,
    },
}

impl ConfigError {
    /// Name of the environment variable this error is about.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::MissingRequired(key) => key,
            ConfigError::InvalidValue { key, .. } => key,
        }
    }

    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}
