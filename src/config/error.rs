//! Configuration error types.

use thiserror::Error;

/// Errors raised while validating or applying a setting change.
///
/// None of these are fatal: the store keeps its last valid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The change targets a stream that does not exist.
    #[error("there is no log stream called {0:?}")]
    UnknownStream(String),

    /// The change names a setting that does not exist.
    #[error("there is no configuration setting called {0:?}")]
    UnknownSetting(String),

    /// The value has the wrong type or content for its setting.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// A severity name was not recognised.
    #[error("invalid log level {0:?}")]
    InvalidSeverity(String),
}

impl ConfigError {
    pub(crate) fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
