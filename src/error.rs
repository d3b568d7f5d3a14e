//! Error taxonomy for the display pipeline.
//!
//! None of these ever escape into the timer tasks or the controller loop:
//! fetch failures keep the last good frame, malformed documents degrade field
//! by field, and configuration problems turn into a no-rotation state.

/// The result type used by the display core.
pub type Result<T> = std::result::Result<T, DisplayError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DisplayError {
    /// A catalog or detail/credits fetch failed.
    #[error("fetch failed: {message}")]
    FetchFailure { message: String },

    /// A fetched document cannot be used as-is.
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {message}")]
    ConfigurationInvalid { message: String },
}

impl DisplayError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchFailure {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationInvalid {
            message: message.into(),
        }
    }
}
