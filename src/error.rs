//! Error types for the radio skill.

use crate::profile::ProfileError;

/// Top-level error type for request dispatch and skill setup.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// No registered handler accepted the request.
    #[error("no handler matched {kind} request")]
    NoHandlerMatched {
        /// Request kind as it appeared on the wire.
        kind: String,
    },

    /// A handler panicked while building its response.
    #[error("handler `{handler}` panicked")]
    HandlerPanicked {
        /// Name of the handler that panicked.
        handler: String,
    },

    /// The stream catalog has no entries to play.
    #[error("stream catalog is empty")]
    EmptyCatalog,

    /// An intent handler ran against a request that carries no intent.
    #[error("request carries no intent")]
    MissingIntent,

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Profile read or forward error.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SkillError>;
