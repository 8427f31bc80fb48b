//! Error types for status-provider operations

use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while talking to a version-control backend
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Git repository error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid repository state
    #[error("invalid repository state: {message}")]
    InvalidState { message: String },

    /// A backend session or subprocess call failed
    #[error("{backend} session failed: {message}")]
    Session { backend: String, message: String },

    /// A blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),
}

impl ProviderError {
    /// Shorthand for an invalid-state failure.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Shorthand for a backend session failure.
    pub fn session(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Session {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
