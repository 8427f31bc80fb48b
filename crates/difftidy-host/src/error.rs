//! Error types for host collaborators

use thiserror::Error;

use crate::types::{DocumentHandle, ProjectNode};

/// Result type for host model calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Errors raised by the host's workspace model
#[derive(Debug, Error)]
pub enum HostError {
    /// No workspace is currently loaded
    #[error("no workspace is loaded")]
    NoWorkspace,

    /// The handle does not refer to a live document
    #[error("unknown document handle {0:?}")]
    UnknownDocument(DocumentHandle),

    /// The handle does not refer to a live project node
    #[error("unknown project node {0:?}")]
    UnknownNode(ProjectNode),

    /// The host does not implement this operation
    #[error("operation not supported by this host: {operation}")]
    Unsupported { operation: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other host-side failure
    #[error("host call failed: {message}")]
    Host { message: String },
}

impl HostError {
    /// Shorthand for an opaque host-side failure.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Shorthand for an unimplemented host operation.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }
}

/// Failures raised by the editing command surface.
///
/// `CallRejected` and `Faulted` are the surface's transient codes: the call
/// may succeed if repeated. Everything else is permanent for that command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The surface was busy with another caller and rejected the call
    #[error("command surface rejected the call")]
    CallRejected,

    /// The surface failed without further detail
    #[error("command surface faulted")]
    Faulted,

    /// The surface does not know the command
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The command ran and reported a failure
    #[error("command failed: {0}")]
    Failed(String),
}
