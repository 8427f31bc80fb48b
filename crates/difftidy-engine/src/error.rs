//! Error types for the orchestration engine

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors that can end a workflow body early
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host's workspace model failed
    #[error("host error: {0}")]
    Host(#[from] difftidy_host::HostError),

    /// A version-control backend failed
    #[error("provider error: {0}")]
    Provider(#[from] difftidy_vcs::ProviderError),
}
