//! Workflow orchestration for difftidy
//!
//! This crate wires the other difftidy crates into the three workflows a
//! host exposes: format pending changes, format the whole workspace, and
//! reconcile no-op changes. The [`OrchestrationService`] is the single
//! entry point; it resolves the status backend for the current workspace,
//! feeds the [`DocumentPipeline`], and reports progress through the host
//! feedback channel.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use difftidy_actions::{standard_actions, CommandExecutor};
//! use difftidy_engine::{DocumentPipeline, OrchestrationService, WorkflowStatus};
//! use difftidy_host::{FileErrorLog, TracingFeedback};
//! use difftidy_vcs::GitProvider;
//!
//! # async fn run(model: Arc<dyn difftidy_host::WorkspaceModel>,
//! #              surface: Arc<dyn difftidy_host::EditSurface>) {
//! let log = Arc::new(FileErrorLog::in_temp_dir());
//! let feedback = Arc::new(TracingFeedback);
//! let executor = CommandExecutor::new(surface, feedback.clone(), log.clone());
//! let pipeline = DocumentPipeline::new(model.clone(), executor, standard_actions(), log.clone());
//! let service = OrchestrationService::new(
//!     model,
//!     vec![Arc::new(GitProvider::new(log.clone()))],
//!     pipeline,
//!     feedback,
//!     log,
//! );
//!
//! assert_eq!(service.format_pending_changes().await, WorkflowStatus::Completed);
//! # }
//! ```

pub mod error;
pub mod pipeline;
pub mod service;
pub mod walker;

pub use error::{EngineError, EngineResult};
pub use pipeline::{BatchOutcome, DocumentPipeline, FileOutcome};
pub use service::{OrchestrationService, WorkflowStatus};
pub use walker::ProjectTreeWalker;
