//! difftidy version-control backends
//!
//! This crate answers three questions for the formatting engine, uniformly
//! across backends:
//! - Does a version-control system manage this workspace?
//! - Which files have pending changes right now?
//! - Which pending edits are byte-identical to their base revision and can
//!   be reverted as formatting no-ops?
//!
//! Two backends ship: [`GitProvider`] on top of libgit2, and
//! [`PerforceProvider`] on top of the `p4` command-line client. Both
//! implement the [`StatusProvider`] capability trait; the engine probes
//! providers in registration order and caches the winner per workspace.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use difftidy_host::FileErrorLog;
//! use difftidy_vcs::{GitProvider, StatusProvider, WorkspaceIdentity};
//!
//! let log = Arc::new(FileErrorLog::in_temp_dir());
//! let provider = GitProvider::new(log);
//! let workspace = WorkspaceIdentity::new("/home/dev/project");
//!
//! if provider.contains_workspace(&workspace).await? {
//!     let changes = provider.query_pending_changes(&workspace).await?;
//!     println!("{} files pending", changes.len());
//! }
//! ```

pub mod changes;
pub mod error;
pub mod git;
pub mod perforce;
pub mod provider;
pub mod reconcile;

pub use changes::{ChangeKind, PendingChangeSet, WorkspaceIdentity};
pub use error::{ProviderError, Result};
pub use git::GitProvider;
pub use perforce::PerforceProvider;
pub use provider::StatusProvider;
pub use reconcile::{
    select_revertible, ContentHandle, PendingChangeRecord, ReconcileSummary, RevertDecision,
};
