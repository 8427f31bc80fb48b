//! Status-provider capability trait

use async_trait::async_trait;

use crate::changes::{PendingChangeSet, WorkspaceIdentity};
use crate::error::Result;
use crate::reconcile::ReconcileSummary;

/// Capability trait for version-control backends.
///
/// Providers are probed in registration order; the first one that claims a
/// workspace serves all later calls for it. Probing must stay cheap and
/// side-effect free.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Whether this backend manages the workspace.
    ///
    /// `Ok(false)` means "not mine" and is never an error; callers move on
    /// to the next backend. `Err` means the backend should manage it but
    /// could not answer.
    async fn contains_workspace(&self, workspace: &WorkspaceIdentity) -> Result<bool>;

    /// All files with pending changes under the workspace root.
    ///
    /// Returns absolute paths, deduplicated case-insensitively. Only file
    /// items appear; directories are never pending changes.
    async fn query_pending_changes(&self, workspace: &WorkspaceIdentity)
        -> Result<PendingChangeSet>;

    /// Revert pending edits whose content is identical to their base
    /// revision.
    ///
    /// Decisions are made for the full change set first, then applied in
    /// one batched backend call. Changes that add, delete, or restore items
    /// are never touched, and a change whose content cannot be read is
    /// skipped and logged rather than reverted.
    async fn reconcile_no_op_changes(&self, workspace: &WorkspaceIdentity)
        -> Result<ReconcileSummary>;
}
