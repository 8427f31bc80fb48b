//! Git status backend

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use git2::build::CheckoutBuilder;
use git2::{Repository, Status, StatusOptions};
use tracing::{debug, trace};

use difftidy_host::ErrorLog;

use crate::changes::{ChangeKind, PendingChangeSet, WorkspaceIdentity};
use crate::error::{ProviderError, Result};
use crate::provider::StatusProvider;
use crate::reconcile::{
    select_revertible, ContentHandle, PendingChangeRecord, ReconcileSummary,
};

/// Status provider backed by a Git repository.
///
/// All libgit2 work runs on the blocking pool; the provider itself holds no
/// repository handle and can be shared freely.
pub struct GitProvider {
    log: Arc<dyn ErrorLog>,
}

impl GitProvider {
    pub fn new(log: Arc<dyn ErrorLog>) -> Self {
        Self { log }
    }

    fn open_repository(root: &Path) -> Result<(Repository, PathBuf)> {
        let repo = Repository::discover(root)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| ProviderError::invalid_state("repository has no working directory"))?
            .to_path_buf();
        Ok((repo, workdir))
    }

    fn status_options() -> StatusOptions {
        let mut options = StatusOptions::new();
        options.include_untracked(true);
        options.recurse_untracked_dirs(true);
        options.include_ignored(false);
        options
    }
}

const PENDING: Status = Status::WT_MODIFIED
    .union(Status::WT_NEW)
    .union(Status::INDEX_NEW)
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_RENAMED)
    .union(Status::WT_RENAMED);

/// Map a git2 status to the provider-agnostic change kind.
fn change_kind_from_status(status: Status) -> ChangeKind {
    ChangeKind {
        is_edit: status.intersects(Status::WT_MODIFIED | Status::INDEX_MODIFIED),
        is_add: status.intersects(
            Status::WT_NEW
                | Status::INDEX_NEW
                | Status::INDEX_RENAMED
                | Status::WT_RENAMED
                | Status::INDEX_TYPECHANGE
                | Status::WT_TYPECHANGE,
        ),
        is_delete: status.intersects(Status::INDEX_DELETED),
        is_local_delete: status.intersects(Status::WT_DELETED),
        is_undelete: false,
    }
}

#[async_trait]
impl StatusProvider for GitProvider {
    fn name(&self) -> &str {
        "git"
    }

    async fn contains_workspace(&self, workspace: &WorkspaceIdentity) -> Result<bool> {
        let root = workspace.root().to_path_buf();
        tokio::task::spawn_blocking(move || match Repository::discover(&root) {
            Ok(repo) => Ok(repo.workdir().is_some()),
            Err(err) => {
                debug!("No Git repository above {}: {}", root.display(), err);
                Ok(false)
            }
        })
        .await
        .map_err(|err| ProviderError::Task(err.to_string()))?
    }

    async fn query_pending_changes(
        &self,
        workspace: &WorkspaceIdentity,
    ) -> Result<PendingChangeSet> {
        let root = workspace.root().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let (repo, workdir) = Self::open_repository(&root)?;
            let statuses = repo.statuses(Some(&mut Self::status_options()))?;

            let mut changes = PendingChangeSet::new();
            for entry in statuses.iter() {
                if !entry.status().intersects(PENDING) {
                    continue;
                }
                if let Some(path) = entry.path() {
                    changes.insert(workdir.join(path));
                }
            }

            trace!(
                "Found {} pending changes under {}",
                changes.len(),
                workdir.display()
            );
            Ok(changes)
        })
        .await
        .map_err(|err| ProviderError::Task(err.to_string()))?
    }

    async fn reconcile_no_op_changes(
        &self,
        workspace: &WorkspaceIdentity,
    ) -> Result<ReconcileSummary> {
        let root = workspace.root().to_path_buf();
        let log = Arc::clone(&self.log);
        tokio::task::spawn_blocking(move || {
            let (repo, workdir) = Self::open_repository(&root)?;
            let head_tree = match repo.head() {
                Ok(head) => Some(head.peel_to_tree()?),
                Err(err) => {
                    debug!("Repository has no HEAD yet: {}", err);
                    None
                }
            };

            let statuses = repo.statuses(Some(&mut Self::status_options()))?;
            let mut records = Vec::new();
            for entry in statuses.iter() {
                let Some(rel) = entry.path() else { continue };
                let kind = change_kind_from_status(entry.status());
                let base = match head_tree
                    .as_ref()
                    .and_then(|tree| tree.get_path(Path::new(rel)).ok())
                {
                    Some(tree_entry) => match repo.find_blob(tree_entry.id()) {
                        Ok(blob) => ContentHandle::from_bytes(blob.content().to_vec()),
                        Err(err) => ContentHandle::failing(format!(
                            "base object of {rel} is not a readable blob: {err}"
                        )),
                    },
                    None => ContentHandle::failing(format!("no base revision for {rel}")),
                };
                let local_path = workdir.join(rel);
                records.push(PendingChangeRecord {
                    path: local_path.clone(),
                    kind,
                    base,
                    local: ContentHandle::from_file(local_path),
                });
            }

            let decision = select_revertible(records, log.as_ref());
            if !decision.revert.is_empty() {
                let rel_paths: Vec<PathBuf> = decision
                    .revert
                    .iter()
                    .filter_map(|path| {
                        path.strip_prefix(&workdir).ok().map(Path::to_path_buf)
                    })
                    .collect();

                let head = repo.head()?.peel_to_commit()?;
                repo.reset_default(
                    Some(&head.into_object()),
                    rel_paths.iter().map(PathBuf::as_path),
                )?;

                let mut checkout = CheckoutBuilder::new();
                checkout.force();
                for rel in &rel_paths {
                    checkout.path(rel.as_path());
                }
                repo.checkout_head(Some(&mut checkout))?;

                debug!("Reverted {} no-op changes under {}", rel_paths.len(), workdir.display());
            }

            Ok(ReconcileSummary::from_decision(&decision))
        })
        .await
        .map_err(|err| ProviderError::Task(err.to_string()))?
    }
}
