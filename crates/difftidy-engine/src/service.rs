//! Workflow orchestration
//!
//! The service owns the three user-facing workflows and everything they
//! share: the provider registry with its per-workspace resolution cache,
//! the document pipeline, and the single-flight gate that keeps workflows
//! from overlapping. Workflows never panic the host: any error ends the
//! body, lands in the error log, and the completion message still goes
//! out.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use difftidy_host::{ErrorLog, StatusFeedback, WorkspaceModel};
use difftidy_vcs::{StatusProvider, WorkspaceIdentity};

use crate::error::EngineResult;
use crate::pipeline::DocumentPipeline;
use crate::walker::ProjectTreeWalker;

const FORMAT_PENDING_LABEL: &str = "Format pending changes";
const FORMAT_WORKSPACE_LABEL: &str = "Format workspace";
const RECONCILE_LABEL: &str = "Reconcile unchanged files";

/// How a workflow invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// The body ran to the end.
    Completed,
    /// The body failed; the failure is in the error log.
    Faulted,
    /// Another workflow held the gate; nothing was done.
    AlreadyRunning,
}

/// Entry point tying providers, actions, and the host together.
pub struct OrchestrationService {
    model: Arc<dyn WorkspaceModel>,
    providers: Vec<Arc<dyn StatusProvider>>,
    pipeline: DocumentPipeline,
    feedback: Arc<dyn StatusFeedback>,
    log: Arc<dyn ErrorLog>,
    /// workspace cache key -> index into `providers`, or None for
    /// "no backend manages this workspace"; entries are never replaced
    provider_cache: Mutex<HashMap<String, Option<usize>>>,
    gate: tokio::sync::Mutex<()>,
}

impl OrchestrationService {
    pub fn new(
        model: Arc<dyn WorkspaceModel>,
        providers: Vec<Arc<dyn StatusProvider>>,
        pipeline: DocumentPipeline,
        feedback: Arc<dyn StatusFeedback>,
        log: Arc<dyn ErrorLog>,
    ) -> Self {
        Self {
            model,
            providers,
            pipeline,
            feedback,
            log,
            provider_cache: Mutex::new(HashMap::new()),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Format every file that currently has a pending change.
    ///
    /// Without a workspace, a managing backend, or pending changes the
    /// workflow completes as a no-op.
    pub async fn format_pending_changes(&self) -> WorkflowStatus {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!(workflow = FORMAT_PENDING_LABEL, "another workflow is running");
            return WorkflowStatus::AlreadyRunning;
        };
        self.feedback
            .publish(&format!("\"{FORMAT_PENDING_LABEL}\" ..."));
        let result = self.format_pending_changes_inner().await;
        self.conclude(FORMAT_PENDING_LABEL, result)
    }

    /// Format every file in the project tree, ignoring pending state.
    pub async fn format_workspace(&self) -> WorkflowStatus {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!(workflow = FORMAT_WORKSPACE_LABEL, "another workflow is running");
            return WorkflowStatus::AlreadyRunning;
        };
        self.feedback
            .publish(&format!("\"{FORMAT_WORKSPACE_LABEL}\" ..."));
        let result = self.format_workspace_inner().await;
        self.conclude(FORMAT_WORKSPACE_LABEL, result)
    }

    /// Revert pending changes that are byte-identical to their base.
    pub async fn reconcile_no_op_changes(&self) -> WorkflowStatus {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!(workflow = RECONCILE_LABEL, "another workflow is running");
            return WorkflowStatus::AlreadyRunning;
        };
        self.feedback.publish(&format!("\"{RECONCILE_LABEL}\" ..."));
        let result = self.reconcile_inner().await;
        self.conclude(RECONCILE_LABEL, result)
    }

    /// Whether a workflow could start right now.
    ///
    /// True when a workspace is loaded and no workflow is running. Meant
    /// for menu enablement; the answer can go stale immediately.
    pub async fn can_execute(&self) -> bool {
        if self.gate.try_lock().is_err() {
            return false;
        }
        matches!(self.model.workspace_root().await, Ok(Some(_)))
    }

    fn conclude(&self, label: &str, result: EngineResult<()>) -> WorkflowStatus {
        let status = match result {
            Ok(()) => WorkflowStatus::Completed,
            Err(err) => {
                error!(workflow = label, error = %err, "workflow failed");
                self.log.append(&format!("Big catch: {err}"));
                WorkflowStatus::Faulted
            }
        };
        self.feedback.publish(&format!("\"{label}\" completed."));
        status
    }

    async fn format_pending_changes_inner(&self) -> EngineResult<()> {
        let Some(root) = self.model.workspace_root().await? else {
            debug!("no workspace loaded");
            return Ok(());
        };
        let workspace = WorkspaceIdentity::new(root);
        let Some(provider) = self.resolve_provider(&workspace).await else {
            debug!(workspace = %workspace, "no backend manages this workspace");
            return Ok(());
        };

        let changes = provider.query_pending_changes(&workspace).await?;
        if changes.is_empty() {
            debug!(workspace = %workspace, "nothing pending");
            return Ok(());
        }

        let outcome = self.pipeline.run_batch(&changes.sorted_paths()).await;
        info!(
            formatted = outcome.formatted,
            skipped = outcome.skipped,
            failed = outcome.failed.len(),
            "pending-change format pass done"
        );
        Ok(())
    }

    async fn format_workspace_inner(&self) -> EngineResult<()> {
        if self.model.workspace_root().await?.is_none() {
            debug!("no workspace loaded");
            return Ok(());
        }

        let walker = ProjectTreeWalker::new(Arc::clone(&self.model));
        let documents = walker.collect_documents().await?;
        if documents.is_empty() {
            debug!("project tree holds no documents");
            return Ok(());
        }

        let outcome = self.pipeline.run_batch(&documents).await;
        info!(
            formatted = outcome.formatted,
            skipped = outcome.skipped,
            failed = outcome.failed.len(),
            "workspace format pass done"
        );
        Ok(())
    }

    async fn reconcile_inner(&self) -> EngineResult<()> {
        let Some(root) = self.model.workspace_root().await? else {
            debug!("no workspace loaded");
            return Ok(());
        };
        let workspace = WorkspaceIdentity::new(root);
        let Some(provider) = self.resolve_provider(&workspace).await else {
            debug!(workspace = %workspace, "no backend manages this workspace");
            return Ok(());
        };

        let summary = provider.reconcile_no_op_changes(&workspace).await?;
        info!(
            examined = summary.examined,
            reverted = summary.reverted,
            unreadable = summary.unreadable,
            "reconcile pass done"
        );
        Ok(())
    }

    /// Resolve the backend for a workspace, probing in registration order.
    ///
    /// The first positive probe wins and is cached. "No backend" is cached
    /// too, but only when every probe answered cleanly; a failed probe
    /// leaves the entry unset so a later run can try again.
    async fn resolve_provider(
        &self,
        workspace: &WorkspaceIdentity,
    ) -> Option<Arc<dyn StatusProvider>> {
        if let Some(cached) = self
            .provider_cache
            .lock()
            .get(workspace.cache_key())
            .copied()
        {
            return cached.map(|index| Arc::clone(&self.providers[index]));
        }

        let mut all_probes_answered = true;
        let mut found = None;
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.contains_workspace(workspace).await {
                Ok(true) => {
                    debug!(provider = provider.name(), workspace = %workspace, "backend claimed workspace");
                    found = Some(index);
                    break;
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(provider = provider.name(), error = %err, "backend probe failed");
                    all_probes_answered = false;
                }
            }
        }

        match found {
            Some(index) => {
                self.provider_cache
                    .lock()
                    .entry(workspace.cache_key().to_string())
                    .or_insert(Some(index));
                Some(Arc::clone(&self.providers[index]))
            }
            None => {
                if all_probes_answered {
                    self.provider_cache
                        .lock()
                        .entry(workspace.cache_key().to_string())
                        .or_insert(None);
                }
                None
            }
        }
    }
}
