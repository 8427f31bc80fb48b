//! Per-document formatting pipeline
//!
//! One flow per file: resolve the document, work out which actions apply,
//! open it, run the actions through the retrying executor, save, and put
//! the open state back the way it was. The batch variant keeps going past
//! per-file failures and reports every file that never completed in one
//! aggregated error-log block.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use difftidy_actions::{CommandExecutor, DocumentDescriptor, FormatAction};
use difftidy_host::{ErrorLog, WorkspaceModel};

use crate::error::EngineResult;

/// How the pipeline disposed of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Actions ran and the document was saved.
    Formatted,
    /// The host has no document for the path.
    NoDocument,
    /// No registered action applies.
    NoActions,
}

/// Tally of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Files formatted and saved.
    pub formatted: usize,
    /// Files skipped (no document or no applicable action).
    pub skipped: usize,
    /// Files whose pipeline run failed part-way.
    pub failed: Vec<PathBuf>,
}

/// Applies the action registry to documents through the host model.
pub struct DocumentPipeline {
    model: Arc<dyn WorkspaceModel>,
    executor: CommandExecutor,
    actions: Vec<Arc<dyn FormatAction>>,
    log: Arc<dyn ErrorLog>,
}

impl DocumentPipeline {
    pub fn new(
        model: Arc<dyn WorkspaceModel>,
        executor: CommandExecutor,
        actions: Vec<Arc<dyn FormatAction>>,
        log: Arc<dyn ErrorLog>,
    ) -> Self {
        Self {
            model,
            executor,
            actions,
            log,
        }
    }

    /// Run every applicable action against one file.
    ///
    /// A file without a document or without applicable actions is a skip,
    /// not an error. Action failures are already retried and logged by the
    /// executor and do not stop the remaining actions; model failures
    /// (open, save, close) abort this file.
    pub async fn run_for_path(&self, path: &Path) -> EngineResult<FileOutcome> {
        let Some(doc) = self.model.find_document(path).await? else {
            trace!(file = %path.display(), "no document for path, skipping");
            return Ok(FileOutcome::NoDocument);
        };

        // classification lookup is allowed to fail; that only means the
        // compile-gated actions will not match
        let build = match self.model.build_classification(doc).await {
            Ok(build) => build,
            Err(err) => {
                debug!(file = %path.display(), error = %err, "build classification unavailable");
                None
            }
        };

        let descriptor = DocumentDescriptor::new(path, build);
        let applicable: Vec<&Arc<dyn FormatAction>> = self
            .actions
            .iter()
            .filter(|action| action.applies_to(&descriptor))
            .collect();
        if applicable.is_empty() {
            trace!(file = %path.display(), "no applicable actions");
            return Ok(FileOutcome::NoActions);
        }

        let was_open = self.model.is_open(doc).await?;
        self.model.open(doc).await?;

        for action in applicable {
            trace!(file = %path.display(), action = action.name(), "running action");
            let _ = self.executor.execute(action.command(), doc, path).await;
        }

        self.model.save(doc).await?;
        if !was_open {
            self.model.close(doc).await?;
        }

        Ok(FileOutcome::Formatted)
    }

    /// Run the pipeline over a batch of files.
    ///
    /// Processing continues past per-file failures. A path leaves the
    /// remaining set only when its run fully completes; whatever is left
    /// afterwards goes into one aggregated error-log block. Editor focus
    /// is restored to the previously active document on a best-effort
    /// basis.
    pub async fn run_batch(&self, paths: &[PathBuf]) -> BatchOutcome {
        let focused = self.model.active_document().await.unwrap_or_default();

        let mut remaining: BTreeSet<PathBuf> = paths.iter().cloned().collect();
        let mut outcome = BatchOutcome::default();

        for path in paths {
            match self.run_for_path(path).await {
                Ok(FileOutcome::Formatted) => {
                    outcome.formatted += 1;
                    remaining.remove(path);
                }
                Ok(FileOutcome::NoDocument) | Ok(FileOutcome::NoActions) => {
                    outcome.skipped += 1;
                    remaining.remove(path);
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "pipeline failed for file");
                    outcome.failed.push(path.clone());
                }
            }
        }

        if let Some(doc) = focused {
            if let Err(err) = self.model.activate(doc).await {
                debug!(error = %err, "could not restore editor focus");
            }
        }

        if !remaining.is_empty() {
            let mut listing = String::from("The following files were not formatted:");
            for path in &remaining {
                listing.push('\n');
                listing.push_str(&path.display().to_string());
            }
            self.log.append(&listing);
        }

        outcome
    }
}
