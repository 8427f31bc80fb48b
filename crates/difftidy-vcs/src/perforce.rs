//! Perforce status backend
//!
//! Talks to the `p4` command-line client. A workspace is managed when the
//! client resolves a mapped client workspace whose root contains the
//! workspace path; pending changes are the files opened in that client.
//! Base content comes from the have-revision, so reconciliation compares
//! against what the developer actually synced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use difftidy_host::ErrorLog;

use crate::changes::{ChangeKind, PendingChangeSet, WorkspaceIdentity};
use crate::error::{ProviderError, Result};
use crate::provider::StatusProvider;
use crate::reconcile::{
    select_revertible, ContentHandle, PendingChangeRecord, ReconcileSummary,
};

/// Status provider backed by the `p4` CLI.
pub struct PerforceProvider {
    log: Arc<dyn ErrorLog>,
}

impl PerforceProvider {
    pub fn new(log: Arc<dyn ErrorLog>) -> Self {
        Self { log }
    }

    fn binary() -> Option<PathBuf> {
        which::which("p4").ok()
    }

    async fn run_p4(&self, cwd: &Path, args: &[&str]) -> Result<std::process::Output> {
        let binary = Self::binary()
            .ok_or_else(|| ProviderError::session("p4", "p4 binary not found"))?;
        let output = Command::new(&binary)
            .args(args)
            .current_dir(cwd)
            .output()
            .await?;
        Ok(output)
    }

    /// Files opened in the mapped client workspace, as ztag field maps.
    async fn opened_files(&self, root: &Path) -> Result<Vec<HashMap<String, String>>> {
        let output = self
            .run_p4(
                root,
                &["-ztag", "fstat", "-Ro", "-T", "clientFile,action", "..."],
            )
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // "nothing opened" comes back as a warning, not a result
            if stderr.contains("no such file") || stderr.contains("not opened") {
                return Ok(Vec::new());
            }
            return Err(ProviderError::session("p4", stderr.trim().to_string()));
        }
        Ok(parse_ztag(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn print_have(&self, cwd: &Path, client_file: &str) -> Result<Vec<u8>> {
        let spec = format!("{client_file}#have");
        let output = self.run_p4(cwd, &["print", "-q", &spec]).await?;
        if !output.status.success() {
            return Err(ProviderError::session(
                "p4",
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

/// Parse `p4 -ztag` output into per-record field maps.
///
/// Records are separated by blank lines; each field line reads
/// `... name value`.
fn parse_ztag(output: &str) -> Vec<HashMap<String, String>> {
    let mut records = Vec::new();
    let mut current: HashMap<String, String> = HashMap::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }
        let Some(rest) = line.strip_prefix("... ") else {
            continue;
        };
        match rest.split_once(' ') {
            Some((name, value)) => {
                current.insert(name.to_string(), value.to_string());
            }
            None => {
                current.insert(rest.to_string(), String::new());
            }
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Map a p4 open action to the provider-agnostic change kind.
fn change_kind_from_action(action: &str) -> ChangeKind {
    match action {
        "edit" | "integrate" => ChangeKind::edit(),
        "add" | "branch" | "move/add" => ChangeKind::add(),
        "delete" | "move/delete" => ChangeKind::delete(),
        other => {
            trace!("unrecognized p4 action: {other}");
            ChangeKind::default()
        }
    }
}

/// Whether `p4 info` fields describe a client workspace mapping `root`.
fn workspace_mapped(fields: &HashMap<String, String>, root: &Path) -> bool {
    let Some(client_name) = fields.get("clientName") else {
        return false;
    };
    if client_name == "*unknown*" {
        return false;
    }
    let Some(client_root) = fields.get("clientRoot") else {
        return false;
    };
    let root_key = PathBuf::from(root.to_string_lossy().to_lowercase());
    let client_key = PathBuf::from(client_root.to_lowercase());
    root_key.starts_with(&client_key)
}

#[async_trait]
impl StatusProvider for PerforceProvider {
    fn name(&self) -> &str {
        "perforce"
    }

    async fn contains_workspace(&self, workspace: &WorkspaceIdentity) -> Result<bool> {
        if Self::binary().is_none() {
            debug!("p4 binary not on PATH, workspace not managed");
            return Ok(false);
        }
        let output = self.run_p4(workspace.root(), &["-ztag", "info"]).await?;
        if !output.status.success() {
            debug!(
                "p4 info failed under {}: {}",
                workspace.root().display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(false);
        }
        let records = parse_ztag(&String::from_utf8_lossy(&output.stdout));
        let mapped = records
            .first()
            .is_some_and(|fields| workspace_mapped(fields, workspace.root()));
        Ok(mapped)
    }

    async fn query_pending_changes(
        &self,
        workspace: &WorkspaceIdentity,
    ) -> Result<PendingChangeSet> {
        let mut changes = PendingChangeSet::new();
        for fields in self.opened_files(workspace.root()).await? {
            let (Some(client_file), Some(action)) =
                (fields.get("clientFile"), fields.get("action"))
            else {
                continue;
            };
            if change_kind_from_action(action).is_edit {
                changes.insert(PathBuf::from(client_file));
            }
        }
        trace!(
            "Found {} opened files under {}",
            changes.len(),
            workspace.root().display()
        );
        Ok(changes)
    }

    async fn reconcile_no_op_changes(
        &self,
        workspace: &WorkspaceIdentity,
    ) -> Result<ReconcileSummary> {
        let root = workspace.root();
        let mut records = Vec::new();
        for fields in self.opened_files(root).await? {
            let (Some(client_file), Some(action)) =
                (fields.get("clientFile"), fields.get("action"))
            else {
                continue;
            };
            let kind = change_kind_from_action(action);
            // fetch base content only where a revert is even possible
            let base = if kind.is_content_revertible() {
                match self.print_have(root, client_file).await {
                    Ok(bytes) => ContentHandle::from_bytes(bytes),
                    Err(err) => ContentHandle::failing(err.to_string()),
                }
            } else {
                ContentHandle::from_bytes(Vec::new())
            };
            records.push(PendingChangeRecord {
                path: PathBuf::from(client_file),
                kind,
                base,
                local: ContentHandle::from_file(client_file),
            });
        }

        let log = Arc::clone(&self.log);
        let decision =
            tokio::task::spawn_blocking(move || select_revertible(records, log.as_ref()))
                .await
                .map_err(|err| ProviderError::Task(err.to_string()))?;
        if !decision.revert.is_empty() {
            let paths: Vec<String> = decision
                .revert
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            let mut args: Vec<&str> = vec!["revert"];
            args.extend(paths.iter().map(String::as_str));
            let output = self.run_p4(root, &args).await?;
            if !output.status.success() {
                return Err(ProviderError::session(
                    "p4",
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                ));
            }
            debug!("Reverted {} no-op changes via p4", paths.len());
        }

        Ok(ReconcileSummary::from_decision(&decision))
    }
}
