//! Workspace model trait: documents, open state, and the project tree

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::HostResult;
use crate::types::{BuildClassification, DocumentHandle, ProjectNode};

/// The host editor's document and project model.
///
/// All engine access to documents goes through this trait so that the engine
/// can be driven by any editor (or by in-memory fakes in tests). Calls are
/// serialized by the engine; implementations do not need to tolerate
/// concurrent mutation.
#[async_trait]
pub trait WorkspaceModel: Send + Sync {
    /// Root path of the loaded workspace, or `None` when nothing is open.
    async fn workspace_root(&self) -> HostResult<Option<PathBuf>>;

    /// Resolve a file path to a document handle.
    ///
    /// `None` means the host has no document item for the path (deleted,
    /// outside the project, or never loaded). That is not an error.
    async fn find_document(&self, path: &Path) -> HostResult<Option<DocumentHandle>>;

    /// Build-system classification for a document.
    ///
    /// `Ok(None)` means the host carries no build metadata for this
    /// document. Hosts without a build system may also fail the call;
    /// callers treat both the same way.
    async fn build_classification(
        &self,
        doc: DocumentHandle,
    ) -> HostResult<Option<BuildClassification>>;

    /// Whether the document is currently open in the editor.
    async fn is_open(&self, doc: DocumentHandle) -> HostResult<bool>;

    /// Open the document (no-op if already open).
    async fn open(&self, doc: DocumentHandle) -> HostResult<()>;

    /// Persist the document's buffer to disk.
    async fn save(&self, doc: DocumentHandle) -> HostResult<()>;

    /// Close the document without saving.
    async fn close(&self, doc: DocumentHandle) -> HostResult<()>;

    /// The document holding editor focus, if any.
    async fn active_document(&self) -> HostResult<Option<DocumentHandle>>;

    /// Give editor focus to the document.
    async fn activate(&self, doc: DocumentHandle) -> HostResult<()>;

    /// Top-level nodes of the project tree.
    async fn tree_roots(&self) -> HostResult<Vec<ProjectNode>>;

    /// Child nodes of a project-tree node.
    async fn node_children(&self, node: ProjectNode) -> HostResult<Vec<ProjectNode>>;

    /// File path of a node, or `None` for folders and virtual nodes.
    async fn node_document(&self, node: ProjectNode) -> HostResult<Option<PathBuf>>;
}
