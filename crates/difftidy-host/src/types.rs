//! Value types shared across the host contracts

use serde::{Deserialize, Serialize};

/// Opaque handle to a document known to the host editor.
///
/// Handles are issued by the host's [`WorkspaceModel`](crate::WorkspaceModel)
/// and are only meaningful to the host that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle(pub u64);

/// Opaque handle to a node in the host's project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectNode(pub u64);

/// How the host's build system treats a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildClassification {
    /// Not part of the build.
    None,
    /// Compiled source.
    Compile,
    /// Copied or served as content.
    Content,
    /// Embedded resource payload.
    EmbeddedResource,
}

/// A named command on the host's editing surface.
///
/// Commands are opaque to the engine; it only forwards them to the
/// [`EditSurface`](crate::EditSurface) and reacts to the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditCommand {
    name: String,
}

impl EditCommand {
    /// Create a command with an arbitrary host-specific name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The whole-document reformat command.
    pub fn format_document() -> Self {
        Self::new("format-document")
    }

    /// The import/using sorter command.
    pub fn sort_imports() -> Self {
        Self::new("sort-imports")
    }

    /// Command name as the host knows it.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for EditCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
