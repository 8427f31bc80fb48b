//! Iterative project-tree traversal

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::trace;

use difftidy_host::{ProjectNode, WorkspaceModel};

use crate::error::EngineResult;

/// Depth-first walk over the host's project tree.
///
/// Parents come out before their children. The traversal is lazy, holds an
/// explicit stack instead of recursing, and guards against aliased or
/// cyclic node graphs with a visited set: a node is yielded at most once
/// no matter how often the host reports it.
pub struct ProjectTreeWalker {
    model: Arc<dyn WorkspaceModel>,
    stack: Vec<ProjectNode>,
    visited: HashSet<ProjectNode>,
    primed: bool,
}

impl ProjectTreeWalker {
    pub fn new(model: Arc<dyn WorkspaceModel>) -> Self {
        Self {
            model,
            stack: Vec::new(),
            visited: HashSet::new(),
            primed: false,
        }
    }

    /// Next unvisited node, or `None` when the tree is exhausted.
    pub async fn next_node(&mut self) -> EngineResult<Option<ProjectNode>> {
        if !self.primed {
            let mut roots = self.model.tree_roots().await?;
            roots.reverse();
            self.stack = roots;
            self.primed = true;
        }

        while let Some(node) = self.stack.pop() {
            if !self.visited.insert(node) {
                trace!(?node, "node already visited, skipping");
                continue;
            }
            let mut children = self.model.node_children(node).await?;
            children.reverse();
            self.stack.extend(children);
            return Ok(Some(node));
        }

        Ok(None)
    }

    /// Walk the whole tree and collect the file paths of document nodes.
    pub async fn collect_documents(mut self) -> EngineResult<Vec<PathBuf>> {
        let mut documents = Vec::new();
        while let Some(node) = self.next_node().await? {
            if let Some(path) = self.model.node_document(node).await? {
                documents.push(path);
            }
        }
        Ok(documents)
    }
}
