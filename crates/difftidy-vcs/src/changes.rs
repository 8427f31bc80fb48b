//! Workspace identity and the pending-change data model

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Identity of a workspace root.
///
/// Compared and hashed case-insensitively so that differently-cased
/// spellings of one root resolve to the same backend cache entry.
#[derive(Debug, Clone)]
pub struct WorkspaceIdentity {
    root: PathBuf,
    key: String,
}

impl WorkspaceIdentity {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let key = path_key(&root);
        Self { root, key }
    }

    /// Workspace root path as given.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Case-folded key suitable for cache maps.
    pub fn cache_key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for WorkspaceIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for WorkspaceIdentity {}

impl Hash for WorkspaceIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for WorkspaceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

/// Flag set describing what a pending change does to its item.
///
/// Backends may set several flags at once; a moved file is an add under its
/// new path, and centralized backends report restore-from-delete as
/// undelete. Only a pure content edit is ever a candidate for automatic
/// reversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeKind {
    pub is_edit: bool,
    pub is_add: bool,
    pub is_delete: bool,
    pub is_local_delete: bool,
    pub is_undelete: bool,
}

impl ChangeKind {
    /// Plain content edit.
    pub fn edit() -> Self {
        Self {
            is_edit: true,
            ..Self::default()
        }
    }

    /// New item.
    pub fn add() -> Self {
        Self {
            is_add: true,
            ..Self::default()
        }
    }

    /// Scheduled deletion.
    pub fn delete() -> Self {
        Self {
            is_delete: true,
            ..Self::default()
        }
    }

    /// Deleted locally without telling the backend.
    pub fn local_delete() -> Self {
        Self {
            is_local_delete: true,
            ..Self::default()
        }
    }

    /// Restore of a previously deleted item.
    pub fn undelete() -> Self {
        Self {
            is_undelete: true,
            ..Self::default()
        }
    }

    /// Whether reverting on content equality is safe for this change.
    ///
    /// True only for a pure edit. Any add/delete/local-delete/undelete flag
    /// disqualifies the change, even when the edit flag is also set.
    pub fn is_content_revertible(&self) -> bool {
        self.is_edit
            && !self.is_add
            && !self.is_delete
            && !self.is_local_delete
            && !self.is_undelete
    }
}

/// Set of files with pending changes, deduplicated case-insensitively.
///
/// The first spelling of a path wins; later case variants are dropped.
/// Status queries build a fresh set per call and hand it over read-only.
#[derive(Debug, Clone, Default)]
pub struct PendingChangeSet {
    by_key: HashMap<String, PathBuf>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut set = Self::new();
        for path in paths {
            set.insert(path);
        }
        set
    }

    /// Add a path; returns false when a case variant was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        let key = path_key(&path);
        if self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(key, path);
        true
    }

    /// Membership test, case-insensitive.
    pub fn contains(&self, path: &Path) -> bool {
        self.by_key.contains_key(&path_key(path))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Paths in a stable sorted order for deterministic processing.
    pub fn sorted_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.by_key.values().cloned().collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_identity_case_insensitive() {
        let a = WorkspaceIdentity::new("/Home/Dev/Project");
        let b = WorkspaceIdentity::new("/home/dev/project");
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        // original spelling is preserved
        assert_eq!(a.root(), Path::new("/Home/Dev/Project"));
    }

    #[test]
    fn test_change_kind_pure_edit_is_revertible() {
        assert!(ChangeKind::edit().is_content_revertible());
    }

    #[test]
    fn test_change_kind_other_flags_block_reversion() {
        assert!(!ChangeKind::add().is_content_revertible());
        assert!(!ChangeKind::delete().is_content_revertible());
        assert!(!ChangeKind::local_delete().is_content_revertible());
        assert!(!ChangeKind::undelete().is_content_revertible());

        let edit_plus_add = ChangeKind {
            is_edit: true,
            is_add: true,
            ..ChangeKind::default()
        };
        assert!(!edit_plus_add.is_content_revertible());

        let edit_plus_undelete = ChangeKind {
            is_edit: true,
            is_undelete: true,
            ..ChangeKind::default()
        };
        assert!(!edit_plus_undelete.is_content_revertible());
    }

    #[test]
    fn test_pending_change_set_dedups_case_variants() {
        let mut set = PendingChangeSet::new();
        assert!(set.insert(PathBuf::from("/ws/Src/File.cs")));
        assert!(!set.insert(PathBuf::from("/ws/src/file.CS")));
        assert_eq!(set.len(), 1);
        // first spelling wins
        assert_eq!(set.sorted_paths(), vec![PathBuf::from("/ws/Src/File.cs")]);
    }

    #[test]
    fn test_pending_change_set_contains_ignores_case() {
        let set = PendingChangeSet::from_paths([PathBuf::from("/ws/a.ts")]);
        assert!(set.contains(Path::new("/ws/A.TS")));
        assert!(!set.contains(Path::new("/ws/b.ts")));
    }

    #[test]
    fn test_sorted_paths_are_ordered() {
        let set = PendingChangeSet::from_paths([
            PathBuf::from("/ws/b.cs"),
            PathBuf::from("/ws/a.cs"),
            PathBuf::from("/ws/c.cs"),
        ]);
        assert_eq!(
            set.sorted_paths(),
            vec![
                PathBuf::from("/ws/a.cs"),
                PathBuf::from("/ws/b.cs"),
                PathBuf::from("/ws/c.cs"),
            ]
        );
    }
}
