//! Property-based tests for pending-change identity
//!
//! Pending paths are compared the way Windows-rooted version control
//! compares them: case-insensitively, keeping the first reported spelling.

use std::collections::HashSet;
use std::path::PathBuf;

use proptest::prelude::*;

use difftidy_vcs::PendingChangeSet;

/// Strategy for lowercase path segments.
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

/// Strategy for multi-segment relative paths.
fn path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..4)
}

/// Strategy for a per-character uppercase mask.
fn mask_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..32)
}

fn join(segments: &[String]) -> PathBuf {
    let mut path = PathBuf::from("/ws");
    for segment in segments {
        path.push(segment);
    }
    path
}

fn flip_case(path: &PathBuf, mask: &[bool]) -> PathBuf {
    let flipped: String = path
        .to_string_lossy()
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            if mask.get(index).copied().unwrap_or(false) {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect();
    PathBuf::from(flipped)
}

#[test]
fn prop_case_variants_collapse_to_one_change() {
    proptest!(|(
        segments in path_strategy(),
        masks in prop::collection::vec(mask_strategy(), 1..5),
    )| {
        let original = join(&segments);
        let mut set = PendingChangeSet::new();
        prop_assert!(set.insert(original.clone()));

        for mask in &masks {
            let variant = flip_case(&original, mask);
            prop_assert!(!set.insert(variant));
        }

        prop_assert_eq!(set.len(), 1);
        prop_assert_eq!(set.sorted_paths(), vec![original]);
    });
}

#[test]
fn prop_first_reported_spelling_is_kept() {
    proptest!(|(segments in path_strategy(), mask in mask_strategy())| {
        let lower = join(&segments);
        let variant = flip_case(&lower, &mask);

        let mut set = PendingChangeSet::new();
        set.insert(variant.clone());
        set.insert(lower);

        prop_assert_eq!(set.sorted_paths(), vec![variant]);
    });
}

#[test]
fn prop_distinct_paths_are_all_kept() {
    proptest!(|(names in prop::collection::vec(segment_strategy(), 1..6))| {
        let unique: HashSet<String> = names.iter().cloned().collect();

        let mut set = PendingChangeSet::new();
        for name in &unique {
            set.insert(PathBuf::from(format!("/ws/{name}.cs")));
        }

        prop_assert_eq!(set.len(), unique.len());
    });
}
