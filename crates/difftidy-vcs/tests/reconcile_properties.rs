//! Property tests for the no-op reconciliation decision logic

use std::path::PathBuf;

use proptest::prelude::*;

use difftidy_host::ErrorLog;
use difftidy_vcs::{select_revertible, ChangeKind, ContentHandle, PendingChangeRecord};

struct SilentLog;

impl ErrorLog for SilentLog {
    fn append(&self, _message: &str) {}
}

fn record(kind: ChangeKind, base: Vec<u8>, local: Vec<u8>) -> PendingChangeRecord {
    PendingChangeRecord {
        path: PathBuf::from("/ws/file.cs"),
        kind,
        base: ContentHandle::from_bytes(base),
        local: ContentHandle::from_bytes(local),
    }
}

fn change_kind_strategy() -> impl Strategy<Value = ChangeKind> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(is_edit, is_add, is_delete, is_local_delete, is_undelete)| ChangeKind {
                is_edit,
                is_add,
                is_delete,
                is_local_delete,
                is_undelete,
            },
        )
}

proptest! {
    /// A pure edit is selected exactly when both sides are byte-identical.
    #[test]
    fn prop_edit_selected_iff_content_equal(
        base in proptest::collection::vec(any::<u8>(), 0..512),
        local in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let equal = base == local;
        let decision = select_revertible(
            vec![record(ChangeKind::edit(), base, local)],
            &SilentLog,
        );
        prop_assert_eq!(decision.revert.len(), usize::from(equal));
        prop_assert_eq!(decision.examined, 1);
        prop_assert_eq!(decision.unreadable, 0);
    }

    /// Identical content never rescues a change that is not a pure edit.
    #[test]
    fn prop_non_pure_edits_never_selected(
        kind in change_kind_strategy(),
        content in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(!kind.is_content_revertible());
        let decision = select_revertible(
            vec![record(kind, content.clone(), content)],
            &SilentLog,
        );
        prop_assert!(decision.revert.is_empty());
    }

    /// Selection decisions are independent across records in a batch.
    #[test]
    fn prop_batch_decisions_are_per_record(
        contents in proptest::collection::vec(
            (proptest::collection::vec(any::<u8>(), 0..64), any::<bool>()),
            0..8,
        ),
    ) {
        let mut expected = 0usize;
        let records: Vec<PendingChangeRecord> = contents
            .into_iter()
            .map(|(bytes, flip)| {
                let mut local = bytes.clone();
                if flip {
                    local.push(0xFF);
                } else {
                    expected += 1;
                }
                record(ChangeKind::edit(), bytes, local)
            })
            .collect();
        let decision = select_revertible(records, &SilentLog);
        prop_assert_eq!(decision.revert.len(), expected);
    }
}
