//! No-op change reconciliation
//!
//! After a formatting pass, some pending changes turn out to be
//! byte-identical to their base revision (the formatter undid the only
//! difference, or the file never really changed). The decision logic here is
//! backend-agnostic: backends build [`PendingChangeRecord`]s with lazy
//! content handles for both sides, and [`select_revertible`] decides which
//! paths are safe to revert. Applying the reverts stays with the backend,
//! batched into a single session call.

use std::io::{Cursor, Read};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{trace, warn};

use difftidy_host::ErrorLog;

use crate::changes::ChangeKind;

/// Lazily opened byte source for one side of a pending change.
///
/// Single use: opening consumes the handle. Opening or reading may fail,
/// and a failure means the owning record is skipped, never reverted.
pub struct ContentHandle {
    open: Box<dyn FnOnce() -> std::io::Result<Box<dyn Read + Send>> + Send>,
}

impl ContentHandle {
    /// Content already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            open: Box::new(move || Ok(Box::new(Cursor::new(bytes)) as Box<dyn Read + Send>)),
        }
    }

    /// Content read from a file on demand.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            open: Box::new(move || {
                let file = std::fs::File::open(&path)?;
                Ok(Box::new(file) as Box<dyn Read + Send>)
            }),
        }
    }

    /// A handle that fails to open with the given message.
    ///
    /// Used by backends for records whose base content cannot be served
    /// (missing base revision, non-file object in the way).
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            open: Box::new(move || Err(std::io::Error::new(std::io::ErrorKind::Other, message))),
        }
    }

    /// Arbitrary open logic, mainly for tests.
    pub fn from_fn(
        open: impl FnOnce() -> std::io::Result<Box<dyn Read + Send>> + Send + 'static,
    ) -> Self {
        Self {
            open: Box::new(open),
        }
    }

    /// Open the byte stream, consuming the handle.
    pub fn open(self) -> std::io::Result<Box<dyn Read + Send>> {
        (self.open)()
    }
}

impl std::fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentHandle(..)")
    }
}

/// One pending change as a backend sees it during reconciliation.
#[derive(Debug)]
pub struct PendingChangeRecord {
    /// Absolute local path of the changed item.
    pub path: PathBuf,
    /// What the change does to the item.
    pub kind: ChangeKind,
    /// Content of the base revision the change was made against.
    pub base: ContentHandle,
    /// Current local content.
    pub local: ContentHandle,
}

/// Decision set produced by [`select_revertible`].
#[derive(Debug, Default)]
pub struct RevertDecision {
    /// Paths whose pending change is content-identical to its base.
    pub revert: Vec<PathBuf>,
    /// Records inspected.
    pub examined: usize,
    /// Records dropped because a content stream failed to read.
    pub unreadable: usize,
}

/// Outcome of one reconciliation pass, as reported to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Pending changes inspected.
    pub examined: usize,
    /// Changes reverted because base and local content matched.
    pub reverted: usize,
    /// Changes skipped because a content stream could not be read.
    pub unreadable: usize,
}

impl ReconcileSummary {
    pub fn from_decision(decision: &RevertDecision) -> Self {
        Self {
            examined: decision.examined,
            reverted: decision.revert.len(),
            unreadable: decision.unreadable,
        }
    }
}

/// Decide which pending changes are no-ops safe to revert.
///
/// Only pure content edits are candidates; any add/delete/local-delete/
/// undelete flag keeps the record untouched regardless of content. Both
/// sides are digested and compared; a record whose base or local stream
/// cannot be read is counted unreadable, logged, and kept. The caller
/// applies the returned paths in one batched backend call.
pub fn select_revertible(
    records: Vec<PendingChangeRecord>,
    log: &dyn ErrorLog,
) -> RevertDecision {
    let mut decision = RevertDecision::default();
    for record in records {
        decision.examined += 1;
        if !record.kind.is_content_revertible() {
            trace!(path = %record.path.display(), "change is not a pure edit, keeping");
            continue;
        }
        let base = match digest_of(record.base) {
            Ok(digest) => digest,
            Err(err) => {
                decision.unreadable += 1;
                warn!(path = %record.path.display(), error = %err, "base content unreadable");
                log.append(&format!(
                    "Could not compare \"{}\" against its base revision: {}",
                    record.path.display(),
                    err
                ));
                continue;
            }
        };
        let local = match digest_of(record.local) {
            Ok(digest) => digest,
            Err(err) => {
                decision.unreadable += 1;
                warn!(path = %record.path.display(), error = %err, "local content unreadable");
                log.append(&format!(
                    "Could not read local content of \"{}\": {}",
                    record.path.display(),
                    err
                ));
                continue;
            }
        };
        if base == local {
            trace!(path = %record.path.display(), "content matches base, reverting");
            decision.revert.push(record.path);
        }
    }
    decision
}

fn digest_of(handle: ContentHandle) -> std::io::Result<[u8; 32]> {
    let mut reader = handle.open()?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentLog;

    impl ErrorLog for SilentLog {
        fn append(&self, _message: &str) {}
    }

    struct CollectingLog(std::sync::Mutex<Vec<String>>);

    impl CollectingLog {
        fn new() -> Self {
            Self(std::sync::Mutex::new(Vec::new()))
        }

        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ErrorLog for CollectingLog {
        fn append(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn edit_record(path: &str, base: &[u8], local: &[u8]) -> PendingChangeRecord {
        PendingChangeRecord {
            path: PathBuf::from(path),
            kind: ChangeKind::edit(),
            base: ContentHandle::from_bytes(base.to_vec()),
            local: ContentHandle::from_bytes(local.to_vec()),
        }
    }

    #[test]
    fn test_identical_edit_is_selected() {
        let decision = select_revertible(
            vec![edit_record("/ws/a.cs", b"class A {}\n", b"class A {}\n")],
            &SilentLog,
        );
        assert_eq!(decision.revert, vec![PathBuf::from("/ws/a.cs")]);
        assert_eq!(decision.examined, 1);
        assert_eq!(decision.unreadable, 0);
    }

    #[test]
    fn test_single_byte_difference_is_kept() {
        let decision = select_revertible(
            vec![edit_record("/ws/a.cs", b"class A {}\n", b"class B {}\n")],
            &SilentLog,
        );
        assert!(decision.revert.is_empty());
        assert_eq!(decision.examined, 1);
    }

    #[test]
    fn test_non_edit_kinds_are_never_selected() {
        let kinds = [
            ChangeKind::add(),
            ChangeKind::delete(),
            ChangeKind::local_delete(),
            ChangeKind::undelete(),
            ChangeKind {
                is_edit: true,
                is_add: true,
                ..ChangeKind::default()
            },
        ];
        for kind in kinds {
            let record = PendingChangeRecord {
                path: PathBuf::from("/ws/same.cs"),
                kind,
                base: ContentHandle::from_bytes(b"same".to_vec()),
                local: ContentHandle::from_bytes(b"same".to_vec()),
            };
            let decision = select_revertible(vec![record], &SilentLog);
            assert!(decision.revert.is_empty(), "kind {kind:?} must not revert");
        }
    }

    #[test]
    fn test_unreadable_base_skips_and_logs() {
        let log = CollectingLog::new();
        let record = PendingChangeRecord {
            path: PathBuf::from("/ws/a.cs"),
            kind: ChangeKind::edit(),
            base: ContentHandle::failing("server went away"),
            local: ContentHandle::from_bytes(b"text".to_vec()),
        };
        let decision = select_revertible(vec![record], &log);
        assert!(decision.revert.is_empty());
        assert_eq!(decision.unreadable, 1);
        let messages = log.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("/ws/a.cs"));
        assert!(messages[0].contains("server went away"));
    }

    #[test]
    fn test_unreadable_local_skips_and_logs() {
        let log = CollectingLog::new();
        let record = PendingChangeRecord {
            path: PathBuf::from("/ws/gone.cs"),
            kind: ChangeKind::edit(),
            base: ContentHandle::from_bytes(b"text".to_vec()),
            local: ContentHandle::from_file("/no/such/file/anywhere.cs"),
        };
        let decision = select_revertible(vec![record], &log);
        assert!(decision.revert.is_empty());
        assert_eq!(decision.unreadable, 1);
        assert!(log.messages()[0].contains("gone.cs"));
    }

    #[test]
    fn test_mixed_batch_decides_per_record() {
        let records = vec![
            edit_record("/ws/same.cs", b"x", b"x"),
            edit_record("/ws/diff.cs", b"x", b"y"),
            PendingChangeRecord {
                path: PathBuf::from("/ws/new.cs"),
                kind: ChangeKind::add(),
                base: ContentHandle::from_bytes(Vec::new()),
                local: ContentHandle::from_bytes(Vec::new()),
            },
        ];
        let decision = select_revertible(records, &SilentLog);
        assert_eq!(decision.revert, vec![PathBuf::from("/ws/same.cs")]);
        assert_eq!(decision.examined, 3);
        assert_eq!(decision.unreadable, 0);
    }

    #[test]
    fn test_summary_mirrors_decision() {
        let decision = RevertDecision {
            revert: vec![PathBuf::from("/ws/a.cs")],
            examined: 4,
            unreadable: 2,
        };
        let summary = ReconcileSummary::from_decision(&decision);
        assert_eq!(summary.examined, 4);
        assert_eq!(summary.reverted, 1);
        assert_eq!(summary.unreadable, 2);
    }
}
