//! Append-only error log trait and the file-backed reference implementation

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only failure log shared by every component.
///
/// Appending never fails from the caller's point of view: a log that cannot
/// record a message swallows the problem. Logging must never take a workflow
/// down.
pub trait ErrorLog: Send + Sync {
    /// Append one free-text message block.
    fn append(&self, message: &str);
}

/// File-backed [`ErrorLog`] writing timestamped message blocks.
///
/// Each appended message becomes one block:
///
/// ```text
/// Time 2024-03-07 14:21:09.812
/// Begin Message
/// <message>
/// End Message
/// ```
///
/// followed by a blank line. Write failures are reported to the tracing
/// subscriber at debug level and otherwise dropped.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    path: PathBuf,
}

impl FileErrorLog {
    /// Log to an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log to `difftidy-errors.txt` under the OS temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("difftidy-errors.txt"))
    }

    /// Path the log writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_block(&self, message: &str) -> std::io::Result<()> {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let block = format!("Time {stamp}\nBegin Message\n{message}\nEnd Message\n\n");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())
    }
}

impl ErrorLog for FileErrorLog {
    fn append(&self, message: &str) {
        if let Err(err) = self.write_block(message) {
            tracing::debug!(
                path = %self.path.display(),
                error = %err,
                "error log write failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_writes_message_blocks() {
        let dir = TempDir::new().unwrap();
        let log = FileErrorLog::new(dir.path().join("errors.txt"));

        log.append("first failure");
        log.append("second failure");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("Begin Message").count(), 2);
        assert_eq!(contents.matches("End Message").count(), 2);
        assert!(contents.contains("first failure"));
        assert!(contents.contains("second failure"));
        // two blocks, each terminated by a blank line
        assert!(contents.ends_with("End Message\n\n"));
    }

    #[test]
    fn test_block_lines_are_ordered() {
        let dir = TempDir::new().unwrap();
        let log = FileErrorLog::new(dir.path().join("errors.txt"));

        log.append("payload");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("Time "));
        assert_eq!(lines[1], "Begin Message");
        assert_eq!(lines[2], "payload");
        assert_eq!(lines[3], "End Message");
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let log = FileErrorLog::new("/nonexistent-dir/deeper/errors.txt");
        // must not panic or error out
        log.append("dropped on the floor");
    }

    #[test]
    fn test_in_temp_dir_points_at_temp() {
        let log = FileErrorLog::in_temp_dir();
        assert!(log.path().starts_with(std::env::temp_dir()));
    }
}
