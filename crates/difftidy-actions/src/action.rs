//! Format-action capability trait and the document descriptor it matches on

use std::path::{Path, PathBuf};

use difftidy_host::{BuildClassification, EditCommand};

/// Everything an action may consult when deciding applicability.
///
/// The build classification is prefetched by the pipeline once per file;
/// `None` covers both "host has no metadata" and "the lookup failed", which
/// actions must treat identically.
#[derive(Debug, Clone)]
pub struct DocumentDescriptor {
    path: PathBuf,
    file_name: String,
    build: Option<BuildClassification>,
}

impl DocumentDescriptor {
    pub fn new(path: impl Into<PathBuf>, build: Option<BuildClassification>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            build,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn build(&self) -> Option<BuildClassification> {
        self.build
    }
}

/// One per-file-type normalization step.
///
/// Actions are pure descriptions: matching is a side-effect-free predicate,
/// and the work itself is a named command the executor sends to the host's
/// editing surface. Several actions may apply to one file; the pipeline
/// runs all of them in registration order.
pub trait FormatAction: Send + Sync {
    /// Action name for logs.
    fn name(&self) -> &str;

    /// Whether this action should run against the document.
    fn applies_to(&self, document: &DocumentDescriptor) -> bool;

    /// Command the action sends to the editing surface.
    fn command(&self) -> &EditCommand;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_extracts_file_name() {
        let descriptor = DocumentDescriptor::new("/ws/src/Deep/File.CS", None);
        assert_eq!(descriptor.file_name(), "File.CS");
        assert_eq!(descriptor.path(), Path::new("/ws/src/Deep/File.CS"));
        assert_eq!(descriptor.build(), None);
    }

    #[test]
    fn test_descriptor_without_file_name() {
        let descriptor = DocumentDescriptor::new("/", Some(BuildClassification::Compile));
        assert_eq!(descriptor.file_name(), "");
        assert_eq!(descriptor.build(), Some(BuildClassification::Compile));
    }
}
