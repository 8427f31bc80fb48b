//! difftidy format actions
//!
//! The per-file-type normalization layer:
//! - [`FormatAction`]: capability trait matching documents to editing
//!   commands
//! - The shipped catalog ([`standard_actions`] plus opt-in extras)
//! - [`CommandExecutor`]: bounded retry around the host's flaky editing
//!   surface
//!
//! Actions never edit text themselves; they name a command and the host
//! surface does the work. That keeps the catalog host-independent and
//! trivially testable.
//!
//! # Examples
//!
//! ```
//! use difftidy_actions::{csharp_format, DocumentDescriptor, FormatAction};
//! use difftidy_host::BuildClassification;
//!
//! let action = csharp_format();
//! let compiled = DocumentDescriptor::new(
//!     "/ws/Program.cs",
//!     Some(BuildClassification::Compile),
//! );
//! let designer = DocumentDescriptor::new(
//!     "/ws/Form1.Designer.cs",
//!     Some(BuildClassification::Compile),
//! );
//! assert!(action.applies_to(&compiled));
//! assert!(!action.applies_to(&designer));
//! ```

pub mod action;
pub mod catalog;
pub mod executor;

pub use action::{DocumentDescriptor, FormatAction};
pub use catalog::{
    csharp_format, csharp_sort_usings, html_format, json_format, scss_format,
    standard_actions, typescript_format, xml_format, CommandAction,
};
pub use executor::{classify, CommandExecutor, FailureClass, RetryPolicy};
