//! Host-editor collaborator contracts for difftidy
//!
//! difftidy never talks to an editor directly. Everything the engine needs
//! from its host lives behind the traits in this crate:
//! - Document and project-tree access ([`WorkspaceModel`])
//! - The editing command surface that performs the actual edits
//!   ([`EditSurface`])
//! - One-line progress feedback ([`StatusFeedback`])
//! - The append-only failure log ([`ErrorLog`])
//!
//! The only concrete collaborator shipped here is [`FileErrorLog`], the
//! file-backed failure log every other component writes through.
//!
//! # Examples
//!
//! ```ignore
//! use difftidy_host::{EditCommand, FileErrorLog, ErrorLog};
//!
//! let log = FileErrorLog::in_temp_dir();
//! log.append("something went wrong");
//!
//! let format = EditCommand::format_document();
//! assert_eq!(format.name(), "format-document");
//! ```

pub mod error;
pub mod feedback;
pub mod log;
pub mod model;
pub mod surface;
pub mod types;

pub use error::{CommandError, HostError, HostResult};
pub use feedback::{StatusFeedback, TracingFeedback};
pub use log::{ErrorLog, FileErrorLog};
pub use model::WorkspaceModel;
pub use surface::EditSurface;
pub use types::{BuildClassification, DocumentHandle, EditCommand, ProjectNode};
