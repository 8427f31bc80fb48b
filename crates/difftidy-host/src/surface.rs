//! Editing command surface trait

use async_trait::async_trait;

use crate::error::CommandError;
use crate::types::{DocumentHandle, EditCommand};

/// The host surface that executes editing commands against open documents.
///
/// The surface is allowed to be flaky: it may reject a call because another
/// client holds it ([`CommandError::CallRejected`]) or fail without detail
/// ([`CommandError::Faulted`]). Callers that want reliability wrap it in a
/// retrying executor rather than expecting the surface itself to retry.
#[async_trait]
pub trait EditSurface: Send + Sync {
    /// Execute `command` against a document, which must already be open.
    async fn execute(&self, command: &EditCommand, doc: DocumentHandle)
        -> Result<(), CommandError>;
}
