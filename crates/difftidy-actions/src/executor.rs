//! Retrying command executor
//!
//! The host's editing surface is allowed to be flaky: it can reject a call
//! while busy or fault without detail, and both are worth one more try. The
//! executor owns that loop so the pipeline above it never sees a transient
//! failure.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use difftidy_host::{
    CommandError, DocumentHandle, EditCommand, EditSurface, ErrorLog, StatusFeedback,
};

/// Transient/permanent split for a surface failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth repeating; the surface may accept the same call shortly.
    Transient,
    /// Will fail the same way on every retry.
    Fatal,
}

/// Classify a surface failure.
///
/// Only the surface's two rejection codes are transient: a busy rejection
/// and an undetailed fault. Everything else is permanent for that command.
pub fn classify(error: &CommandError) -> FailureClass {
    match error {
        CommandError::CallRejected | CommandError::Faulted => FailureClass::Transient,
        CommandError::UnknownCommand(_) | CommandError::Failed(_) => FailureClass::Fatal,
    }
}

/// Retry configuration for surface commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per command, first try included.
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Policy without waits, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Wait out the backoff before the next attempt.
    pub async fn sleep(&self) {
        tokio::time::sleep(self.backoff).await;
    }
}

/// Executes editing commands against the surface with bounded retries.
///
/// Before every attempt the target file is announced through the status
/// feedback. A command that still fails after the last attempt is written
/// to the error log with its command name, file, and failure detail, and
/// the error is returned for callers that count outcomes.
pub struct CommandExecutor {
    surface: Arc<dyn EditSurface>,
    feedback: Arc<dyn StatusFeedback>,
    log: Arc<dyn ErrorLog>,
    policy: RetryPolicy,
}

impl CommandExecutor {
    pub fn new(
        surface: Arc<dyn EditSurface>,
        feedback: Arc<dyn StatusFeedback>,
        log: Arc<dyn ErrorLog>,
    ) -> Self {
        Self {
            surface,
            feedback,
            log,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `command` against an open document.
    ///
    /// Transient surface failures are retried up to the policy's attempt
    /// bound with a fixed backoff in between; the first fatal failure ends
    /// the loop immediately.
    pub async fn execute(
        &self,
        command: &EditCommand,
        doc: DocumentHandle,
        file: &Path,
    ) -> Result<(), CommandError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.feedback
                .publish(&format!("Updating {}", file.display()));
            match self.surface.execute(command, doc).await {
                Ok(()) => {
                    trace!(
                        command = %command,
                        file = %file.display(),
                        attempt,
                        "command succeeded"
                    );
                    return Ok(());
                }
                Err(err) => {
                    if classify(&err) == FailureClass::Transient
                        && attempt < self.policy.max_attempts
                    {
                        debug!(
                            command = %command,
                            file = %file.display(),
                            attempt,
                            error = %err,
                            "transient surface failure, retrying"
                        );
                        self.policy.sleep().await;
                        continue;
                    }
                    warn!(
                        command = %command,
                        file = %file.display(),
                        attempt,
                        error = %err,
                        "command failed"
                    );
                    self.log.append(&format!(
                        "Command \"{}\" failed for \"{}\": {}",
                        command,
                        file.display(),
                        err
                    ));
                    return Err(err);
                }
            }
        }
    }
}
