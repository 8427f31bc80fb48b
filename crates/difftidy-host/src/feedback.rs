//! Status feedback trait and the tracing-backed default

/// One-line progress feedback, typically a status bar.
///
/// Publishing is fire-and-forget: implementations must not fail and must not
/// block on user interaction.
pub trait StatusFeedback: Send + Sync {
    /// Replace the current status line with `message`.
    fn publish(&self, message: &str);
}

/// Feedback sink that forwards status lines to the tracing subscriber.
///
/// Useful for headless runs and tests where no status bar exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFeedback;

impl StatusFeedback for TracingFeedback {
    fn publish(&self, message: &str) {
        tracing::info!(target: "difftidy::status", "{}", message);
    }
}
