//! Error types for the tick layer.

/// Errors from starting or stopping a [`TickDriver`](crate::TickDriver).
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// `start()` was called on a driver whose task is still running.
    #[error("tick driver '{0}' is already running")]
    AlreadyRunning(&'static str),

    /// `shutdown()` was called on a driver that was never started (or
    /// was already shut down).
    #[error("tick driver '{0}' is not running")]
    NotRunning(&'static str),

    /// `start()` was called outside a Tokio runtime.
    #[error("tick driver '{0}' needs a Tokio runtime to start")]
    NoRuntime(&'static str),

    /// The background task panicked (a sweep panicked).
    #[error("tick driver '{0}' task failed: {1}")]
    TaskFailed(&'static str, String),
}
