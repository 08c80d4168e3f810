//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The worker could not be launched by any execution strategy.
    #[error("Worker startup failed: {0}")]
    WorkerStartup(String),

    /// The external submitter reported an error.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A spawned job or sweep task panicked or was cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A configured duration does not fit the timestamp range.
    #[error("Duration out of range: {0}")]
    DurationOutOfRange(String),
}
