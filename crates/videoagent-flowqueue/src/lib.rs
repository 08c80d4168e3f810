//! # VideoAgent Flow Queue
//!
//! Background task queue that serializes browser-automation submissions to
//! the Flow video generator.
//!
//! ## Features
//!
//! - FIFO queue with exact-payload coalescing
//! - Single worker loop with a concurrency ceiling
//! - Bounded retry by re-queueing at the tail
//! - Advisory debugging-port lock table
//! - Bounded history ring and read-only summaries
//! - Periodic eviction of old terminal jobs
//! - Cooperative or dedicated-thread worker execution

mod cleanup;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod manager;
pub mod ports;
pub mod queue;
pub mod submitter;
pub mod task;
mod worker;

pub use config::QueueConfig;
pub use error::QueueError;
pub use executor::{BackgroundJob, CooperativeExecutor, DedicatedThreadExecutor, ExecutionMode, WorkerExecutor};
pub use history::{HistoryAction, HistoryEntry, HistoryLog};
pub use manager::{FlowTaskManager, QueueSummary, StartOutcome};
pub use ports::PortLockTable;
pub use submitter::{BrowserSubmitter, SubmitOutcome};
pub use task::{FlowTask, TaskStatus};
