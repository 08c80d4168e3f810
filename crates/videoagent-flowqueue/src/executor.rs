//! Strategies for running the worker's background loops.
//!
//! When the caller is already inside a tokio runtime the loops are spawned
//! onto it. Otherwise a named OS thread is started that owns its own
//! current-thread runtime for the lifetime of the process.

use std::fmt;
use std::thread;

use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Handle};
use tracing::{debug, info};

use crate::error::QueueError;

/// A background loop handed to an executor.
pub type BackgroundJob = BoxFuture<'static, ()>;

/// How the worker was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Spawned onto the caller's runtime.
    Cooperative,
    /// Running on a dedicated thread with a private runtime.
    DedicatedThread,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Cooperative => write!(f, "cooperative"),
            ExecutionMode::DedicatedThread => write!(f, "dedicated_thread"),
        }
    }
}

/// Launches background loops.
pub trait WorkerExecutor: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    /// Start every job. Returns once they are scheduled, not when they finish.
    fn launch(&self, name: &str, jobs: Vec<BackgroundJob>) -> Result<(), QueueError>;
}

/// Spawns jobs onto an existing tokio runtime.
#[derive(Debug, Clone)]
pub struct CooperativeExecutor {
    handle: Handle,
}

impl CooperativeExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the current context, if there is one.
    pub fn detect() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl WorkerExecutor for CooperativeExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Cooperative
    }

    fn launch(&self, name: &str, jobs: Vec<BackgroundJob>) -> Result<(), QueueError> {
        debug!("Spawning {} job(s) for {} on the current runtime", jobs.len(), name);
        for job in jobs {
            self.handle.spawn(job);
        }
        Ok(())
    }
}

/// Runs jobs on a named OS thread that owns a current-thread runtime.
#[derive(Debug, Clone, Default)]
pub struct DedicatedThreadExecutor;

impl DedicatedThreadExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerExecutor for DedicatedThreadExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::DedicatedThread
    }

    fn launch(&self, name: &str, jobs: Vec<BackgroundJob>) -> Result<(), QueueError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .thread_name(name)
            .build()
            .map_err(|e| QueueError::WorkerStartup(format!("runtime: {}", e)))?;

        let thread_name = name.to_string();
        thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                runtime.block_on(future::join_all(jobs));
                info!("Background thread {} exited", thread_name);
            })
            .map_err(|e| QueueError::WorkerStartup(format!("thread: {}", e)))?;

        Ok(())
    }
}
