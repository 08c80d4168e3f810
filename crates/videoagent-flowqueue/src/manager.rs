//! Public entry point of the Flow queue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cleanup;
use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::executor::{
    BackgroundJob, CooperativeExecutor, DedicatedThreadExecutor, ExecutionMode, WorkerExecutor,
};
use crate::history::HistoryEntry;
use crate::queue::{Dispatch, Settlement, TaskBook};
use crate::submitter::{BrowserSubmitter, SubmitOutcome};
use crate::task::FlowTask;
use crate::worker;

const WORKER_THREAD_NAME: &str = "flow-worker";

/// Result of `start_worker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The worker was launched by this call.
    Started(ExecutionMode),
    /// A previous call already launched the worker.
    AlreadyRunning(ExecutionMode),
}

impl StartOutcome {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            StartOutcome::Started(mode) | StartOutcome::AlreadyRunning(mode) => *mode,
        }
    }
}

/// Read-only snapshot of the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSummary {
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    pub locked_ports: Vec<u16>,
    pub running_tasks: Vec<FlowTask>,
    pub recent_history: Vec<HistoryEntry>,
    pub worker_mode: Option<ExecutionMode>,
}

/// Serializes browser-automation submissions behind a FIFO queue.
///
/// All queue state sits behind one mutex. Only the worker mutates task
/// status; callers add tasks and read snapshots.
pub struct FlowTaskManager {
    config: QueueConfig,
    book: Mutex<TaskBook>,
    submitter: Arc<dyn BrowserSubmitter>,
    worker_mode: Mutex<Option<ExecutionMode>>,
    shutdown: CancellationToken,
}

impl FlowTaskManager {
    /// Create a manager. The worker is not started.
    pub fn new(config: QueueConfig, submitter: Arc<dyn BrowserSubmitter>) -> Self {
        info!(
            "FlowTaskManager initialized (max_concurrent={}, max_retries={})",
            config.max_concurrent, config.max_retries
        );
        Self {
            book: Mutex::new(TaskBook::new(config.history_capacity)),
            config,
            submitter,
            worker_mode: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Enqueue a submission and return its task ID.
    ///
    /// A payload identical to a queued or running task returns that task's ID
    /// instead of creating a new one.
    pub fn add_task(&self, payload: &str, port: Option<u16>, url: Option<String>) -> Uuid {
        self.book
            .lock()
            .add(payload, port, url, self.config.max_retries)
            .task_id
    }

    /// Snapshot of one task, if known.
    pub fn get_task_status(&self, task_id: Uuid) -> Option<FlowTask> {
        self.book.lock().find(task_id).cloned()
    }

    pub fn get_queue_summary(&self) -> QueueSummary {
        let worker_mode = *self.worker_mode.lock();
        let book = self.book.lock();
        let (queued, running) = (book.queued_len(), book.running_len());
        let (completed, failed) = (book.completed_len(), book.failed_len());

        QueueSummary {
            queued,
            running,
            completed,
            failed,
            total: queued + running + completed + failed,
            locked_ports: book.ports.locked_ports(),
            running_tasks: book.running_tasks(),
            recent_history: book.history.recent(self.config.summary_history),
            worker_mode,
        }
    }

    /// Launch the worker loop and cleanup sweep.
    ///
    /// Uses the current tokio runtime when there is one, otherwise a dedicated
    /// thread. Calling it again is a no-op.
    pub fn start_worker(self: &Arc<Self>) -> Result<StartOutcome, QueueError> {
        match CooperativeExecutor::detect() {
            Some(executor) => self.start_worker_with(&executor),
            None => self.start_worker_with(&DedicatedThreadExecutor::new()),
        }
    }

    /// Launch with an explicit strategy, falling back to a dedicated thread
    /// if it cannot launch.
    pub fn start_worker_with(
        self: &Arc<Self>,
        executor: &dyn WorkerExecutor,
    ) -> Result<StartOutcome, QueueError> {
        let mut current = self.worker_mode.lock();
        if let Some(mode) = *current {
            debug!("Flow worker already running ({})", mode);
            return Ok(StartOutcome::AlreadyRunning(mode));
        }

        let mode = match self.launch_on(executor) {
            Ok(mode) => mode,
            Err(e) if executor.mode() != ExecutionMode::DedicatedThread => {
                warn!("{} launch failed, falling back to a dedicated thread: {}", executor.mode(), e);
                self.launch_on(&DedicatedThreadExecutor::new())?
            }
            Err(e) => return Err(e),
        };

        *current = Some(mode);
        info!("Flow task worker started ({})", mode);
        Ok(StartOutcome::Started(mode))
    }

    fn launch_on(self: &Arc<Self>, executor: &dyn WorkerExecutor) -> Result<ExecutionMode, QueueError> {
        let jobs: Vec<BackgroundJob> = vec![
            worker::run_loop(Arc::clone(self), self.shutdown.clone()).boxed(),
            cleanup::run_sweeper(Arc::clone(self), self.shutdown.clone()).boxed(),
        ];
        executor.launch(WORKER_THREAD_NAME, jobs)?;
        Ok(executor.mode())
    }

    /// Mode of the running worker, if started.
    pub fn worker_mode(&self) -> Option<ExecutionMode> {
        *self.worker_mode.lock()
    }

    /// Stop dispatching and the cleanup sweep. In-flight submissions still
    /// settle before the worker exits.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!("Flow task worker shutting down");
            self.shutdown.cancel();
        }
    }

    /// Evict terminal tasks older than the configured age.
    pub fn cleanup_expired(&self) -> Result<Vec<Uuid>, QueueError> {
        let max_age = chrono::Duration::from_std(self.config.max_age)
            .map_err(|e| QueueError::DurationOutOfRange(e.to_string()))?;
        let cutoff = Utc::now()
            .checked_sub_signed(max_age)
            .ok_or_else(|| QueueError::DurationOutOfRange(format!("{:?}", self.config.max_age)))?;
        Ok(self.evict_terminal_before(cutoff))
    }

    /// Evict terminal tasks whose start (or submission) precedes `cutoff`.
    pub fn evict_terminal_before(&self, cutoff: DateTime<Utc>) -> Vec<Uuid> {
        let evicted = self.book.lock().evict_older_than(cutoff);
        if !evicted.is_empty() {
            info!("Evicted {} expired Flow task(s)", evicted.len());
        }
        evicted
    }

    /// The submitter the worker drives, for callers that bypass the queue.
    pub fn submitter(&self) -> Arc<dyn BrowserSubmitter> {
        Arc::clone(&self.submitter)
    }

    pub(crate) fn dispatch_next(&self) -> Option<Dispatch> {
        self.book
            .lock()
            .dispatch_next(self.config.max_concurrent, Utc::now())
    }

    pub(crate) fn settle(&self, task_id: Uuid, outcome: SubmitOutcome) -> Option<Settlement> {
        self.book.lock().settle(task_id, outcome, Utc::now())
    }

    pub(crate) fn port_held_by_other(&self, port: u16, task_id: Uuid) -> bool {
        self.book.lock().ports.is_held_by_other(port, task_id)
    }

    pub(crate) fn lock_port(&self, port: u16, task_id: Uuid) {
        self.book.lock().ports.lock(port, task_id);
    }

    pub(crate) fn unlock_port(&self, port: u16, task_id: Uuid) -> bool {
        self.book.lock().ports.unlock(port, task_id)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
