//! Queue state: the pending FIFO plus the running and terminal buckets.
//!
//! Every known task lives in exactly one bucket. All mutation goes through
//! `TaskBook` methods, which the manager calls while holding its single lock.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::history::{HistoryAction, HistoryLog};
use crate::ports::PortLockTable;
use crate::submitter::SubmitOutcome;
use crate::task::{FlowTask, TaskStatus};

/// Result of `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub task_id: Uuid,
    /// True when the payload matched an existing queued or running task.
    pub coalesced: bool,
}

/// Snapshot handed to the worker when a task starts.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub task_id: Uuid,
    pub payload: String,
    pub target_port: Option<u16>,
    pub target_url: Option<String>,
    /// Running count including this task.
    pub running_now: usize,
}

/// Transition applied when an attempt finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Completed,
    /// Re-queued at the tail with the new retry count.
    Requeued { retry_count: u32 },
    Failed,
}

/// In-memory task buckets.
#[derive(Debug)]
pub struct TaskBook {
    queue: VecDeque<FlowTask>,
    running: HashMap<Uuid, FlowTask>,
    completed: HashMap<Uuid, FlowTask>,
    failed: HashMap<Uuid, FlowTask>,
    pub(crate) ports: PortLockTable,
    pub(crate) history: HistoryLog,
}

impl TaskBook {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            running: HashMap::new(),
            completed: HashMap::new(),
            failed: HashMap::new(),
            ports: PortLockTable::new(),
            history: HistoryLog::new(history_capacity),
        }
    }

    /// Enqueue a payload, or coalesce it into a live task with the same payload.
    pub fn add(
        &mut self,
        payload: &str,
        target_port: Option<u16>,
        target_url: Option<String>,
        max_retries: u32,
    ) -> Admission {
        let existing = self
            .running
            .values()
            .chain(self.queue.iter())
            .find(|task| task.payload == payload)
            .map(|task| task.id);

        if let Some(task_id) = existing {
            warn!("Duplicate Flow submission coalesced into task {}", task_id);
            self.history
                .record(HistoryAction::Coalesced, task_id, self.queue.len());
            return Admission {
                task_id,
                coalesced: true,
            };
        }

        let task = FlowTask::new(payload, target_port, target_url, max_retries);
        let task_id = task.id;
        self.queue.push_back(task);
        self.history
            .record(HistoryAction::Added, task_id, self.queue.len());
        info!("Task {} added to Flow queue. Queue size: {}", task_id, self.queue.len());

        Admission {
            task_id,
            coalesced: false,
        }
    }

    /// Pop the queue head into the running set if below the ceiling.
    pub fn dispatch_next(&mut self, max_concurrent: usize, now: DateTime<Utc>) -> Option<Dispatch> {
        if self.running.len() >= max_concurrent {
            return None;
        }
        let mut task = self.queue.pop_front()?;

        task.status = TaskStatus::Running;
        task.started_at = Some(now);

        let dispatch = Dispatch {
            task_id: task.id,
            payload: task.payload.clone(),
            target_port: task.target_port,
            target_url: task.target_url.clone(),
            running_now: self.running.len() + 1,
        };
        self.running.insert(task.id, task);
        self.history
            .record(HistoryAction::Started, dispatch.task_id, self.queue.len());
        info!(
            "Starting task {}. Active tasks: {}",
            dispatch.task_id, dispatch.running_now
        );

        Some(dispatch)
    }

    /// Move a running task to its next bucket.
    ///
    /// Returns `None` if the task is not running, which only happens if it was
    /// settled already.
    pub fn settle(
        &mut self,
        task_id: Uuid,
        outcome: SubmitOutcome,
        now: DateTime<Utc>,
    ) -> Option<Settlement> {
        let mut task = self.running.remove(&task_id)?;
        let success = outcome.success;
        task.result = Some(outcome);

        let settlement = if success {
            task.status = TaskStatus::Completed;
            task.finished_at = Some(now);
            self.completed.insert(task_id, task);
            Settlement::Completed
        } else if task.can_retry() {
            task.retry_count += 1;
            task.status = TaskStatus::Queued;
            let retry_count = task.retry_count;
            self.queue.push_back(task);
            Settlement::Requeued { retry_count }
        } else {
            task.status = TaskStatus::Failed;
            task.finished_at = Some(now);
            self.failed.insert(task_id, task);
            Settlement::Failed
        };

        let action = match settlement {
            Settlement::Completed => HistoryAction::Completed,
            Settlement::Requeued { .. } => HistoryAction::Retry,
            Settlement::Failed => HistoryAction::Failed,
        };
        self.history.record(action, task_id, self.queue.len());
        debug!(
            "Task {} settled as {:?}. Active tasks: {}",
            task_id,
            settlement,
            self.running.len()
        );

        Some(settlement)
    }

    /// Find a task, searching running, completed, failed, then queued.
    pub fn find(&self, task_id: Uuid) -> Option<&FlowTask> {
        self.running
            .get(&task_id)
            .or_else(|| self.completed.get(&task_id))
            .or_else(|| self.failed.get(&task_id))
            .or_else(|| self.queue.iter().find(|task| task.id == task_id))
    }

    /// Evict terminal tasks whose age anchor is before `cutoff`.
    pub fn evict_older_than(&mut self, cutoff: DateTime<Utc>) -> Vec<Uuid> {
        let mut evicted = Vec::new();
        for bucket in [&mut self.completed, &mut self.failed] {
            bucket.retain(|id, task| {
                let keep = task.age_anchor() >= cutoff;
                if !keep {
                    evicted.push(*id);
                }
                keep
            });
        }
        for id in &evicted {
            self.history
                .record(HistoryAction::Evicted, *id, self.queue.len());
        }
        evicted
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn failed_len(&self) -> usize {
        self.failed.len()
    }

    /// Running tasks ordered by start time.
    pub fn running_tasks(&self) -> Vec<FlowTask> {
        let mut tasks: Vec<FlowTask> = self.running.values().cloned().collect();
        tasks.sort_by_key(|task| task.started_at);
        tasks
    }

    /// Buckets that currently contain `task_id`.
    #[cfg(test)]
    pub(crate) fn locations(&self, task_id: Uuid) -> Vec<TaskStatus> {
        let mut found = Vec::new();
        if self.queue.iter().any(|task| task.id == task_id) {
            found.push(TaskStatus::Queued);
        }
        if self.running.contains_key(&task_id) {
            found.push(TaskStatus::Running);
        }
        if self.completed.contains_key(&task_id) {
            found.push(TaskStatus::Completed);
        }
        if self.failed.contains_key(&task_id) {
            found.push(TaskStatus::Failed);
        }
        found
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
