//! Job record and status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::submitter::SubmitOutcome;

/// Job status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting in the queue.
    #[default]
    Queued,
    /// Being submitted to a browser.
    Running,
    /// Submitted successfully.
    Completed,
    /// Retries exhausted.
    Failed,
}

impl TaskStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One request to submit a payload through the browser-automation channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowTask {
    /// Unique task ID.
    pub id: Uuid,
    /// Opaque prompt text.
    pub payload: String,
    /// Browser debugging port to drive.
    pub target_port: Option<u16>,
    /// Flow page URL passed through to the submitter.
    pub target_url: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Number of retries already consumed.
    pub retry_count: u32,
    /// Maximum retries allowed.
    pub max_retries: u32,
    /// Creation time.
    pub submitted_at: DateTime<Utc>,
    /// Start of the most recent attempt.
    pub started_at: Option<DateTime<Utc>>,
    /// Time the task reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
    /// Outcome of the most recent attempt.
    pub result: Option<SubmitOutcome>,
}

impl FlowTask {
    /// Create a new queued task.
    pub fn new(
        payload: impl Into<String>,
        target_port: Option<u16>,
        target_url: Option<String>,
        max_retries: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
            target_port,
            target_url,
            status: TaskStatus::Queued,
            retry_count: 0,
            max_retries,
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
            result: None,
        }
    }

    /// Check if another attempt is allowed after a failure.
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Total attempts made or in progress.
    pub fn attempts(&self) -> u32 {
        match self.status {
            TaskStatus::Queued => self.retry_count,
            _ => self.retry_count + 1,
        }
    }

    /// Timestamp the cleanup sweep measures age from.
    pub fn age_anchor(&self) -> DateTime<Utc> {
        self.started_at.unwrap_or(self.submitted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = FlowTask::new("{\"scene\":1}", Some(9222), None, 2);
        assert_eq!(task.status, TaskStatus::Queued);
        assert_eq!(task.retry_count, 0);
        assert_eq!(task.target_port, Some(9222));
        assert!(task.started_at.is_none());
        assert!(task.result.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = FlowTask::new("same", None, None, 0);
        let b = FlowTask::new("same", None, None, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_can_retry() {
        let mut task = FlowTask::new("p", None, None, 2);
        assert!(task.can_retry());
        task.retry_count = 2;
        assert!(!task.can_retry());
    }

    #[test]
    fn test_zero_retries_never_retries() {
        let task = FlowTask::new("p", None, None, 0);
        assert!(!task.can_retry());
    }

    #[test]
    fn test_default_status_is_queued() {
        assert_eq!(TaskStatus::default(), TaskStatus::Queued);
        assert!(!TaskStatus::default().is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskStatus::Queued).unwrap(), "\"queued\"");
        assert_eq!(serde_json::to_string(&TaskStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn test_age_anchor_prefers_started_at() {
        let mut task = FlowTask::new("p", None, None, 0);
        assert_eq!(task.age_anchor(), task.submitted_at);
        let started = task.submitted_at + chrono::Duration::seconds(5);
        task.started_at = Some(started);
        assert_eq!(task.age_anchor(), started);
    }
}
