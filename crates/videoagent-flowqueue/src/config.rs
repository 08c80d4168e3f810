//! Queue configuration.

use std::time::Duration;

use videoagent_config::FlowConfig;

/// Runtime settings for the Flow queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Concurrency ceiling for running jobs.
    pub max_concurrent: usize,
    /// Retries granted after the first failed attempt.
    pub max_retries: u32,
    /// Worker idle/poll cadence.
    pub poll_interval: Duration,
    /// Delay before a job starts while others are running.
    pub stagger_delay: Duration,
    /// Wait when the job's port is held by another job.
    pub port_wait: Duration,
    /// Cleanup sweep period.
    pub cleanup_interval: Duration,
    /// Backoff after a failed sweep.
    pub cleanup_retry: Duration,
    /// Terminal jobs older than this are evicted.
    pub max_age: Duration,
    /// History ring capacity.
    pub history_capacity: usize,
    /// History entries returned in summaries.
    pub summary_history: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::from(&FlowConfig::default())
    }
}

impl From<&FlowConfig> for QueueConfig {
    fn from(cfg: &FlowConfig) -> Self {
        Self {
            max_concurrent: cfg.max_concurrent as usize,
            max_retries: cfg.max_retries,
            poll_interval: Duration::from_secs(cfg.poll_interval_secs),
            stagger_delay: Duration::from_secs(cfg.stagger_delay_secs),
            port_wait: Duration::from_secs(cfg.port_wait_secs),
            cleanup_interval: Duration::from_secs(cfg.cleanup_interval_secs),
            cleanup_retry: Duration::from_secs(cfg.cleanup_retry_secs),
            max_age: Duration::from_secs(cfg.max_age_hours.saturating_mul(3600)),
            history_capacity: cfg.history_capacity,
            summary_history: cfg.summary_history,
        }
    }
}
