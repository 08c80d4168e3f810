//! Flow submission queue configuration.

use serde::{Deserialize, Serialize};

/// Settings for the background queue that serializes browser submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Maximum number of jobs driven against browsers at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: u32,

    /// Retries granted to a job after its first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Idle/poll cadence of the worker loop.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Delay inserted before a job starts while other jobs are running.
    #[serde(default = "default_stagger_delay")]
    pub stagger_delay_secs: u64,

    /// Wait applied when a job's debugging port is held by another job.
    #[serde(default = "default_port_wait")]
    pub port_wait_secs: u64,

    /// Period of the terminal-job cleanup sweep.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Backoff after a failed cleanup sweep.
    #[serde(default = "default_cleanup_retry")]
    pub cleanup_retry_secs: u64,

    /// Age after which completed/failed jobs are evicted.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,

    /// Capacity of the history ring.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// History entries included in queue summaries.
    #[serde(default = "default_summary_history")]
    pub summary_history: usize,
}

fn default_max_concurrent() -> u32 {
    5
}

fn default_max_retries() -> u32 {
    2
}

fn default_poll_interval() -> u64 {
    5
}

fn default_stagger_delay() -> u64 {
    3
}

fn default_port_wait() -> u64 {
    2
}

fn default_cleanup_interval() -> u64 {
    3600
}

fn default_cleanup_retry() -> u64 {
    300
}

fn default_max_age_hours() -> u64 {
    24
}

fn default_history_capacity() -> usize {
    100
}

fn default_summary_history() -> usize {
    10
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_retries: default_max_retries(),
            poll_interval_secs: default_poll_interval(),
            stagger_delay_secs: default_stagger_delay(),
            port_wait_secs: default_port_wait(),
            cleanup_interval_secs: default_cleanup_interval(),
            cleanup_retry_secs: default_cleanup_retry(),
            max_age_hours: default_max_age_hours(),
            history_capacity: default_history_capacity(),
            summary_history: default_summary_history(),
        }
    }
}
