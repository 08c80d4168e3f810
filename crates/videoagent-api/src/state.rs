//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use videoagent_flowqueue::FlowTaskManager;

use crate::veo::VeoClient;

/// State shared across handlers.
pub struct AppState {
    pub flow: Arc<FlowTaskManager>,
    pub veo: VeoClient,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(flow: Arc<FlowTaskManager>, veo: VeoClient) -> Self {
        Self {
            flow,
            veo,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
