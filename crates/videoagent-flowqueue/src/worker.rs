//! Worker loop: pulls tasks under the concurrency ceiling and runs each one
//! on its own spawned task.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::QueueError;
use crate::manager::FlowTaskManager;
use crate::queue::{Dispatch, Settlement};
use crate::submitter::{BrowserSubmitter, SubmitOutcome};

/// Run until `shutdown` is cancelled, then wait for in-flight tasks.
///
/// At most one task is started per poll interval. New submissions do not wake
/// the loop.
pub(crate) async fn run_loop(manager: Arc<FlowTaskManager>, shutdown: CancellationToken) {
    info!("Flow task worker loop started");
    let poll_interval = manager.config().poll_interval;
    let in_flight = TaskTracker::new();

    while !shutdown.is_cancelled() {
        if let Some(dispatch) = manager.dispatch_next() {
            in_flight.spawn(run_task(Arc::clone(&manager), dispatch));
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(poll_interval) => {}
        }
    }

    in_flight.close();
    if !in_flight.is_empty() {
        info!("Waiting for {} in-flight Flow task(s)", in_flight.len());
    }
    in_flight.wait().await;
    info!("Flow task worker loop stopped");
}

/// Execute one attempt of a dispatched task and settle it.
async fn run_task(manager: Arc<FlowTaskManager>, dispatch: Dispatch) {
    let task_id = dispatch.task_id;
    let config = manager.config();

    if dispatch.running_now > 1 && !config.stagger_delay.is_zero() {
        debug!(
            "Task {} staggering {:?} ({} running)",
            task_id, config.stagger_delay, dispatch.running_now
        );
        tokio::time::sleep(config.stagger_delay).await;
    }

    let lease = match dispatch.target_port {
        Some(port) => {
            if manager.port_held_by_other(port, task_id) {
                info!("Port {} busy, task {} waiting {:?}", port, task_id, config.port_wait);
                tokio::time::sleep(config.port_wait).await;
            }
            Some(PortLease::acquire(&manager, port, task_id))
        }
        None => None,
    };

    let outcome = submit_isolated(manager.submitter(), &dispatch).await;
    drop(lease);

    if outcome.success {
        info!("Task {} finished. Result: {}", task_id, outcome.message);
    } else {
        error!("Task {} attempt failed: {}", task_id, outcome.message);
    }

    match manager.settle(task_id, outcome) {
        Some(Settlement::Completed) => {}
        Some(Settlement::Requeued { retry_count }) => {
            warn!(
                "Task {} re-queued for retry {}/{}",
                task_id,
                retry_count,
                manager.config().max_retries
            );
        }
        Some(Settlement::Failed) => {
            error!("Task {} failed after exhausting retries", task_id);
        }
        None => warn!("Task {} was no longer running when settled", task_id),
    }
}

/// Call the submitter on its own task so a panic surfaces as a failure.
async fn submit_isolated(submitter: Arc<dyn BrowserSubmitter>, dispatch: &Dispatch) -> SubmitOutcome {
    let payload = dispatch.payload.clone();
    let port = dispatch.target_port;
    let url = dispatch.target_url.clone();

    let joined = tokio::spawn(async move { submitter.submit(&payload, port, url.as_deref()).await }).await;

    match joined.map_err(QueueError::from).and_then(|result| result) {
        Ok(outcome) => outcome,
        Err(e) => SubmitOutcome::failure(e.to_string()),
    }
}

/// Holds a port lock for the duration of one attempt.
struct PortLease<'a> {
    manager: &'a FlowTaskManager,
    port: u16,
    task_id: Uuid,
}

impl<'a> PortLease<'a> {
    fn acquire(manager: &'a FlowTaskManager, port: u16, task_id: Uuid) -> Self {
        manager.lock_port(port, task_id);
        debug!("Task {} locked port {}", task_id, port);
        Self {
            manager,
            port,
            task_id,
        }
    }
}

impl Drop for PortLease<'_> {
    fn drop(&mut self) {
        if self.manager.unlock_port(self.port, self.task_id) {
            debug!("Task {} released port {}", self.task_id, self.port);
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
