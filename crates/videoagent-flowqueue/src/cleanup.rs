//! Periodic eviction of old completed and failed tasks.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::QueueError;
use crate::manager::FlowTaskManager;

/// Sweep every cleanup interval until `shutdown` is cancelled.
///
/// A failed or panicking sweep is retried after the shorter backoff.
pub(crate) async fn run_sweeper(manager: Arc<FlowTaskManager>, shutdown: CancellationToken) {
    let interval = manager.config().cleanup_interval;
    let backoff = manager.config().cleanup_retry;
    let mut delay = interval;

    info!("Flow cleanup sweep scheduled every {:?}", interval);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        let sweep = Arc::clone(&manager);
        let result = tokio::spawn(async move { sweep.cleanup_expired() })
            .await
            .map_err(QueueError::from)
            .and_then(|evicted| evicted);

        delay = match result {
            Ok(evicted) => {
                debug!("Cleanup sweep evicted {} task(s)", evicted.len());
                interval
            }
            Err(e) => {
                error!("Cleanup sweep failed: {}. Retrying in {:?}", e, backoff);
                backoff
            }
        };
    }

    info!("Flow cleanup sweep stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::config::QueueConfig;
    use crate::submitter::{BrowserSubmitter, SubmitOutcome};
    use crate::task::TaskStatus;

    struct AlwaysOk;

    #[async_trait]
    impl BrowserSubmitter for AlwaysOk {
        async fn submit(
            &self,
            _payload: &str,
            _port: Option<u16>,
            _url: Option<&str>,
        ) -> Result<SubmitOutcome, QueueError> {
            Ok(SubmitOutcome::success("submitted"))
        }
    }

    fn manager(config: QueueConfig) -> Arc<FlowTaskManager> {
        Arc::new(FlowTaskManager::new(config, Arc::new(AlwaysOk)))
    }

    #[test]
    fn test_out_of_range_age_is_an_error() {
        let config = QueueConfig {
            max_age: Duration::MAX,
            ..Default::default()
        };
        let result = manager(config).cleanup_expired();
        assert!(matches!(result, Err(QueueError::DurationOutOfRange(_))));
    }

    #[test]
    fn test_cleanup_keeps_recent_tasks() {
        let manager = manager(QueueConfig::default());
        let id = manager.add_task("recent", None, None);
        manager.dispatch_next().unwrap();
        manager.settle(id, SubmitOutcome::success("ok"));

        assert!(manager.cleanup_expired().unwrap().is_empty());
        assert!(manager.get_task_status(id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_tasks() {
        let config = QueueConfig {
            cleanup_interval: Duration::from_secs(60),
            max_age: Duration::ZERO,
            ..Default::default()
        };
        let manager = manager(config);
        let id = manager.add_task("old", None, None);
        manager.dispatch_next().unwrap();
        manager.settle(id, SubmitOutcome::success("ok"));
        assert_eq!(manager.get_task_status(id).unwrap().status, TaskStatus::Completed);

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_sweeper(Arc::clone(&manager), shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(manager.get_task_status(id).is_none());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_survives_failed_sweeps() {
        let config = QueueConfig {
            cleanup_interval: Duration::from_secs(60),
            cleanup_retry: Duration::from_secs(5),
            max_age: Duration::MAX,
            ..Default::default()
        };
        let manager = manager(config);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_sweeper(Arc::clone(&manager), shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!handle.is_finished());

        shutdown.cancel();
        handle.await.unwrap();
    }
}
