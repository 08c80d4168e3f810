//! Boundary to the external browser-automation call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Outcome reported by a submitter for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmitOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Submits a payload to a browser-hosted generator.
///
/// Implementations are slow and may be flaky. They own their internal
/// timeouts; the worker never cancels a running call. An `Err` or a panic is
/// treated like an unsuccessful outcome.
#[async_trait]
pub trait BrowserSubmitter: Send + Sync {
    async fn submit(
        &self,
        payload: &str,
        port: Option<u16>,
        url: Option<&str>,
    ) -> Result<SubmitOutcome, QueueError>;
}
