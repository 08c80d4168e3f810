//! Mock client for the Veo generation API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use videoagent_config::VeoConfig;

#[derive(Debug, Error)]
pub enum VeoError {
    #[error("VEO_API_KEY is not set")]
    MissingApiKey,
}

/// Accepted generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeoSubmission {
    pub success: bool,
    pub message: String,
    pub task_id: String,
}

/// Simulates submitting a structured prompt to Veo.
#[derive(Debug, Clone)]
pub struct VeoClient {
    config: VeoConfig,
}

impl VeoClient {
    pub fn new(config: VeoConfig) -> Self {
        Self { config }
    }

    pub async fn submit(&self, prompt: &Value) -> Result<VeoSubmission, VeoError> {
        self.config.resolve_api_key().ok_or(VeoError::MissingApiKey)?;

        let topic = prompt
            .pointer("/meta/topic")
            .and_then(Value::as_str)
            .unwrap_or("N/A");
        info!("Submitting Veo generation task (topic: {})", topic);

        tokio::time::sleep(Duration::from_millis(self.config.simulated_latency_ms)).await;

        let task_id = format!("veo_task_{}", chrono::Utc::now().timestamp());
        info!("Veo task accepted: {}", task_id);

        Ok(VeoSubmission {
            success: true,
            message: format!(
                "Submitted to the Veo API. Task ID is {}, check back later for the result.",
                task_id
            ),
            task_id,
        })
    }
}
