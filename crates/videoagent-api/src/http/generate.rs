//! Direct generation handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};
use videoagent_flowqueue::SubmitOutcome;

use crate::error::ApiError;
use crate::http::flow::FlowTaskRequest;
use crate::state::AppState;
use crate::veo::VeoSubmission;

#[derive(Debug, Deserialize)]
pub struct VeoGenerateRequest {
    /// Structured prompt document.
    pub prompt_content: serde_json::Map<String, Value>,
}

/// Submit a prompt to Flow right away, bypassing the queue.
///
/// POST /api/generate/video
pub async fn generate_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlowTaskRequest>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    state.increment_requests();
    if req.prompt_content.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt_content must not be empty".to_string()));
    }

    let flow_url = req.flow_url.filter(|u| !u.trim().is_empty());
    info!("Direct Flow submission (port: {:?})", req.debugging_port);
    let outcome = state
        .flow
        .submitter()
        .submit(&req.prompt_content, req.debugging_port, flow_url.as_deref())
        .await
        .map_err(|e| ApiError::Submission(e.to_string()))?;

    if outcome.success {
        Ok(Json(outcome))
    } else {
        error!("Direct Flow submission failed: {}", outcome.message);
        Err(ApiError::Submission(outcome.message))
    }
}

/// Submit a prompt to the Veo API.
///
/// POST /api/generate/veo
pub async fn generate_veo(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VeoGenerateRequest>,
) -> Result<Json<VeoSubmission>, ApiError> {
    state.increment_requests();
    let prompt = Value::Object(req.prompt_content);
    match state.veo.submit(&prompt).await {
        Ok(submission) => Ok(Json(submission)),
        Err(e) => {
            error!("Veo generation failed: {}", e);
            Err(e.into())
        }
    }
}
