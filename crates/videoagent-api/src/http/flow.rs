//! Flow queue handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use videoagent_flowqueue::{FlowTask, QueueSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// Request to queue a Flow submission.
#[derive(Debug, Deserialize)]
pub struct FlowTaskRequest {
    /// Prompt text, usually a JSON document.
    pub prompt_content: String,

    /// Chrome debugging port to use.
    pub debugging_port: Option<u16>,

    /// Flow page to open when no Flow tab exists.
    pub flow_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlowTaskAccepted {
    pub task_id: Uuid,
    pub status: String,
}

/// Queue a Flow submission.
///
/// POST /api/flow/tasks
pub async fn submit_flow_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlowTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();
    if req.prompt_content.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt_content must not be empty".to_string()));
    }

    let flow_url = req.flow_url.filter(|u| !u.trim().is_empty());
    let task_id = state
        .flow
        .add_task(&req.prompt_content, req.debugging_port, flow_url);
    info!("Flow task accepted: {}", task_id);

    Ok((
        StatusCode::ACCEPTED,
        Json(FlowTaskAccepted {
            task_id,
            status: "queued".to_string(),
        }),
    ))
}

/// Status of one Flow task.
///
/// GET /api/flow/tasks/{task_id}
pub async fn get_flow_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<FlowTask>, ApiError> {
    let id = Uuid::parse_str(&task_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid task id: {}", task_id)))?;

    state
        .flow
        .get_task_status(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", task_id)))
}

/// Queue summary.
///
/// GET /api/flow/queue_status
pub async fn queue_status(State(state): State<Arc<AppState>>) -> Json<QueueSummary> {
    Json(state.flow.get_queue_summary())
}
