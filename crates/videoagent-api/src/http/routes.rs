//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::{flow, generate, monitoring};
use crate::state::AppState;

/// Create the main router.
///
/// ## Route Structure
///
/// ```text
/// /api/flow
///   POST   /api/flow/tasks        - Queue a Flow submission
///   GET    /api/flow/tasks/{id}   - Query task status
///   GET    /api/flow/queue_status - Queue summary
///
/// /api/generate
///   POST   /api/generate/video    - Submit to Flow directly
///   POST   /api/generate/veo      - Submit to the Veo API
///
/// /api/health - Health check
/// /livez      - Liveness probe
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let flow_routes = Router::new()
        .route("/tasks", post(flow::submit_flow_task))
        .route("/tasks/{task_id}", get(flow::get_flow_task))
        .route("/queue_status", get(flow::queue_status));

    let generate_routes = Router::new()
        .route("/video", post(generate::generate_video))
        .route("/veo", post(generate::generate_veo));

    let api_routes = Router::new()
        .nest("/flow", flow_routes)
        .nest("/generate", generate_routes)
        .route("/health", get(monitoring::health))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .merge(liveness_route)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
