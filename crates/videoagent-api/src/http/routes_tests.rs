use super::*;
use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;
use videoagent_config::VeoConfig;
use videoagent_flowqueue::{
    BrowserSubmitter, FlowTaskManager, QueueConfig, QueueError, SubmitOutcome,
};

use crate::veo::VeoClient;

/// Succeeds unless built with a failure message.
struct FakeFlow {
    failure: Option<&'static str>,
}

#[async_trait]
impl BrowserSubmitter for FakeFlow {
    async fn submit(
        &self,
        _payload: &str,
        port: Option<u16>,
        _url: Option<&str>,
    ) -> Result<SubmitOutcome, QueueError> {
        Ok(match self.failure {
            Some(message) => SubmitOutcome::failure(message),
            None => SubmitOutcome::success(format!("submitted via {:?}", port)),
        })
    }
}

fn create_test_state(api_key: Option<&str>) -> Arc<AppState> {
    create_state_with(FakeFlow { failure: None }, api_key)
}

fn create_state_with(submitter: FakeFlow, api_key: Option<&str>) -> Arc<AppState> {
    let manager = Arc::new(FlowTaskManager::new(
        QueueConfig::default(),
        Arc::new(submitter),
    ));
    let veo = VeoClient::new(VeoConfig {
        api_key: api_key.map(str::to_string),
        simulated_latency_ms: 0,
    });
    Arc::new(AppState::new(manager, veo))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_state(None));
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = create_router(create_test_state(None));
    let response = app.oneshot(get("/livez")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "alive");
}

#[tokio::test]
async fn test_submit_flow_task_is_queued() {
    let state = create_test_state(None);
    let app = create_router(state.clone());

    let response = app
        .oneshot(post_json(
            "/api/flow/tasks",
            serde_json::json!({ "prompt_content": "{\"meta\":{\"topic\":\"cats\"}}", "debugging_port": 9222 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    assert_eq!(body["status"], "queued");
    let id = uuid::Uuid::parse_str(body["task_id"].as_str().unwrap()).unwrap();

    let task = state.flow.get_task_status(id).unwrap();
    assert_eq!(task.target_port, Some(9222));
    assert_eq!(state.flow.get_queue_summary().queued, 1);
    assert_eq!(state.request_count(), 1);
}

#[tokio::test]
async fn test_duplicate_submission_returns_same_id() {
    let state = create_test_state(None);
    let body = serde_json::json!({ "prompt_content": "same prompt" });

    let first = create_router(state.clone())
        .oneshot(post_json("/api/flow/tasks", body.clone()))
        .await
        .unwrap();
    let second = create_router(state.clone())
        .oneshot(post_json("/api/flow/tasks", body))
        .await
        .unwrap();

    let first = json_body(first).await;
    let second = json_body(second).await;
    assert_eq!(first["task_id"], second["task_id"]);
    assert_eq!(state.flow.get_queue_summary().queued, 1);
}

#[tokio::test]
async fn test_submit_blank_prompt_rejected() {
    let state = create_test_state(None);
    let response = create_router(state.clone())
        .oneshot(post_json(
            "/api/flow/tasks",
            serde_json::json!({ "prompt_content": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
    assert_eq!(state.flow.get_queue_summary().total, 0);
}

#[tokio::test]
async fn test_get_flow_task() {
    let state = create_test_state(None);
    let id = state.flow.add_task("payload", None, None);

    let response = create_router(state)
        .oneshot(get(&format!("/api/flow/tasks/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["status"], "queued");
    assert_eq!(body["payload"], "payload");
}

#[tokio::test]
async fn test_get_unknown_task_is_not_found() {
    let app = create_router(create_test_state(None));
    let response = app
        .oneshot(get(&format!("/api/flow/tasks/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_malformed_task_id_is_bad_request() {
    let app = create_router(create_test_state(None));
    let response = app.oneshot(get("/api/flow/tasks/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_queue_status_endpoint() {
    let state = create_test_state(None);
    state.flow.add_task("a", Some(9222), None);
    state.flow.add_task("b", None, None);

    let response = create_router(state)
        .oneshot(get("/api/flow/queue_status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["queued"], 2);
    assert_eq!(body["running"], 0);
    assert_eq!(body["total"], 2);
    assert!(body["locked_ports"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_video_submits_directly() {
    let state = create_test_state(None);
    let response = create_router(state.clone())
        .oneshot(post_json(
            "/api/generate/video",
            serde_json::json!({ "prompt_content": "{}", "debugging_port": 9222 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "submitted via Some(9222)");
    // Direct submissions never touch the queue
    assert_eq!(state.flow.get_queue_summary().total, 0);
}

#[tokio::test]
async fn test_generate_video_failure_is_server_error() {
    let state = create_state_with(FakeFlow { failure: Some("No Flow tab found") }, None);
    let response = create_router(state)
        .oneshot(post_json(
            "/api/generate/video",
            serde_json::json!({ "prompt_content": "{}" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("No Flow tab found"));
}

#[tokio::test]
async fn test_generate_video_blank_prompt_rejected() {
    let app = create_router(create_test_state(None));
    let response = app
        .oneshot(post_json(
            "/api/generate/video",
            serde_json::json!({ "prompt_content": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_veo() {
    let app = create_router(create_test_state(Some("test-key")));
    let response = app
        .oneshot(post_json(
            "/api/generate/veo",
            serde_json::json!({ "prompt_content": { "meta": { "topic": "ocean" } } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["task_id"].as_str().unwrap().starts_with("veo_task_"));
}

#[tokio::test]
async fn test_generate_veo_without_key() {
    if std::env::var("VEO_API_KEY").is_ok() {
        return;
    }
    let app = create_router(create_test_state(None));
    let response = app
        .oneshot(post_json(
            "/api/generate/veo",
            serde_json::json!({ "prompt_content": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].as_str().unwrap().contains("VEO_API_KEY"));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = create_router(create_test_state(None));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_router(create_test_state(None));
    let response = app.oneshot(get("/api/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
