use super::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> DevToolsEndpoint {
    DevToolsEndpoint::new(&server.uri(), Duration::from_secs(2)).unwrap()
}

#[test]
fn test_base_trims_trailing_slash() {
    let endpoint = DevToolsEndpoint::new("http://127.0.0.1:9222/", Duration::from_secs(1)).unwrap();
    assert_eq!(endpoint.base(), "http://127.0.0.1:9222");
}

#[test]
fn test_for_port() {
    let endpoint = DevToolsEndpoint::for_port("localhost", 9333, Duration::from_secs(1)).unwrap();
    assert_eq!(endpoint.base(), "http://localhost:9333");
}

#[tokio::test]
async fn test_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Browser": "Chrome/126.0.6478.127",
            "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
        })))
        .mount(&server)
        .await;

    let version = endpoint(&server).version().await.unwrap();
    assert_eq!(version.browser, "Chrome/126.0.6478.127");
}

#[tokio::test]
async fn test_version_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = endpoint(&server).version().await.unwrap_err();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

#[tokio::test]
async fn test_list_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "type": "page", "title": "Inbox", "url": "https://mail.example.com"},
            {"id": "B", "type": "page", "title": "Flow", "url": "https://labs.google/fx/tools/flow"}
        ])))
        .mount(&server)
        .await;

    let pages = endpoint(&server).list_pages().await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].id, "B");
}

#[tokio::test]
async fn test_open_tab_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/json/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "NEW",
            "type": "page",
            "title": "",
            "url": "https://labs.google/fx/tools/flow"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = endpoint(&server)
        .open_tab("https://labs.google/fx/tools/flow")
        .await
        .unwrap();
    assert_eq!(page.id, "NEW");
}

#[tokio::test]
async fn test_open_tab_rejects_invalid_url() {
    let server = MockServer::start().await;
    let err = endpoint(&server).open_tab("not a url").await.unwrap_err();
    assert!(matches!(err, CdpError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let endpoint = DevToolsEndpoint::for_port("127.0.0.1", 1, Duration::from_millis(300)).unwrap();
    assert!(endpoint.version().await.is_err());
}
