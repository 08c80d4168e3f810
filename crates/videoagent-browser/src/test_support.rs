//! In-process stand-in for a Chrome DevTools WebSocket.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

pub(crate) enum Reply {
    Ok(Value),
    Err(i64, &'static str),
}

impl Reply {
    /// `Runtime.evaluate` result carrying `value`.
    pub(crate) fn value(value: Value) -> Self {
        Reply::Ok(json!({"result": {"type": "object", "value": value}}))
    }
}

type Responder = Arc<dyn Fn(&str, &Value) -> Reply + Send + Sync>;

pub(crate) struct FakeBrowser {
    pub ws_url: String,
    log: Arc<Mutex<Vec<(String, Value)>>>,
}

impl FakeBrowser {
    pub(crate) async fn start(
        responder: impl Fn(&str, &Value) -> Reply + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(responder);

        let accept_log = Arc::clone(&log);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let responder = Arc::clone(&responder);
                let log = Arc::clone(&accept_log);
                tokio::spawn(async move {
                    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                        return;
                    };
                    while let Some(Ok(msg)) = ws.next().await {
                        let Message::Text(text) = msg else { continue };
                        let request: Value = serde_json::from_str(&text).unwrap();
                        let method = request["method"].as_str().unwrap_or_default().to_string();
                        let params = request.get("params").cloned().unwrap_or(Value::Null);
                        log.lock().push((method.clone(), params.clone()));

                        let body = match responder(&method, &params) {
                            Reply::Ok(result) => json!({
                                "id": request["id"],
                                "result": result,
                                "sessionId": request.get("sessionId"),
                            }),
                            Reply::Err(code, message) => json!({
                                "id": request["id"],
                                "error": {"code": code, "message": message},
                            }),
                        };
                        // Interleave an event the client must ignore.
                        let event = json!({"method": "Page.frameNavigated", "params": {}});
                        if ws.send(Message::Text(event.to_string().into())).await.is_err()
                            || ws.send(Message::Text(body.to_string().into())).await.is_err()
                        {
                            return;
                        }
                    }
                });
            }
        });

        Self {
            ws_url: format!("ws://{}/devtools/browser/fake", addr),
            log,
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.log.lock().clone()
    }

    pub(crate) fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(method, _)| method).collect()
    }
}

/// A Flow page with a prompt textarea and a working Enter key.
pub(crate) fn flow_page(method: &str, params: &Value) -> Reply {
    match method {
        "Target.attachToTarget" => Reply::Ok(json!({"sessionId": "S1"})),
        "Runtime.evaluate" => {
            let expression = params["expression"].as_str().unwrap_or_default();
            if expression.contains("document.readyState") {
                Reply::value(json!("complete"))
            } else if expression.contains("location.href") {
                Reply::value(json!("https://labs.google/fx/tools/flow"))
            } else if expression.contains("found: true") {
                Reply::value(json!({"found": true, "selector": "textarea"}))
            } else if expression.contains("clicked: true") {
                Reply::value(json!({"clicked": true, "selector": "button[type='submit']"}))
            } else if expression.contains("activeElement") {
                Reply::value(json!("a prompt"))
            } else {
                Reply::value(Value::Null)
            }
        }
        _ => Reply::Ok(json!({})),
    }
}
