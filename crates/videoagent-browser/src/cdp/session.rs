//! Session attached to a single page.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use super::client::Connection;
use super::error::CdpError;
use super::protocol::KeyEventType;

const READY_POLL: Duration = Duration::from_millis(250);

/// A flattened DevTools session for one tab.
pub struct PageSession {
    target_id: String,
    session_id: String,
    conn: Arc<Connection>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, conn: Arc<Connection>) -> Self {
        Self {
            target_id,
            session_id,
            conn,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command scoped to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.call(method, params, Some(&self.session_id)).await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    pub async fn bring_to_front(&self) -> Result<(), CdpError> {
        self.call("Page.bringToFront", None).await?;
        Ok(())
    }

    /// Current URL of the page.
    pub async fn url(&self) -> Result<String, CdpError> {
        let value = self.evaluate("window.location.href").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Poll `document.readyState` until it is `complete`.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub async fn wait_until_complete(&self, timeout: Duration) -> Result<bool, CdpError> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.evaluate("document.readyState").await?;
            if state.as_str() == Some("complete") {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }

    /// Insert text at the focused element as if typed or pasted.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Inserted {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release Enter on the focused element.
    pub async fn press_enter(&self) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyDown,
                "key": "Enter",
                "code": "Enter",
                "windowsVirtualKeyCode": 13,
                "text": "\r",
            })),
        )
        .await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyUp,
                "key": "Enter",
                "code": "Enter",
                "windowsVirtualKeyCode": 13,
            })),
        )
        .await?;

        Ok(())
    }
}
