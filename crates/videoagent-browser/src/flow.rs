//! Drives the Flow page to submit a prompt.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use videoagent_config::BrowserConfig;
use videoagent_flowqueue::{BrowserSubmitter, QueueError, SubmitOutcome};

use crate::cdp::{CdpClient, CdpError, PageSession};
use crate::discovery::{PortDiscovery, ProbedPort};
use crate::error::BrowserError;
use crate::heuristics::{self, ClickResult, FocusResult};

/// Waits used while driving the page.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Wait for `document.readyState == "complete"`; a timeout is not fatal.
    pub page_load: Duration,
    /// Extra wait for client-side rendering.
    pub render_settle: Duration,
    /// Budget for all input/submit attempts.
    pub app_ready: Duration,
    pub retry_interval: Duration,
    /// Wait after the text is inserted.
    pub paste_settle: Duration,
    /// Wait after focusing the input.
    pub focus_settle: Duration,
    /// Wait after Enter or a button click.
    pub submit_settle: Duration,
    /// Wait after opening a new tab.
    pub tab_open_settle: Duration,
}

impl From<&BrowserConfig> for Timings {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            page_load: Duration::from_secs(config.page_load_timeout_secs),
            render_settle: Duration::from_millis(config.render_settle_ms),
            app_ready: Duration::from_secs(config.app_ready_timeout_secs),
            retry_interval: Duration::from_millis(config.retry_interval_ms),
            paste_settle: Duration::from_millis(config.paste_settle_ms),
            focus_settle: Duration::from_millis(500),
            submit_settle: Duration::from_secs(2),
            tab_open_settle: Duration::from_secs(3),
        }
    }
}

/// Submits prompts to Flow through a running Chrome.
pub struct FlowAutomator {
    config: BrowserConfig,
    discovery: PortDiscovery,
    timings: Timings,
}

impl FlowAutomator {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            discovery: PortDiscovery::new(&config),
            timings: Timings::from(&config),
            config,
        }
    }

    pub fn with_discovery(mut self, discovery: PortDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn discovery(&self) -> &PortDiscovery {
        &self.discovery
    }

    /// Submit `prompt` and return a success message.
    pub async fn run(
        &self,
        prompt: &str,
        port: Option<u16>,
        url: Option<&str>,
    ) -> Result<String, BrowserError> {
        info!("Starting Flow submission");

        let probed = self
            .discovery
            .choose_port(port.or(self.config.preferred_port))
            .await
            .ok_or(BrowserError::NoDevToolsPort)?;

        let client = CdpClient::connect_ws(&probed.version.web_socket_debugger_url).await?;
        let session = self.open_flow_page(&probed, &client, url).await?;
        self.prepare_page(&session).await;

        let deadline = Instant::now() + self.timings.app_ready;
        let mut attempts = 0;
        let mut last_reason = String::from("no attempt made");

        while Instant::now() < deadline {
            attempts += 1;
            debug!("Flow submit attempt {}", attempts);

            match self.input_and_submit(&session, prompt).await {
                Ok(how) => {
                    info!("Flow prompt submitted via {} on attempt {}", how, attempts);
                    return Ok(format!("Generation request submitted ({})", how));
                }
                Err(e) => {
                    warn!("Flow attempt {} failed: {}", attempts, e);
                    last_reason = e.to_string();
                }
            }
            tokio::time::sleep(self.timings.retry_interval).await;
        }

        Err(BrowserError::AttemptsExhausted {
            attempts,
            last_reason,
        })
    }

    /// Attach to an open Flow tab, or open one.
    async fn open_flow_page(
        &self,
        probed: &ProbedPort,
        client: &CdpClient,
        url: Option<&str>,
    ) -> Result<PageSession, BrowserError> {
        let pages = probed.endpoint.list_pages().await?;
        for page in pages.iter().filter(|p| p.is_page()) {
            debug!("Open tab: {}", page.url);
        }

        let target_id = match heuristics::pick_flow_tab(&pages, &self.config.tab_keywords) {
            Some(page) => {
                info!("Found Flow tab: {}", page.url);
                page.id.clone()
            }
            None => {
                let flow_url = url
                    .filter(|u| !u.trim().is_empty())
                    .or(self.config.flow_url.as_deref())
                    .ok_or(BrowserError::NoFlowTab)?;
                info!("Opening Flow page: {}", flow_url);
                let page = probed.endpoint.open_tab(flow_url).await?;
                tokio::time::sleep(self.timings.tab_open_settle).await;
                page.id
            }
        };

        Ok(client.attach_page(&target_id).await?)
    }

    async fn prepare_page(&self, session: &PageSession) {
        if let Err(e) = session.bring_to_front().await {
            warn!("Could not bring Flow tab to front: {}", e);
        }
        if let Ok(url) = session.url().await {
            info!("Current page: {}", url);
        }

        match session.wait_until_complete(self.timings.page_load).await {
            Ok(true) => debug!("Page load complete"),
            Ok(false) => warn!("Page load timed out, continuing"),
            Err(e) => warn!("Could not read page state: {}", e),
        }

        tokio::time::sleep(self.timings.render_settle).await;
    }

    /// One attempt: focus the input, insert the prompt and submit it.
    async fn input_and_submit(
        &self,
        session: &PageSession,
        prompt: &str,
    ) -> Result<&'static str, BrowserError> {
        let focus: FocusResult =
            serde_json::from_value(session.evaluate(&heuristics::focus_input_script()).await?)
                .map_err(CdpError::from)?;
        if !focus.found {
            return Err(BrowserError::InputNotFound);
        }
        debug!("Prompt input: {:?}", focus.selector);
        tokio::time::sleep(self.timings.focus_settle).await;

        session.insert_text(prompt).await?;
        tokio::time::sleep(self.timings.paste_settle).await;

        if let Ok(content) = session.evaluate(heuristics::input_content_script()).await {
            let preview: String = content.as_str().unwrap_or_default().chars().take(50).collect();
            debug!("Input now holds: {}", preview);
        }

        match session.press_enter().await {
            Ok(()) => {
                tokio::time::sleep(self.timings.submit_settle).await;
                return Ok("enter key");
            }
            Err(e) => warn!("Enter key failed: {}", e),
        }

        let click: ClickResult =
            serde_json::from_value(session.evaluate(&heuristics::click_send_button_script()).await?)
                .map_err(CdpError::from)?;
        if !click.clicked {
            return Err(BrowserError::SubmitFailed("no send button found".to_string()));
        }
        debug!("Clicked send button: {:?}", click.selector);
        tokio::time::sleep(self.timings.submit_settle).await;
        Ok("send button")
    }
}

#[async_trait]
impl BrowserSubmitter for FlowAutomator {
    async fn submit(
        &self,
        payload: &str,
        port: Option<u16>,
        url: Option<&str>,
    ) -> Result<SubmitOutcome, QueueError> {
        match self.run(payload, port, url).await {
            Ok(message) => Ok(SubmitOutcome::success(message)),
            Err(e) => {
                warn!("Flow submission failed: {}", e);
                Ok(SubmitOutcome::failure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
