//! HTTP side of the DevTools interface (`/json/*`).

use std::time::Duration;

use tracing::debug;
use url::Url;

use super::error::CdpError;
use super::protocol::{BrowserVersion, PageInfo};

/// DevTools HTTP endpoint of one browser, e.g. `http://127.0.0.1:9222`.
///
/// Requests bypass any configured proxy; DevTools only listens locally.
#[derive(Debug, Clone)]
pub struct DevToolsEndpoint {
    base: String,
    http: reqwest::Client,
}

impl DevToolsEndpoint {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, CdpError> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Endpoint for `host:port` over plain HTTP.
    pub fn for_port(host: &str, port: u16, timeout: Duration) -> Result<Self, CdpError> {
        Self::new(&format!("http://{}:{}", host, port), timeout)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch `/json/version`.
    pub async fn version(&self) -> Result<BrowserVersion, CdpError> {
        let url = format!("{}/json/version", self.base);
        debug!("Fetching browser version from {}", url);
        let version = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", self.base, e)))?
            .json()
            .await?;
        Ok(version)
    }

    /// All targets from `/json/list`.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.base);
        let pages = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(pages)
    }

    /// Open `url` in a new tab. Chrome requires PUT for `/json/new`.
    pub async fn open_tab(&self, url: &str) -> Result<PageInfo, CdpError> {
        let target = Url::parse(url)?;
        let create_url = format!("{}/json/new?{}", self.base, target);
        let page: PageInfo = self
            .http
            .put(&create_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Opened new tab {} - {}", page.id, page.url);
        Ok(page)
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
