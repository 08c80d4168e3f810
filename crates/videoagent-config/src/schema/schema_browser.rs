//! Browser automation and Veo API configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Settings for driving the Flow web page through Chrome DevTools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Debugging port tried before any discovery.
    #[serde(default)]
    pub preferred_port: Option<u16>,

    /// Flow page opened when no matching tab exists.
    #[serde(default)]
    pub flow_url: Option<String>,

    #[serde(default = "default_scan_port_start")]
    pub scan_port_start: u16,

    #[serde(default = "default_scan_port_end")]
    pub scan_port_end: u16,

    /// Timeout for a single `/json/version` probe.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Extra `DevToolsActivePort` files to read candidate ports from.
    #[serde(default)]
    pub devtools_port_files: Vec<PathBuf>,

    /// URL fragments identifying an already open Flow tab.
    #[serde(default = "default_tab_keywords")]
    pub tab_keywords: Vec<String>,

    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Extra wait for client-side rendering after load.
    #[serde(default = "default_render_settle")]
    pub render_settle_ms: u64,

    /// Total budget for input/submit attempts.
    #[serde(default = "default_app_ready_timeout")]
    pub app_ready_timeout_secs: u64,

    #[serde(default = "default_retry_interval")]
    pub retry_interval_ms: u64,

    /// Wait after text injection before submitting.
    #[serde(default = "default_paste_settle")]
    pub paste_settle_ms: u64,
}

fn default_scan_port_start() -> u16 {
    9222
}

fn default_scan_port_end() -> u16 {
    9232
}

fn default_probe_timeout() -> u64 {
    1200
}

fn default_tab_keywords() -> Vec<String> {
    ["flow", "veo", "labs.google", "ai.google"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_page_load_timeout() -> u64 {
    15
}

fn default_render_settle() -> u64 {
    3000
}

fn default_app_ready_timeout() -> u64 {
    60
}

fn default_retry_interval() -> u64 {
    2000
}

fn default_paste_settle() -> u64 {
    1500
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            preferred_port: None,
            flow_url: None,
            scan_port_start: default_scan_port_start(),
            scan_port_end: default_scan_port_end(),
            probe_timeout_ms: default_probe_timeout(),
            devtools_port_files: Vec::new(),
            tab_keywords: default_tab_keywords(),
            page_load_timeout_secs: default_page_load_timeout(),
            render_settle_ms: default_render_settle(),
            app_ready_timeout_secs: default_app_ready_timeout(),
            retry_interval_ms: default_retry_interval(),
            paste_settle_ms: default_paste_settle(),
        }
    }
}

impl BrowserConfig {
    /// Port files with `~` expanded to the home directory.
    pub fn expanded_port_files(&self) -> Vec<PathBuf> {
        self.devtools_port_files
            .iter()
            .map(|path| PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy())))
            .collect()
    }
}

/// Mocked Veo generation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeoConfig {
    /// API key; when unset the `VEO_API_KEY` environment variable is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,
}

fn default_simulated_latency() -> u64 {
    2000
}

impl Default for VeoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            simulated_latency_ms: default_simulated_latency(),
        }
    }
}

impl VeoConfig {
    /// Resolve the API key from config or environment. Empty keys count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("VEO_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}
