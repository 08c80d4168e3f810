//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_browser;
mod schema_flow;

pub use schema_browser::*;
pub use schema_flow::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub veo: VeoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
