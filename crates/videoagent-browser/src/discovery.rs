//! Finding a live Chrome DevTools port.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use sysinfo::{ProcessExt, System, SystemExt};
use tracing::{debug, info};
use videoagent_config::BrowserConfig;

use crate::cdp::{BrowserVersion, DevToolsEndpoint};

static MAJOR_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)\.").expect("valid major version pattern"));

static DEBUG_PORT_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--remote-debugging-port=(\d+)").expect("valid debugging port pattern")
});

/// Hosts tried for every candidate port.
const PROBE_HOSTS: &[&str] = &["127.0.0.1", "localhost"];

/// A port that answered `/json/version`.
#[derive(Debug, Clone)]
pub struct ProbedPort {
    pub port: u16,
    pub endpoint: DevToolsEndpoint,
    pub version: BrowserVersion,
}

impl ProbedPort {
    pub fn major_version(&self) -> Option<u32> {
        parse_major(&self.version.browser)
    }
}

/// Builds the candidate port list and probes it in order.
#[derive(Debug, Clone)]
pub struct PortDiscovery {
    port_files: Vec<PathBuf>,
    scan_range: RangeInclusive<u16>,
    probe_timeout: Duration,
    system_sources: bool,
}

impl PortDiscovery {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            port_files: config.expanded_port_files(),
            scan_range: config.scan_port_start..=config.scan_port_end,
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            system_sources: true,
        }
    }

    /// Toggle the default Chrome profile file and the process scan.
    pub fn with_system_sources(mut self, enabled: bool) -> Self {
        self.system_sources = enabled;
        self
    }

    /// Candidate ports in priority order, without duplicates.
    pub async fn candidates(&self, preferred: Option<u16>) -> Vec<u16> {
        let mut ports = Vec::new();
        ports.extend(preferred.filter(|p| *p > 0));

        let mut files = self.port_files.clone();
        if self.system_sources {
            files.extend(default_profile_port_file());
        }
        for file in &files {
            ports.extend(read_port_file(file).await);
        }

        if self.system_sources {
            ports.extend(ports_from_processes().await);
        }

        ports.extend(self.scan_range.clone());

        let mut seen = std::collections::HashSet::new();
        ports.retain(|port| seen.insert(*port));
        ports
    }

    /// Probe one port on each local host name.
    pub async fn probe(&self, port: u16) -> Option<ProbedPort> {
        for host in PROBE_HOSTS {
            let Ok(endpoint) = DevToolsEndpoint::for_port(host, port, self.probe_timeout) else {
                continue;
            };
            match endpoint.version().await {
                Ok(version) => {
                    return Some(ProbedPort {
                        port,
                        endpoint,
                        version,
                    });
                }
                Err(e) => debug!("Probe {}:{} failed: {}", host, port, e),
            }
        }
        None
    }

    /// The first candidate that answers.
    pub async fn choose_port(&self, preferred: Option<u16>) -> Option<ProbedPort> {
        let candidates = self.candidates(preferred).await;
        debug!("DevTools port candidates: {:?}", candidates);

        for port in candidates {
            if let Some(probed) = self.probe(port).await {
                info!(
                    "Using DevTools port {} ({}, major {:?})",
                    port,
                    probed.version.browser,
                    probed.major_version()
                );
                return Some(probed);
            }
        }
        None
    }
}

/// Major version from a `Browser` string such as `Chrome/126.0.6478.127`.
pub fn parse_major(browser: &str) -> Option<u32> {
    MAJOR_VERSION.captures(browser)?.get(1)?.as_str().parse().ok()
}

/// Port from a `--remote-debugging-port=N` argument in a command line.
pub fn parse_debug_port(cmdline: &str) -> Option<u16> {
    DEBUG_PORT_ARG
        .captures(cmdline)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
        .filter(|port| *port > 0)
}

/// First line of a `DevToolsActivePort` file, if it is a port number.
pub async fn read_port_file(path: &Path) -> Option<u16> {
    let content = tokio::fs::read_to_string(path).await.ok()?;
    let port = content.lines().next()?.trim().parse().ok()?;
    debug!("Read DevTools port {} from {}", port, path.display());
    Some(port)
}

/// `DevToolsActivePort` of the default Chrome profile on this platform.
fn default_profile_port_file() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let profile = dirs::data_local_dir().map(|d| d.join("Google").join("Chrome").join("User Data"));
    #[cfg(target_os = "macos")]
    let profile = dirs::config_dir().map(|d| d.join("Google").join("Chrome"));
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let profile = dirs::config_dir().map(|d| d.join("google-chrome"));

    profile.map(|p| p.join("DevToolsActivePort"))
}

/// Debugging ports named on the command line of running Chrome processes.
async fn ports_from_processes() -> Vec<u16> {
    let scan = tokio::task::spawn_blocking(|| {
        let mut system = System::new();
        system.refresh_processes();
        system
            .processes()
            .values()
            .filter(|process| process.name().to_lowercase().contains("chrome"))
            .filter_map(|process| parse_debug_port(&process.cmd().join(" ")))
            .collect::<Vec<u16>>()
    });
    scan.await.unwrap_or_default()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
