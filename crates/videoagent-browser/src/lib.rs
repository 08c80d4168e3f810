//! # VideoAgent Browser
//!
//! Submits prompts to the Flow web page by attaching to a running Chrome
//! over the DevTools protocol.
//!
//! ## Flow
//!
//! 1. Discover a live DevTools port (preferred, `DevToolsActivePort` files,
//!    Chrome command lines, then a port scan).
//! 2. Pick an open Flow tab or open the configured URL.
//! 3. Locate the prompt input, inject the text and submit it.

pub mod cdp;
pub mod discovery;
pub mod error;
pub mod flow;
pub mod heuristics;

pub use cdp::{CdpClient, CdpError, DevToolsEndpoint, PageSession};
pub use discovery::{PortDiscovery, parse_major};
pub use error::BrowserError;
pub use flow::FlowAutomator;

#[cfg(test)]
mod test_support;
