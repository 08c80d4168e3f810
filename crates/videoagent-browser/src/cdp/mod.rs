//! Minimal Chrome DevTools Protocol client.

mod client;
mod endpoint;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use endpoint::DevToolsEndpoint;
pub use error::CdpError;
pub use protocol::{BrowserVersion, CdpRequest, CdpResponse, KeyEventType, PageInfo};
pub use session::PageSession;
