//! # VideoAgent API
//!
//! HTTP surface of the VideoAgent service.
//!
//! ## Endpoints
//!
//! - Flow queue: submit, task status, queue summary
//! - Mock Veo generation
//! - Health and liveness probes

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod veo;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiServer, ServerSettings};
pub use state::AppState;
pub use veo::{VeoClient, VeoError, VeoSubmission};
