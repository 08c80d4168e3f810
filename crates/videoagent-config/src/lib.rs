//! # VideoAgent Config
//!
//! Configuration management for the VideoAgent service: HTTP server,
//! Flow submission queue, browser automation and the Veo API mock.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
