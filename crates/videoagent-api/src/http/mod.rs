//! HTTP interface module.
//!
//! Provides REST endpoints for:
//! - Flow task submission and status
//! - Veo generation
//! - Health checks

pub mod flow;
pub mod generate;
pub mod routes;

pub(crate) mod monitoring;
