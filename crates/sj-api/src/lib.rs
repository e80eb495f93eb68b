//! # sj-api
//!
//! HTTP API server for SOAR Jobs.
//!
//! Exposes the make-job pipeline and the share-link builder as JSON
//! request/response endpoints, plus health and metrics probes.

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
