//! Axum HTTP server for the video trimmer.
//!
//! This crate provides:
//! - Upload endpoints for the interval and scene summaries
//! - Inline preview and attachment download of each variant's output
//! - Security headers, request IDs and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
