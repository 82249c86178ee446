//! Control API: job submission, polling, template catalog, and clip delivery.
//!
//! This crate provides:
//! - The seven-endpoint HTTP surface (§4.J)
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod broken_pipe;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::StaleJobDetector;
pub use state::AppState;
