#![deny(unreachable_patterns)]
//! Video processing worker.
//!
//! This crate provides:
//! - Job executor: claim, run, report against the broker
//! - The clip rendering pipeline (download, transcribe, select, render)
//! - Status sidecar emission
//! - Graceful shutdown

pub mod config;
pub mod error;
pub mod executor;
pub mod face_cache;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod retry;
pub mod sidecar;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use pipeline::{Pipeline, ProgressReporter};
