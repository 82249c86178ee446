//! Worker configuration.

use std::time::Duration;

/// Worker configuration. One job at a time per process; horizontal scaling
/// is N processes against the same broker, not concurrency inside one.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Stable name this worker registers under (`worker:{name}` in the broker).
    pub worker_name: String,
    /// How long to block waiting for the next job before looping again.
    pub claim_timeout: Duration,
    /// Graceful shutdown timeout.
    pub shutdown_timeout: Duration,
    /// Scratch directory for per-job intermediates; a subdirectory per job id.
    pub work_dir: String,
    /// Interval for refreshing the broker claim and liveness heartbeat while processing.
    pub heartbeat_interval: Duration,
    /// Output canvas size in pixels (width, height); 1080x1920 by default.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Per-stage child-process timeouts, seconds.
    pub download_timeout_secs: u64,
    pub extract_audio_timeout_secs: u64,
    pub cut_timeout_secs: u64,
    pub reframe_timeout_secs: u64,
    pub burn_timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_name: "opus-caption-worker".to_string(),
            claim_timeout: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(30),
            work_dir: "/tmp/vclip".to_string(),
            heartbeat_interval: Duration::from_secs(30),
            canvas_width: 1080,
            canvas_height: 1920,
            download_timeout_secs: 30 * 60,
            extract_audio_timeout_secs: 5 * 60,
            cut_timeout_secs: 10 * 60,
            reframe_timeout_secs: 10 * 60,
            burn_timeout_secs: 10 * 60,
            probe_timeout_secs: 60,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            worker_name: std::env::var("WORKER_NAME").unwrap_or(default.worker_name),
            claim_timeout: Duration::from_secs(
                std::env::var("WORKER_CLAIM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default.claim_timeout.as_secs()),
            ),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default.shutdown_timeout.as_secs()),
            ),
            work_dir: std::env::var("WORKER_WORK_DIR").unwrap_or(default.work_dir),
            heartbeat_interval: Duration::from_secs(
                std::env::var("WORKER_HEARTBEAT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default.heartbeat_interval.as_secs()),
            ),
            canvas_width: std::env::var("WORKER_CANVAS_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.canvas_width),
            canvas_height: std::env::var("WORKER_CANVAS_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.canvas_height),
            download_timeout_secs: std::env::var("WORKER_DOWNLOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.download_timeout_secs),
            extract_audio_timeout_secs: std::env::var("WORKER_EXTRACT_AUDIO_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.extract_audio_timeout_secs),
            cut_timeout_secs: std::env::var("WORKER_CUT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.cut_timeout_secs),
            reframe_timeout_secs: std::env::var("WORKER_REFRAME_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.reframe_timeout_secs),
            burn_timeout_secs: std::env::var("WORKER_BURN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.burn_timeout_secs),
            probe_timeout_secs: std::env::var("WORKER_PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.probe_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_single_job_per_process() {
        let config = WorkerConfig::default();
        assert_eq!(config.canvas_width, 1080);
        assert_eq!(config.canvas_height, 1920);
        assert_eq!(config.worker_name, "opus-caption-worker");
    }
}
