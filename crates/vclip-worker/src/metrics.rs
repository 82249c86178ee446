//! Worker-process Prometheus metrics: jobs claimed/completed/failed, per-stage
//! duration, and clips rendered. Mirrors the control API's metrics module —
//! same `metrics::counter!`/`histogram!` macros, a separate Prometheus
//! registry scraped on the worker's own `/metrics` if `METRICS_ENABLED`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new().install_recorder().expect("failed to install Prometheus recorder")
}

pub mod names {
    pub const JOBS_CLAIMED_TOTAL: &str = "vclip_worker_jobs_claimed_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vclip_worker_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vclip_worker_jobs_failed_total";
    pub const STAGE_DURATION_SECONDS: &str = "vclip_worker_stage_duration_seconds";
    pub const CLIPS_RENDERED_TOTAL: &str = "vclip_worker_clips_rendered_total";
}

pub fn record_job_claimed() {
    counter!(names::JOBS_CLAIMED_TOTAL).increment(1);
}

pub fn record_job_completed() {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
}

pub fn record_job_failed() {
    counter!(names::JOBS_FAILED_TOTAL).increment(1);
}

pub fn record_stage_duration(stage: &str, duration_secs: f64) {
    let labels = [("stage", stage.to_string())];
    histogram!(names::STAGE_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_clips_rendered(count: u64) {
    counter!(names::CLIPS_RENDERED_TOTAL).increment(count);
}
