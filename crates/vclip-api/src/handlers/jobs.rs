//! Job submission and status polling.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use vclip_models::{ClipLengthBounds, Job, JobId, LayoutMode, Timeframe};

use crate::error::{ApiError, ApiResult};
use crate::security::validate_video_url;
use crate::state::AppState;

/// POST /jobs response.
#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
}

/// Parsed multipart submission, before it becomes a `Job`.
#[derive(Debug, Default)]
struct JobSubmission {
    job_id: Option<String>,
    source_url: Option<String>,
    opus_template: Option<String>,
    clip_duration: Option<u32>,
    layout: Option<String>,
    timeframe_start: Option<f64>,
    timeframe_end: Option<f64>,
    min_clip_length: Option<f64>,
    max_clip_length: Option<f64>,
    target_clip_length: Option<f64>,
}

/// POST /jobs
///
/// Accepts the submission form fields (multipart/form-encoded): `job_id`,
/// `youtube_url`/`video_url`, `opus_template`, `clip_duration`, `layout`,
/// `timeframe_start`/`timeframe_end`, `min_clip_length`/`max_clip_length`/
/// `target_clip_length`. Enqueues on the broker and returns `{job_id}`.
pub async fn submit_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<SubmitJobResponse>> {
    let mut submission = JobSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed field '{name}': {e}")))?;

        match name.as_str() {
            "job_id" => submission.job_id = Some(value),
            "youtube_url" | "video_url" => submission.source_url = Some(value),
            "opus_template" => submission.opus_template = Some(value),
            "clip_duration" => submission.clip_duration = value.parse().ok(),
            "layout" => submission.layout = Some(value),
            "timeframe_start" => submission.timeframe_start = value.parse().ok(),
            "timeframe_end" => submission.timeframe_end = value.parse().ok(),
            "min_clip_length" => submission.min_clip_length = value.parse().ok(),
            "max_clip_length" => submission.max_clip_length = value.parse().ok(),
            "target_clip_length" => submission.target_clip_length = value.parse().ok(),
            _ => {}
        }
    }

    let job = build_job(submission, &state.output_root)?;

    info!(job_id = %job.id, source_url = %job.source_url, "submitting job");
    state.queue.enqueue(&job).await?;
    crate::metrics::record_job_enqueued();

    Ok(Json(SubmitJobResponse { job_id: job.id.to_string() }))
}

fn build_job(submission: JobSubmission, output_root: &str) -> ApiResult<Job> {
    let job_id = submission.job_id.ok_or_else(|| ApiError::bad_request("job_id is required"))?;
    let source_url = submission
        .source_url
        .ok_or_else(|| ApiError::bad_request("youtube_url or video_url is required"))?;
    let source_url = validate_video_url(&source_url).into_result().map_err(ApiError::bad_request)?;

    let output_dir = format!("{}/{}", output_root.trim_end_matches('/'), job_id);

    let mut job = Job::new(job_id, source_url, output_dir);

    if let Some(template) = submission.opus_template.as_deref() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(template) {
            if let Some(name) = value.get("name").and_then(|v| v.as_str()) {
                job = job.with_template(name);
            }
        } else {
            job = job.with_template(template);
        }
    }

    if let Some(layout) = submission.layout.as_deref() {
        let layout: LayoutMode = layout.parse().map_err(|_| ApiError::bad_request(format!("unknown layout '{layout}'")))?;
        job = job.with_layout(layout);
    }

    if let Some(duration) = submission.clip_duration {
        job.clip_duration = duration;
    }

    job.timeframe = Timeframe { start: submission.timeframe_start, end: submission.timeframe_end };

    let defaults = ClipLengthBounds::default();
    let min = submission.min_clip_length.unwrap_or(defaults.min);
    let max = submission.max_clip_length.unwrap_or(defaults.max);
    let target = submission.target_clip_length.unwrap_or(defaults.target);
    if min > max {
        return Err(ApiError::bad_request("min_clip_length must not exceed max_clip_length"));
    }
    job = job.with_clip_length(ClipLengthBounds { min, target, max });

    Ok(job)
}

/// GET /jobs/{id} response. `state` is one of `PROCESSING`, `COMPLETED`,
/// `FAILED`, or the `not_found` sentinel — never a 404; pollers retry on the
/// sentinel rather than treating it as an error.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job: JobView,
}

#[derive(Debug, Serialize)]
pub struct JobView {
    pub state: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<vclip_models::ClipRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn get_job(State(state): State<AppState>, Path(job_id): Path<String>) -> ApiResult<Json<JobStatusResponse>> {
    let job_id = JobId::from_string(job_id);

    let status = match state.queue.get(&job_id).await {
        Ok(Some(status)) => status,
        Ok(None) => {
            return Ok(Json(JobStatusResponse {
                job: JobView { state: "not_found".to_string(), progress: 0, stage: None, message: None, result: None, error: None },
            }));
        }
        Err(e) => {
            warn!(job_id = %job_id, "failed to read job status: {}", e);
            return Err(ApiError::from(e));
        }
    };

    // Spec's job-state surface is {PROCESSING, COMPLETED, FAILED, not_found}; a
    // queued-but-unclaimed job is not yet a distinct user-facing state, and a
    // stale job (dead worker) is reported the same as a failure.
    let state_str = match status.status {
        vclip_models::JobStatus::Queued | vclip_models::JobStatus::Processing => "PROCESSING",
        vclip_models::JobStatus::Completed => "COMPLETED",
        vclip_models::JobStatus::Failed | vclip_models::JobStatus::Stale => "FAILED",
    };

    Ok(Json(JobStatusResponse {
        job: JobView {
            state: state_str.to_string(),
            progress: status.progress,
            stage: status.stage,
            message: status.message,
            result: if status.clips.is_empty() { None } else { Some(status.clips) },
            error: status.error_message,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(job_id: &str, url: &str) -> JobSubmission {
        JobSubmission { job_id: Some(job_id.to_string()), source_url: Some(url.to_string()), ..Default::default() }
    }

    #[test]
    fn test_build_job_rejects_missing_job_id() {
        let submission = JobSubmission { source_url: Some("https://youtu.be/abc123".to_string()), ..Default::default() };
        assert!(build_job(submission, "/out").is_err());
    }

    #[test]
    fn test_build_job_rejects_missing_source_url() {
        let submission = JobSubmission { job_id: Some("job-1".to_string()), ..Default::default() };
        assert!(build_job(submission, "/out").is_err());
    }

    #[test]
    fn test_build_job_rejects_min_exceeding_max() {
        let mut submission = submission("job-1", "https://youtu.be/abc123");
        submission.min_clip_length = Some(50.0);
        submission.max_clip_length = Some(20.0);
        assert!(build_job(submission, "/out").is_err());
    }

    #[test]
    fn test_build_job_applies_defaults() {
        let submission = submission("job-1", "https://youtu.be/abc123");
        let job = build_job(submission, "/out").unwrap();
        assert_eq!(job.id.as_str(), "job-1");
        assert_eq!(job.output_dir, "/out/job-1");
        assert_eq!(job.layout, LayoutMode::Fit);
        assert_eq!(job.clip_duration, 30);
    }

    #[test]
    fn test_build_job_rejects_unsupported_domain() {
        let submission = submission("job-1", "https://evil.example.com/video");
        assert!(build_job(submission, "/out").is_err());
    }
}
