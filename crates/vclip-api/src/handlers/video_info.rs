//! Remote video metadata probe, via a `yt-dlp` subprocess.

use std::time::Duration;

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::security::{is_valid_video_id, validate_video_url};

const PROBE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct VideoInfoQuery {
    pub video_id: String,
}

#[derive(Debug, Serialize)]
pub struct VideoInfoResponse {
    pub duration: Option<f64>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub upload_date: Option<String>,
}

/// GET /video-info?video_id=…
///
/// Shells out to `yt-dlp --dump-json --no-download` and maps the relevant
/// fields into the response. Returns 504 if the probe doesn't finish within
/// 30 s (a gone/slow upstream shouldn't hang the request indefinitely).
pub async fn get_video_info(Query(query): Query<VideoInfoQuery>) -> ApiResult<Json<VideoInfoResponse>> {
    let candidate = if query.video_id.contains("://") {
        query.video_id.clone()
    } else {
        if !is_valid_video_id(&query.video_id) {
            return Err(ApiError::bad_request("video_id is not a valid identifier or URL"));
        }
        format!("https://www.youtube.com/watch?v={}", query.video_id)
    };
    let url = validate_video_url(&candidate).into_result().map_err(ApiError::bad_request)?;

    let probe = Command::new("yt-dlp")
        .arg("--dump-json")
        .arg("--no-download")
        .arg(&url)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), probe)
        .await
        .map_err(|_| ApiError::timeout("video metadata probe timed out"))?
        .map_err(|e| ApiError::internal(format!("failed to spawn yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("yt-dlp probe failed: {}", stderr);
        return Err(ApiError::bad_request(format!("could not probe video: {}", stderr.trim())));
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| ApiError::internal(format!("yt-dlp returned unparseable output: {e}")))?;

    Ok(Json(VideoInfoResponse {
        duration: json.get("duration").and_then(|v| v.as_f64()),
        title: json.get("title").and_then(|v| v.as_str()).map(String::from),
        uploader: json.get("uploader").and_then(|v| v.as_str()).map(String::from),
        view_count: json.get("view_count").and_then(|v| v.as_u64()),
        upload_date: json.get("upload_date").and_then(|v| v.as_str()).map(String::from),
    }))
}
