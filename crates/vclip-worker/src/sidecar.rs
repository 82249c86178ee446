//! Status sidecar: `{output_dir}/{job_id}_status.json`, an auxiliary progress
//! channel parallel to the broker so downstream tooling can observe a job
//! without broker access. Overwritten in place on every update.

use std::path::{Path, PathBuf};

use serde::Serialize;
use vclip_models::{ClipRecord, ProgressSnapshot};

#[derive(Debug, Serialize)]
struct SidecarSnapshot<'a> {
    #[serde(rename = "jobId")]
    job_id: &'a str,
    status: &'a str,
    progress: u8,
    stage: &'a str,
    message: &'a str,
    timestamp: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    clips: Vec<ClipRecord>,
}

fn sidecar_path(output_dir: impl AsRef<Path>, job_id: &str) -> PathBuf {
    output_dir.as_ref().join(format!("{job_id}_status.json"))
}

/// Overwrite the sidecar with an in-progress snapshot.
pub async fn write_processing(
    output_dir: impl AsRef<Path>,
    job_id: &str,
    snapshot: &ProgressSnapshot,
) -> std::io::Result<()> {
    write_status(output_dir, job_id, "processing", snapshot).await
}

/// Overwrite the sidecar with a terminal success snapshot.
pub async fn write_completed(
    output_dir: impl AsRef<Path>,
    job_id: &str,
    clips: Vec<ClipRecord>,
) -> std::io::Result<()> {
    let snapshot = ProgressSnapshot::new(100, "done", "completed").with_clips(clips);
    write_status(output_dir, job_id, "completed", &snapshot).await
}

/// Overwrite the sidecar with a terminal failure snapshot.
pub async fn write_error(
    output_dir: impl AsRef<Path>,
    job_id: &str,
    message: &str,
) -> std::io::Result<()> {
    let snapshot = ProgressSnapshot::new(0, "failed", message);
    write_status(output_dir, job_id, "error", &snapshot).await
}

async fn write_status(
    output_dir: impl AsRef<Path>,
    job_id: &str,
    status: &str,
    snapshot: &ProgressSnapshot,
) -> std::io::Result<()> {
    let output_dir = output_dir.as_ref();
    tokio::fs::create_dir_all(output_dir).await?;

    let doc = SidecarSnapshot {
        job_id,
        status,
        progress: snapshot.percentage,
        stage: &snapshot.stage,
        message: &snapshot.message,
        timestamp: snapshot.timestamp.timestamp(),
        clips: snapshot.clips.clone(),
    };

    let body = serde_json::to_vec_pretty(&doc)?;
    let path = sidecar_path(output_dir, job_id);
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, body).await?;
    tokio::fs::rename(&tmp_path, &path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_completed_round_trips_as_json() {
        let dir = tempfile::tempdir().unwrap();
        write_completed(dir.path(), "job-1", vec![]).await.unwrap();

        let path = sidecar_path(dir.path(), "job-1");
        let raw = tokio::fs::read_to_string(path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["jobId"], "job-1");
        assert_eq!(parsed["status"], "completed");
        assert_eq!(parsed["progress"], 100);
    }
}
