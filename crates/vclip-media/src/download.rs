//! Video download using yt-dlp.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Minimum video file size threshold (50MB) to consider download complete.
const MIN_VIDEO_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum download attempts before giving up on a retryable error.
const MAX_DOWNLOAD_ATTEMPTS: u32 = 3;

/// Fixed backoff between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// Overall budget for a single download attempt.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Download a video from URL using yt-dlp, retrying transient failures.
///
/// Source-gone (`DownloadUnavailable`) and restricted (`DownloadRestricted`)
/// failures are permanent and returned immediately; timeouts and unclassified
/// failures are retried up to [`MAX_DOWNLOAD_ATTEMPTS`] times with a fixed backoff.
pub async fn download_video(url: &str, output_path: impl AsRef<Path>) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    if output_path.exists() {
        if let Ok(metadata) = output_path.metadata() {
            if metadata.len() > MIN_VIDEO_FILE_SIZE {
                info!("Using existing video file: {}", output_path.display());
                return Ok(());
            }
            warn!(
                "Existing file {} is too small ({} bytes), re-downloading",
                output_path.display(),
                metadata.len()
            );
            tokio::fs::remove_file(output_path).await?;
        }
    }

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let mut last_err = MediaError::DownloadUnknown("no attempts made".into());
    for attempt in 1..=MAX_DOWNLOAD_ATTEMPTS {
        match tokio::time::timeout(DOWNLOAD_TIMEOUT, run_yt_dlp(url, output_path)).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => {
                if !err.is_retryable_download() || attempt == MAX_DOWNLOAD_ATTEMPTS {
                    return Err(err);
                }
                warn!(
                    "Download attempt {} of {} failed ({}), retrying",
                    attempt, MAX_DOWNLOAD_ATTEMPTS, err
                );
                last_err = err;
            }
            Err(_) => {
                let err = MediaError::DownloadTimeout(DOWNLOAD_TIMEOUT.as_secs());
                if attempt == MAX_DOWNLOAD_ATTEMPTS {
                    return Err(err);
                }
                warn!(
                    "Download attempt {} of {} timed out, retrying",
                    attempt, MAX_DOWNLOAD_ATTEMPTS
                );
                last_err = err;
            }
        }
        tokio::time::sleep(RETRY_BACKOFF).await;
    }

    Err(last_err)
}

/// Run a single yt-dlp invocation and classify its outcome.
async fn run_yt_dlp(url: &str, output_path: &Path) -> MediaResult<()> {
    info!("Downloading video from {} to {}", url, output_path.display());

    let output = Command::new("yt-dlp")
        .args([
            "--remote-components", "ejs:github",
            "-f", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
            "-o",
        ])
        .arg(output_path)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);
        return Err(classify_yt_dlp_failure(&stderr));
    }

    if !output_path.exists() {
        return Err(MediaError::DownloadUnknown("output file not created".into()));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        "Downloaded video: {} ({:.1} MB)",
        output_path.display(),
        file_size as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}

/// Map yt-dlp's stderr text onto the download error taxonomy.
fn classify_yt_dlp_failure(stderr: &str) -> MediaError {
    let lowered = stderr.to_lowercase();
    let last_line = stderr.lines().last().unwrap_or("unknown error").to_string();

    if lowered.contains("video unavailable")
        || lowered.contains("private video")
        || lowered.contains("has been removed")
        || lowered.contains("does not exist")
    {
        return MediaError::DownloadUnavailable(last_line);
    }

    if lowered.contains("sign in to confirm your age")
        || lowered.contains("age-restricted")
        || lowered.contains("not available in your country")
        || lowered.contains("copyright")
    {
        return MediaError::DownloadRestricted(last_line);
    }

    MediaError::DownloadUnknown(last_line)
}

/// Check if a URL is a supported video platform.
pub fn is_supported_url(url: &str) -> bool {
    let supported_domains = [
        "youtube.com",
        "youtu.be",
        "vimeo.com",
        "twitter.com",
        "x.com",
        "twitch.tv",
        "tiktok.com",
    ];

    supported_domains.iter().any(|domain| url.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::extract_youtube_id_legacy;

    #[test]
    fn test_is_supported_url() {
        assert!(is_supported_url("https://youtube.com/watch?v=abc"));
        assert!(is_supported_url("https://youtu.be/abc"));
        assert!(is_supported_url("https://vimeo.com/123"));
        assert!(!is_supported_url("https://example.com/video"));
    }

    #[test]
    fn test_extract_youtube_id() {
        assert_eq!(
            extract_youtube_id_legacy("https://youtube.com/watch?v=abc123def45"),
            Some("abc123def45".to_string())
        );
        assert_eq!(
            extract_youtube_id_legacy("https://youtu.be/abc123def45"),
            Some("abc123def45".to_string())
        );
        assert_eq!(extract_youtube_id_legacy("https://example.com"), None);
    }

    #[test]
    fn test_classify_yt_dlp_failure_unavailable() {
        let err = classify_yt_dlp_failure("ERROR: Video unavailable. This video has been removed");
        assert!(matches!(err, MediaError::DownloadUnavailable(_)));
    }

    #[test]
    fn test_classify_yt_dlp_failure_restricted() {
        let err = classify_yt_dlp_failure("ERROR: Sign in to confirm your age");
        assert!(matches!(err, MediaError::DownloadRestricted(_)));
    }

    #[test]
    fn test_classify_yt_dlp_failure_unknown() {
        let err = classify_yt_dlp_failure("ERROR: some transient network blip");
        assert!(matches!(err, MediaError::DownloadUnknown(_)));
        assert!(err.is_retryable_download());
    }
}
