//! Composed media toolchain operations.
//!
//! A thin, sequential façade over `ffmpeg`/`ffprobe`: every operation here
//! spawns exactly one child process, capped by a caller-supplied timeout, and
//! leaves cleanup of its own output to the caller on failure.

use std::path::Path;

use vclip_models::LayoutMode;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::build_reframe_filter;
use crate::probe::probe_video;

/// `probe_duration(path) → seconds`.
pub async fn probe_duration(path: impl AsRef<Path>, timeout_secs: u64) -> MediaResult<f64> {
    let path = path.as_ref().to_path_buf();
    let info = tokio::time::timeout(
        std::time::Duration::from_secs(timeout_secs),
        probe_video(path),
    )
    .await
    .map_err(|_| MediaError::Timeout(timeout_secs))??;
    Ok(info.duration)
}

/// `extract_audio(path, dst, sample_rate, channels)` — linear PCM WAV.
pub async fn extract_audio(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    sample_rate: u32,
    channels: u8,
    timeout_secs: u64,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(src, dst)
        .output_arg("-vn")
        .output_arg("-ar")
        .output_arg(sample_rate.to_string())
        .output_arg("-ac")
        .output_arg(channels.to_string())
        .output_arg("-c:a")
        .output_arg("pcm_s16le");

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner
        .run(&cmd)
        .await
        .map_err(|e| MediaError::ExtractError(e.to_string()))
}

/// `cut(src, dst, start, duration)` — stream-copy when possible, re-encode otherwise.
pub async fn cut(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    start: f64,
    duration: f64,
    timeout_secs: u64,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(src, dst)
        .seek(start)
        .duration(duration)
        .output_arg("-c:v")
        .output_arg("copy")
        .output_arg("-c:a")
        .output_arg("copy")
        .output_arg("-avoid_negative_ts")
        .output_arg("make_zero");

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    if runner.run(&cmd).await.is_ok() {
        return Ok(());
    }

    // Copy-mode failed (keyframe boundary mismatch, incompatible codec); re-encode.
    let cmd = FfmpegCommand::new(src, dst)
        .seek(start)
        .duration(duration)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(20)
        .audio_codec("aac");

    runner.run(&cmd).await
}

/// `reframe(src, dst, mode, params)` for the four layout modes.
///
/// `face` is required (and used) only for [`LayoutMode::Auto`]; callers must
/// have already resolved it via the face/speaker adapter.
pub async fn reframe(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    mode: LayoutMode,
    canvas_width: u32,
    canvas_height: u32,
    face: Option<(f64, f64)>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let filter = build_reframe_filter(mode, canvas_width, canvas_height, face);

    let cmd = FfmpegCommand::new(src, dst)
        .video_filter(filter)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(20)
        .audio_codec("copy");

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner.run(&cmd).await
}

/// `burn_subtitles(src, subs, dst)` — re-encode video, stream-copy audio.
pub async fn burn_subtitles(
    src: impl AsRef<Path>,
    subs_path: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let subs = subs_path.as_ref().to_string_lossy().replace(':', "\\:");
    let filter = format!("ass='{subs}'");

    let cmd = FfmpegCommand::new(src, dst)
        .video_filter(filter)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(20)
        .audio_codec("copy");

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner.run(&cmd).await
}

/// `concat(parts, dst)` — concatenate same-codec parts via the concat demuxer.
pub async fn concat(
    parts: &[impl AsRef<Path>],
    dst: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    if parts.is_empty() {
        return Err(MediaError::internal("concat called with no parts"));
    }

    let list_file = tempfile_for_concat_list(parts).await?;

    let cmd = FfmpegCommand::new(list_file.path(), dst)
        .input_arg("-f")
        .input_arg("concat")
        .input_arg("-safe")
        .input_arg("0")
        .output_arg("-c")
        .output_arg("copy");

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner.run(&cmd).await
}

async fn tempfile_for_concat_list(
    parts: &[impl AsRef<Path>],
) -> MediaResult<tempfile::NamedTempFile> {
    use std::io::Write;

    let file = tempfile::NamedTempFile::new().map_err(MediaError::Io)?;
    {
        let mut handle = file.as_file();
        for part in parts {
            let escaped = part.as_ref().to_string_lossy().replace('\'', "'\\''");
            writeln!(handle, "file '{escaped}'").map_err(MediaError::Io)?;
        }
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concat_rejects_empty_parts() {
        let parts: Vec<std::path::PathBuf> = vec![];
        let err = concat(&parts, "/tmp/out.mp4", 60).await.unwrap_err();
        assert!(matches!(err, MediaError::Internal(_)));
    }
}
