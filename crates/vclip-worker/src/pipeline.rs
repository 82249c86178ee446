//! The clip generation pipeline: download, transcribe, select, render.
//!
//! Straight-line synchronous per job (suspension only at child-process waits,
//! broker RPCs, and file I/O — no cooperative-concurrency requirement).
//! Clip renders are sequential to keep peak memory bounded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use vclip_asr::TranscriptionCapability;
use vclip_captions::{TranslationCapability, TranslationMode, TranslationRequest};
use vclip_models::{
    CandidateWindow, ClipRecord, ClipStatus, Job, JobId, LayoutMode, ProgressSnapshot, SpeakerLabel, SpeakerSegment,
    TemplateCatalog, TranscriptSegment,
};
use vclip_selection::SentimentCapability;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::face_cache::FaceCache;

/// Capabilities injected once per worker process and passed through explicitly,
/// rather than held as global mutable state on a long-lived instance.
pub struct Pipeline {
    pub config: WorkerConfig,
    pub catalog: Arc<TemplateCatalog>,
    pub transcriber: Arc<dyn TranscriptionCapability>,
    pub sentiment: Option<Arc<dyn SentimentCapability>>,
    pub translation: Option<Arc<dyn TranslationCapability>>,
}

/// Told about every stage boundary so it can fan out to the broker's
/// `update_progress` and the status sidecar together.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, job_id: &JobId, snapshot: ProgressSnapshot);
}

/// Speaker-bucket sampling interval used to build the caption compiler's
/// speaker segments from the voice-window heuristic.
const SPEAKER_SAMPLE_SECS: f64 = 2.0;

impl Pipeline {
    pub async fn run(
        &self,
        job: &Job,
        reporter: &dyn ProgressReporter,
    ) -> WorkerResult<Vec<ClipRecord>> {
        validate_job(job)?;

        let job_dir = PathBuf::from(&self.config.work_dir).join(job.id.as_str());
        tokio::fs::create_dir_all(&job_dir).await?;
        let result = self.run_in_dir(job, &job_dir, reporter).await;
        if let Err(err) = tokio::fs::remove_dir_all(&job_dir).await {
            warn!(job_id = %job.id, "failed to clean up job directory: {}", err);
        }
        result
    }

    async fn run_in_dir(
        &self,
        job: &Job,
        job_dir: &Path,
        reporter: &dyn ProgressReporter,
    ) -> WorkerResult<Vec<ClipRecord>> {
        let source_path = job_dir.join("source.mp4");
        reporter
            .report(&job.id, ProgressSnapshot::new(5, "downloading", "fetching source video"))
            .await;
        vclip_media::download_video(&job.source_url, &source_path).await?;

        let duration = vclip_media::probe_duration(&source_path, self.config.probe_timeout_secs).await?;

        let audio_path = job_dir.join("audio.wav");
        reporter
            .report(&job.id, ProgressSnapshot::new(20, "transcribing", "extracting audio"))
            .await;
        vclip_media::extract_audio(&source_path, &audio_path, 16_000, 1, self.config.extract_audio_timeout_secs).await?;

        let mut options = vclip_asr::TranscribeOptions::default();
        if let Some(language) = &job.video_language {
            options = options.with_language(language.clone());
        }
        let (segments, _detected_language) =
            vclip_asr::transcribe(self.transcriber.as_ref(), &audio_path, options).await?;

        let segments = clamp_to_timeframe(segments, job);

        reporter
            .report(&job.id, ProgressSnapshot::new(45, "selecting", "scoring candidate windows"))
            .await;
        let candidates = vclip_selection::segment(
            &segments,
            job.clip_length.min,
            job.clip_length.target,
            job.clip_length.max,
        );
        let ranked = vclip_selection::rank(candidates, job.clip_length.target, self.sentiment.as_deref()).await;
        let selected = vclip_selection::select_top(
            ranked,
            job.max_clips as usize,
            duration,
            job.clip_length.target,
        );

        if selected.is_empty() {
            info!(job_id = %job.id, "selection produced no candidates; returning an empty clip list");
            return Ok(Vec::new());
        }

        let template = self
            .catalog
            .get(&job.template)
            .ok_or_else(|| WorkerError::validation(format!("unknown template: {}", job.template)))?
            .clone();

        let mut face_cache = FaceCache::new();
        let mut clips = Vec::with_capacity(selected.len());

        for (index, candidate) in selected.iter().enumerate() {
            let percent = 50 + ((index * 40) / selected.len().max(1)) as u8;
            reporter
                .report(
                    &job.id,
                    ProgressSnapshot::new(percent, "rendering", format!("rendering clip {}", index + 1)),
                )
                .await;

            match self
                .render_clip(job, job_dir, &source_path, &audio_path, candidate, index, &template, &mut face_cache, duration)
                .await
            {
                Ok(clip) => clips.push(clip),
                Err(err) => {
                    warn!(job_id = %job.id, clip_index = index, "clip render failed: {}", err);
                    clips.push(
                        ClipRecord::pending(source_path.to_string_lossy(), candidate.start, candidate.end, job.layout, &job.template)
                            .mark_failed(err.to_string()),
                    );
                }
            }
        }

        if clips.iter().all(|c| c.status == ClipStatus::Failed) {
            return Err(WorkerError::internal("every clip failed to render"));
        }

        Ok(clips)
    }

    #[allow(clippy::too_many_arguments)]
    async fn render_clip(
        &self,
        job: &Job,
        job_dir: &Path,
        source_path: &Path,
        audio_path: &Path,
        candidate: &CandidateWindow,
        index: usize,
        template: &vclip_models::StyleTemplate,
        face_cache: &mut FaceCache,
        video_duration: f64,
    ) -> WorkerResult<ClipRecord> {
        let start = candidate.start;
        let end = candidate.end;
        let clip_duration = candidate.duration();

        let cut_path = job_dir.join(format!("clip_{index}_cut.mp4"));
        vclip_media::cut(source_path, &cut_path, start, clip_duration, self.config.cut_timeout_secs).await?;

        let face = if job.layout == LayoutMode::Auto {
            let midpoint = start + clip_duration / 2.0;
            Some(face_cache.get_or_compute(source_path, midpoint, index % 2 == 0, video_duration).await)
        } else {
            None
        };
        let face_tuple = face.map(|f| (f.x, f.y));

        let reframed_path = job_dir.join(format!("clip_{index}_reframed.mp4"));
        vclip_media::reframe(
            &cut_path,
            &reframed_path,
            job.layout,
            self.config.canvas_width,
            self.config.canvas_height,
            face_tuple,
            self.config.reframe_timeout_secs,
        )
        .await?;

        let speakers = sample_speakers(audio_path, start, end).await;

        let translation_req = match (&job.caption_language, &self.translation) {
            (Some(target), Some(capability)) => Some(TranslationRequest {
                target_language: target,
                mode: if job.translate_captions { TranslationMode::Transliterate } else { TranslationMode::Translate },
                capability: capability.as_ref(),
            }),
            _ => None,
        };

        let doc = vclip_captions::compile(candidate, template, job.layout, &speakers, seed_for(job, index), translation_req).await?;

        let subs_path = job_dir.join(format!("clip_{index}.ass"));
        tokio::fs::write(&subs_path, doc.to_ass_string()).await?;

        let mut clip = ClipRecord::pending(source_path.to_string_lossy(), start, end, job.layout, &job.template);
        clip.score = candidate.score.total;
        clip.text = candidate.text.clone();

        let output_filename = clip.output_filename(Some(job.id.as_str()), index + 1);
        let output_path = PathBuf::from(&job.output_dir).join(&output_filename);
        tokio::fs::create_dir_all(&job.output_dir).await?;

        vclip_media::burn_subtitles(&reframed_path, &subs_path, &output_path, self.config.burn_timeout_secs).await?;

        Ok(clip.mark_done(output_path.to_string_lossy().to_string()))
    }
}

fn seed_for(job: &Job, index: usize) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    use std::hash::{Hash, Hasher};
    job.id.as_str().hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

fn validate_job(job: &Job) -> WorkerResult<()> {
    if job.source_url.trim().is_empty() {
        return Err(WorkerError::validation("source_url must not be empty"));
    }
    if job.output_dir.trim().is_empty() {
        return Err(WorkerError::validation("output_dir must not be empty"));
    }
    if job.clip_length.min > job.clip_length.max {
        return Err(WorkerError::validation("clip_length.min must not exceed clip_length.max"));
    }
    Ok(())
}

/// Restrict a full-video transcript to the job's requested sub-range, if any.
fn clamp_to_timeframe(segments: Vec<TranscriptSegment>, job: &Job) -> Vec<TranscriptSegment> {
    let start = job.timeframe.start.unwrap_or(0.0);
    let end = job.timeframe.end.unwrap_or(f64::MAX);
    segments.into_iter().filter(|s| s.start >= start && s.end <= end).collect()
}

/// Samples the louder stereo channel over `[start, end]` in fixed buckets to
/// build the speaker segments the caption compiler's speaker-colored recipe
/// consults; unrelated to layout selection.
async fn sample_speakers(audio_path: &Path, start: f64, end: f64) -> Vec<SpeakerSegment> {
    let mut segments = Vec::new();
    let mut t = start;
    while t < end {
        let bucket_end = (t + SPEAKER_SAMPLE_SECS).min(end);
        let label = vclip_media::voice_window(audio_path, t, bucket_end).await;
        merge_or_push(&mut segments, t - start, bucket_end - start, label);
        t = bucket_end;
    }
    segments
}

fn merge_or_push(segments: &mut Vec<SpeakerSegment>, start: f64, end: f64, label: SpeakerLabel) {
    if let Some(last) = segments.last_mut() {
        if last.speaker == label {
            last.end = end;
            return;
        }
    }
    segments.push(SpeakerSegment::new(start, end, label));
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::{ClipLengthBounds, Timeframe};

    fn sample_job() -> Job {
        Job::new("job-1", "https://youtube.com/watch?v=abc", "/tmp/out")
    }

    #[test]
    fn test_validate_job_rejects_empty_source_url() {
        let mut job = sample_job();
        job.source_url = String::new();
        assert!(validate_job(&job).is_err());
    }

    #[test]
    fn test_validate_job_rejects_inverted_bounds() {
        let mut job = sample_job();
        job.clip_length = ClipLengthBounds { min: 40.0, target: 30.0, max: 20.0 };
        assert!(validate_job(&job).is_err());
    }

    #[test]
    fn test_clamp_to_timeframe_filters_outside_range() {
        let job = Job {
            timeframe: Timeframe { start: Some(10.0), end: Some(20.0) },
            ..sample_job()
        };
        let segments = vec![
            TranscriptSegment::new(0.0, 5.0, "before", vec![]),
            TranscriptSegment::new(12.0, 15.0, "inside", vec![]),
            TranscriptSegment::new(25.0, 30.0, "after", vec![]),
        ];
        let clamped = clamp_to_timeframe(segments, &job);
        assert_eq!(clamped.len(), 1);
        assert_eq!(clamped[0].text, "inside");
    }

    #[test]
    fn test_seed_is_stable_for_same_job_and_index() {
        let job = sample_job();
        assert_eq!(seed_for(&job, 0), seed_for(&job, 0));
        assert_ne!(seed_for(&job, 0), seed_for(&job, 1));
    }

    #[test]
    fn test_merge_or_push_merges_same_speaker() {
        let mut segments = Vec::new();
        merge_or_push(&mut segments, 0.0, 2.0, SpeakerLabel::Left);
        merge_or_push(&mut segments, 2.0, 4.0, SpeakerLabel::Left);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, 4.0);
    }
}
