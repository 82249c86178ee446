//! Job definitions for the render queue.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-supplied, opaque job identifier. Unique among live (non-terminal) jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the source frame is placed onto the vertical output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Letterbox onto the canvas with a blurred, scaled copy as background.
    #[default]
    Fit,
    /// Scale to cover the canvas, center-cropping the overflow.
    Fill,
    /// Centered inset over a blurred background.
    Square,
    /// Crop a zoomed box centered on a detected face coordinate.
    Auto,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Fit => "fit",
            LayoutMode::Fill => "fill",
            LayoutMode::Square => "square",
            LayoutMode::Auto => "auto",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(LayoutMode::Fit),
            "fill" => Ok(LayoutMode::Fill),
            "square" => Ok(LayoutMode::Square),
            "auto" => Ok(LayoutMode::Auto),
            other => Err(format!("unknown layout mode: {other}")),
        }
    }
}

/// A window within the source video to render clips from, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timeframe {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Min/target/max duration knobs for clip selection, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipLengthBounds {
    pub min: f64,
    pub target: f64,
    pub max: f64,
}

impl Default for ClipLengthBounds {
    fn default() -> Self {
        Self {
            min: 20.0,
            target: 30.0,
            max: 40.0,
        }
    }
}

/// A job submitted to the render queue.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Client-supplied, must be unique among live jobs.
    pub id: JobId,

    /// Remote source URL (e.g. a hosted video link).
    pub source_url: String,

    /// Style template reference, resolved against the template catalog.
    pub template: String,

    /// Requested clip duration hint, seconds.
    #[serde(default = "default_clip_duration")]
    pub clip_duration: u32,

    /// Layout mode to render every clip with.
    #[serde(default)]
    pub layout: LayoutMode,

    /// Language hint for transcription (e.g. "hi", "en"); None means auto-detect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_language: Option<String>,

    /// Translate caption text into this language (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_language: Option<String>,

    /// Romanize (transliterate) captions word-by-word instead of translating.
    #[serde(default)]
    pub translate_captions: bool,

    /// Only consider this sub-range of the source video.
    #[serde(default)]
    pub timeframe: Timeframe,

    /// Min/target/max clip length.
    #[serde(default)]
    pub clip_length: ClipLengthBounds,

    /// Maximum number of clips to return; still bounded by the automatic ceiling.
    #[serde(default = "default_max_clips")]
    pub max_clips: u32,

    /// Directory finished clips and the status sidecar are written to.
    pub output_dir: String,

    /// Current lifecycle state.
    #[serde(default)]
    pub state: JobState,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub retry_count: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn default_clip_duration() -> u32 {
    30
}

fn default_max_clips() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    3
}

impl Job {
    /// Build a new queued job from submission fields. `id` and `output_dir` are
    /// caller-chosen; every other field has a spec-conformant default.
    pub fn new(id: impl Into<String>, source_url: impl Into<String>, output_dir: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::from_string(id),
            source_url: source_url.into(),
            template: "default".to_string(),
            clip_duration: default_clip_duration(),
            layout: LayoutMode::default(),
            video_language: None,
            caption_language: None,
            translate_captions: false,
            timeframe: Timeframe { start: None, end: None },
            clip_length: ClipLengthBounds::default(),
            max_clips: default_max_clips(),
            output_dir: output_dir.into(),
            state: JobState::Queued,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            retry_count: 0,
            max_retries: default_max_retries(),
            error_message: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_clip_length(mut self, bounds: ClipLengthBounds) -> Self {
        self.clip_length = bounds;
        self
    }

    pub fn start(mut self) -> Self {
        self.state = JobState::Running;
        self.started_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    pub fn complete(mut self) -> Self {
        self.state = JobState::Completed;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.state = JobState::Failed;
        self.error_message = Some(error.into());
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries && self.state == JobState::Failed
    }

    /// Idempotency key used by the queue to reject duplicate submissions.
    pub fn idempotency_key(&self) -> String {
        format!("job:{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_creation_defaults() {
        let job = Job::new("job-1", "https://example.com/video", "/tmp/out");
        assert_eq!(job.state, JobState::Queued);
        assert_eq!(job.layout, LayoutMode::Fit);
        assert_eq!(job.clip_length, ClipLengthBounds::default());
        assert_eq!(job.idempotency_key(), "job:job-1");
    }

    #[test]
    fn test_job_state_transitions() {
        let job = Job::new("job-2", "https://example.com/video", "/tmp/out");
        let started = job.start();
        assert_eq!(started.state, JobState::Running);
        assert!(started.started_at.is_some());

        let completed = started.complete();
        assert_eq!(completed.state, JobState::Completed);
        assert!(completed.completed_at.is_some());
    }

    #[test]
    fn test_job_retry() {
        let job = Job::new("job-3", "https://example.com/video", "/tmp/out");
        let failed = job.fail("boom");
        assert!(failed.can_retry());
    }

    #[test]
    fn test_layout_mode_parse() {
        assert_eq!("auto".parse::<LayoutMode>().unwrap(), LayoutMode::Auto);
        assert!("bogus".parse::<LayoutMode>().is_err());
    }
}
