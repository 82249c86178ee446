//! Shared data models for the clip generation service.
//!
//! This crate provides the canonical, Serde-serializable types shared by the
//! control API, the queue, and the worker: jobs and their lifecycle, word-timed
//! transcripts, candidate windows and their scoring, rendered clip records,
//! style templates, and speaker/face types.

pub mod candidate;
pub mod catalog;
pub mod clip;
pub mod job;
pub mod job_status;
pub mod rect;
pub mod speaker;
pub mod template;
pub mod transcript;
pub mod utils;

pub use candidate::{CandidateWindow, ScoreRecord};
pub use catalog::{default_highlight_colors, TemplateCatalog};
pub use clip::{ClipRecord, ClipStatus};
pub use job::{ClipLengthBounds, Job, JobId, JobState, LayoutMode, Timeframe};
pub use job_status::{JobStatus, JobStatusCache, ProgressSnapshot};
pub use rect::NormalizedRect;
pub use speaker::{FaceCenter, SpeakerLabel, SpeakerSegment};
pub use template::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};
pub use transcript::{TranscriptSegment, WordToken};
pub use utils::{extract_youtube_id, extract_youtube_id_legacy, YoutubeIdError, YoutubeIdResult};
