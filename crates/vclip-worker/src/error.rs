//! Worker error types.
//!
//! Variants line up with the abstract error kinds named in the pipeline
//! design: `Validation` is `ValidationError`, `Media` carries `DownloadError`/
//! `ProbeError`/`ExtractError`/`RenderError` (the media adapter's own enum
//! already distinguishes them), `Transcription` is `TranscriptionError`,
//! `SelectionEmpty` and `Cancelled` are their own terminal reasons, and
//! `Internal` is the uncaught catch-all the worker loop reports with a trace.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("media error: {0}")]
    Media(#[from] vclip_media::MediaError),

    #[error("transcription failed: {0}")]
    Transcription(#[from] vclip_asr::AsrError),

    #[error("no candidate clips survived selection")]
    SelectionEmpty,

    #[error("caption compilation failed: {0}")]
    Caption(#[from] vclip_captions::CaptionError),

    #[error("queue error: {0}")]
    Queue(#[from] vclip_queue::QueueError),

    #[error("job cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Matches the downloader's own retry taxonomy (§5): only timeouts and
    /// unclassified failures are worth a caller-level retry.
    pub fn is_retryable_download(&self) -> bool {
        matches!(
            self,
            WorkerError::Media(vclip_media::MediaError::DownloadTimeout(_))
                | WorkerError::Media(vclip_media::MediaError::DownloadUnknown(_))
        )
    }

    /// Source is permanently inaccessible; retrying will not help.
    pub fn is_permanent_download_failure(&self) -> bool {
        matches!(
            self,
            WorkerError::Media(vclip_media::MediaError::DownloadUnavailable(_))
                | WorkerError::Media(vclip_media::MediaError::DownloadRestricted(_))
        )
    }
}
