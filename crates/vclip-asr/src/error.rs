//! Error types for the ASR adapter.

use thiserror::Error;

pub type AsrResult<T> = Result<T, AsrError>;

#[derive(Debug, Error)]
pub enum AsrError {
    #[error("transcription engine not found in PATH")]
    EngineNotFound,

    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("no decodable audio in input")]
    NoDecodableAudio,

    #[error("model could not be loaded (out of memory or disk): {0}")]
    ModelLoadFailed(String),

    #[error("malformed transcription output: {0}")]
    MalformedOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
