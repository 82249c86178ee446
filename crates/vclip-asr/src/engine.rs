//! External transcription engine invocation.
//!
//! The ASR engine itself is an external collaborator (out of scope per the
//! system's design); this module only defines the capability boundary and a
//! process-spawning implementation against a whisper-compatible CLI that
//! emits word-timestamped JSON, following the same spawn/capture/parse
//! discipline as the media toolchain adapter.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use vclip_models::{TranscriptSegment, WordToken};

use crate::error::{AsrError, AsrResult};
use crate::options::TranscribeOptions;

/// Output of a transcription call: the segments plus the language actually used.
#[derive(Debug, Clone)]
pub struct TranscriptionOutput {
    pub segments: Vec<TranscriptSegment>,
    pub detected_language: String,
}

/// Injected capability constructed once per worker process, per the
/// "no global mutable model handles" design note.
#[async_trait]
pub trait TranscriptionCapability: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> AsrResult<TranscriptionOutput>;
}

/// Transcribes by shelling out to a whisper-compatible CLI binary that
/// accepts `--language`, `--initial-prompt`, `--beam-size`,
/// `--word-timestamps`, and emits a JSON document on stdout.
pub struct WhisperCliTranscriber {
    binary_name: String,
}

impl Default for WhisperCliTranscriber {
    fn default() -> Self {
        Self { binary_name: "whisper-cli".to_string() }
    }
}

impl WhisperCliTranscriber {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self { binary_name: binary_name.into() }
    }
}

#[derive(Debug, Deserialize)]
struct WhisperJsonOutput {
    language: Option<String>,
    segments: Vec<WhisperJsonSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Vec<WhisperJsonWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonWord {
    start: f64,
    end: f64,
    word: String,
}

#[async_trait]
impl TranscriptionCapability for WhisperCliTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> AsrResult<TranscriptionOutput> {
        which::which(&self.binary_name).map_err(|_| AsrError::EngineNotFound)?;

        if !audio_path.exists() {
            return Err(AsrError::NoDecodableAudio);
        }

        let mut cmd = Command::new(&self.binary_name);
        cmd.arg(audio_path).args(["--output-format", "json", "--beam-size", &options.beam_size.to_string()]);

        if options.word_timestamps {
            cmd.arg("--word-timestamps");
        }
        if let Some(language) = &options.language {
            cmd.args(["--language", language]);
        }
        if let Some(prompt) = &options.initial_prompt {
            cmd.args(["--initial-prompt", prompt]);
        }

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.to_lowercase().contains("out of memory") || stderr.to_lowercase().contains("disk") {
                return Err(AsrError::ModelLoadFailed(stderr.to_string()));
            }
            return Err(AsrError::TranscriptionFailed(stderr.to_string()));
        }

        let parsed: WhisperJsonOutput = serde_json::from_slice(&output.stdout)?;
        if parsed.segments.is_empty() {
            return Err(AsrError::NoDecodableAudio);
        }

        let segments = parsed
            .segments
            .into_iter()
            .map(|s| TranscriptSegment {
                start: s.start,
                end: s.end,
                text: s.text.trim().to_string(),
                words: s
                    .words
                    .into_iter()
                    .map(|w| WordToken { start: w.start, end: w.end, text: w.word })
                    .collect(),
            })
            .collect();

        Ok(TranscriptionOutput {
            segments,
            detected_language: parsed.language.unwrap_or_else(|| "en".to_string()),
        })
    }
}
