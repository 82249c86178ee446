//! ASR adapter: word-timed transcription with Hindi hallucination handling.

pub mod engine;
pub mod error;
pub mod hallucination;
pub mod options;

use std::path::Path;
use tracing::info;

pub use engine::{TranscriptionCapability, TranscriptionOutput, WhisperCliTranscriber};
pub use error::{AsrError, AsrResult};
pub use options::TranscribeOptions;
use vclip_models::TranscriptSegment;

/// `transcribe(audio_path, options) → (segments, detected_language)`.
///
/// Applies the Hindi language policy: when the caller names `hi`, the
/// Devanagari hint is attached up front. When auto-detecting, a result that
/// comes back as Hindi without the hint already applied triggers exactly one
/// re-transcription with the hint added. Once a stream is confirmed Hindi,
/// hallucinated (non-Devanagari) tokens are stripped from every segment.
pub async fn transcribe(
    capability: &dyn TranscriptionCapability,
    audio_path: impl AsRef<Path>,
    options: TranscribeOptions,
) -> AsrResult<(Vec<TranscriptSegment>, String)> {
    let audio_path = audio_path.as_ref();
    let had_explicit_hint = options.initial_prompt.is_some();
    let options = options.with_hindi_hint_if_needed();

    let mut result = capability.transcribe(audio_path, &options).await?;

    if result.detected_language == "hi" && options.initial_prompt.is_none() && !had_explicit_hint {
        info!("auto-detected Hindi without the Devanagari hint; re-transcribing once");
        let retry_options = TranscribeOptions {
            language: Some("hi".to_string()),
            ..options
        }
        .with_hindi_hint_if_needed();
        result = capability.transcribe(audio_path, &retry_options).await?;
    }

    let segments = if result.detected_language == "hi" {
        hallucination::strip_hallucinations_all(&result.segments)
    } else {
        result.segments
    };

    Ok((segments, result.detected_language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vclip_models::WordToken;

    struct ScriptedTranscriber {
        calls: AtomicUsize,
        responses: Mutex<Vec<TranscriptionOutput>>,
    }

    #[async_trait]
    impl TranscriptionCapability for ScriptedTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _options: &TranscribeOptions,
        ) -> AsrResult<TranscriptionOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses.lock().unwrap().remove(0))
        }
    }

    fn segment(text: &str, words: Vec<WordToken>) -> TranscriptSegment {
        TranscriptSegment { start: 0.0, end: 1.0, text: text.to_string(), words }
    }

    #[tokio::test]
    async fn test_re_transcribes_once_on_undetected_hindi_hallucination() {
        let capability = ScriptedTranscriber {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(vec![
                TranscriptionOutput {
                    segments: vec![segment("garbled", vec![])],
                    detected_language: "hi".to_string(),
                },
                TranscriptionOutput {
                    segments: vec![segment(
                        "नमस्ते",
                        vec![WordToken { start: 0.0, end: 0.5, text: "नमस्ते".into() }],
                    )],
                    detected_language: "hi".to_string(),
                },
            ]),
        };

        let (segments, lang) =
            transcribe(&capability, Path::new("audio.wav"), TranscribeOptions::default())
                .await
                .unwrap();

        assert_eq!(capability.calls.load(Ordering::SeqCst), 2);
        assert_eq!(lang, "hi");
        assert_eq!(segments.len(), 1);
    }

    #[tokio::test]
    async fn test_does_not_retranscribe_when_hint_already_explicit() {
        let capability = ScriptedTranscriber {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(vec![TranscriptionOutput {
                segments: vec![segment(
                    "नमस्ते",
                    vec![WordToken { start: 0.0, end: 0.5, text: "नमस्ते".into() }],
                )],
                detected_language: "hi".to_string(),
            }]),
        };

        let options = TranscribeOptions::default()
            .with_language("hi")
            .with_hindi_hint_if_needed();
        assert!(options.initial_prompt.is_some());

        let (_segments, _lang) =
            transcribe(&capability, Path::new("audio.wav"), options).await.unwrap();

        assert_eq!(capability.calls.load(Ordering::SeqCst), 1);
    }
}
