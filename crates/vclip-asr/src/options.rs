//! Transcription request options.

/// The Devanagari-script hint attached to discourage Whisper-family models
/// from drifting into other scripts when transcribing Hindi.
pub const HINDI_DEVANAGARI_PROMPT: &str =
    "यह एक हिन्दी वीडियो है। कृपया देवनागरी लिपि में लिखें।";

#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// BCP-47-ish language hint, e.g. "hi", "en". `None` triggers auto-detect.
    pub language: Option<String>,
    /// Always true for this adapter — callers downstream require word timing.
    pub word_timestamps: bool,
    pub initial_prompt: Option<String>,
    pub beam_size: u32,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            language: None,
            word_timestamps: true,
            initial_prompt: None,
            beam_size: 5,
        }
    }
}

impl TranscribeOptions {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Apply the Hindi hallucination-avoidance hint when the hint isn't
    /// already set explicitly.
    pub fn with_hindi_hint_if_needed(mut self) -> Self {
        if self.language.as_deref() == Some("hi") && self.initial_prompt.is_none() {
            self.initial_prompt = Some(HINDI_DEVANAGARI_PROMPT.to_string());
        }
        self
    }
}
