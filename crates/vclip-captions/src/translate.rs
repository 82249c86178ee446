//! Optional translation/transliteration of clip-relative words prior to
//! compilation. Absent a capability, words pass through unchanged.

use async_trait::async_trait;

use crate::words::TimedWord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// Replace the text with a translation into another language; word-level
    /// timing is approximated by even distribution across the line duration.
    Translate,
    /// Keep exact per-word timing; only the glyphs change (e.g. Devanagari to
    /// Roman script).
    Transliterate,
}

#[async_trait]
pub trait TranslationCapability: Send + Sync {
    /// Translates or transliterates `text` (the full line) into the target
    /// language/script. Returns `None` if the source is already in the
    /// target representation (an English-only line under a transliteration
    /// request, for instance) — the caller then passes the words through
    /// unchanged.
    async fn convert(&self, text: &str, target: &str, mode: TranslationMode) -> Option<String>;
}

/// Applies a translation/transliteration capability to one chunked line.
///
/// `Translate` rebuilds the line's words from the returned text, splitting on
/// whitespace and distributing the line's original [start, end] evenly across
/// the new word count. `Transliterate` requires a 1:1 word count match with
/// the source line so each original timing slot can be kept exactly; if the
/// counts don't match, the original words are kept unchanged (no
/// transliteration fallback that claims more confidence than it can provide).
pub async fn apply_translation(
    line: &[TimedWord],
    target_language: &str,
    mode: TranslationMode,
    capability: &dyn TranslationCapability,
) -> Vec<TimedWord> {
    if line.is_empty() {
        return Vec::new();
    }

    let source_text = line.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
    let Some(converted) = capability.convert(&source_text, target_language, mode).await else {
        return line.to_vec();
    };

    match mode {
        TranslationMode::Translate => {
            let line_start = line.first().unwrap().start;
            let line_end = line.last().unwrap().end;
            distribute_evenly(&converted, line_start, line_end)
        }
        TranslationMode::Transliterate => {
            let words: Vec<&str> = converted.split_whitespace().collect();
            if words.len() != line.len() {
                return line.to_vec();
            }
            line.iter()
                .zip(words)
                .map(|(original, text)| TimedWord { text: text.to_string(), start: original.start, end: original.end })
                .collect()
        }
    }
}

fn distribute_evenly(text: &str, start: f64, end: f64) -> Vec<TimedWord> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    let span = (end - start).max(0.0);
    let per_word = span / words.len() as f64;
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| TimedWord {
            text: w.to_string(),
            start: start + i as f64 * per_word,
            end: start + (i + 1) as f64 * per_word,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTranslator(&'static str);

    #[async_trait]
    impl TranslationCapability for FixedTranslator {
        async fn convert(&self, _text: &str, _target: &str, _mode: TranslationMode) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn line() -> Vec<TimedWord> {
        vec![
            TimedWord { text: "hello".into(), start: 0.0, end: 1.0 },
            TimedWord { text: "world".into(), start: 1.0, end: 2.0 },
        ]
    }

    #[tokio::test]
    async fn test_translate_distributes_evenly_over_original_span() {
        let cap = FixedTranslator("bonjour le monde");
        let out = apply_translation(&line(), "fr", TranslationMode::Translate, &cap).await;
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].start, 0.0);
        assert!((out.last().unwrap().end - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_transliterate_keeps_exact_timing_on_matching_count() {
        let cap = FixedTranslator("namaste duniya");
        let original = vec![
            TimedWord { text: "hi".into(), start: 0.3, end: 0.9 },
            TimedWord { text: "world".into(), start: 0.9, end: 1.8 },
        ];
        let out = apply_translation(&original, "hi", TranslationMode::Transliterate, &cap).await;
        assert_eq!(out[0].start, 0.3);
        assert_eq!(out[1].end, 1.8);
        assert_eq!(out[0].text, "namaste");
    }

    #[tokio::test]
    async fn test_transliterate_falls_back_on_word_count_mismatch() {
        let cap = FixedTranslator("one two three");
        let out = apply_translation(&line(), "hi", TranslationMode::Transliterate, &cap).await;
        assert_eq!(out, line());
    }
}
