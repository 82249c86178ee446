//! Hindi/Devanagari hallucination stripping.
//!
//! Whisper-family models, when forced toward Hindi, occasionally drift into
//! other scripts mid-utterance (a known hallucination mode). Once a stream is
//! confirmed Hindi, we discard any token whose text contains a code point
//! outside Devanagari, common punctuation, digits, and whitespace, while
//! keeping the surviving tokens' timing untouched.

use vclip_models::{TranscriptSegment, WordToken};

/// True if every character in `text` is Devanagari, ASCII digit, common
/// punctuation, or whitespace.
fn is_devanagari_clean(text: &str) -> bool {
    text.chars().all(|c| {
        c.is_whitespace()
            || c.is_ascii_digit()
            || is_devanagari(c)
            || is_common_punctuation(c)
    })
}

fn is_devanagari(c: char) -> bool {
    matches!(c as u32, 0x0900..=0x097F)
}

fn is_common_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | '-' | '\'' | '"' | ':' | ';' | '(' | ')' | '…' | '।'
    )
}

/// Strip hallucinated (non-Devanagari) word tokens from a segment's word list,
/// rebuilding the segment's text from the surviving tokens. Segment start/end
/// bounds are left untouched since downstream candidate windows key off them.
pub fn strip_hallucinations(segment: &TranscriptSegment) -> TranscriptSegment {
    let words: Vec<WordToken> = segment
        .words
        .iter()
        .filter(|w| is_devanagari_clean(&w.text))
        .cloned()
        .collect();

    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    TranscriptSegment {
        start: segment.start,
        end: segment.end,
        text,
        words,
    }
}

/// Apply [`strip_hallucinations`] across a whole transcript, dropping segments
/// left with no surviving words.
pub fn strip_hallucinations_all(segments: &[TranscriptSegment]) -> Vec<TranscriptSegment> {
    segments
        .iter()
        .map(strip_hallucinations)
        .filter(|s| !s.words.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> WordToken {
        WordToken { start, end, text: text.to_string() }
    }

    #[test]
    fn test_strips_non_devanagari_tokens() {
        let segment = TranscriptSegment {
            start: 0.0,
            end: 2.0,
            text: "यह एक 这是 परीक्षण है".to_string(),
            words: vec![
                word("यह", 0.0, 0.3),
                word("एक", 0.3, 0.6),
                word("这是", 0.6, 0.9),
                word("परीक्षण", 0.9, 1.5),
                word("है", 1.5, 2.0),
            ],
        };

        let cleaned = strip_hallucinations(&segment);
        assert_eq!(cleaned.words.len(), 4);
        assert!(!cleaned.text.contains("这是"));
    }

    #[test]
    fn test_keeps_punctuation_and_digits() {
        let segment = TranscriptSegment {
            start: 0.0,
            end: 1.0,
            text: "नमस्ते, 2026!".to_string(),
            words: vec![word("नमस्ते,", 0.0, 0.5), word("2026!", 0.5, 1.0)],
        };
        let cleaned = strip_hallucinations(&segment);
        assert_eq!(cleaned.words.len(), 2);
    }

    #[test]
    fn test_preserves_timing_on_surviving_tokens() {
        let segment = TranscriptSegment {
            start: 0.0,
            end: 2.0,
            text: "".to_string(),
            words: vec![word("ठीक", 1.0, 1.4), word("hello", 1.4, 1.8)],
        };
        let cleaned = strip_hallucinations(&segment);
        assert_eq!(cleaned.words.len(), 1);
        assert_eq!(cleaned.words[0].start, 1.0);
        assert_eq!(cleaned.words[0].end, 1.4);
    }
}
