//! Word-timed transcript types produced by the ASR adapter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single transcribed word with its own timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordToken {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl WordToken {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self { start, end, text: text.into() }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Shift both timestamps by `offset` seconds (used when re-basing a clip to 0).
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            start: self.start - offset,
            end: self.end - offset,
            text: self.text.clone(),
        }
    }
}

/// A contiguous span of transcript with word-level timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Vec<WordToken>,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>, words: Vec<WordToken>) -> Self {
        Self { start, end, text: text.into(), words }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the segment's text ends a sentence: terminal punctuation, or
    /// enough accumulated words that holding the window open further would
    /// not meaningfully improve candidate quality.
    pub fn ends_sentence_boundary(&self, min_word_count: usize) -> bool {
        let trimmed = self.text.trim_end();
        let ends_punct = trimmed
            .chars()
            .last()
            .map(|c| matches!(c, '.' | '!' | '?'))
            .unwrap_or(false);
        ends_punct || self.words.len() > min_word_count
    }

    /// True if every invariant in the data model holds: start <= end, and
    /// every word is monotonic and contained within the segment.
    pub fn is_well_formed(&self) -> bool {
        if self.start > self.end {
            return false;
        }
        let mut last_end = self.start;
        for w in &self.words {
            if w.start > w.end {
                return false;
            }
            if w.start < last_end - 1e-6 {
                return false;
            }
            if w.start < self.start - 1e-6 || w.end > self.end + 1e-6 {
                return false;
            }
            last_end = w.end;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str, words: Vec<(f64, f64, &str)>) -> TranscriptSegment {
        TranscriptSegment::new(
            start,
            end,
            text,
            words.into_iter().map(|(s, e, t)| WordToken::new(s, e, t)).collect(),
        )
    }

    #[test]
    fn test_well_formed_segment() {
        let s = seg(0.0, 2.0, "hi there", vec![(0.0, 0.5, "hi"), (0.6, 2.0, "there")]);
        assert!(s.is_well_formed());
    }

    #[test]
    fn test_out_of_bounds_word_is_malformed() {
        let s = seg(0.0, 1.0, "hi", vec![(0.0, 1.5, "hi")]);
        assert!(!s.is_well_formed());
    }

    #[test]
    fn test_sentence_boundary_detection() {
        let ended = seg(0.0, 1.0, "That is amazing.", vec![]);
        assert!(ended.ends_sentence_boundary(10));
        let not_ended = seg(0.0, 1.0, "and then", vec![]);
        assert!(!not_ended.ends_sentence_boundary(10));
    }

    #[test]
    fn test_word_shift() {
        let w = WordToken::new(5.0, 5.5, "hi");
        let shifted = w.shifted(5.0);
        assert_eq!(shifted.start, 0.0);
        assert_eq!(shifted.end, 0.5);
    }
}
