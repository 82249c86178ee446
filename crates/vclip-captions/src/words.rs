//! Clip-relative word tokens: every recipe works from these, never from the
//! source transcript's absolute timestamps.

use vclip_models::CandidateWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TimedWord {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Flattens a candidate window's segments into clip-relative word tokens:
/// `word.start - clip.start_time`, preserving each word's true duration.
pub fn clip_relative_words(candidate: &CandidateWindow) -> Vec<TimedWord> {
    candidate
        .segments
        .iter()
        .flat_map(|segment| segment.words.iter())
        .map(|word| TimedWord {
            text: word.text.clone(),
            start: word.start - candidate.start,
            end: word.end - candidate.start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::{TranscriptSegment, WordToken};

    #[test]
    fn test_clip_relative_words_shifts_by_clip_start() {
        let seg = TranscriptSegment::new(
            10.0,
            12.0,
            "hi there",
            vec![WordToken::new(10.0, 10.5, "hi"), WordToken::new(10.5, 12.0, "there")],
        );
        let candidate = CandidateWindow::new(vec![seg]);
        let words = clip_relative_words(&candidate);
        assert_eq!(words[0].start, 0.0);
        assert_eq!(words[1].start, 0.5);
        assert_eq!(words[1].end, 2.0);
    }
}
