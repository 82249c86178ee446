//! Candidate window and scoring types produced by the hook scorer and clip selector.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptSegment;

/// The hook-scoring breakdown for a single candidate window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreRecord {
    /// Hook keyword phrases matched (case-insensitive).
    pub keywords: Vec<String>,
    /// Whether the text opens with (or contains in its first sentence) a question.
    pub is_question: bool,
    /// Normalized sentiment intensity in [0, 1]; 0 when no sentiment adapter is configured.
    pub emotion_score: f64,
    /// 1.0 if the window's duration is within 10% of the target length, else 0.0.
    pub length_bonus: f64,
    /// Sum of keyword_points + question_points + emotion_points + length_bonus.
    pub total: f64,
}

/// A candidate clip window derived from consecutive transcript segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateWindow {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub score: ScoreRecord,
}

impl CandidateWindow {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        let start = segments.first().map(|s| s.start).unwrap_or(0.0);
        let end = segments.last().map(|s| s.end).unwrap_or(0.0);
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            start,
            end,
            text,
            segments,
            score: ScoreRecord::default(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn with_score(mut self, score: ScoreRecord) -> Self {
        self.score = score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::WordToken;

    #[test]
    fn test_candidate_window_concatenates_text() {
        let s1 = TranscriptSegment::new(0.0, 5.0, "hello world", vec![WordToken::new(0.0, 5.0, "hello world")]);
        let s2 = TranscriptSegment::new(5.0, 10.0, "goodbye", vec![WordToken::new(5.0, 10.0, "goodbye")]);
        let window = CandidateWindow::new(vec![s1, s2]);
        assert_eq!(window.text, "hello world goodbye");
        assert_eq!(window.duration(), 10.0);
    }
}
