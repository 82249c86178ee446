//! Optional ML sentiment capability consulted by the hook scorer.
//!
//! Absent any capability, the scorer simply contributes 0 emotion points —
//! the sentiment model is an external collaborator, not a hard dependency.

use async_trait::async_trait;

/// A sentiment label as returned by the external classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// Any label the classifier returns that isn't one of the three above;
    /// its raw confidence is used unscaled.
    Other(String),
}

#[derive(Debug, Clone)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
}

#[async_trait]
pub trait SentimentCapability: Send + Sync {
    async fn classify(&self, text: &str) -> Option<SentimentResult>;
}

/// Scale a sentiment result into the [0,1] emotion intensity the scorer uses.
///
/// Positive sentiment is boosted ×1.2, negative ×1.3 (both drive engagement,
/// negative slightly more so), neutral dampened ×0.5; an unrecognized label
/// contributes its raw confidence unscaled.
pub fn emotion_intensity(result: &SentimentResult) -> f64 {
    let scaled = match &result.label {
        SentimentLabel::Positive => result.confidence * 1.2,
        SentimentLabel::Negative => result.confidence * 1.3,
        SentimentLabel::Neutral => result.confidence * 0.5,
        SentimentLabel::Other(_) => result.confidence,
    };
    scaled.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_boost() {
        let r = SentimentResult { label: SentimentLabel::Positive, confidence: 0.8 };
        assert!((emotion_intensity(&r) - 0.96).abs() < 0.001);
    }

    #[test]
    fn test_negative_boost_clamped() {
        let r = SentimentResult { label: SentimentLabel::Negative, confidence: 0.9 };
        assert!((emotion_intensity(&r) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_neutral_dampened() {
        let r = SentimentResult { label: SentimentLabel::Neutral, confidence: 0.6 };
        assert!((emotion_intensity(&r) - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_unknown_label_uses_raw_confidence() {
        let r = SentimentResult { label: SentimentLabel::Other("mixed".into()), confidence: 0.4 };
        assert!((emotion_intensity(&r) - 0.4).abs() < 0.001);
    }
}
