//! Hook scorer: pure function from text + duration to a viral-potential score.

use vclip_models::ScoreRecord;

use crate::sentiment::{emotion_intensity, SentimentCapability, SentimentResult};

/// Curated hook phrases, grouped by the rhetorical device they invoke.
const HOOK_KEYWORDS: &[&str] = &[
    // Secrets & reveals
    "secret", "secrets", "hidden", "revealed", "expose", "exposed", "truth about",
    "nobody told you", "nobody tells you", "they don't want you to know",
    // Mistakes & problems
    "mistake", "mistakes", "wrong", "error", "problem", "issue", "fail", "failure",
    "biggest mistake", "common mistake", "avoid this",
    // Crazy & shocking
    "crazy", "insane", "shocking", "unbelievable", "incredible", "amazing",
    "you won't believe", "mind-blowing", "jaw-dropping",
    // Explanatory hooks
    "this is why", "here's why", "the reason", "because", "how to", "watch this",
    "look at this", "check this out", "pay attention",
    // Urgency & FOMO
    "right now", "immediately", "before it's too late", "limited time",
    "don't miss", "last chance", "urgent",
    // Emotional triggers
    "love", "hate", "angry", "frustrated", "excited", "scared", "worried",
];

const QUESTION_STARTERS: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "which", "whose",
    "can you", "do you", "have you", "are you", "will you", "would you",
    "is it", "are they", "did you know",
];

/// `score(text, duration, target_length) → ScoreRecord`.
pub async fn score(
    text: &str,
    duration: f64,
    target_length: f64,
    sentiment: Option<&dyn SentimentCapability>,
) -> ScoreRecord {
    let keywords = detect_keywords(text);
    let keyword_points = keywords.len() as f64 * 2.0;

    let is_question = detect_question(text);
    let question_points = if is_question { 2.0 } else { 0.0 };

    let emotion_score = match sentiment {
        Some(capability) => match capability.classify(text).await {
            Some(result) => emotion_intensity(&result),
            None => 0.0,
        },
        None => 0.0,
    };
    let emotion_points = emotion_score * 2.0;

    let length_bonus = length_bonus(duration, target_length);

    let total = keyword_points + question_points + emotion_points + length_bonus;

    ScoreRecord {
        keywords,
        is_question,
        emotion_score,
        length_bonus,
        total,
    }
}

fn detect_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    HOOK_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

fn detect_question(text: &str) -> bool {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();

    if QUESTION_STARTERS.iter().any(|s| trimmed.starts_with(s)) {
        return true;
    }

    trimmed.split('.').next().is_some_and(|first| first.contains('?'))
}

fn length_bonus(duration: f64, target_length: f64) -> f64 {
    let tolerance = target_length * 0.1;
    if (duration - target_length).abs() <= tolerance {
        1.0
    } else {
        0.0
    }
}

/// Unscaled sentiment result, used by callers that already have it cached (so
/// scoring stays a pure function of text and duration for a fixed model).
pub fn score_with_precomputed_emotion(
    text: &str,
    duration: f64,
    target_length: f64,
    emotion_score: Option<&SentimentResult>,
) -> ScoreRecord {
    let keywords = detect_keywords(text);
    let keyword_points = keywords.len() as f64 * 2.0;

    let is_question = detect_question(text);
    let question_points = if is_question { 2.0 } else { 0.0 };

    let emotion_score = emotion_score.map(emotion_intensity).unwrap_or(0.0);
    let emotion_points = emotion_score * 2.0;

    let length_bonus = length_bonus(duration, target_length);
    let total = keyword_points + question_points + emotion_points + length_bonus;

    ScoreRecord { keywords, is_question, emotion_score, length_bonus, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_score_without_sentiment_is_deterministic() {
        let text = "This is why nobody tells you the biggest mistake. Did you know?";
        let a = score(text, 30.0, 30.0, None).await;
        let b = score(text, 30.0, 30.0, None).await;
        assert_eq!(a.total, b.total);
        assert!(a.total > 0.0);
    }

    #[test]
    fn test_length_bonus_within_tolerance() {
        assert_eq!(length_bonus(29.0, 30.0), 1.0);
        assert_eq!(length_bonus(20.0, 30.0), 0.0);
    }

    #[test]
    fn test_question_detection_via_starter() {
        assert!(detect_question("How do you even do that"));
        assert!(!detect_question("This is a statement"));
    }

    #[test]
    fn test_question_detection_via_mark() {
        assert!(detect_question("Seriously? that happened"));
    }

    #[test]
    fn test_keyword_detection_counts_distinct_hits() {
        let keywords = detect_keywords("This is the biggest mistake, a secret nobody tells you");
        assert!(keywords.contains(&"biggest mistake".to_string()));
        assert!(keywords.contains(&"secret".to_string()));
    }
}
