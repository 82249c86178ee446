//! Clip selector: turns timed segments into a ranked, capped list of candidates.

use vclip_models::{CandidateWindow, TranscriptSegment};

use crate::sentiment::SentimentCapability;

/// Overlap fraction used when advancing the scan cursor past an accepted window.
const OVERLAP_FRACTION: f64 = 0.5;

/// Minimum word count past which a segment is treated as ending a sentence
/// even without terminal punctuation.
const SENTENCE_BOUNDARY_WORD_COUNT: usize = 10;

/// `segment(segments) → candidates`.
///
/// Greedily accumulates segments into a growing window; whenever the
/// trailing segment ends on a sentence boundary and the window duration is
/// within `[min_length, max_length]`, records a candidate closest to
/// `target_length`. Advances the cursor by ~half the accepted window for 50%
/// overlap coverage.
pub fn segment(
    segments: &[TranscriptSegment],
    min_length: f64,
    target_length: f64,
    max_length: f64,
) -> Vec<CandidateWindow> {
    let mut ordered: Vec<&TranscriptSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap());

    let mut candidates = Vec::new();
    let mut i = 0;

    while i < ordered.len() {
        let clip_start = ordered[i].start;
        let mut best: Option<(usize, usize)> = None; // (accepted end index exclusive, accepted len)

        let mut j = i;
        while j < ordered.len() {
            let duration = ordered[j].end - clip_start;
            if duration > max_length {
                break;
            }

            if duration >= min_length && ends_sentence_boundary(ordered[j]) {
                let accept = match best {
                    None => true,
                    Some((best_end, _)) => {
                        let best_duration = ordered[best_end - 1].end - clip_start;
                        (duration - target_length).abs() < (best_duration - target_length).abs()
                    }
                };
                if accept {
                    best = Some((j + 1, j + 1 - i));
                }
                if duration >= target_length {
                    break;
                }
            }

            j += 1;
        }

        match best {
            Some((end_exclusive, accepted_len)) => {
                let window_segments: Vec<TranscriptSegment> =
                    ordered[i..end_exclusive].iter().map(|s| (*s).clone()).collect();
                candidates.push(CandidateWindow::new(window_segments));
                i += (accepted_len / 2).max(1);
            }
            None => i += 1,
        }
    }

    candidates
}

fn ends_sentence_boundary(segment: &TranscriptSegment) -> bool {
    segment.ends_sentence_boundary(SENTENCE_BOUNDARY_WORD_COUNT)
}

/// `rank(candidates) → ordered_candidates`.
///
/// Scores each with the hook scorer, sorts by total score descending, ties
/// broken by earlier start.
pub async fn rank(
    mut candidates: Vec<CandidateWindow>,
    target_length: f64,
    sentiment: Option<&dyn SentimentCapability>,
) -> Vec<CandidateWindow> {
    for candidate in candidates.iter_mut() {
        let score = crate::scorer::score(&candidate.text, candidate.duration(), target_length, sentiment).await;
        candidate.score = score;
    }

    candidates.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap()
            .then(a.start.partial_cmp(&b.start).unwrap())
    });

    candidates
}

/// Automatic selection ceiling by total video duration, per the spec's table.
fn automatic_ceiling(total_video_duration: f64) -> usize {
    if total_video_duration >= 20.0 * 60.0 {
        10
    } else if total_video_duration >= 10.0 * 60.0 {
        8
    } else if total_video_duration >= 5.0 * 60.0 {
        5
    } else if total_video_duration >= 2.0 * 60.0 {
        3
    } else {
        2
    }
}

/// `select_top(ordered, requested_max, total_video_duration, avg_clip_length) → final`.
///
/// Applies the automatic ceiling, a feasibility ceiling derived from the
/// video's total duration and the average clip length, and the requested
/// max; always returns ranked order and never filters purely by score.
pub fn select_top(
    ordered: Vec<CandidateWindow>,
    requested_max: usize,
    total_video_duration: f64,
    avg_clip_length: f64,
) -> Vec<CandidateWindow> {
    let ceiling = automatic_ceiling(total_video_duration);
    let feasible = if avg_clip_length > 0.0 {
        (total_video_duration / avg_clip_length).floor() as usize
    } else {
        ordered.len()
    };

    let limit = requested_max.min(ceiling).min(feasible.max(1)).min(ordered.len());

    ordered.into_iter().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::WordToken;

    fn segment_at(start: f64, end: f64, text: &str) -> TranscriptSegment {
        let words: Vec<WordToken> = text
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| {
                let word_len = (end - start) / text.split_whitespace().count().max(1) as f64;
                WordToken {
                    start: start + i as f64 * word_len,
                    end: start + (i + 1) as f64 * word_len,
                    text: w.to_string(),
                }
            })
            .collect();
        TranscriptSegment { start, end, text: text.to_string(), words }
    }

    #[test]
    fn test_segment_yields_candidates_within_bounds() {
        let segments = vec![
            segment_at(0.0, 30.0, "This is the opening line of the segment."),
            segment_at(30.0, 60.0, "And here the story continues onward."),
            segment_at(60.0, 90.0, "Finally we reach a dramatic conclusion."),
            segment_at(90.0, 120.0, "The end comes with one last twist."),
        ];

        let candidates = segment(&segments, 20.0, 30.0, 40.0);
        assert!(!candidates.is_empty());
        for c in &candidates {
            assert!(c.duration() >= 20.0 - 0.001 && c.duration() <= 40.0 + 0.001);
        }
    }

    #[test]
    fn test_automatic_ceiling_table() {
        assert_eq!(automatic_ceiling(25.0 * 60.0), 10);
        assert_eq!(automatic_ceiling(15.0 * 60.0), 8);
        assert_eq!(automatic_ceiling(7.0 * 60.0), 5);
        assert_eq!(automatic_ceiling(3.0 * 60.0), 3);
        assert_eq!(automatic_ceiling(60.0), 2);
    }

    #[test]
    fn test_select_top_never_exceeds_any_ceiling() {
        let segments = vec![
            segment_at(0.0, 30.0, "one two three four five six seven eight nine ten eleven."),
        ];
        let candidates = segment(&segments, 10.0, 20.0, 30.0);
        let selected = select_top(candidates, 10, 90.0, 30.0);
        assert!(selected.len() <= 2);
    }
}
