//! Speaker-colored block: the whole line is colored by the dominant speaker
//! of its first word's start time; inter-line gaps under 0.3s are closed so
//! there's no visible flicker of bare canvas between speaker turns.

use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::speaker_color::{color_for_speaker, speaker_at};
use crate::tags::Override;
use crate::words::TimedWord;

const GAP_CLOSE_THRESHOLD: f64 = 0.3;
const FALLBACK_COLOR: crate::color::AssColor = crate::color::AssColor::WHITE;

/// Builds one event per line (not per word), called once across every line
/// of a chunked clip so that consecutive lines can close short gaps between
/// each other.
pub fn build_lines(lines: &[Vec<TimedWord>], ctx: &RecipeContext) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let mut previous_end: Option<f64> = None;

    for line in lines {
        let (Some(first), Some(last)) = (line.first(), line.last()) else { continue };

        let mut start = first.start;
        if let Some(prev_end) = previous_end {
            if start - prev_end < GAP_CLOSE_THRESHOLD && start > prev_end {
                start = prev_end;
            }
        }
        let end = last.end;
        previous_end = Some(end);

        let color = speaker_at(first.start, ctx.speakers).map(|s| color_for_speaker(&s)).unwrap_or(FALLBACK_COLOR);

        let text = line.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
        let tags = vec![
            Override::Alignment(5),
            Override::Position { x: ctx.anchor.x as i32, y: ctx.anchor.y as i32 },
            Override::PrimaryColor(color),
            Override::Fade { fade_in_ms: 100, fade_out_ms: 100 },
        ];

        events.push(AssEvent::new(0, start, end, ctx.style_name, vec![EventSegment::new(tags, text)]));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, SpeakerLabel, SpeakerSegment, StyleTemplate};

    #[test]
    fn test_closes_short_gaps_between_lines() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 2 },
            recipe: AnimationRecipe::SpeakerColoredBlock,
            accent_keywords: HashMap::new(),
        };
        let speakers = vec![SpeakerSegment::new(0.0, 5.0, SpeakerLabel::Left)];
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &speakers };
        let lines = vec![
            vec![TimedWord { text: "hi".into(), start: 0.0, end: 1.0 }],
            vec![TimedWord { text: "there".into(), start: 1.2, end: 2.0 }], // 0.2s gap, should close
        ];
        let events = build_lines(&lines, &rc);
        assert_eq!(events[1].start, 1.0);
    }

    #[test]
    fn test_keeps_large_gaps() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 2 },
            recipe: AnimationRecipe::SpeakerColoredBlock,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let lines = vec![
            vec![TimedWord { text: "hi".into(), start: 0.0, end: 1.0 }],
            vec![TimedWord { text: "there".into(), start: 2.0, end: 3.0 }],
        ];
        let events = build_lines(&lines, &rc);
        assert_eq!(events[1].start, 2.0);
    }
}
