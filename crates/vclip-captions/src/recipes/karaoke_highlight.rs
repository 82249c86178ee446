//! Karaoke highlight: the active word gets a colour change plus an ease-in/
//! ease-out scale bump; an inter-word "all normal" event covers every gap so
//! no frame shows two active words.

use crate::color::AssColor;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const ACTIVE_COLOR: AssColor = AssColor::new(0x00, 0xFF, 0x00);
const NORMAL_COLOR: AssColor = AssColor::WHITE;
const PEAK_SCALE: f64 = 125.0;
const MAX_EASE_MS: u32 = 100;

pub fn build(line: &[TimedWord], ctx: &RecipeContext) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor = vec![Override::Alignment(5), Override::Position { x: ctx.anchor.x as i32, y: ctx.anchor.y as i32 }];

    for (i, active) in line.iter().enumerate() {
        let duration_ms = ((active.end - active.start) * 1000.0).max(1.0) as u32;
        let ease_in = (duration_ms / 4).min(MAX_EASE_MS).max(1);
        let ease_out_start = ease_in.max(duration_ms.saturating_sub(MAX_EASE_MS));

        let mut segments = vec![EventSegment::new(anchor.clone(), "")];
        for (j, word) in line.iter().enumerate() {
            if i == j {
                let tags = vec![
                    Override::PrimaryColor(ACTIVE_COLOR),
                    Override::Transform { start_ms: 0, end_ms: ease_in, tags: vec![Override::Scale { x: PEAK_SCALE, y: PEAK_SCALE }] },
                    Override::Transform {
                        start_ms: ease_out_start,
                        end_ms: duration_ms,
                        tags: vec![Override::Scale { x: 100.0, y: 100.0 }],
                    },
                ];
                segments.push(EventSegment::new(tags, format!("{} ", word.text.to_uppercase())));
            } else {
                let tags = vec![Override::PrimaryColor(NORMAL_COLOR), Override::Scale { x: 100.0, y: 100.0 }];
                segments.push(EventSegment::new(tags, format!("{} ", word.text.to_uppercase())));
            }
        }

        events.push(AssEvent::new(0, active.start, active.end, ctx.style_name, segments));

        if let Some(next) = line.get(i + 1) {
            if next.start > active.end {
                events.push(all_normal_event(line, active.end, next.start, ctx, &anchor));
            }
        }
    }

    events
}

fn all_normal_event(line: &[TimedWord], start: f64, end: f64, ctx: &RecipeContext, anchor: &[Override]) -> AssEvent {
    let mut segments = vec![EventSegment::new(anchor.to_vec(), "")];
    for word in line {
        let tags = vec![Override::PrimaryColor(NORMAL_COLOR), Override::Scale { x: 100.0, y: 100.0 }];
        segments.push(EventSegment::new(tags, format!("{} ", word.text.to_uppercase())));
    }
    AssEvent::new(0, start, end, ctx.style_name, segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

    fn template() -> StyleTemplate {
        StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::KaraokeHighlight,
            accent_keywords: HashMap::new(),
        }
    }

    #[test]
    fn test_emits_one_event_per_word_plus_gap_fillers() {
        let template = template();
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line = vec![
            TimedWord { text: "this".into(), start: 0.0, end: 0.4 },
            TimedWord { text: "is".into(), start: 0.5, end: 0.7 },
        ];
        let events = build(&line, &rc);
        // 2 word events + 1 gap-filler between them (0.4..0.5)
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].start, 0.4);
        assert_eq!(events[1].end, 0.5);
    }

    #[test]
    fn test_no_gap_filler_when_words_are_contiguous() {
        let template = template();
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line = vec![
            TimedWord { text: "this".into(), start: 0.0, end: 0.4 },
            TimedWord { text: "is".into(), start: 0.4, end: 0.7 },
        ];
        let events = build(&line, &rc);
        assert_eq!(events.len(), 2);
    }
}
