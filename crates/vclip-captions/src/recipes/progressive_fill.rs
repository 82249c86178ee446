//! Progressive fill: the whole line renders once; each word's fill animates
//! in proportional to its own duration.

use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const SCALE_BUMP: f64 = 112.0;

pub fn build(line: &[TimedWord], ctx: &RecipeContext) -> Vec<AssEvent> {
    let Some(first) = line.first() else { return Vec::new() };
    let Some(last) = line.last() else { return Vec::new() };
    let line_start = first.start;
    let line_end = last.end;

    let anchor_tags = vec![Override::Alignment(5), Override::Position { x: ctx.anchor.x as i32, y: ctx.anchor.y as i32 }];

    let mut segments = vec![EventSegment::new(anchor_tags, "")];
    for word in line {
        let start_ms = ((word.start - line_start) * 1000.0).max(0.0) as u32;
        let end_ms = (((word.end - line_start) * 1000.0).max(start_ms as f64 + 1.0)) as u32;

        // Each word starts fully transparent and animates to opaque over its
        // own span, so the line fills in at the pace it was actually spoken.
        let mut tags = vec![Override::Alpha(0xFF), Override::Transform { start_ms, end_ms, tags: vec![Override::Alpha(0x00)] }];

        if ctx.is_accent("impact", &word.text) {
            tags.push(Override::Transform { start_ms, end_ms, tags: vec![Override::Scale { x: SCALE_BUMP, y: SCALE_BUMP }] });
        }

        segments.push(EventSegment::new(tags, format!("{} ", word.text)));
    }

    vec![AssEvent::new(0, line_start, line_end, ctx.style_name, segments)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

    fn ctx() -> StyleTemplate {
        StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::ProgressiveFill,
            accent_keywords: Default::default(),
        }
    }

    #[test]
    fn test_single_event_spans_whole_line() {
        let template = ctx();
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line = vec![
            TimedWord { text: "hi".into(), start: 0.0, end: 0.5 },
            TimedWord { text: "there".into(), start: 0.5, end: 1.2 },
        ];
        let events = build(&line, &rc);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, 0.0);
        assert_eq!(events[0].end, 1.2);
    }
}
