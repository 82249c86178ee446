//! Progressive typewriter: each word event shows the accumulated prefix of
//! the line with a cursor glyph after the just-typed word; the cursor blinks
//! on the final word.

use crate::color::AssColor;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const TYPED_COLOR: AssColor = AssColor::new(0xCC, 0xCC, 0xCC);
const CURSOR_COLOR: AssColor = AssColor::new(0x00, 0xFF, 0x00);
const TRAILING_GAP_SECS: f64 = 0.01;

pub fn build(line: &[TimedWord], ctx: &RecipeContext) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor = vec![Override::Alignment(5), Override::Position { x: ctx.anchor.x as i32, y: ctx.anchor.y as i32 }];

    for (i, word) in line.iter().enumerate() {
        let start = word.start;
        let end = match line.get(i + 1) {
            Some(next) => (next.start - TRAILING_GAP_SECS).max(start + 0.01),
            None => word.end + 0.5,
        };

        let mut segments = vec![EventSegment::new(anchor.clone(), "")];
        for typed in &line[..=i] {
            segments.push(EventSegment::new(vec![Override::PrimaryColor(TYPED_COLOR)], format!("{} ", typed.text)));
        }

        let is_final_word = i == line.len() - 1;
        let cursor_tags = if is_final_word {
            vec![
                Override::PrimaryColor(CURSOR_COLOR),
                Override::Alpha(0x00),
                Override::Transform { start_ms: 0, end_ms: 500, tags: vec![Override::Alpha(0x80)] },
                Override::Transform { start_ms: 500, end_ms: 1000, tags: vec![Override::Alpha(0x00)] },
            ]
        } else {
            vec![Override::PrimaryColor(CURSOR_COLOR)]
        };
        segments.push(EventSegment::new(cursor_tags, "|"));

        events.push(AssEvent::new(0, start, end, ctx.style_name, segments));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

    #[test]
    fn test_progressive_prefix_grows_and_cursor_blinks_on_last_word() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::ProgressiveTypewriter,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line = vec![
            TimedWord { text: "one".into(), start: 0.0, end: 0.3 },
            TimedWord { text: "two".into(), start: 0.4, end: 0.7 },
        ];
        let events = build(&line, &rc);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].segments.len(), 4); // anchor + "one" + "two" + cursor
    }
}
