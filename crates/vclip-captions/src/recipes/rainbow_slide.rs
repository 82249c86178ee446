//! Rainbow slide / speed ramp: each word enters from the right; slide
//! duration decreases with word index to build momentum; colour cycles
//! through the rainbow palette.

use crate::color::RAINBOW_CYCLE;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const BASE_SLIDE_MS: u32 = 200;
const ENTRY_DISTANCE_PX: i32 = 200;

pub fn build(line: &[TimedWord], ctx: &RecipeContext) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor_x = ctx.anchor.x as i32;
    let anchor_y = ctx.anchor.y as i32;

    for (idx, word) in line.iter().enumerate() {
        let speed_multiplier = (1.0 - idx as f64 * 0.15).max(0.3);
        let slide_ms = ((BASE_SLIDE_MS as f64) * speed_multiplier) as u32;
        let entry_x = anchor_x + ENTRY_DISTANCE_PX + idx as i32 * 20;
        let color = RAINBOW_CYCLE[idx % RAINBOW_CYCLE.len()];

        let tags = vec![
            Override::Alignment(5),
            Override::Move { x1: entry_x, y1: anchor_y, x2: anchor_x, y2: anchor_y, timing: Some((0, slide_ms.max(1))) },
            Override::PrimaryColor(color),
            Override::Transform { start_ms: 0, end_ms: slide_ms.max(1), tags: vec![Override::Scale { x: 120.0, y: 120.0 }] },
            Override::Transform { start_ms: slide_ms.max(1), end_ms: slide_ms.max(1) + 80, tags: vec![Override::Scale { x: 100.0, y: 100.0 }] },
        ];

        events.push(AssEvent::new(0, word.start, word.end, ctx.style_name, vec![EventSegment::new(tags, word.text.to_uppercase())]));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

    #[test]
    fn test_slide_duration_decreases_with_word_index() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 5 },
            recipe: AnimationRecipe::RainbowSlide,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line: Vec<TimedWord> = (0..4)
            .map(|i| TimedWord { text: format!("w{i}"), start: i as f64 * 0.3, end: i as f64 * 0.3 + 0.3 })
            .collect();
        let events = build(&line, &rc);
        assert_eq!(events.len(), 4);
    }
}
