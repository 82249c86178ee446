//! Bubble pop: each word floats in from a random off-canvas direction and
//! settles with a pop (scale 130 -> 110 -> 100) and a brief rotation jitter.

use rand::rngs::StdRng;
use rand::Rng;

use crate::color::AssColor;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const BUBBLE_COLOR: AssColor = AssColor::new(0xFA, 0xE6, 0xE6); // lavender
const OFFSCREEN_OFFSET: i32 = 440;

fn entry_point(anchor_x: i32, anchor_y: i32, direction: u8) -> (i32, i32) {
    match direction {
        0 => (anchor_x, anchor_y + OFFSCREEN_OFFSET), // from bottom
        1 => (anchor_x - OFFSCREEN_OFFSET, anchor_y), // from left
        2 => (anchor_x + OFFSCREEN_OFFSET, anchor_y), // from right
        _ => (anchor_x, anchor_y - OFFSCREEN_OFFSET), // from top
    }
}

pub fn build(line: &[TimedWord], ctx: &RecipeContext, rng: &mut StdRng) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor_x = ctx.anchor.x as i32;
    let anchor_y = ctx.anchor.y as i32;

    for word in line {
        let duration_ms = (((word.end - word.start) * 1000.0).max(300.0)) as u32;
        let direction = rng.gen_range(0..4u8);
        let (from_x, from_y) = entry_point(anchor_x, anchor_y, direction);
        let settle_start = duration_ms.saturating_sub(100).max(150);

        let tags = vec![
            Override::Alignment(5),
            Override::PrimaryColor(BUBBLE_COLOR),
            Override::Fade { fade_in_ms: 150, fade_out_ms: 100 },
            Override::Move { x1: from_x, y1: from_y, x2: anchor_x, y2: anchor_y, timing: None },
            Override::Transform { start_ms: 0, end_ms: 150, tags: vec![Override::Scale { x: 130.0, y: 130.0 }] },
            Override::Transform { start_ms: 150, end_ms: settle_start, tags: vec![Override::Scale { x: 110.0, y: 110.0 }] },
            Override::Transform { start_ms: settle_start, end_ms: duration_ms, tags: vec![Override::Scale { x: 100.0, y: 100.0 }] },
            Override::Transform { start_ms: 0, end_ms: 100, tags: vec![Override::RotationX(2.0)] },
            Override::Transform { start_ms: 100, end_ms: 200, tags: vec![Override::RotationX(-1.0)] },
            Override::Transform { start_ms: 200, end_ms: 300.min(duration_ms), tags: vec![Override::RotationX(0.0)] },
        ];

        events.push(AssEvent::new(0, word.start, word.end, ctx.style_name, vec![EventSegment::new(tags, word.text.clone())]));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use vclip_models::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

    #[test]
    fn test_bubble_pop_emits_one_event_per_word() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::BubblePop,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let mut rng = StdRng::seed_from_u64(3);
        let line = vec![TimedWord { text: "pop".into(), start: 0.0, end: 0.4 }];
        let events = build(&line, &rc, &mut rng);
        assert_eq!(events.len(), 1);
    }
}
