//! Drop-in impact: the word drops from above the anchor over ~300ms, the
//! scale explodes to ~200% then settles, with an optional colour flash on
//! flagged "impact" words.

use crate::color::AssColor;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const DROP_OFFSET_PX: i32 = 1400;
const PEAK_SCALE: f64 = 200.0;
const FLASH_COLOR: AssColor = AssColor::WHITE;

pub fn build(line: &[TimedWord], ctx: &RecipeContext) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor_x = ctx.anchor.x as i32;
    let anchor_y = ctx.anchor.y as i32;

    for word in line {
        let duration_ms = (((word.end - word.start) * 1000.0).max(400.0)) as u32;
        let drop_ms = duration_ms.min(300).max(1);
        let bounce_ms = (duration_ms / 3).min(200).max(1);
        let is_impact = ctx.is_accent("impact", &word.text);
        let settle_scale = if is_impact { PEAK_SCALE } else { 160.0 };

        let mut tags = vec![
            Override::Alignment(5),
            Override::Move {
                x1: anchor_x,
                y1: (anchor_y - DROP_OFFSET_PX).max(0),
                x2: anchor_x,
                y2: anchor_y,
                timing: Some((0, drop_ms)),
            },
            Override::Transform { start_ms: 0, end_ms: drop_ms, tags: vec![Override::Scale { x: settle_scale, y: settle_scale }] },
            Override::Transform {
                start_ms: drop_ms,
                end_ms: drop_ms + bounce_ms,
                tags: vec![Override::Scale { x: settle_scale - 40.0, y: settle_scale - 40.0 }],
            },
            Override::Transform {
                start_ms: drop_ms + bounce_ms,
                end_ms: drop_ms + bounce_ms + 100,
                tags: vec![Override::Scale { x: settle_scale, y: settle_scale }],
            },
        ];

        if is_impact {
            tags.push(Override::PrimaryColor(FLASH_COLOR));
            tags.push(Override::Transform { start_ms: drop_ms, end_ms: drop_ms + 1, tags: vec![Override::PrimaryColor(AssColor::WHITE)] });
        }

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
    fn test_drop_emits_one_event_per_word() {
        let mut accents = HashMap::new();
        accents.insert("impact".to_string(), vec!["huge".to_string()]);
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::DropInImpact,
            accent_keywords: accents,
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let line = vec![TimedWord { text: "huge".into(), start: 0.0, end: 0.5 }];
        let events = build(&line, &rc);
        assert_eq!(events.len(), 1);
    }
}
