//! RGB glitch: three overlapping events per word at +/-N px horizontal offset
//! in red/green/blue, with semi-transparent red/blue layers and optional
//! alpha flicker on flagged "error" words.

use rand::rngs::StdRng;
use rand::Rng;

use crate::color::GLITCH_CHANNELS;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

const CHANNEL_OFFSET_PX: i32 = 5;
const SIDE_CHANNEL_ALPHA: u8 = 0x80;

pub fn build(line: &[TimedWord], ctx: &RecipeContext, rng: &mut StdRng) -> Vec<AssEvent> {
    let mut events = Vec::new();
    let anchor_x = ctx.anchor.x as i32;
    let anchor_y = ctx.anchor.y as i32;

    for word in line {
        let is_error = ctx.is_accent("error", &word.text);
        let jitter_x: i32 = rng.gen_range(-3..=3);
        let jitter_y: i32 = rng.gen_range(-2..=2);

        for (offset_sign, channel_color, alpha) in [(-1, GLITCH_CHANNELS[0], SIDE_CHANNEL_ALPHA), (0, GLITCH_CHANNELS[1], 0x00), (1, GLITCH_CHANNELS[2], SIDE_CHANNEL_ALPHA)] {
            let x = anchor_x + offset_sign * CHANNEL_OFFSET_PX + jitter_x;
            let y = anchor_y + offset_sign * (-2) + jitter_y;

            let mut tags = vec![
                Override::Alignment(5),
                Override::Position { x, y },
                Override::PrimaryColor(channel_color),
                Override::Alpha(alpha),
            ];

            if is_error {
                tags.push(Override::Transform { start_ms: 0, end_ms: 50, tags: vec![Override::Alpha(0xFF)] });
                tags.push(Override::Transform { start_ms: 50, end_ms: 100, tags: vec![Override::Alpha(0x00)] });
                tags.push(Override::Transform { start_ms: 100, end_ms: 150, tags: vec![Override::Alpha(0xFF)] });
                tags.push(Override::Transform { start_ms: 150, end_ms: 200, tags: vec![Override::Alpha(0x00)] });
            }

            events.push(AssEvent::new(0, word.start, word.end, ctx.style_name, vec![EventSegment::new(tags, word.text.to_uppercase())]));
        }
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
    fn test_emits_three_channel_events_per_word() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::RgbGlitch,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let mut rng = StdRng::seed_from_u64(11);
        let line = vec![TimedWord { text: "lag".into(), start: 0.0, end: 0.3 }];
        let events = build(&line, &rc, &mut rng);
        assert_eq!(events.len(), 3);
    }
}
