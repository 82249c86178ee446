//! Word-by-word explode: per word, scale bursts 50 -> 180 -> 120 -> 100% over
//! the word's duration; colour cycles through three high-contrast hues; a
//! small horizontal jitter rides along.

use rand::rngs::StdRng;
use rand::Rng;

use crate::color::EXPLODE_CYCLE;
use crate::document::{AssEvent, EventSegment};
use crate::recipes::context::RecipeContext;
use crate::tags::Override;
use crate::words::TimedWord;

pub fn build(line: &[TimedWord], ctx: &RecipeContext, rng: &mut StdRng) -> Vec<AssEvent> {
    let mut events = Vec::new();

    for word in line {
        let duration_ms = ((word.end - word.start) * 1000.0).max(1.0) as u32;
        let third = duration_ms / 3;

        let burst_1 = (duration_ms / 10).clamp(1, duration_ms);
        let burst_2 = (duration_ms * 5 / 20).clamp(burst_1, duration_ms);

        let color = EXPLODE_CYCLE[rng.gen_range(0..EXPLODE_CYCLE.len())];
        let jitter: f64 = rng.gen_range(-2.0..2.0);

        let tags = vec![
            Override::Alignment(5),
            Override::Position { x: ctx.anchor.x as i32, y: ctx.anchor.y as i32 },
            Override::Scale { x: 50.0, y: 50.0 },
            Override::Transform { start_ms: 0, end_ms: burst_1, tags: vec![Override::Scale { x: 180.0, y: 180.0 }] },
            Override::Transform { start_ms: burst_1, end_ms: burst_2, tags: vec![Override::Scale { x: 120.0, y: 120.0 }] },
            Override::Transform { start_ms: burst_2, end_ms: duration_ms, tags: vec![Override::Scale { x: 100.0, y: 100.0 }] },
            Override::PrimaryColor(color),
            Override::Transform { start_ms: 0, end_ms: third.max(1), tags: vec![Override::RotationX(jitter)] },
            Override::Transform { start_ms: third.max(1), end_ms: duration_ms, tags: vec![Override::RotationX(0.0)] },
        ];

        events.push(AssEvent::new(
            0,
            word.start,
            word.end,
            ctx.style_name,
            vec![EventSegment::new(tags, word.text.to_uppercase())],
        ));
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
    fn test_one_event_per_word() {
        let template = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::WordByWordExplode,
            accent_keywords: HashMap::new(),
        };
        let rc = RecipeContext { style_name: "Default", anchor: template.anchor, template: &template, speakers: &[] };
        let mut rng = StdRng::seed_from_u64(5);
        let line = vec![
            TimedWord { text: "boom".into(), start: 0.0, end: 0.3 },
            TimedWord { text: "wow".into(), start: 0.3, end: 0.6 },
        ];
        let events = build(&line, &rc, &mut rng);
        assert_eq!(events.len(), 2);
    }
}
