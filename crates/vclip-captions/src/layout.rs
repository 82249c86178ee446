//! Resolves a template's anchor against the render layout mode.
//!
//! Every layout mode (`fit`, `fill`, `square`, `auto`) renders onto the same
//! 1080x1920 canvas, but `fit`/`square` leave blurred letterbox bands the
//! template's own anchor might sit inside of. Layout-aware positioning
//! overrides the template anchor with the canonical safe-zone anchor in that
//! case; `fill` and `auto` fill the whole canvas so the template's anchor is
//! already safe.

use vclip_models::{Anchor, LayoutMode, StyleTemplate};

pub fn resolve_anchor(template: &StyleTemplate, layout: LayoutMode) -> Anchor {
    match layout {
        LayoutMode::Fit | LayoutMode::Square => StyleTemplate::layout_safe_zone_anchor(),
        LayoutMode::Fill | LayoutMode::Auto => template.anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{AnimationRecipe, ChunkMode};

    fn template_with_anchor(x: u32, y: u32) -> StyleTemplate {
        StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x, y },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::KaraokeHighlight,
            accent_keywords: HashMap::new(),
        }
    }

    #[test]
    fn test_fit_overrides_to_safe_zone() {
        let t = template_with_anchor(540, 900);
        let a = resolve_anchor(&t, LayoutMode::Fit);
        assert_eq!(a, StyleTemplate::layout_safe_zone_anchor());
    }

    #[test]
    fn test_fill_keeps_template_anchor() {
        let t = template_with_anchor(540, 900);
        let a = resolve_anchor(&t, LayoutMode::Fill);
        assert_eq!(a, Anchor { x: 540, y: 900 });
    }
}
