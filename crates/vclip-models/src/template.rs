//! Style template catalog types consumed by the caption compiler.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the nine concrete, reproducible caption animation recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnimationRecipe {
    ProgressiveFill,
    KaraokeHighlight,
    WordByWordExplode,
    ProgressiveTypewriter,
    BubblePop,
    DropInImpact,
    RgbGlitch,
    RainbowSlide,
    SpeakerColoredBlock,
}

impl AnimationRecipe {
    pub const ALL: &'static [AnimationRecipe] = &[
        AnimationRecipe::ProgressiveFill,
        AnimationRecipe::KaraokeHighlight,
        AnimationRecipe::WordByWordExplode,
        AnimationRecipe::ProgressiveTypewriter,
        AnimationRecipe::BubblePop,
        AnimationRecipe::DropInImpact,
        AnimationRecipe::RgbGlitch,
        AnimationRecipe::RainbowSlide,
        AnimationRecipe::SpeakerColoredBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationRecipe::ProgressiveFill => "progressive_fill",
            AnimationRecipe::KaraokeHighlight => "karaoke_highlight",
            AnimationRecipe::WordByWordExplode => "word_by_word_explode",
            AnimationRecipe::ProgressiveTypewriter => "progressive_typewriter",
            AnimationRecipe::BubblePop => "bubble_pop",
            AnimationRecipe::DropInImpact => "drop_in_impact",
            AnimationRecipe::RgbGlitch => "rgb_glitch",
            AnimationRecipe::RainbowSlide => "rainbow_slide",
            AnimationRecipe::SpeakerColoredBlock => "speaker_colored_block",
        }
    }
}

/// How many words are grouped per rendered caption line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ChunkMode {
    /// Exactly `words_per_line` words per line.
    Fixed { words_per_line: u32 },
    /// Weighted random line size within [min, max], biased toward 2-3 words.
    Variable { min_words_per_line: u32, max_words_per_line: u32 },
}

/// A named anchor position on the 1080x1920 output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Anchor {
    pub x: u32,
    pub y: u32,
}

/// A style template resolved from the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StyleTemplate {
    pub name: String,
    pub font_family: String,
    pub font_size: u32,
    pub anchor: Anchor,
    pub chunking: ChunkMode,
    pub recipe: AnimationRecipe,
    /// Keyword lists driving per-word accents, e.g. "impact" / "error" / "momentum".
    #[serde(default)]
    pub accent_keywords: HashMap<String, Vec<String>>,
}

impl StyleTemplate {
    /// Canonical safe-zone anchor used when layout-aware positioning overrides
    /// the template's own anchor to avoid letterbox/blur collision.
    pub fn layout_safe_zone_anchor() -> Anchor {
        Anchor { x: 540, y: 1600 }
    }

    pub fn accents_for(&self, category: &str) -> &[String] {
        self.accent_keywords
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_zone_anchor() {
        let a = StyleTemplate::layout_safe_zone_anchor();
        assert_eq!(a.y, 1600);
    }

    #[test]
    fn test_accents_for_missing_category_is_empty() {
        let tmpl = StyleTemplate {
            name: "t".into(),
            font_family: "Arial".into(),
            font_size: 64,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe: AnimationRecipe::KaraokeHighlight,
            accent_keywords: HashMap::new(),
        };
        assert!(tmpl.accents_for("impact").is_empty());
    }
}
