//! Built-in style template catalog.
//!
//! The catalog is an in-process map from template name to [`StyleTemplate`],
//! loaded once at service start and shared read-only by the control API (for
//! `GET /templates`) and the worker (to resolve a job's `template` field).

use std::collections::HashMap;

use crate::template::{Anchor, AnimationRecipe, ChunkMode, StyleTemplate};

/// Per-token-category highlight colors shown to clients previewing a recipe,
/// as hex strings (no leading `#`, matching ASS color conventions upstream).
pub fn default_highlight_colors() -> HashMap<String, String> {
    HashMap::from([
        ("keyword".to_string(), "FFD700".to_string()),
        ("emphasis".to_string(), "FF4500".to_string()),
        ("question".to_string(), "00BFFF".to_string()),
        ("exclamation".to_string(), "FF1493".to_string()),
        ("number".to_string(), "32CD32".to_string()),
        ("default".to_string(), "FFFFFF".to_string()),
    ])
}

/// The in-memory template catalog.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: HashMap<String, StyleTemplate>,
}

impl TemplateCatalog {
    /// Build the catalog from an explicit template list (e.g. loaded from a
    /// config file). `names()`/`get()` are case-insensitive on lookup.
    pub fn new(templates: Vec<StyleTemplate>) -> Self {
        let templates = templates
            .into_iter()
            .map(|t| (t.name.to_lowercase(), t))
            .collect();
        Self { templates }
    }

    /// The catalog's built-in defaults, one per animation recipe, covering
    /// every chunking mode and a representative accent-keyword set.
    pub fn load_default() -> Self {
        Self::new(vec![
            StyleTemplate {
                name: "default".to_string(),
                font_family: "Montserrat".to_string(),
                font_size: 72,
                anchor: Anchor { x: 540, y: 1700 },
                chunking: ChunkMode::Fixed { words_per_line: 3 },
                recipe: AnimationRecipe::ProgressiveFill,
                accent_keywords: HashMap::from([(
                    "impact".to_string(),
                    vec!["never".to_string(), "always".to_string(), "secret".to_string()],
                )]),
            },
            StyleTemplate {
                name: "karaoke".to_string(),
                font_family: "Montserrat ExtraBold".to_string(),
                font_size: 80,
                anchor: Anchor { x: 540, y: 1600 },
                chunking: ChunkMode::Variable { min_words_per_line: 2, max_words_per_line: 4 },
                recipe: AnimationRecipe::KaraokeHighlight,
                accent_keywords: HashMap::new(),
            },
            StyleTemplate {
                name: "explode".to_string(),
                font_family: "Anton".to_string(),
                font_size: 90,
                anchor: Anchor { x: 540, y: 1550 },
                chunking: ChunkMode::Fixed { words_per_line: 1 },
                recipe: AnimationRecipe::WordByWordExplode,
                accent_keywords: HashMap::new(),
            },
            StyleTemplate {
                name: "typewriter".to_string(),
                font_family: "Courier Prime".to_string(),
                font_size: 64,
                anchor: Anchor { x: 540, y: 1700 },
                chunking: ChunkMode::Variable { min_words_per_line: 3, max_words_per_line: 6 },
                recipe: AnimationRecipe::ProgressiveTypewriter,
                accent_keywords: HashMap::new(),
            },
            StyleTemplate {
                name: "bubble".to_string(),
                font_family: "Baloo 2".to_string(),
                font_size: 76,
                anchor: Anchor { x: 540, y: 1600 },
                chunking: ChunkMode::Fixed { words_per_line: 2 },
                recipe: AnimationRecipe::BubblePop,
                accent_keywords: HashMap::new(),
            },
            StyleTemplate {
                name: "impact".to_string(),
                font_family: "Archivo Black".to_string(),
                font_size: 88,
                anchor: Anchor { x: 540, y: 1650 },
                chunking: ChunkMode::Fixed { words_per_line: 2 },
                recipe: AnimationRecipe::DropInImpact,
                accent_keywords: HashMap::from([(
                    "impact".to_string(),
                    vec!["wow".to_string(), "insane".to_string(), "huge".to_string()],
                )]),
            },
            StyleTemplate {
                name: "glitch".to_string(),
                font_family: "Space Mono".to_string(),
                font_size: 70,
                anchor: Anchor { x: 540, y: 1650 },
                chunking: ChunkMode::Fixed { words_per_line: 3 },
                recipe: AnimationRecipe::RgbGlitch,
                accent_keywords: HashMap::from([(
                    "error".to_string(),
                    vec!["wrong".to_string(), "broken".to_string(), "failed".to_string()],
                )]),
            },
            StyleTemplate {
                name: "rainbow".to_string(),
                font_family: "Poppins ExtraBold".to_string(),
                font_size: 78,
                anchor: Anchor { x: 540, y: 1600 },
                chunking: ChunkMode::Variable { min_words_per_line: 2, max_words_per_line: 3 },
                recipe: AnimationRecipe::RainbowSlide,
                accent_keywords: HashMap::new(),
            },
            StyleTemplate {
                name: "speaker".to_string(),
                font_family: "Montserrat".to_string(),
                font_size: 72,
                anchor: Anchor { x: 540, y: 1700 },
                chunking: ChunkMode::Fixed { words_per_line: 4 },
                recipe: AnimationRecipe::SpeakerColoredBlock,
                accent_keywords: HashMap::new(),
            },
        ])
    }

    pub fn get(&self, name: &str) -> Option<&StyleTemplate> {
        self.templates.get(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn templates(&self) -> impl Iterator<Item = &StyleTemplate> {
        self.templates.values()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::load_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_covers_every_recipe() {
        let catalog = TemplateCatalog::load_default();
        let recipes: std::collections::HashSet<AnimationRecipe> =
            catalog.templates().map(|t| t.recipe).collect();
        assert_eq!(recipes.len(), AnimationRecipe::ALL.len());
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let catalog = TemplateCatalog::load_default();
        assert!(catalog.get("Karaoke").is_some());
        assert!(catalog.get("KARAOKE").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let catalog = TemplateCatalog::load_default();
        let names = catalog.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
