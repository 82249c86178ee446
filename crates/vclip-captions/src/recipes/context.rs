//! Shared inputs every recipe needs beyond its line of words.

use vclip_models::{Anchor, SpeakerSegment, StyleTemplate};

pub struct RecipeContext<'a> {
    pub style_name: &'a str,
    pub anchor: Anchor,
    pub template: &'a StyleTemplate,
    pub speakers: &'a [SpeakerSegment],
}

impl<'a> RecipeContext<'a> {
    pub fn is_accent(&self, category: &str, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.template.accents_for(category).iter().any(|kw| lowered.contains(kw.as_str()))
    }
}
