//! Top-level entry point: compiles a candidate window into a complete,
//! rendered ASS document for a chosen style template and layout mode.

use rand::rngs::StdRng;
use rand::SeedableRng;
use vclip_models::{AnimationRecipe, CandidateWindow, LayoutMode, SpeakerSegment, StyleTemplate};

use crate::color::AssColor;
use crate::chunker::chunk;
use crate::document::{AssDocument, AssStyleDef};
use crate::error::{CaptionError, CaptionResult};
use crate::layout::resolve_anchor;
use crate::recipes::context::RecipeContext;
use crate::recipes::{
    bubble_pop, drop_in_impact, karaoke_highlight, progressive_fill, progressive_typewriter, rainbow_slide, rgb_glitch,
    speaker_colored_block, word_by_word_explode,
};
use crate::translate::{apply_translation, TranslationCapability, TranslationMode};
use crate::words::{clip_relative_words, TimedWord};

const DEFAULT_STYLE_NAME: &str = "Default";

/// Optional translation step applied to every chunked line before the
/// animation recipe renders it.
pub struct TranslationRequest<'a> {
    pub target_language: &'a str,
    pub mode: TranslationMode,
    pub capability: &'a dyn TranslationCapability,
}

/// `compile(candidate, template, layout, speakers, seed) -> AssDocument`.
///
/// `seed` makes every randomized choice (bubble-pop entry direction, glitch
/// jitter, variable-chunk line sizes) reproducible: the same inputs and seed
/// always produce a bit-identical script.
pub async fn compile(
    candidate: &CandidateWindow,
    template: &StyleTemplate,
    layout: LayoutMode,
    speakers: &[SpeakerSegment],
    seed: u64,
    translation: Option<TranslationRequest<'_>>,
) -> CaptionResult<AssDocument> {
    let words = clip_relative_words(candidate);
    if words.is_empty() {
        return Err(CaptionError::NoWords);
    }

    let anchor = resolve_anchor(template, layout);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lines = chunk(&words, &template.chunking, &mut rng);

    if let Some(request) = translation {
        lines = translate_lines(lines, &request).await;
    }

    let ctx = RecipeContext { style_name: DEFAULT_STYLE_NAME, anchor, template, speakers };
    let events = build_events(&lines, template.recipe, &ctx, &mut rng);

    let mut doc = AssDocument::new(format!("clip_{:.3}", candidate.start), 1080, 1920);
    doc.styles.push(AssStyleDef {
        name: DEFAULT_STYLE_NAME.to_string(),
        font_family: template.font_family.clone(),
        font_size: template.font_size,
        primary_color: AssColor::WHITE,
        outline_color: AssColor::BLACK,
    });
    doc.events = events;
    Ok(doc)
}

async fn translate_lines(lines: Vec<Vec<TimedWord>>, request: &TranslationRequest<'_>) -> Vec<Vec<TimedWord>> {
    let mut translated = Vec::with_capacity(lines.len());
    for line in lines {
        let converted = apply_translation(&line, request.target_language, request.mode, request.capability).await;
        translated.push(converted);
    }
    translated
}

fn build_events(
    lines: &[Vec<TimedWord>],
    recipe: AnimationRecipe,
    ctx: &RecipeContext,
    rng: &mut StdRng,
) -> Vec<crate::document::AssEvent> {
    if recipe == AnimationRecipe::SpeakerColoredBlock {
        return speaker_colored_block::build_lines(lines, ctx);
    }

    let mut events = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut line_events = match recipe {
            AnimationRecipe::ProgressiveFill => progressive_fill::build(line, ctx),
            AnimationRecipe::KaraokeHighlight => karaoke_highlight::build(line, ctx),
            AnimationRecipe::WordByWordExplode => word_by_word_explode::build(line, ctx, rng),
            AnimationRecipe::ProgressiveTypewriter => progressive_typewriter::build(line, ctx),
            AnimationRecipe::BubblePop => bubble_pop::build(line, ctx, rng),
            AnimationRecipe::DropInImpact => drop_in_impact::build(line, ctx),
            AnimationRecipe::RgbGlitch => rgb_glitch::build(line, ctx, rng),
            AnimationRecipe::RainbowSlide => rainbow_slide::build(line, ctx),
            AnimationRecipe::SpeakerColoredBlock => unreachable!("handled above"),
        };
        events.append(&mut line_events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vclip_models::{Anchor, ChunkMode, TranscriptSegment, WordToken};

    fn candidate() -> CandidateWindow {
        let seg = TranscriptSegment::new(
            10.0,
            12.0,
            "this is amazing",
            vec![
                WordToken::new(10.0, 10.4, "this"),
                WordToken::new(10.4, 10.8, "is"),
                WordToken::new(10.8, 11.4, "amazing"),
            ],
        );
        CandidateWindow::new(vec![seg])
    }

    fn template(recipe: AnimationRecipe) -> StyleTemplate {
        StyleTemplate {
            name: "t".into(),
            font_family: "Arial Black".into(),
            font_size: 96,
            anchor: Anchor { x: 540, y: 1600 },
            chunking: ChunkMode::Fixed { words_per_line: 3 },
            recipe,
            accent_keywords: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_compile_preserves_clip_relative_timing() {
        let candidate = candidate();
        let template = template(AnimationRecipe::KaraokeHighlight);
        let doc = compile(&candidate, &template, LayoutMode::Fit, &[], 1, None).await.unwrap();
        assert!(!doc.events.is_empty());
        // every event starts within the clip's own duration window
        for event in &doc.events {
            assert!(event.start >= 0.0 && event.end <= candidate.duration() + 0.001);
        }
    }

    #[tokio::test]
    async fn test_compile_is_deterministic_for_fixed_seed() {
        let candidate = candidate();
        let template = template(AnimationRecipe::BubblePop);
        let doc_a = compile(&candidate, &template, LayoutMode::Fit, &[], 42, None).await.unwrap();
        let doc_b = compile(&candidate, &template, LayoutMode::Fit, &[], 42, None).await.unwrap();
        assert_eq!(doc_a.to_ass_string(), doc_b.to_ass_string());
    }

    #[tokio::test]
    async fn test_compile_rejects_empty_candidate() {
        let seg = TranscriptSegment::new(0.0, 0.0, "", vec![]);
        let candidate = CandidateWindow::new(vec![seg]);
        let template = template(AnimationRecipe::ProgressiveFill);
        let result = compile(&candidate, &template, LayoutMode::Fit, &[], 1, None).await;
        assert!(matches!(result, Err(CaptionError::NoWords)));
    }
}
