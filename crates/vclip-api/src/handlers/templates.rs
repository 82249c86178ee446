//! Template catalog introspection.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use vclip_models::{default_highlight_colors, AnimationRecipe, StyleTemplate};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<StyleTemplate>,
    pub recipes: Vec<&'static str>,
    pub default_highlight_colors: HashMap<String, String>,
}

/// GET /templates
///
/// Beyond the raw style records, surfaces the available animation-recipe
/// names and the default highlight color per token category, for client-side
/// preview before a job is submitted.
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplatesResponse> {
    let templates = state.catalog.templates().cloned().collect();
    let recipes = AnimationRecipe::ALL.iter().map(|r| r.as_str()).collect();

    Json(TemplatesResponse { templates, recipes, default_highlight_colors: default_highlight_colors() })
}
