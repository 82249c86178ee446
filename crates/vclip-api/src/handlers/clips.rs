//! Finished clip listing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use vclip_storage::ClipFile;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClipsResponse {
    pub clips: Vec<ClipFile>,
}

/// GET /clips — list finished MP4s under the output root, newest first.
pub async fn list_clips(State(state): State<AppState>) -> ApiResult<Json<ClipsResponse>> {
    let clips = state.output_store.list_clips().await?;
    Ok(Json(ClipsResponse { clips }))
}
