//! Finished clip file streaming.

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /outputs/{filename} — stream a finished clip back by name. The
/// filename is resolved against the output root with traversal rejected by
/// `OutputStore::resolve`; an unknown filename falls through to `ServeFile`'s
/// own 404.
pub async fn get_output(State(state): State<AppState>, Path(filename): Path<String>, request: Request) -> ApiResult<Response> {
    let path = state.output_store.resolve(&filename)?;

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };
    Ok(response)
}
