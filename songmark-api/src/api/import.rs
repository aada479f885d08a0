//! Import endpoint
//!
//! `POST /api/import` `{"url": "..."}` → draft song for review. Lookup
//! failures still produce a draft (`"source": "fallback"`); only an
//! unrecognizable URL is rejected.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::services::{import_from_url, ImportDraft};
use crate::{ApiResult, AppState};

/// Import request body
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub url: String,
}

/// POST /api/import
pub async fn import_song(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Json<ImportDraft>> {
    let Json(request) = payload?;
    let url = request.url.trim();
    let draft = import_from_url(&state.oembed, url).await?;

    info!(
        url = %url,
        name = %draft.song.name,
        source = ?draft.source,
        "Import draft prepared"
    );

    Ok(Json(draft))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new().route("/api/import", post(import_song))
}
