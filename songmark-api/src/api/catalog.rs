//! Catalog label endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::catalog::{labels, CatalogLabels};
use crate::{ApiResult, AppState};

/// GET /api/catalog/labels
pub async fn list_labels(State(state): State<AppState>) -> ApiResult<Json<CatalogLabels>> {
    let songs = state.store.list().await?;
    Ok(Json(labels(&songs)))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/api/catalog/labels", get(list_labels))
}
