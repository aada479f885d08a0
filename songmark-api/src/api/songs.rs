//! Song CRUD and rating endpoints
//!
//! - `GET    /api/songs`          list with optional catalog query
//! - `POST   /api/songs`          create (201)
//! - `GET    /api/songs/:id`      fetch one
//! - `PUT    /api/songs/:id`      edit (usage statistics untouched)
//! - `DELETE /api/songs/:id`      delete, returning the removed record
//! - `POST   /api/songs/:id/rate` `{"rating": 1..=5}`

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use songmark_common::time;
use uuid::Uuid;

use crate::catalog::{CatalogQuery, SongListItem};
use crate::models::{to_presentation, Rating, Song, SongInput, SongView};
use crate::{ApiError, ApiResult, AppState};

/// Rating request body
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Song {} not found", id))
}

/// GET /api/songs
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SongListItem>>> {
    let Query(query) = query?;
    let songs = query.apply(state.store.list().await?);
    let now = time::now();

    Ok(Json(
        songs
            .into_iter()
            .map(|song| SongListItem::from_song(song, &now))
            .collect(),
    ))
}

/// POST /api/songs
///
/// `id` is generated unless supplied. Returns 400 when `name` is blank or
/// the identifier is already taken.
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<SongInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SongView>)> {
    let Json(input) = payload?;
    let song = Song::create(input, Uuid::new_v4().to_string(), time::now())?;
    let created = state.store.create(song).await?;
    Ok((StatusCode::CREATED, Json(to_presentation(created))))
}

/// GET /api/songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SongView>> {
    let song = state.store.get(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(Json(to_presentation(song)))
}

/// PUT /api/songs/:id
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongInput>, JsonRejection>,
) -> ApiResult<Json<SongView>> {
    let Json(input) = payload?;
    let mut song = state.store.get(&id).await?.ok_or_else(|| not_found(&id))?;
    song.apply_edit(input, time::now())?;

    let updated = state
        .store
        .update(&id, &song)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(to_presentation(updated)))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SongView>> {
    let deleted = state.store.delete(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(Json(to_presentation(deleted)))
}

/// POST /api/songs/:id/rate
pub async fn rate_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<Json<SongView>> {
    let Json(request) = payload?;
    let rating = Rating::new(request.rating)?;
    let rated = state
        .store
        .rate(&id, rating, time::now())
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(to_presentation(rated)))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs", get(list_songs).post(create_song))
        .route(
            "/api/songs/:id",
            get(get_song).put(update_song).delete(delete_song),
        )
        .route("/api/songs/:id/rate", post(rate_song))
}
