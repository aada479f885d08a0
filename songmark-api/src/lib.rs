//! songmark-api library interface
//!
//! Exposes the router, shared state and domain modules for the binary and
//! for integration tests.

pub mod api;
pub mod catalog;
pub mod error;
pub mod models;
pub mod seed;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::OEmbedClient;
use crate::store::SongStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Song persistence chosen at start-up
    pub store: Arc<dyn SongStore>,
    /// oEmbed client used by the import pipeline
    pub oembed: Arc<OEmbedClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn SongStore>, oembed: OEmbedClient) -> Self {
        Self {
            store,
            oembed: Arc::new(oembed),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::song_routes())
        .merge(api::import_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
