//! HTTP API handlers
//!
//! Bodies use the presentation convention (`refUrls`, `lastSungAt`, `singCount`).

pub mod catalog;
pub mod health;
pub mod import;
pub mod songs;

pub use catalog::catalog_routes;
pub use health::health_routes;
pub use import::import_routes;
pub use songs::song_routes;
