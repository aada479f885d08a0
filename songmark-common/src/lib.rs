//! # SongMark Common Library
//!
//! Shared code for the SongMark service crates:
//! - Error and result types
//! - Bootstrap configuration loading and root folder resolution
//! - Database initialization for the `songs` table
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
