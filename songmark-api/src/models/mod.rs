//! Song data models

pub mod shape;
pub mod song;

pub use shape::{
    is_presentation_shape, is_storage_shape, to_presentation, to_presentation_batch, to_storage,
    SongShape, SongView,
};
pub use song::{average_score, format_average_score, Rating, Song, SongInput};
