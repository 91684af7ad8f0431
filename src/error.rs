//! Boundary errors
//!
//! The simulation itself never fails; these come from configuration and storage.

use thiserror::Error;

/// Errors raised at the crate boundary
#[derive(Debug, Error)]
pub enum Error {
    /// Tuning JSON could not be parsed
    #[error("invalid tuning JSON: {0}")]
    TuningParse(#[from] serde_json::Error),

    /// A tuning value is outside its allowed range
    #[error("tuning value `{field}` out of range: {value}")]
    TuningRange { field: &'static str, value: f32 },

    /// Best score could not be read
    #[error("failed to read best score: {0}")]
    StoreRead(String),

    /// Best score could not be written
    #[error("failed to write best score: {0}")]
    StoreWrite(String),
}

pub type Result<T> = std::result::Result<T, Error>;
