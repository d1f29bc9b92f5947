//! Error types for bdf-solid

use bdf_card::CardError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolidError>;

#[derive(Error, Debug)]
pub enum SolidError {
    /// Raw input does not describe a valid element/node/property; nothing is created.
    #[error("Construction error: {0}")]
    Construction(String),

    /// Query issued before cross-referencing, or an id the mesh cannot resolve.
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Zero-area face or zero-length axis where a divisor is required.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
