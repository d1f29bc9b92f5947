//! Error types for bdf-card

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardError>;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{card} field {index}: expected {expected}, found {found}")]
    Field {
        card: String,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("field {index}: '{value}' does not fit in 8 columns")]
    Width { index: usize, value: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
