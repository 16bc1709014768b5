//! Clip model error types.

use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("Select at least one clip")]
    EmptySelection,

    #[error("Clip index {index} is out of range for {len} clips")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Font size must be a positive whole number, got {0:?}")]
    InvalidFontSize(String),

    #[error("Unknown layout {0:?} (expected \"landscape\" or \"shorts\")")]
    UnknownLayout(String),
}
