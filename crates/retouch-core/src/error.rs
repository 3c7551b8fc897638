//! Crate-level error type.

use thiserror::Error;

use crate::color::ColorParseError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors surfaced by [`crate::Editor`] operations.
///
/// Missing preconditions (no image, no crop region, blank text) are not
/// errors; those operations report `false` or `None` instead.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("Invalid editor configuration: {0}")]
    InvalidConfig(String),

    #[error("Font error: {0}")]
    Font(String),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
