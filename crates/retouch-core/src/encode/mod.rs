//! Image encoding for export.
//!
//! Exports are always written as PNG so the alpha channel survives the
//! transparent corners of non-quarter rotations.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray, opaque-ish image
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, EncodeError};
