//! Image decoding for uploads.
//!
//! Uploaded files are decoded into straight RGBA bitmaps with EXIF
//! orientation already applied, so the editor always works on an upright
//! image whose pixel size is the document's native size.
//!
//! # Architecture
//!
//! Decoding is synchronous. In the browser the host reads the file
//! asynchronously and hands the bytes over once they are available.

mod raster;
mod types;

pub use raster::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
