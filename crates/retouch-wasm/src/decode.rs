//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@retouch/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const data = new ImageData(new Uint8ClampedArray(image.pixels()), image.width);
//! ```

use crate::types::{js_error, JsDecodedImage};
use retouch_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an uploaded image (PNG, JPEG, GIF, WebP, BMP) into RGBA pixels.
///
/// EXIF orientation is applied, so the result is upright.
///
/// # Errors
///
/// Throws if the bytes are empty, in an unsupported format, or corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Read the EXIF orientation tag (1-8) of an image file; 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_defaults_to_normal() {
        assert_eq!(image_orientation(&[]), 1);
        assert_eq!(image_orientation(b"not an image"), 1);
    }
}
