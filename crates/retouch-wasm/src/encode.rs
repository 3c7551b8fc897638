//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png } from '@retouch/wasm';
//!
//! const png = encode_png(imageData.data, imageData.width, imageData.height);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{js_error, JsDecodedImage};
use retouch_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Errors
///
/// Throws if the pixel data length doesn't match width * height * 4 or a
/// dimension is zero.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(js_error)
}

/// Encode a JsDecodedImage to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode::encode_png(&pixels, image.width(), image.height()).map_err(js_error)
}

/// Tests for encode bindings.
///
/// Note: Most encode tests use functions that return `Result<T, JsValue>`, which
/// only work on wasm32 targets. For comprehensive encode testing, see the tests
/// in `retouch_core::encode` which test the underlying functionality.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_from_image_pixels() {
        let img = JsDecodedImage::new(10, 10, vec![128u8; 10 * 10 * 4]);
        let png = retouch_core::encode::encode_png(&img.pixels(), img.width(), img.height()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png_basic() {
        let png = encode_png(&vec![128u8; 4 * 4 * 4], 4, 4).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_png_invalid_pixel_data() {
        assert!(encode_png(&vec![128u8; 12], 2, 2).is_err());
        assert!(encode_png(&[], 0, 2).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_png_from_image() {
        let img = JsDecodedImage::new(3, 3, vec![0u8; 3 * 3 * 4]);
        assert!(encode_png_from_image(&img).is_ok());
    }
}
