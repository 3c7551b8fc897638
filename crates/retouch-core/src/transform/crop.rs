//! Pixel cropping of the base image.
//!
//! Crop regions are edited in display space. Applying one maps the region
//! onto the native bitmap with a per-axis `native / display` scale and
//! copies out that sub-rectangle.
//!
//! # Example
//!
//! ```ignore
//! // 1000x500 image shown at 800x400: a 320x320 display crop is 400x400 pixels
//! let rect = native_crop_rect(&region, Size::new(800.0, 400.0), 1000, 500);
//! let cropped = apply_crop(&image, rect);
//! ```

use crate::decode::DecodedImage;
use crate::geometry::Size;
use crate::tools::CropRegion;

/// An integer rectangle in native pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map a display-space crop region onto a `native_width` x `native_height`
/// bitmap shown at `display` size.
///
/// Edges are rounded to whole pixels and clamped to the bitmap. The result
/// is never smaller than 1x1.
pub fn native_crop_rect(
    region: &CropRegion,
    display: Size,
    native_width: u32,
    native_height: u32,
) -> PixelRect {
    let (sx, sy) = display.scale_to(Size::from_pixels(native_width, native_height));
    let (x, width) = scale_span(region.x, region.width, sx, native_width);
    let (y, height) = scale_span(region.y, region.height, sy, native_height);
    PixelRect {
        x,
        y,
        width,
        height,
    }
}

fn scale_span(start: f64, len: f64, scale: f64, limit: u32) -> (u32, u32) {
    let limit_f = limit as f64;
    let lo = (start * scale).round().clamp(0.0, (limit_f - 1.0).max(0.0));
    let hi = ((start + len) * scale).round().clamp(lo + 1.0, limit_f.max(1.0));
    (lo as u32, (hi - lo).max(1.0) as u32)
}

/// Copy `rect` out of `image`, clamping it to the image bounds.
///
/// # Behavior
///
/// - A rectangle covering the whole image returns a copy of the original
/// - Minimum output dimension is 1x1 pixels
pub fn apply_crop(image: &DecodedImage, rect: PixelRect) -> DecodedImage {
    let covers_all =
        rect.x == 0 && rect.y == 0 && rect.width >= image.width && rect.height >= image.height;
    if covers_all || image.is_empty() {
        return image.clone();
    }

    let left = rect.x.min(image.width.saturating_sub(1));
    let top = rect.y.min(image.height.saturating_sub(1));
    let right = left.saturating_add(rect.width).min(image.width);
    let bottom = top.saturating_add(rect.height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);
    let row_bytes = out_width as usize * 4;

    let mut output = Vec::with_capacity(row_bytes * out_height as usize);
    for y in top..top + out_height {
        let start = (y as usize * image.width as usize + left as usize) * 4;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage {
        width: out_width,
        height: out_height,
        pixels: output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        DecodedImage {
            width,
            height,
            pixels,
        }
    }

    fn rect(x: u32, y: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = apply_crop(&img, rect(0, 0, 100, 100));
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, rect(2, 2, 6, 6));

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 6);
        // Value at (2, 2) = 2 * 10 + 2
        assert_eq!(result.pixel(0, 0), Some([22, 22, 22, 255]));
        assert_eq!(result.pixel(5, 5), Some([77, 77, 77, 255]));
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, rect(8, 8, 5, 5));
        assert_eq!((result.width, result.height), (2, 2));
    }

    #[test]
    fn test_crop_outside_image_keeps_one_pixel() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, rect(50, 50, 5, 5));
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixels.len(), 4);
    }

    #[test]
    fn test_native_rect_scales_per_axis() {
        let region = CropRegion::new(40.0, 40.0, 320.0, 320.0);
        let r = native_crop_rect(&region, Size::new(800.0, 400.0), 1000, 500);
        assert_eq!(r, rect(50, 50, 400, 400));
    }

    #[test]
    fn test_native_rect_stretched_canvas() {
        // 400x200 image stretched into a 400x400 square canvas.
        let region = CropRegion::new(0.0, 200.0, 400.0, 200.0);
        let r = native_crop_rect(&region, Size::new(400.0, 400.0), 400, 200);
        assert_eq!(r, rect(0, 100, 400, 100));
    }

    #[test]
    fn test_native_rect_never_empty() {
        let region = CropRegion::new(10.0, 10.0, 0.1, 0.1);
        let r = native_crop_rect(&region, Size::new(100.0, 100.0), 10, 10);
        assert!(r.width >= 1 && r.height >= 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the native rectangle always lies inside the bitmap.
        #[test]
        fn prop_native_rect_in_bounds(
            native_w in 1u32..=4000,
            native_h in 1u32..=4000,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            fw in 0.0f64..1.0,
            fh in 0.0f64..1.0,
        ) {
            let display = Size::new(800.0, 600.0);
            let x = fx * display.width;
            let y = fy * display.height;
            let region = CropRegion::new(x, y, fw * (display.width - x), fh * (display.height - y));

            let r = native_crop_rect(&region, display, native_w, native_h);
            prop_assert!(r.width >= 1 && r.height >= 1);
            prop_assert!(r.x + r.width <= native_w);
            prop_assert!(r.y + r.height <= native_h);
        }

        /// Property: output buffer length matches output dimensions.
        #[test]
        fn prop_output_buffer_consistent(
            (w, h) in (1u32..=40, 1u32..=40),
            (x, y, cw, ch) in (0u32..=50, 0u32..=50, 0u32..=50, 0u32..=50),
        ) {
            let img = DecodedImage::filled(w, h, [1, 2, 3, 4]);
            let out = apply_crop(&img, PixelRect { x, y, width: cw, height: ch });
            prop_assert_eq!(out.pixels.len(), (out.width * out.height * 4) as usize);
            prop_assert!(out.width <= w && out.height <= h);
        }
    }
}
