//! Rotation of RGBA rasters onto their rotated bounding box.
//!
//! Quarter turns are exact pixel permutations. Any other angle uses inverse
//! mapping with bilinear interpolation: for each output pixel we find the
//! source position it came from and blend the four nearest source pixels.
//! Positions outside the source are transparent.
//!
//! Rotation is clockwise, matching how the editor shows the canvas on
//! screen. For a source of size `s` and output of size `d`:
//! ```text
//! src = s.center + R(-θ) · (dst - d.center)
//! ```

use image::{imageops, Rgba, RgbaImage};

use crate::geometry::{Point, Rotation, Size};
use crate::mapper;

/// Pixel dimensions of `width` x `height` rotated by `rotation`.
///
/// # Example
///
/// ```ignore
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, Rotation::new(90)), (50, 100));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    if rotation.is_axis_aligned() {
        return if rotation.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        };
    }
    mapper::rotated_bounds(Size::from_pixels(width, height), rotation).to_pixels()
}

/// Rotate `image` about its center onto a canvas sized to its rotated bounds.
pub fn apply_rotation(image: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation.degrees() {
        0 => image.clone(),
        90 => imageops::rotate90(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate270(image),
        _ => rotate_bilinear(image, rotation),
    }
}

fn rotate_bilinear(image: &RgbaImage, rotation: Rotation) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = compute_rotated_bounds(src_w, src_h, rotation);
    let src_size = Size::from_pixels(src_w, src_h);
    let dst_center = Size::from_pixels(dst_w, dst_h).center();
    let inverse = rotation.inverse();

    RgbaImage::from_fn(dst_w, dst_h, |x, y| {
        let relative = Point::new(x as f64 + 0.5, y as f64 + 0.5).sub(dst_center);
        let src = src_size
            .center()
            .add(mapper::rotate_vector(relative, inverse));
        // Back from pixel-center to pixel-index coordinates.
        sample_bilinear(image, src.x - 0.5, src.y - 0.5)
    })
}

/// Premultiplied fetch; out-of-bounds taps are transparent.
#[inline]
fn tap(image: &RgbaImage, x: i64, y: i64) -> [f64; 4] {
    let (w, h) = image.dimensions();
    if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
        return [0.0; 4];
    }
    let p = image.get_pixel(x as u32, y as u32);
    let a = p[3] as f64 / 255.0;
    [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, p[3] as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Color is interpolated premultiplied so transparent neighbours do not
/// darken edges.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    if x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64 {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = tap(image, x0, y0);
    let p10 = tap(image, x0 + 1, y0);
    let p01 = tap(image, x0, y0 + 1);
    let p11 = tap(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = acc[3];
    if alpha < 0.5 {
        return Rgba([0, 0, 0, 0]);
    }
    let unpremultiply = 255.0 / alpha;
    Rgba([
        (acc[0] * unpremultiply).round().clamp(0.0, 255.0) as u8,
        (acc[1] * unpremultiply).round().clamp(0.0, 255.0) as u8,
        (acc[2] * unpremultiply).round().clamp(0.0, 255.0) as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ])
}


// ============================================================================
// Property-Based Tests
// ============================================================================
