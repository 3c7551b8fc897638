//! Freehand stroke overlay.
//!
//! The overlay is a transparent RGBA raster the size of the unrotated
//! display canvas. Strokes are painted straight into it as round-capped,
//! anti-aliased capsules between consecutive pointer samples. The raster is
//! not part of the undo history: resizing, clearing or navigating history
//! wipes it.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Point, Size};

/// Smallest and largest brush diameters, in display pixels.
pub const BRUSH_SIZE_RANGE: (f64, f64) = (1.0, 50.0);

/// Brush used for new stroke segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brush {
    /// Stroke diameter in display pixels (1-50).
    pub size: f64,
    pub color: Color,
}

impl Brush {
    pub fn new(size: f64, color: Color) -> Self {
        Self { size, color }.clamped()
    }

    /// The same brush with its size forced into range.
    pub fn clamped(self) -> Self {
        let size = if self.size.is_finite() {
            self.size.clamp(BRUSH_SIZE_RANGE.0, BRUSH_SIZE_RANGE.1)
        } else {
            BRUSH_SIZE_RANGE.0
        };
        Self { size, ..self }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: Color::WHITE,
        }
    }
}

/// The stroke raster plus the in-progress stroke's last sample.
#[derive(Debug, Clone)]
pub struct DrawingOverlay {
    raster: RgbaImage,
    last: Option<Point>,
    painted: bool,
}

impl DrawingOverlay {
    pub fn new(size: Size) -> Self {
        let (w, h) = size.to_pixels();
        Self {
            raster: RgbaImage::new(w, h),
            last: None,
            painted: false,
        }
    }

    /// Reallocate for a new display size. Existing strokes are discarded.
    pub fn resize(&mut self, size: Size) {
        *self = Self::new(size);
    }

    /// Wipe all strokes, keeping the size.
    pub fn clear(&mut self) {
        if self.painted {
            self.raster.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
        }
        self.last = None;
        self.painted = false;
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// True when nothing has been painted since the last clear.
    pub fn is_blank(&self) -> bool {
        !self.painted
    }

    pub fn is_stroking(&self) -> bool {
        self.last.is_some()
    }

    /// Start a stroke at a canvas-local point. Nothing is painted yet.
    pub fn begin_stroke(&mut self, p: Point) {
        if p.is_finite() {
            self.last = Some(p);
        }
    }

    /// Paint a segment from the previous sample to `p`.
    ///
    /// Returns `false` if no stroke is in progress.
    pub fn extend_stroke(&mut self, p: Point, brush: &Brush) -> bool {
        let Some(from) = self.last else {
            return false;
        };
        if !p.is_finite() {
            return false;
        }
        paint_segment(&mut self.raster, from, p, brush);
        self.painted = true;
        self.last = Some(p);
        true
    }

    pub fn end_stroke(&mut self) {
        self.last = None;
    }
}

/// Paint a round-capped capsule from `a` to `b`, blending source-over.
fn paint_segment(raster: &mut RgbaImage, a: Point, b: Point, brush: &Brush) {
    let radius = brush.size / 2.0;
    let (w, h) = raster.dimensions();
    let reach = radius + 1.0;

    let min_x = (a.x.min(b.x) - reach).floor().max(0.0) as u32;
    let min_y = (a.y.min(b.y) - reach).floor().max(0.0) as u32;
    let max_x = (a.x.max(b.x) + reach).ceil().min(w as f64) as u32;
    let max_y = (a.y.max(b.y) + reach).ceil().min(h as f64) as u32;

    for py in min_y..max_y {
        for px in min_x..max_x {
            let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
            let coverage = (radius + 0.5 - distance_to_segment(center, a, b)).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_over(raster.get_pixel_mut(px, py), brush.color, coverage as f32);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b.sub(a);
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let ap = p.sub(a);
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a.offset(ab.x * t, ab.y * t))
}

/// Source-over compositing of `color` at `coverage` onto a straight-alpha pixel.
pub(crate) fn blend_over(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let sa = color.a as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let src = [color.r, color.g, color.b];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> DrawingOverlay {
        DrawingOverlay::new(Size::new(100.0, 50.0))
    }

    #[test]
    fn test_new_overlay_is_transparent() {
        let o = overlay();
        assert_eq!(o.dimensions(), (100, 50));
        assert!(o.is_blank());
        assert!(o.raster().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_pointer_down_alone_paints_nothing() {
        let mut o = overlay();
        o.begin_stroke(Point::new(10.0, 10.0));
        o.end_stroke();
        assert!(o.is_blank());
    }

    #[test]
    fn test_segment_paints_along_path() {
        let mut o = overlay();
        let brush = Brush::new(4.0, Color::rgb(255, 0, 0));
        o.begin_stroke(Point::new(10.0, 10.5));
        assert!(o.extend_stroke(Point::new(60.0, 10.5), &brush));

        assert_eq!(o.raster().get_pixel(30, 10).0, [255, 0, 0, 255]);
        // Round cap reaches a radius past the end point.
        assert_eq!(o.raster().get_pixel(61, 10).0[3], 255);
        // Far from the path stays clear.
        assert_eq!(o.raster().get_pixel(30, 40).0[3], 0);
        assert!(!o.is_blank());
    }

    #[test]
    fn test_move_without_stroke_is_ignored() {
        let mut o = overlay();
        assert!(!o.extend_stroke(Point::new(5.0, 5.0), &Brush::default()));
        assert!(o.is_blank());
    }

    #[test]
    fn test_end_stroke_breaks_path() {
        let mut o = overlay();
        let brush = Brush::default();
        o.begin_stroke(Point::new(10.0, 10.0));
        o.extend_stroke(Point::new(20.0, 10.0), &brush);
        o.end_stroke();
        assert!(!o.is_stroking());
        assert!(!o.extend_stroke(Point::new(90.0, 40.0), &brush));
    }

    #[test]
    fn test_clear_and_resize_wipe_strokes() {
        let mut o = overlay();
        o.begin_stroke(Point::new(10.0, 10.0));
        o.extend_stroke(Point::new(20.0, 20.0), &Brush::default());
        o.clear();
        assert!(o.is_blank());
        assert!(o.raster().pixels().all(|p| p[3] == 0));

        o.begin_stroke(Point::new(10.0, 10.0));
        o.extend_stroke(Point::new(20.0, 20.0), &Brush::default());
        o.resize(Size::new(30.0, 30.0));
        assert_eq!(o.dimensions(), (30, 30));
        assert!(o.is_blank());
    }

    #[test]
    fn test_strokes_outside_canvas_are_clipped() {
        let mut o = overlay();
        o.begin_stroke(Point::new(-50.0, -50.0));
        o.extend_stroke(Point::new(-40.0, -40.0), &Brush::default());
        assert!(o.raster().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_brush_size_clamped() {
        assert_eq!(Brush::new(0.0, Color::WHITE).size, 1.0);
        assert_eq!(Brush::new(80.0, Color::WHITE).size, 50.0);
        assert_eq!(Brush::new(f64::NAN, Color::WHITE).size, 1.0);
    }

    #[test]
    fn test_blend_over_transparent_destination() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_over(&mut px, Color::rgb(10, 20, 30), 0.5);
        assert_eq!(px.0, [10, 20, 30, 128]);
    }
}
