//! Text rasterization for export.
//!
//! The compositor only knows the [`TextRenderer`] trait. [`FontBook`] is the
//! bundled implementation: the host registers font files per family name,
//! and glyphs are drawn from their outlines with `ab_glyph`.

use std::collections::HashMap;
use std::fmt;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::RgbaImage;

use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::geometry::Point;
use crate::tools::draw::blend_over;

/// One line of text to draw, in target pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub font_family: &'a str,
    /// Em size in pixels.
    pub font_size: f64,
    pub color: Color,
    /// Top-left corner of the text box.
    pub origin: Point,
}

/// Draws text runs onto a raster.
pub trait TextRenderer {
    /// Draw `run` onto `target`. Returns `false` if the run could not be
    /// drawn (for example, no font for its family).
    fn draw(&self, target: &mut RgbaImage, run: &TextRun<'_>) -> bool;
}

/// Font files keyed by family name (case-insensitive).
#[derive(Clone, Default)]
pub struct FontBook {
    fonts: HashMap<String, FontArc>,
    fallback: Option<String>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TrueType/OpenType font for `family`.
    ///
    /// The first registered family becomes the fallback for families that
    /// have no font of their own.
    pub fn register(&mut self, family: &str, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| EditorError::Font(format!("{family}: {e}")))?;
        let key = family.to_lowercase();
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        tracing::debug!(family, "font registered");
        self.fonts.insert(key, font);
        Ok(())
    }

    /// Use an already registered family as the fallback.
    pub fn set_fallback(&mut self, family: &str) -> bool {
        let key = family.to_lowercase();
        if !self.fonts.contains_key(&key) {
            return false;
        }
        self.fallback = Some(key);
        true
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&family.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.fonts
            .get(&family.to_lowercase())
            .or_else(|| self.fallback.as_ref().and_then(|f| self.fonts.get(f)))
    }
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut families: Vec<_> = self.fonts.keys().collect();
        families.sort();
        f.debug_struct("FontBook")
            .field("families", &families)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Pixel scale whose em square is `font_size` pixels, like CSS `font-size`.
fn em_scale(font: &FontArc, font_size: f32) -> PxScale {
    let height = font.height_unscaled();
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(font_size * height / upem),
        _ => PxScale::from(font_size),
    }
}

impl TextRenderer for FontBook {
    fn draw(&self, target: &mut RgbaImage, run: &TextRun<'_>) -> bool {
        let Some(font) = self.resolve(run.font_family) else {
            return false;
        };
        if !(run.font_size.is_finite() && run.font_size > 0.0) {
            return false;
        }

        let scale = em_scale(font, run.font_size as f32);
        let scaled = font.as_scaled(scale);
        let (width, height) = target.dimensions();
        let baseline = run.origin.y as f32 + scaled.ascent();
        let mut caret = run.origin.x as f32;
        let mut prev: Option<GlyphId> = None;

        for ch in run.text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x >= 0 && y >= 0 && x < width as i64 && y < height as i64 {
                    blend_over(target.get_pixel_mut(x as u32, y as u32), run.color, coverage);
                }
            });
        }
        true
    }
}

/// DejaVu Sans, used by tests that rasterize real glyphs.
#[cfg(test)]
pub(crate) const TEST_FONT: &[u8] = include_bytes!("../../test_fixtures/DejaVuSans.ttf");
