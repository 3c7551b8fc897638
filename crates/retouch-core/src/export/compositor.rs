//! Flattening the document into one native-resolution raster.
//!
//! Layers are composed in the unrotated native frame and the result is
//! rotated once at the end:
//!
//! 1. the base bitmap,
//! 2. the stroke overlay, resized from display to native size,
//! 3. each text annotation, with position and font size scaled by
//!    `native / display`,
//! 4. rotation onto the rotated bounding box.
//!
//! Composing before rotating keeps every layer in the same frame, so
//! strokes and text stay registered with the image for any rotation and
//! any aspect ratio.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::decode::DecodeError;
use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::export::text::{TextRenderer, TextRun};
use crate::geometry::Size;
use crate::transform::apply_rotation;

/// Compose `document` and the optional stroke `overlay` (sized to `display`).
///
/// # Arguments
///
/// * `document` - Committed image, rotation and annotations
/// * `overlay` - Stroke raster in display pixels, or `None` when blank
/// * `display` - Size of the unrotated display canvas the edits were made on
/// * `renderer` - Text rasterizer
///
/// # Returns
///
/// The flattened raster, sized to the native size rotated by the document
/// rotation.
///
/// # Errors
///
/// `EditorError::Font` if any annotation cannot be drawn. Partial exports
/// are never returned.
pub fn compose(
    document: &Document,
    overlay: Option<&RgbaImage>,
    display: Size,
    renderer: &dyn TextRenderer,
) -> Result<RgbaImage> {
    let image = &document.image;
    let mut canvas = image
        .to_rgba_image()
        .ok_or(DecodeError::InvalidPixelData {
            expected: image.width as usize * image.height as usize * 4,
            actual: image.pixels.len(),
        })?;
    let (native_w, native_h) = canvas.dimensions();
    let (sx, sy) = display.scale_to(document.native_size());

    if let Some(overlay) = overlay {
        if overlay.dimensions() == (native_w, native_h) {
            imageops::overlay(&mut canvas, overlay, 0, 0);
        } else {
            let scaled = imageops::resize(overlay, native_w, native_h, FilterType::Triangle);
            imageops::overlay(&mut canvas, &scaled, 0, 0);
        }
    }

    for annotation in &document.text_annotations {
        let run = TextRun {
            text: &annotation.text,
            font_family: &annotation.style.font_family,
            font_size: annotation.style.font_size * sx,
            color: annotation.style.color,
            origin: annotation.position.scale(sx, sy),
        };
        if !renderer.draw(&mut canvas, &run) {
            tracing::warn!(
                id = %annotation.id,
                family = %annotation.style.font_family,
                "no font available for annotation"
            );
            return Err(EditorError::Font(format!(
                "no font registered for '{}' (annotation {})",
                annotation.style.font_family, annotation.id
            )));
        }
    }

    let output = apply_rotation(&canvas, document.rotation);
    tracing::info!(
        width = output.width(),
        height = output.height(),
        rotation = document.rotation.degrees(),
        annotations = document.text_annotations.len(),
        "export composed"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use image::Rgba;

    use super::*;
    use crate::color::Color;
    use crate::decode::DecodedImage;
    use crate::geometry::{Point, Rotation};
    use crate::tools::{TextAnnotation, TextStyle};

    /// Fills a `font_size`-square box at the run origin and records the runs.
    #[derive(Default)]
    struct BoxRenderer {
        runs: RefCell<Vec<(Point, f64)>>,
    }

    impl TextRenderer for BoxRenderer {
        fn draw(&self, target: &mut RgbaImage, run: &TextRun<'_>) -> bool {
            self.runs.borrow_mut().push((run.origin, run.font_size));
            let x0 = run.origin.x as u32;
            let y0 = run.origin.y as u32;
            let side = run.font_size as u32;
            for y in y0..(y0 + side).min(target.height()) {
                for x in x0..(x0 + side).min(target.width()) {
                    target.put_pixel(x, y, Rgba(run.color.to_array()));
                }
            }
            true
        }
    }

    struct NoFonts;

    impl TextRenderer for NoFonts {
        fn draw(&self, _: &mut RgbaImage, _: &TextRun<'_>) -> bool {
            false
        }
    }

    fn document(width: u32, height: u32) -> Document {
        Document::new(DecodedImage::filled(width, height, [0, 0, 255, 255]))
    }

    fn annotation(x: f64, y: f64, size: f64) -> TextAnnotation {
        TextAnnotation::new("t", Point::new(x, y), TextStyle::new(size, Color::rgb(255, 0, 0), "Arial"))
            .unwrap()
    }

    #[test]
    fn test_plain_image_passes_through() {
        let doc = document(10, 6);
        let out = compose(&doc, None, Size::new(10.0, 6.0), &NoFonts).unwrap();
        assert_eq!(out.dimensions(), (10, 6));
        assert!(out.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn test_rotation_swaps_output_size() {
        let doc = document(1000, 500).with_rotation(Rotation::new(90));
        let out = compose(&doc, None, Size::new(800.0, 400.0), &NoFonts).unwrap();
        assert_eq!(out.dimensions(), (500, 1000));
    }

    #[test]
    fn test_overlay_scaled_to_native() {
        let doc = document(200, 100);
        let mut overlay = RgbaImage::new(100, 50);
        for y in 0..25 {
            for x in 0..50 {
                overlay.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }

        let out = compose(&doc, Some(&overlay), Size::new(100.0, 50.0), &NoFonts).unwrap();
        assert_eq!(out.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(190, 90).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_text_scaled_by_native_over_display() {
        let doc = document(1000, 500).with_annotations(vec![annotation(100.0, 50.0, 20.0)]);
        let renderer = BoxRenderer::default();

        let out = compose(&doc, None, Size::new(800.0, 400.0), &renderer).unwrap();

        let runs = renderer.runs.borrow();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, Point::new(125.0, 62.5));
        assert_eq!(runs[0].1, 25.0);
        assert_eq!(out.get_pixel(130, 70).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_layers_rotate_with_image() {
        // Mark the native top-left corner with text; after a quarter turn it
        // must sit in the top-right corner of the output.
        let doc = document(40, 20)
            .with_annotations(vec![annotation(0.0, 0.0, 8.0)])
            .with_rotation(Rotation::new(90));
        let out = compose(&doc, None, Size::new(40.0, 20.0), &BoxRenderer::default()).unwrap();

        assert_eq!(out.dimensions(), (20, 40));
        assert_eq!(out.get_pixel(19, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_annotation_order_is_paint_order() {
        let mut top = annotation(0.0, 0.0, 10.0);
        top.style.color = Color::rgb(0, 255, 0);
        let doc = document(20, 20).with_annotations(vec![annotation(0.0, 0.0, 10.0), top]);

        let out = compose(&doc, None, Size::new(20.0, 20.0), &BoxRenderer::default()).unwrap();
        assert_eq!(out.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_undrawable_annotation_fails_export() {
        let doc = document(10, 10).with_annotations(vec![annotation(1.0, 1.0, 8.0)]);
        let err = compose(&doc, None, Size::new(10.0, 10.0), &NoFonts).unwrap_err();
        match err {
            EditorError::Font(message) => {
                assert!(message.contains("Arial"), "{message}");
                assert!(message.contains(&doc.text_annotations[0].id.to_string()));
            }
            other => panic!("expected font error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_annotations_need_no_fonts() {
        let doc = document(10, 10).with_rotation(Rotation::new(180));
        assert!(compose(&doc, None, Size::new(10.0, 10.0), &NoFonts).is_ok());
    }

    #[test]
    fn test_export_is_deterministic() {
        let doc = document(64, 48)
            .with_annotations(vec![annotation(3.0, 4.0, 12.0)])
            .with_rotation(Rotation::new(270));
        let mut overlay = RgbaImage::new(32, 24);
        overlay.put_pixel(5, 5, Rgba([9, 9, 9, 200]));
        let renderer = BoxRenderer::default();

        let a = compose(&doc, Some(&overlay), Size::new(32.0, 24.0), &renderer).unwrap();
        let b = compose(&doc, Some(&overlay), Size::new(32.0, 24.0), &renderer).unwrap();
        assert_eq!(a, b);
    }
}
