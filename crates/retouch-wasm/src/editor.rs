//! Stateful editor bindings.
//!
//! [`JsEditor`] owns a [`retouch_core::Editor`] and exposes it to the UI.
//! Enumerations cross the boundary as strings (`"crop"`, `"16:9"`, `"nw"`),
//! colors as hex strings and structured state as plain JS objects.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditor } from '@retouch/wasm';
//!
//! const editor = new JsEditor();
//! editor.load_bytes(new Uint8Array(await file.arrayBuffer()));
//! editor.activate_tool('draw');
//! editor.pointer_down('canvas', e.offsetX, e.offsetY);
//! ```

use std::str::FromStr;

use retouch_core::{
    AnnotationId, CanvasMode, Color, CropHandle, Editor, EditorConfig, Key, Point, PointerTarget,
    ToolKind,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsDecodedImage};

/// Parse a hit-test result reported by the UI.
///
/// Accepts `"canvas"`, a crop handle name (`"move"`, `"nw"`, `"ne"`, `"sw"`,
/// `"se"`) or an annotation id.
pub(crate) fn parse_target(target: &str) -> Result<PointerTarget, String> {
    if target == "canvas" {
        return Ok(PointerTarget::Canvas);
    }
    if let Ok(handle) = CropHandle::from_str(target) {
        return Ok(PointerTarget::CropHandle(handle));
    }
    AnnotationId::parse_str(target)
        .map(PointerTarget::Annotation)
        .map_err(|_| format!("unknown pointer target: {target}"))
}

fn parse<T>(value: &str) -> Result<T, JsValue>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(js_error)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

/// Text composition in progress, as shown by the floating input.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Composing<'a> {
    x: f64,
    y: f64,
    input: &'a str,
}

/// The Retouch editor session.
#[wasm_bindgen]
pub struct JsEditor {
    inner: Editor,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor. `config` is an optional `EditorConfig`-shaped object;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };
        let inner = Editor::new(config).map_err(js_error)?;
        Ok(JsEditor { inner })
    }

    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    /// Decode and load an uploaded file.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_bytes(bytes).map_err(js_error)
    }

    /// Load an already-decoded image.
    pub fn load_image(&mut self, image: &JsDecodedImage) -> Result<(), JsValue> {
        let decoded = image.to_decoded().map_err(js_error)?;
        self.inner.load_image(decoded).map_err(js_error)
    }

    pub fn clear_document(&mut self) {
        self.inner.clear_document();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// The current base image, or `undefined` when the canvas is empty.
    pub fn image(&self) -> Option<JsDecodedImage> {
        self.inner
            .document()
            .map(|doc| JsDecodedImage::from_decoded(doc.image.as_ref().clone()))
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn rotate(&mut self) -> bool {
        self.inner.rotate()
    }

    pub fn rotate_by(&mut self, degrees: i32) -> bool {
        self.inner.rotate_by(degrees)
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> i32 {
        self.inner.rotation().degrees()
    }

    /// CSS rotation to apply to text inputs so they read upright while the
    /// canvas is rotated.
    #[wasm_bindgen(getter)]
    pub fn text_counter_rotation(&self) -> i32 {
        self.inner.text_counter_rotation().degrees()
    }

    /// Set the canvas aspect mode: `"free"`, `"1:1"`, `"16:9"`, `"4:3"` or `"9:16"`.
    pub fn set_canvas_mode(&mut self, mode: &str) -> Result<bool, JsValue> {
        let mode: CanvasMode = parse(mode)?;
        Ok(self.inner.set_canvas_mode(mode))
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_mode(&self) -> String {
        self.inner.canvas_mode().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> f64 {
        self.inner.display_size().width
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> f64 {
        self.inner.display_size().height
    }

    /// Width of the rotated layout box.
    #[wasm_bindgen(getter)]
    pub fn layout_width(&self) -> f64 {
        self.inner.layout_size().width
    }

    #[wasm_bindgen(getter)]
    pub fn layout_height(&self) -> f64 {
        self.inner.layout_size().height
    }

    /// Map a layout-box position to canvas-local `[x, y]`.
    pub fn to_canvas_local(&self, x: f64, y: f64) -> Vec<f64> {
        let p = self.inner.to_canvas_local(Point::new(x, y));
        vec![p.x, p.y]
    }

    /// Map a canvas-local position back to layout-box `[x, y]`.
    pub fn to_display(&self, x: f64, y: f64) -> Vec<f64> {
        let p = self.inner.to_display(Point::new(x, y));
        vec![p.x, p.y]
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// The active tool name, or `undefined` when idle.
    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> Option<String> {
        self.inner.mode().kind().map(|kind| kind.to_string())
    }

    pub fn activate_tool(&mut self, tool: &str) -> Result<bool, JsValue> {
        let kind: ToolKind = parse(tool)?;
        Ok(self.inner.activate_tool(kind))
    }

    pub fn toggle_tool(&mut self, tool: &str) -> Result<bool, JsValue> {
        let kind: ToolKind = parse(tool)?;
        Ok(self.inner.toggle_tool(kind))
    }

    pub fn deactivate_tool(&mut self) -> bool {
        self.inner.deactivate_tool()
    }

    /// `target` is what the pointer landed on; see the module docs.
    pub fn pointer_down(&mut self, target: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        let target = parse_target(target).map_err(js_error)?;
        Ok(self.inner.pointer_down(target, Point::new(x, y)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up()
    }

    pub fn click(&mut self, target: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        let target = parse_target(target).map_err(js_error)?;
        Ok(self.inner.click(target, Point::new(x, y)))
    }

    pub fn set_composing_text(&mut self, text: &str) -> bool {
        self.inner.set_composing_text(text)
    }

    /// Forward a `KeyboardEvent.key`. Keys the editor does not handle return false.
    pub fn key(&mut self, key: &str) -> bool {
        match Key::from_str(key) {
            Ok(key) => self.inner.key(key),
            Err(_) => false,
        }
    }

    /// The pending text input as `{ x, y, input }`, or `undefined`.
    pub fn composing(&self) -> Result<JsValue, JsValue> {
        match self.inner.composing() {
            Some((at, input)) => to_js(&Composing {
                x: at.x,
                y: at.y,
                input,
            }),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// The crop rectangle as `{ x, y, width, height }`, or `undefined`.
    pub fn crop_region(&self) -> Result<JsValue, JsValue> {
        match self.inner.crop_region() {
            Some(region) => to_js(&region),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn apply_crop(&mut self) -> bool {
        self.inner.apply_crop()
    }

    pub fn cancel_crop(&mut self) -> bool {
        self.inner.cancel_crop()
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// `{ size, color }` of the current brush.
    pub fn brush(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.brush())
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.inner.set_brush_size(size);
    }

    pub fn set_brush_color(&mut self, color: &str) -> Result<(), JsValue> {
        let color: Color = parse(color)?;
        self.inner.set_brush_color(color);
        Ok(())
    }

    /// RGBA pixels of the drawing overlay, sized to the display canvas.
    pub fn overlay_pixels(&self) -> Vec<u8> {
        self.inner.overlay().raster().as_raw().clone()
    }

    #[wasm_bindgen(getter)]
    pub fn overlay_width(&self) -> u32 {
        self.inner.overlay().dimensions().0
    }

    #[wasm_bindgen(getter)]
    pub fn overlay_height(&self) -> u32 {
        self.inner.overlay().dimensions().1
    }

    pub fn clear_drawing(&mut self) -> bool {
        self.inner.clear_drawing()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// All annotations of the current document as an array of
    /// `{ id, text, position, fontSize, color, fontFamily }`.
    pub fn annotations(&self) -> Result<JsValue, JsValue> {
        match self.inner.document() {
            Some(doc) => to_js(&doc.text_annotations),
            None => to_js(&[] as &[retouch_core::TextAnnotation]),
        }
    }

    /// Id of the selected annotation, or `undefined`.
    #[wasm_bindgen(getter)]
    pub fn selected_annotation(&self) -> Option<String> {
        self.inner.selected_annotation().map(|id| id.to_string())
    }

    /// `{ fontSize, color, fontFamily }` applied to new text.
    pub fn text_style(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.text_style())
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        self.inner.set_font_size(size)
    }

    pub fn set_text_color(&mut self, color: &str) -> Result<bool, JsValue> {
        let color: Color = parse(color)?;
        Ok(self.inner.set_text_color(color))
    }

    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.inner.set_font_family(family)
    }

    pub fn delete_annotation(&mut self, id: &str) -> Result<bool, JsValue> {
        let id = AnnotationId::parse_str(id).map_err(js_error)?;
        Ok(self.inner.delete_annotation(id))
    }

    pub fn delete_selected(&mut self) -> bool {
        self.inner.delete_selected()
    }

    /// Register a TrueType/OpenType font for export under a CSS family name.
    pub fn register_font(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner.fonts_mut().register(family, bytes).map_err(js_error)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Flatten all layers at native resolution and encode as PNG.
    ///
    /// Returns `undefined` when there is no image. Throws when an annotation
    /// uses a family with no registered font and no fallback exists.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner.export_png().map_err(js_error)
    }

    /// Download name for an export made now.
    pub fn export_file_name(&self) -> String {
        retouch_core::export_file_name(js_sys::Date::now() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_canvas_and_handles() {
        assert_eq!(parse_target("canvas"), Ok(PointerTarget::Canvas));
        assert_eq!(
            parse_target("nw"),
            Ok(PointerTarget::CropHandle(CropHandle::Nw))
        );
        assert_eq!(
            parse_target("move"),
            Ok(PointerTarget::CropHandle(CropHandle::Move))
        );
    }

    #[test]
    fn test_parse_target_annotation_id() {
        let id = AnnotationId::new_v4();
        assert_eq!(
            parse_target(&id.to_string()),
            Ok(PointerTarget::Annotation(id))
        );
    }

    #[test]
    fn test_parse_target_rejects_unknown() {
        let err = parse_target("handle").unwrap_err();
        assert!(err.contains("handle"));
    }
}
