//! The editor state machine.
//!
//! [`Editor`] is the single owner of everything that changes while a user
//! edits: the live [`Document`], its [`History`], the canvas mode, the active
//! tool and the stroke overlay. Hosts feed it pointer and keyboard events in
//! display coordinates (relative to the rotated layout box); the editor maps
//! them into canvas-local space once and routes them to the active tool.
//!
//! Committing operations (upload, rotate, reset, crop, text edits) push a
//! whole-document snapshot to the history. Strokes are never committed:
//! history navigation, rotation and any change of the display canvas wipe
//! the overlay.

use std::sync::Arc;

use image::RgbaImage;

use crate::canvas::{self, CanvasMode};
use crate::color::Color;
use crate::config::EditorConfig;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::document::Document;
use crate::encode::encode_png;
use crate::error::Result;
use crate::export::{compose, FontBook, TextRenderer};
use crate::geometry::{Point, Rotation, Size};
use crate::history::History;
use crate::mapper;
use crate::tools::{
    AnnotationId, Brush, CropRegion, CropState, DrawingOverlay, Key, PointerTarget, TextState,
    TextStyle, ToolKind, ToolMode,
};
use crate::transform::{apply_crop, native_crop_rect};

/// Distance in canvas-local pixels within which a pointer grabs a crop corner.
pub const HANDLE_TOLERANCE: f64 = 8.0;

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    /// Live state; equal to the history's current entry except during a
    /// text drag.
    document: Option<Document>,
    history: History,
    canvas_mode: CanvasMode,
    mode: ToolMode,
    overlay: DrawingOverlay,
    brush: Brush,
    text_style: TextStyle,
    fonts: FontBook,
}

impl Default for Editor {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor after validating `config`.
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EditorConfig) -> Self {
        let overlay = DrawingOverlay::new(config.empty_canvas_size);
        let history = History::new(config.history_limit);
        let brush = config.brush.clamped();
        let text_style = config.text_style.clone().clamped();
        Self {
            config,
            document: None,
            history,
            canvas_mode: CanvasMode::default(),
            mode: ToolMode::Idle,
            overlay,
            brush,
            text_style,
            fonts: FontBook::new(),
        }
    }

    // ------------------------------------------------------------------
    // State queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.document.is_some()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> &ToolMode {
        &self.mode
    }

    pub fn canvas_mode(&self) -> CanvasMode {
        self.canvas_mode
    }

    pub fn overlay(&self) -> &DrawingOverlay {
        &self.overlay
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn rotation(&self) -> Rotation {
        self.document
            .as_ref()
            .map_or(Rotation::NONE, |doc| doc.rotation)
    }

    /// Size of the unrotated display canvas.
    pub fn display_size(&self) -> Size {
        match &self.document {
            Some(doc) => canvas::display_size(
                doc.native_size(),
                self.canvas_mode,
                self.config.max_display_size,
            ),
            None => self.config.empty_canvas_size,
        }
    }

    /// Size of the box the rotated display canvas occupies on screen.
    pub fn layout_size(&self) -> Size {
        mapper::rotated_bounds(self.display_size(), self.rotation())
    }

    pub fn to_canvas_local(&self, display: Point) -> Point {
        mapper::to_canvas_local(display, self.rotation(), self.display_size())
    }

    pub fn to_display(&self, local: Point) -> Point {
        mapper::to_display(local, self.rotation(), self.display_size())
    }

    pub fn crop_region(&self) -> Option<CropRegion> {
        self.mode.crop().map(CropState::region)
    }

    pub fn selected_annotation(&self) -> Option<AnnotationId> {
        self.mode.text().and_then(TextState::selected)
    }

    /// Position and text of the pending text input, if one is open.
    pub fn composing(&self) -> Option<(Point, &str)> {
        self.mode.text().and_then(TextState::composing)
    }

    /// Rotation the host applies to annotations so they read upright while
    /// text mode is active.
    pub fn text_counter_rotation(&self) -> Rotation {
        match self.mode {
            ToolMode::Texting(_) => self.rotation().inverse(),
            _ => Rotation::NONE,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    /// Start editing a new bitmap. Rotation and annotations reset, and the
    /// upload is committed after whatever history already exists.
    ///
    /// A bitmap with no pixels is rejected and leaves the editor unchanged.
    pub fn load_image(&mut self, image: DecodedImage) -> Result<()> {
        if image.is_empty() {
            tracing::warn!(width = image.width, height = image.height, "empty image rejected");
            return Err(DecodeError::Empty.into());
        }
        tracing::info!(width = image.width, height = image.height, "image loaded");
        self.mode = ToolMode::Idle;
        self.commit(Document::new(image));
        self.refit_overlay();
        Ok(())
    }

    /// Decode uploaded file bytes and load the result.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let image = decode_image(bytes)
            .inspect_err(|e| tracing::warn!(error = %e, "image decode failed"))?;
        self.load_image(image)
    }

    /// Drop the image, history and every tool state.
    pub fn clear_document(&mut self) {
        self.document = None;
        self.history.clear();
        self.canvas_mode = CanvasMode::default();
        self.mode = ToolMode::Idle;
        self.refit_overlay();
        tracing::info!("document cleared");
    }

    // ------------------------------------------------------------------
    // Rotation and canvas mode
    // ------------------------------------------------------------------

    /// Rotate by the configured step.
    pub fn rotate(&mut self) -> bool {
        self.rotate_by(self.config.rotation_step)
    }

    pub fn rotate_by(&mut self, degrees: i32) -> bool {
        if self.document.is_none() {
            return false;
        }
        self.pointer_up();
        let Some(doc) = &self.document else {
            return false;
        };
        let rotation = doc.rotation.rotated_by(degrees);
        if rotation == doc.rotation {
            return false;
        }
        let next = doc.with_rotation(rotation);
        tracing::info!(rotation = next.rotation.degrees(), "rotated");

        if let ToolMode::Texting(state) = &mut self.mode {
            *state = TextState::new();
        }
        self.commit(next);
        self.overlay.clear();
        true
    }

    /// Back to rotation 0 and free canvas mode, with no tool active.
    pub fn reset(&mut self) -> bool {
        if self.document.is_none() {
            return false;
        }
        self.leave_mode();
        self.canvas_mode = CanvasMode::Free;

        if let Some(doc) = self.document.as_ref().filter(|d| d.rotation != Rotation::NONE) {
            let next = doc.with_rotation(Rotation::NONE);
            self.commit(next);
        }
        self.refit_overlay();
        tracing::info!("view reset");
        true
    }

    /// Switch the aspect-ratio preset. The display canvas changes size, so
    /// strokes are wiped and an open crop is abandoned.
    pub fn set_canvas_mode(&mut self, mode: CanvasMode) -> bool {
        if mode == self.canvas_mode {
            return false;
        }
        self.pointer_up();
        if matches!(self.mode, ToolMode::Cropping(_)) {
            self.mode = ToolMode::Idle;
        }
        self.canvas_mode = mode;
        self.refit_overlay();
        tracing::debug!(%mode, "canvas mode changed");
        true
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// Make `kind` the active tool. Requires an image.
    pub fn activate_tool(&mut self, kind: ToolKind) -> bool {
        if self.document.is_none() || self.mode.kind() == Some(kind) {
            return false;
        }
        self.leave_mode();
        self.mode = match kind {
            ToolKind::Crop => ToolMode::Cropping(CropState::new(
                self.display_size(),
                self.config.crop_inset,
                self.config.min_crop_size,
            )),
            ToolKind::Draw => ToolMode::Drawing,
            ToolKind::Text => ToolMode::Texting(TextState::new()),
        };
        tracing::debug!(tool = %kind, "tool activated");
        true
    }

    pub fn toggle_tool(&mut self, kind: ToolKind) -> bool {
        if self.mode.kind() == Some(kind) {
            self.deactivate_tool()
        } else {
            self.activate_tool(kind)
        }
    }

    pub fn deactivate_tool(&mut self) -> bool {
        if self.mode.is_idle() {
            return false;
        }
        self.leave_mode();
        true
    }

    /// Finish any in-flight drag, then go idle.
    fn leave_mode(&mut self) {
        self.pointer_up();
        self.mode = ToolMode::Idle;
    }

    // ------------------------------------------------------------------
    // Pointer and keyboard
    // ------------------------------------------------------------------

    /// Pointer pressed at `display` on `target`.
    ///
    /// Crop: grabs the given handle; on a bare canvas target the handle is
    /// hit-tested. Draw: starts a stroke. Text: starts dragging the selected
    /// annotation.
    pub fn pointer_down(&mut self, target: PointerTarget, display: Point) -> bool {
        let local = self.to_canvas_local(display);
        match &mut self.mode {
            ToolMode::Idle => false,
            ToolMode::Cropping(state) => {
                let handle = match target {
                    PointerTarget::CropHandle(handle) => Some(handle),
                    _ => state.region().handle_at(local, HANDLE_TOLERANCE),
                };
                match handle {
                    Some(handle) => {
                        state.begin_drag(handle);
                        true
                    }
                    None => false,
                }
            }
            ToolMode::Drawing => {
                if !local.is_finite() {
                    return false;
                }
                self.overlay.begin_stroke(local);
                true
            }
            ToolMode::Texting(state) => match (target, &self.document) {
                (PointerTarget::Annotation(id), Some(doc)) => {
                    state.begin_drag(id, display, &doc.text_annotations)
                }
                _ => false,
            },
        }
    }

    pub fn pointer_move(&mut self, display: Point) -> bool {
        let local = self.to_canvas_local(display);
        match &mut self.mode {
            ToolMode::Idle => false,
            ToolMode::Cropping(state) => state.drag_to(local),
            ToolMode::Drawing => self.overlay.extend_stroke(local, &self.brush),
            ToolMode::Texting(state) => match self.document.as_mut() {
                Some(doc) => state.drag_to(display, doc.rotation, &mut doc.text_annotations),
                None => false,
            },
        }
    }

    /// Pointer released. A text drag that moved its annotation is committed.
    pub fn pointer_up(&mut self) -> bool {
        let moved = match &mut self.mode {
            ToolMode::Idle => return false,
            ToolMode::Cropping(state) => {
                let held = state.active_handle().is_some();
                state.end_drag();
                return held;
            }
            ToolMode::Drawing => {
                let stroking = self.overlay.is_stroking();
                self.overlay.end_stroke();
                return stroking;
            }
            ToolMode::Texting(state) => {
                let Some(doc) = &self.document else {
                    return false;
                };
                if state.dragging().is_none() {
                    return false;
                }
                state.end_drag(&doc.text_annotations)
            }
        };

        if let (Some(id), Some(doc)) = (moved, self.document.clone()) {
            tracing::info!(%id, "annotation moved");
            self.commit(doc);
        }
        true
    }

    /// A click in text mode: select an annotation, or open a text input on
    /// empty canvas.
    pub fn click(&mut self, target: PointerTarget, display: Point) -> bool {
        let local = self.to_canvas_local(display);
        let ToolMode::Texting(state) = &mut self.mode else {
            return false;
        };
        match (target, &self.document) {
            (PointerTarget::Annotation(id), Some(doc)) => {
                match state.select(id, &doc.text_annotations) {
                    Some(style) => {
                        self.text_style = style;
                        true
                    }
                    None => false,
                }
            }
            (PointerTarget::Annotation(_), None) => false,
            _ => state.click_canvas(local),
        }
    }

    /// Replace the text of the pending input.
    pub fn set_composing_text(&mut self, text: &str) -> bool {
        match &mut self.mode {
            ToolMode::Texting(state) => state.set_input(text),
            _ => false,
        }
    }

    /// `Enter` confirms the pending text; `Escape` discards it.
    pub fn key(&mut self, key: Key) -> bool {
        let ToolMode::Texting(state) = &mut self.mode else {
            return false;
        };
        match key {
            Key::Escape => state.cancel(),
            Key::Enter => {
                let Some(doc) = &self.document else {
                    return false;
                };
                let Some(list) = state.confirm(&self.text_style, &doc.text_annotations) else {
                    return false;
                };
                let next = doc.with_annotations(list);
                tracing::info!(annotations = next.text_annotations.len(), "text added");
                self.commit(next);
                true
            }
        }
    }

    // ------------------------------------------------------------------
    // Tool settings and edits
    // ------------------------------------------------------------------

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush.clamped();
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.set_brush(Brush { size, ..self.brush });
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.set_brush(Brush { color, ..self.brush });
    }

    /// Update the text tool style. If an annotation is selected it takes the
    /// new style too, which is committed; the return value reports that.
    pub fn set_text_style(&mut self, style: TextStyle) -> bool {
        self.text_style = style.clamped();
        let (Some(state), Some(doc)) = (self.mode.text(), &self.document) else {
            return false;
        };
        let Some(list) = state.restyle(&self.text_style, &doc.text_annotations) else {
            return false;
        };
        let next = doc.with_annotations(list);
        tracing::info!("annotation restyled");
        self.commit(next);
        true
    }

    pub fn set_font_size(&mut self, font_size: f64) -> bool {
        self.set_text_style(TextStyle {
            font_size,
            ..self.text_style.clone()
        })
    }

    pub fn set_text_color(&mut self, color: Color) -> bool {
        self.set_text_style(TextStyle {
            color,
            ..self.text_style.clone()
        })
    }

    pub fn set_font_family(&mut self, font_family: &str) -> bool {
        self.set_text_style(TextStyle {
            font_family: font_family.to_string(),
            ..self.text_style.clone()
        })
    }

    /// Remove an annotation and commit.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        let Some(doc) = &self.document else {
            return false;
        };
        let list = match &mut self.mode {
            ToolMode::Texting(state) => state.delete(id, &doc.text_annotations),
            _ => TextState::new().delete(id, &doc.text_annotations),
        };
        let Some(list) = list else {
            return false;
        };
        let next = doc.with_annotations(list);
        tracing::info!(%id, "annotation deleted");
        self.commit(next);
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected_annotation() {
            Some(id) => self.delete_annotation(id),
            None => false,
        }
    }

    /// Wipe all strokes. Not an undoable edit.
    pub fn clear_drawing(&mut self) -> bool {
        if self.overlay.is_blank() {
            return false;
        }
        self.overlay.clear();
        true
    }

    // ------------------------------------------------------------------
    // Crop
    // ------------------------------------------------------------------

    /// Cut the image down to the crop region and commit.
    ///
    /// The region is scaled to native pixels per axis. Annotations are
    /// moved into the new display space so they stay over the same content.
    pub fn apply_crop(&mut self) -> bool {
        let (Some(doc), ToolMode::Cropping(state)) = (&self.document, &self.mode) else {
            return false;
        };
        let region = state.region();
        let (native_w, native_h) = doc.native_dimensions();
        let rect = native_crop_rect(&region, state.bounds(), native_w, native_h);
        let cropped = apply_crop(&doc.image, rect);

        let new_display = canvas::display_size(
            Size::from_pixels(cropped.width, cropped.height),
            self.canvas_mode,
            self.config.max_display_size,
        );
        let text_annotations = doc
            .text_annotations
            .iter()
            .map(|a| a.reprojected(&region, new_display))
            .collect();

        tracing::info!(
            width = cropped.width,
            height = cropped.height,
            "crop applied"
        );
        let next = Document {
            image: Arc::new(cropped),
            rotation: doc.rotation,
            text_annotations,
        };
        self.mode = ToolMode::Idle;
        self.commit(next);
        self.refit_overlay();
        true
    }

    pub fn cancel_crop(&mut self) -> bool {
        if !matches!(self.mode, ToolMode::Cropping(_)) {
            return false;
        }
        self.mode = ToolMode::Idle;
        tracing::debug!("crop cancelled");
        true
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(doc) => {
                self.restore(doc);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(doc) => {
                self.restore(doc);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, doc: Document) {
        self.document = Some(doc);
        self.mode = ToolMode::Idle;
        self.refit_overlay();
    }

    fn commit(&mut self, document: Document) {
        self.history.commit(document.clone());
        self.document = Some(document);
    }

    fn refit_overlay(&mut self) {
        self.overlay.resize(self.display_size());
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Flatten the current state with the registered fonts. `None` without
    /// an image; `EditorError::Font` if an annotation has no usable font.
    pub fn export(&self) -> Result<Option<RgbaImage>> {
        self.export_with(&self.fonts)
    }

    pub fn export_with(&self, renderer: &dyn TextRenderer) -> Result<Option<RgbaImage>> {
        let Some(doc) = &self.document else {
            return Ok(None);
        };
        let overlay = (!self.overlay.is_blank()).then(|| self.overlay.raster());
        compose(doc, overlay, self.display_size(), renderer)
            .map(Some)
            .inspect_err(|e| tracing::warn!(error = %e, "export failed"))
    }

    /// Export encoded as PNG.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>> {
        let Some(raster) = self.export()? else {
            return Ok(None);
        };
        let (width, height) = raster.dimensions();
        let bytes = encode_png(raster.as_raw(), width, height)
            .inspect_err(|e| tracing::warn!(error = %e, "export encoding failed"))?;
        Ok(Some(bytes))
    }
}
