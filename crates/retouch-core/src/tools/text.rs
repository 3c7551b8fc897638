//! Text annotations and the text tool's interaction state.
//!
//! Annotations are stored in canvas-local (unrotated) coordinates; their
//! position is the top-left corner of the text box. While text mode is
//! active the layer is in exactly one of four states:
//!
//! ```text
//! Idle ──click canvas──▶ Composing ──Enter──▶ Idle (+ commit)
//!   │                        └──Escape──▶ Idle
//!   └──click annotation──▶ Selected ──pointer down──▶ Dragging ──pointer up──▶ Selected (+ commit)
//! ```
//!
//! Keeping the state in one enum makes "composing", "selected" and
//! "dragging" mutually exclusive by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::geometry::{Point, Rotation, Size};
use crate::mapper;
use crate::tools::crop::CropRegion;

/// Stable identifier of an annotation, shared by every history snapshot.
pub type AnnotationId = Uuid;

/// Smallest and largest font sizes offered by the text tool, in display pixels.
pub const FONT_SIZE_RANGE: (f64, f64) = (8.0, 72.0);

/// Font families offered by the text tool.
pub const FONT_FAMILIES: [&str; 7] = [
    "Arial",
    "Georgia",
    "Times New Roman",
    "Comic Sans MS",
    "Courier New",
    "Trebuchet MS",
    "Verdana",
];

/// Font, size and color shared by the text tool and each annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Color,
    pub font_family: String,
}

impl TextStyle {
    pub fn new(font_size: f64, color: Color, font_family: impl Into<String>) -> Self {
        Self {
            font_size,
            color,
            font_family: font_family.into(),
        }
        .clamped()
    }

    /// The same style with its font size forced into range.
    pub fn clamped(self) -> Self {
        let font_size = if self.font_size.is_finite() {
            self.font_size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)
        } else {
            FONT_SIZE_RANGE.0
        };
        Self { font_size, ..self }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            color: Color::WHITE,
            font_family: FONT_FAMILIES[0].to_string(),
        }
    }
}

/// A placed piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub id: AnnotationId,
    pub text: String,
    pub position: Point,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl TextAnnotation {
    /// Create an annotation with a fresh id. Blank text yields `None`.
    pub fn new(text: &str, position: Point, style: TextStyle) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            position,
            style,
        })
    }

    /// Move into the coordinate space of a cropped and re-fitted canvas.
    ///
    /// The position is translated by the crop origin and scaled by
    /// `new_display / region`; the font size follows the horizontal factor.
    pub fn reprojected(&self, region: &CropRegion, new_display: Size) -> Self {
        let (sx, _) = region.size().scale_to(new_display);
        let mut next = self.clone();
        next.position = region.reproject(self.position, new_display);
        next.style.font_size *= sx;
        next
    }
}

/// What the text layer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TextInteraction {
    #[default]
    Idle,
    /// A pending, unconfirmed annotation with an open input.
    Composing { at: Point, input: String },
    Selected(AnnotationId),
    /// `last` is the previous raw display-space pointer position; `start` is
    /// the annotation's position when the drag began.
    Dragging {
        id: AnnotationId,
        last: Point,
        start: Point,
    },
}

/// Live state of text mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextState {
    interaction: TextInteraction,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interaction(&self) -> &TextInteraction {
        &self.interaction
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        match self.interaction {
            TextInteraction::Selected(id) => Some(id),
            _ => None,
        }
    }

    pub fn dragging(&self) -> Option<AnnotationId> {
        match self.interaction {
            TextInteraction::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Position and current input of the pending annotation, if any.
    pub fn composing(&self) -> Option<(Point, &str)> {
        match &self.interaction {
            TextInteraction::Composing { at, input } => Some((*at, input.as_str())),
            _ => None,
        }
    }

    /// Click on empty canvas at a canvas-local point: open a new input there
    /// and drop any selection. Ignored while an input is already open.
    pub fn click_canvas(&mut self, at: Point) -> bool {
        match self.interaction {
            TextInteraction::Composing { .. } | TextInteraction::Dragging { .. } => false,
            _ if !at.is_finite() => false,
            _ => {
                self.interaction = TextInteraction::Composing {
                    at,
                    input: String::new(),
                };
                true
            }
        }
    }

    /// Replace the pending input text.
    pub fn set_input(&mut self, text: &str) -> bool {
        match &mut self.interaction {
            TextInteraction::Composing { input, .. } => {
                text.clone_into(input);
                true
            }
            _ => false,
        }
    }

    /// Confirm the pending input (`Enter`).
    ///
    /// Returns the new annotation list to commit, or `None` when nothing is
    /// being composed or the input is blank (the input stays open).
    pub fn confirm(
        &mut self,
        style: &TextStyle,
        annotations: &[TextAnnotation],
    ) -> Option<Vec<TextAnnotation>> {
        let TextInteraction::Composing { at, input } = &self.interaction else {
            return None;
        };
        let annotation = TextAnnotation::new(input, *at, style.clone())?;
        tracing::debug!(id = %annotation.id, "text annotation composed");
        self.interaction = TextInteraction::Idle;

        let mut next = annotations.to_vec();
        next.push(annotation);
        Some(next)
    }

    /// Discard the pending input (`Escape`).
    pub fn cancel(&mut self) -> bool {
        if matches!(self.interaction, TextInteraction::Composing { .. }) {
            self.interaction = TextInteraction::Idle;
            true
        } else {
            false
        }
    }

    /// Click on an annotation: select it and cancel any composition.
    ///
    /// Returns its style so the caller can load it into the tool settings.
    pub fn select(&mut self, id: AnnotationId, annotations: &[TextAnnotation]) -> Option<TextStyle> {
        if matches!(self.interaction, TextInteraction::Dragging { .. }) {
            return None;
        }
        let annotation = annotations.iter().find(|a| a.id == id)?;
        self.interaction = TextInteraction::Selected(id);
        Some(annotation.style.clone())
    }

    pub fn deselect(&mut self) {
        if matches!(self.interaction, TextInteraction::Selected(_)) {
            self.interaction = TextInteraction::Idle;
        }
    }

    /// Pointer down on an annotation. Only the selected one can be dragged.
    pub fn begin_drag(
        &mut self,
        id: AnnotationId,
        pointer: Point,
        annotations: &[TextAnnotation],
    ) -> bool {
        if self.selected() != Some(id) || !pointer.is_finite() {
            return false;
        }
        let Some(annotation) = annotations.iter().find(|a| a.id == id) else {
            return false;
        };
        self.interaction = TextInteraction::Dragging {
            id,
            last: pointer,
            start: annotation.position,
        };
        true
    }

    /// Pointer move during a drag, in raw display coordinates.
    ///
    /// The screen-space delta is rotated back into canvas-local space before
    /// it is added to the live annotation. Positions never go negative.
    pub fn drag_to(
        &mut self,
        pointer: Point,
        rotation: Rotation,
        annotations: &mut [TextAnnotation],
    ) -> bool {
        let TextInteraction::Dragging { id, last, .. } = &mut self.interaction else {
            return false;
        };
        if !pointer.is_finite() {
            return false;
        }
        let delta = mapper::delta_to_canvas_local(pointer.sub(*last), rotation);
        *last = pointer;

        let Some(annotation) = annotations.iter_mut().find(|a| a.id == *id) else {
            return false;
        };
        let moved = annotation.position.add(delta);
        annotation.position = Point::new(moved.x.max(0.0), moved.y.max(0.0));
        true
    }

    /// Pointer up. Returns the dragged id when its position changed, which
    /// the caller commits.
    pub fn end_drag(&mut self, annotations: &[TextAnnotation]) -> Option<AnnotationId> {
        let TextInteraction::Dragging { id, start, .. } = self.interaction else {
            return None;
        };
        self.interaction = TextInteraction::Selected(id);
        annotations
            .iter()
            .find(|a| a.id == id)
            .filter(|a| a.position != start)
            .map(|a| a.id)
    }

    /// Apply `style` to the selected annotation.
    pub fn restyle(
        &self,
        style: &TextStyle,
        annotations: &[TextAnnotation],
    ) -> Option<Vec<TextAnnotation>> {
        let id = self.selected()?;
        let current = annotations.iter().find(|a| a.id == id)?;
        if current.style == *style {
            return None;
        }
        Some(
            annotations
                .iter()
                .map(|a| {
                    if a.id == id {
                        TextAnnotation {
                            style: style.clone(),
                            ..a.clone()
                        }
                    } else {
                        a.clone()
                    }
                })
                .collect(),
        )
    }

    /// Remove an annotation, dropping the selection.
    pub fn delete(
        &mut self,
        id: AnnotationId,
        annotations: &[TextAnnotation],
    ) -> Option<Vec<TextAnnotation>> {
        if !annotations.iter().any(|a| a.id == id) {
            return None;
        }
        self.interaction = TextInteraction::Idle;
        Some(annotations.iter().filter(|a| a.id != id).cloned().collect())
    }
}
