//! Editor configuration.
//!
//! Every field has a default, so hosts only send what they override:
//!
//! ```json
//! { "maxDisplaySize": { "width": 1024, "height": 768 }, "historyLimit": 50 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::geometry::Size;
use crate::tools::{Brush, TextStyle, BRUSH_SIZE_RANGE, FONT_SIZE_RANGE, MIN_CROP_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Envelope the display canvas is fitted into.
    pub max_display_size: Size,
    /// Display canvas size before any image is loaded.
    pub empty_canvas_size: Size,
    pub min_crop_size: f64,
    /// Fraction of the canvas left outside the initial crop region on each side.
    pub crop_inset: f64,
    /// Degrees added per rotate action.
    pub rotation_step: i32,
    /// Maximum number of history entries; `None` keeps everything.
    pub history_limit: Option<usize>,
    pub brush: Brush,
    pub text_style: TextStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_display_size: Size::new(800.0, 600.0),
            empty_canvas_size: Size::new(384.0, 256.0),
            min_crop_size: MIN_CROP_SIZE,
            crop_inset: 0.1,
            rotation_step: 90,
            history_limit: None,
            brush: Brush::default(),
            text_style: TextStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(EditorError::InvalidConfig(msg));

        if !self.max_display_size.is_positive() {
            return invalid(format!(
                "maxDisplaySize must be positive, got {:?}",
                self.max_display_size
            ));
        }
        if !self.empty_canvas_size.is_positive() {
            return invalid(format!(
                "emptyCanvasSize must be positive, got {:?}",
                self.empty_canvas_size
            ));
        }
        if !(self.min_crop_size.is_finite() && self.min_crop_size > 0.0) {
            return invalid(format!("minCropSize must be positive, got {}", self.min_crop_size));
        }
        if !(0.0..0.5).contains(&self.crop_inset) {
            return invalid(format!("cropInset must be in [0, 0.5), got {}", self.crop_inset));
        }
        if self.rotation_step.rem_euclid(360) == 0 {
            return invalid(format!(
                "rotationStep must not be a multiple of 360, got {}",
                self.rotation_step
            ));
        }
        if self.history_limit == Some(0) {
            return invalid("historyLimit must be at least 1".to_string());
        }
        let (lo, hi) = BRUSH_SIZE_RANGE;
        if !(lo..=hi).contains(&self.brush.size) {
            return invalid(format!("brush.size must be in [{lo}, {hi}], got {}", self.brush.size));
        }
        let (lo, hi) = FONT_SIZE_RANGE;
        if !(lo..=hi).contains(&self.text_style.font_size) {
            return invalid(format!(
                "textStyle.fontSize must be in [{lo}, {hi}], got {}",
                self.text_style.font_size
            ));
        }
        Ok(())
    }
}
