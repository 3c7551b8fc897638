//! Interactive tools and the exclusive tool mode.
//!
//! At most one tool is active at a time. The active tool owns its transient
//! interaction state (crop region, text composition) inside [`ToolMode`], so
//! leaving a mode drops that state with it.

pub mod crop;
pub mod draw;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use crop::{CropHandle, CropRegion, CropState, MIN_CROP_SIZE};
pub use draw::{Brush, DrawingOverlay, BRUSH_SIZE_RANGE};
pub use text::{
    AnnotationId, TextAnnotation, TextInteraction, TextState, TextStyle, FONT_FAMILIES,
    FONT_SIZE_RANGE,
};

/// The selectable tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Crop,
    Draw,
    Text,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Crop => "crop",
            ToolKind::Draw => "draw",
            ToolKind::Text => "text",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crop" => Ok(ToolKind::Crop),
            "draw" => Ok(ToolKind::Draw),
            "text" => Ok(ToolKind::Text),
            _ => Err(format!("unknown tool: {s}")),
        }
    }
}

/// Current tool and its live state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolMode {
    #[default]
    Idle,
    Cropping(CropState),
    Drawing,
    Texting(TextState),
}

impl ToolMode {
    pub fn kind(&self) -> Option<ToolKind> {
        match self {
            ToolMode::Idle => None,
            ToolMode::Cropping(_) => Some(ToolKind::Crop),
            ToolMode::Drawing => Some(ToolKind::Draw),
            ToolMode::Texting(_) => Some(ToolKind::Text),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ToolMode::Idle)
    }

    pub fn crop(&self) -> Option<&CropState> {
        match self {
            ToolMode::Cropping(state) => Some(state),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextState> {
        match self {
            ToolMode::Texting(state) => Some(state),
            _ => None,
        }
    }
}

/// What a pointer event landed on, as reported by the host's hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The canvas surface itself (or empty space within it).
    Canvas,
    CropHandle(CropHandle),
    Annotation(AnnotationId),
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enter" => Ok(Key::Enter),
            "Escape" | "Esc" => Ok(Key::Escape),
            _ => Err(format!("unhandled key: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_round_trip_names() {
        for kind in [ToolKind::Crop, ToolKind::Draw, ToolKind::Text] {
            assert_eq!(kind.as_str().parse::<ToolKind>().unwrap(), kind);
        }
        assert!("brush".parse::<ToolKind>().is_err());
    }

    #[test]
    fn test_mode_kind() {
        assert_eq!(ToolMode::Idle.kind(), None);
        assert_eq!(ToolMode::Drawing.kind(), Some(ToolKind::Draw));
        assert_eq!(
            ToolMode::Texting(TextState::new()).kind(),
            Some(ToolKind::Text)
        );
        assert!(ToolMode::default().is_idle());
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("Enter".parse::<Key>().unwrap(), Key::Enter);
        assert_eq!("Escape".parse::<Key>().unwrap(), Key::Escape);
        assert!("a".parse::<Key>().is_err());
    }
}
