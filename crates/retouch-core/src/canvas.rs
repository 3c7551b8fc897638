//! Canvas-mode presets and display-canvas sizing.
//!
//! The display canvas is the on-screen (unrotated) surface the tools work
//! on. Its size is derived from the image's native size, the selected
//! aspect-ratio preset and a maximum display envelope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Aspect-ratio preset the image is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CanvasMode {
    /// Keep the image's own aspect ratio.
    #[default]
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "9:16")]
    Portrait,
}

impl CanvasMode {
    pub const ALL: [CanvasMode; 5] = [
        CanvasMode::Free,
        CanvasMode::Square,
        CanvasMode::Widescreen,
        CanvasMode::Standard,
        CanvasMode::Portrait,
    ];

    /// Target width / height, or `None` for free mode.
    pub fn aspect_ratio(self) -> Option<f64> {
        match self {
            CanvasMode::Free => None,
            CanvasMode::Square => Some(1.0),
            CanvasMode::Widescreen => Some(16.0 / 9.0),
            CanvasMode::Standard => Some(4.0 / 3.0),
            CanvasMode::Portrait => Some(9.0 / 16.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasMode::Free => "free",
            CanvasMode::Square => "1:1",
            CanvasMode::Widescreen => "16:9",
            CanvasMode::Standard => "4:3",
            CanvasMode::Portrait => "9:16",
        }
    }
}

impl fmt::Display for CanvasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CanvasMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanvasMode::ALL
            .into_iter()
            .find(|mode| mode.label() == s)
            .ok_or_else(|| format!("unknown canvas mode: {s}"))
    }
}

/// Compute the display canvas size for an image.
///
/// With a fixed ratio the short side is stretched until the box has that
/// ratio. The result is then bounded by `max` (width first, then height),
/// preserving the ratio reached so far.
pub fn display_size(native: Size, mode: CanvasMode, max: Size) -> Size {
    let mut width = native.width;
    let mut height = native.height;

    if let Some(target) = mode.aspect_ratio() {
        if native.aspect_ratio() > target {
            height = native.width / target;
        } else {
            width = native.height * target;
        }
    }

    if width > max.width {
        height *= max.width / width;
        width = max.width;
    }
    if height > max.height {
        width *= max.height / height;
        height = max.height;
    }

    Size::new(width, height)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the display canvas always fits the envelope.
        #[test]
        fn prop_fits_envelope(
            w in 1.0f64..=8000.0,
            h in 1.0f64..=8000.0,
            mode_idx in 0usize..5,
        ) {
            let size = display_size(Size::new(w, h), CanvasMode::ALL[mode_idx], ENVELOPE);
            prop_assert!(size.width <= 800.0 + 1e-9);
            prop_assert!(size.height <= 600.0 + 1e-9);
        }

        /// Property: free mode preserves the image aspect ratio.
        #[test]
        fn prop_free_preserves_ratio(w in 1.0f64..=8000.0, h in 1.0f64..=8000.0) {
            let size = display_size(Size::new(w, h), CanvasMode::Free, ENVELOPE);
            prop_assert!((size.aspect_ratio() - w / h).abs() / (w / h) < 1e-9);
        }
    }

    const ENVELOPE: Size = Size {
        width: 800.0,
        height: 600.0,
    };
}
