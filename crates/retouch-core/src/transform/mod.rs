//! Pixel-level transforms of the base image: cropping and rotation.
//!
//! # Coordinate System
//!
//! - Rotation angles are integer degrees, positive = clockwise on screen
//! - Crop rectangles are in native pixels; [`native_crop_rect`] converts a
//!   display-space region
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{apply_crop, native_crop_rect, PixelRect};
pub use rotation::{apply_rotation, compute_rotated_bounds};
