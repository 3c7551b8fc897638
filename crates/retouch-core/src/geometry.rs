//! Plane geometry primitives shared by every tool.
//!
//! Coordinates are `f64` with the origin at the top-left corner and the y
//! axis pointing down, matching the browser's layout space. Rotations are
//! whole degrees measured clockwise on screen.

use serde::{Deserialize, Serialize};

/// A point (or a displacement) in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `origin` to `self`.
    pub fn sub(self, origin: Point) -> Point {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn add(self, delta: Point) -> Point {
        self.offset(delta.x, delta.y)
    }

    pub fn scale(self, sx: f64, sy: f64) -> Point {
        Self::new(self.x * sx, self.y * sy)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a surface, in pixels of whatever space it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The same size with the axes exchanged.
    pub fn swapped(self) -> Size {
        Size::new(self.height, self.width)
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Round to whole pixels, never below 1x1.
    pub fn to_pixels(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }

    /// Per-axis factor that maps this size onto `target`.
    pub fn scale_to(self, target: Size) -> (f64, f64) {
        (target.width / self.width, target.height / self.height)
    }
}

/// An integer rotation in degrees, always normalized into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Rotation(i32);

impl Rotation {
    pub const NONE: Rotation = Rotation(0);

    pub fn new(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360))
    }

    pub fn degrees(self) -> i32 {
        self.0
    }

    pub fn radians(self) -> f64 {
        (self.0 as f64).to_radians()
    }

    /// Add `step` degrees, wrapping modulo 360.
    pub fn rotated_by(self, step: i32) -> Self {
        Self::new(self.0 + step.rem_euclid(360))
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Self::new(-self.0)
    }

    /// True for 90° and 270°, where width and height trade places.
    pub fn swaps_axes(self) -> bool {
        self.0 % 180 == 90
    }

    /// True for multiples of 90°.
    pub fn is_axis_aligned(self) -> bool {
        self.0 % 90 == 0
    }

    /// `(sin, cos)` of the rotation, exact for quarter turns.
    pub fn sin_cos(self) -> (f64, f64) {
        match self.0 {
            0 => (0.0, 1.0),
            90 => (1.0, 0.0),
            180 => (0.0, -1.0),
            270 => (-1.0, 0.0),
            _ => self.radians().sin_cos(),
        }
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Self::new(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_normalizes() {
        assert_eq!(Rotation::new(450).degrees(), 90);
        assert_eq!(Rotation::new(-90).degrees(), 270);
        assert_eq!(Rotation::new(720).degrees(), 0);
    }

    #[test]
    fn test_four_quarter_turns_return_home() {
        for start in [0, 45, 90, 359] {
            let start = Rotation::new(start);
            let mut r = start;
            for _ in 0..4 {
                r = r.rotated_by(90);
            }
            assert_eq!(r, start);
        }
    }

    #[test]
    fn test_swaps_axes() {
        assert!(!Rotation::new(0).swaps_axes());
        assert!(Rotation::new(90).swaps_axes());
        assert!(!Rotation::new(180).swaps_axes());
        assert!(Rotation::new(270).swaps_axes());
        assert!(!Rotation::new(45).swaps_axes());
    }

    #[test]
    fn test_quarter_turn_sin_cos_exact() {
        assert_eq!(Rotation::new(90).sin_cos(), (1.0, 0.0));
        assert_eq!(Rotation::new(270).sin_cos(), (-1.0, 0.0));
    }

    #[test]
    fn test_size_to_pixels_rounds_and_floors_at_one() {
        assert_eq!(Size::new(799.6, 0.2).to_pixels(), (800, 1));
    }

    #[test]
    fn test_rotation_serde_as_integer() {
        let r: Rotation = 450.into();
        assert_eq!(i32::from(r), 90);
    }
}
