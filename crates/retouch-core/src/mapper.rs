//! Display ↔ canvas-local coordinate mapping.
//!
//! The display canvas is laid out inside a box sized to its rotated bounding
//! box and visually rotated about its center. Pointer positions arrive
//! relative to the top-left of that layout box; every tool works in the
//! unrotated canvas-local frame. All conversions between the two go through
//! this module.
//!
//! # Algorithm
//!
//! For a rotation θ (clockwise on screen), a canvas of size `c` and its
//! layout box `b = rotated_bounds(c, θ)`:
//!
//! ```text
//! local   = c.center + R(-θ) · (display - b.center)
//! display = b.center + R(θ)  · (local   - c.center)
//! ```

use crate::geometry::{Point, Rotation, Size};

/// Size of the axis-aligned box that contains `size` rotated by `rotation`.
///
/// Quarter turns swap the axes exactly; other angles use
/// `|w·cos| + |h·sin|` by `|w·sin| + |h·cos|`.
pub fn rotated_bounds(size: Size, rotation: Rotation) -> Size {
    if rotation.is_axis_aligned() {
        return if rotation.swaps_axes() {
            size.swapped()
        } else {
            size
        };
    }

    let (sin, cos) = rotation.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Size::new(
        size.width * cos + size.height * sin,
        size.width * sin + size.height * cos,
    )
}

/// Rotate a vector by `rotation` (clockwise on screen).
pub fn rotate_vector(v: Point, rotation: Rotation) -> Point {
    let (sin, cos) = rotation.sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Map a pointer position in display space to canvas-local space.
///
/// `canvas` is the unrotated display canvas size. Pure and exact for any
/// rotation, not just quarter turns.
pub fn to_canvas_local(display: Point, rotation: Rotation, canvas: Size) -> Point {
    let layout = rotated_bounds(canvas, rotation);
    let relative = display.sub(layout.center());
    canvas
        .center()
        .add(rotate_vector(relative, rotation.inverse()))
}

/// Map a canvas-local point to where it appears in display space.
pub fn to_display(local: Point, rotation: Rotation, canvas: Size) -> Point {
    let layout = rotated_bounds(canvas, rotation);
    let relative = local.sub(canvas.center());
    layout.center().add(rotate_vector(relative, rotation))
}

/// Convert a pointer displacement measured on screen into a canvas-local
/// displacement.
pub fn delta_to_canvas_local(delta: Point, rotation: Rotation) -> Point {
    rotate_vector(delta, rotation.inverse())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn canvas_strategy() -> impl Strategy<Value = Size> {
        (30.0f64..=800.0, 30.0f64..=600.0).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: mapping to display and back returns the original point.
        #[test]
        fn prop_round_trip(
            canvas in canvas_strategy(),
            degrees in -720i32..=720,
            x in -100.0f64..=900.0,
            y in -100.0f64..=700.0,
        ) {
            let r = Rotation::new(degrees);
            let p = Point::new(x, y);
            let back = to_canvas_local(to_display(p, r, canvas), r, canvas);
            prop_assert!((back.x - p.x).abs() < 1e-6, "x: {} vs {}", back.x, p.x);
            prop_assert!((back.y - p.y).abs() < 1e-6, "y: {} vs {}", back.y, p.y);
        }

        /// Property: the canvas center always maps to the layout center.
        #[test]
        fn prop_center_is_fixed(canvas in canvas_strategy(), degrees in 0i32..360) {
            let r = Rotation::new(degrees);
            let c = to_display(canvas.center(), r, canvas);
            let layout = rotated_bounds(canvas, r).center();
            prop_assert!((c.x - layout.x).abs() < 1e-9);
            prop_assert!((c.y - layout.y).abs() < 1e-9);
        }

        /// Property: rotating a delta preserves its length.
        #[test]
        fn prop_delta_preserves_length(
            degrees in 0i32..360,
            dx in -500.0f64..=500.0,
            dy in -500.0f64..=500.0,
        ) {
            let d = Point::new(dx, dy);
            let mapped = delta_to_canvas_local(d, Rotation::new(degrees));
            prop_assert!((mapped.distance(Point::ORIGIN) - d.distance(Point::ORIGIN)).abs() < 1e-9);
        }

        /// Property: mapping is deterministic for a fixed input.
        #[test]
        fn prop_mapping_is_pure(
            canvas in canvas_strategy(),
            degrees in 0i32..360,
            x in 0.0f64..=800.0,
            y in 0.0f64..=600.0,
        ) {
            let r = Rotation::new(degrees);
            let p = Point::new(x, y);
            prop_assert_eq!(to_canvas_local(p, r, canvas), to_canvas_local(p, r, canvas));
        }
    }
}
