//! Crop region editing.
//!
//! While crop mode is active the editor owns a [`CropState`]: a rectangle in
//! canvas-local coordinates and the handle currently being dragged. Every
//! pointer move recomputes the region from the dragged handle, then clamps
//! it so it stays inside the display canvas and never shrinks below the
//! minimum size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Default minimum crop width and height, in display pixels.
pub const MIN_CROP_SIZE: f64 = 30.0;

/// Rectangle in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Which part of the crop rectangle the pointer is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropHandle {
    Move,
    Nw,
    Ne,
    Sw,
    Se,
}

impl CropHandle {
    pub fn as_str(self) -> &'static str {
        match self {
            CropHandle::Move => "move",
            CropHandle::Nw => "nw",
            CropHandle::Ne => "ne",
            CropHandle::Sw => "sw",
            CropHandle::Se => "se",
        }
    }
}

impl fmt::Display for CropHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(CropHandle::Move),
            "nw" => Ok(CropHandle::Nw),
            "ne" => Ok(CropHandle::Ne),
            "sw" => Ok(CropHandle::Sw),
            "se" => Ok(CropHandle::Se),
            other => Err(format!("unknown crop handle: {other}")),
        }
    }
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region inset from every edge of `bounds` by `fraction` of its size.
    pub fn inset(bounds: Size, fraction: f64) -> Self {
        Self::new(
            bounds.width * fraction,
            bounds.height * fraction,
            bounds.width * (1.0 - 2.0 * fraction),
            bounds.height * (1.0 - 2.0 * fraction),
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Handle under `p`: a corner within `tolerance`, otherwise the body.
    pub fn handle_at(&self, p: Point, tolerance: f64) -> Option<CropHandle> {
        let corners = [
            (CropHandle::Nw, Point::new(self.x, self.y)),
            (CropHandle::Ne, Point::new(self.right(), self.y)),
            (CropHandle::Sw, Point::new(self.x, self.bottom())),
            (CropHandle::Se, Point::new(self.right(), self.bottom())),
        ];
        corners
            .into_iter()
            .find(|(_, corner)| corner.distance(p) <= tolerance)
            .map(|(handle, _)| handle)
            .or_else(|| self.contains(p).then_some(CropHandle::Move))
    }

    /// True when the region lies inside `bounds` and respects `min_size`
    /// (up to floating-point slack).
    pub fn is_within(&self, bounds: Size, min_size: f64) -> bool {
        const EPS: f64 = 1e-9;
        let (min_w, min_h) = effective_min(bounds, min_size);
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width + EPS
            && self.bottom() <= bounds.height + EPS
            && self.width >= min_w - EPS
            && self.height >= min_h - EPS
    }

    /// Move `handle` to follow `p`, then clamp into `bounds`.
    ///
    /// The opposite edge(s) of a corner handle stay fixed. Clamping runs
    /// after the handle update, x/width first and then y/height.
    pub fn dragged(&self, handle: CropHandle, p: Point, bounds: Size, min_size: f64) -> Self {
        let (min_w, min_h) = effective_min(bounds, min_size);
        let r = *self;
        let mut next = r;

        match handle {
            CropHandle::Move => {
                let center = r.center();
                next.x = clamp(r.x + (p.x - center.x), 0.0, bounds.width - r.width);
                next.y = clamp(r.y + (p.y - center.y), 0.0, bounds.height - r.height);
            }
            CropHandle::Nw => {
                next.x = clamp(p.x, 0.0, r.right() - min_w);
                next.y = clamp(p.y, 0.0, r.bottom() - min_h);
                next.width = (r.right() - next.x).max(min_w);
                next.height = (r.bottom() - next.y).max(min_h);
            }
            CropHandle::Ne => {
                next.x = clamp(r.x, 0.0, p.x - min_w);
                next.y = clamp(p.y, 0.0, r.bottom() - min_h);
                next.width = (p.x - next.x).max(min_w);
                next.height = (r.bottom() - next.y).max(min_h);
            }
            CropHandle::Sw => {
                next.x = clamp(p.x, 0.0, r.right() - min_w);
                next.y = clamp(r.y, 0.0, p.y - min_h);
                next.width = (r.right() - next.x).max(min_w);
                next.height = (p.y - next.y).max(min_h);
            }
            CropHandle::Se => {
                next.width = (p.x - r.x).max(min_w);
                next.height = (p.y - r.y).max(min_h);
            }
        }

        next.x = clamp(next.x, 0.0, bounds.width - min_w);
        next.width = next.width.min(bounds.width - next.x);
        next.y = clamp(next.y, 0.0, bounds.height - min_h);
        next.height = next.height.min(bounds.height - next.y);
        next
    }

    /// Re-express a canvas-local point relative to this region after it has
    /// been cropped out and re-fitted to `new_display`.
    pub fn reproject(&self, p: Point, new_display: Size) -> Point {
        let (sx, sy) = self.size().scale_to(new_display);
        p.sub(self.origin()).scale(sx, sy)
    }
}

/// `max(lo, min(v, hi))`: the lower bound wins when the range is empty.
fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

/// The minimum crop size can never exceed the canvas itself.
fn effective_min(bounds: Size, min_size: f64) -> (f64, f64) {
    (min_size.min(bounds.width), min_size.min(bounds.height))
}

/// Live state of crop mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    region: CropRegion,
    handle: Option<CropHandle>,
    bounds: Size,
    min_size: f64,
}

impl CropState {
    /// Enter crop mode on a canvas of `bounds`, seeding a region inset by
    /// `inset` on every side.
    pub fn new(bounds: Size, inset: f64, min_size: f64) -> Self {
        let seeded = CropRegion::inset(bounds, inset);
        // Re-clamp so tiny canvases still start from a valid region.
        let corner = Point::new(seeded.right(), seeded.bottom());
        let region = seeded.dragged(CropHandle::Se, corner, bounds, min_size);
        Self {
            region,
            handle: None,
            bounds,
            min_size,
        }
    }

    pub fn region(&self) -> CropRegion {
        self.region
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn active_handle(&self) -> Option<CropHandle> {
        self.handle
    }

    pub fn begin_drag(&mut self, handle: CropHandle) {
        tracing::debug!(%handle, "crop drag started");
        self.handle = Some(handle);
    }

    /// Update the region for a canvas-local pointer position.
    ///
    /// Returns `false` when no handle is held or the position is not finite.
    pub fn drag_to(&mut self, p: Point) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        if !p.is_finite() {
            return false;
        }
        self.region = self.region.dragged(handle, p, self.bounds, self.min_size);
        true
    }

    pub fn end_drag(&mut self) {
        self.handle = None;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle_strategy() -> impl Strategy<Value = CropHandle> {
        prop_oneof![
            Just(CropHandle::Move),
            Just(CropHandle::Nw),
            Just(CropHandle::Ne),
            Just(CropHandle::Sw),
            Just(CropHandle::Se),
        ]
    }

    fn drag_strategy() -> impl Strategy<Value = Vec<(CropHandle, f64, f64)>> {
        prop::collection::vec(
            (handle_strategy(), -500.0f64..=1500.0, -500.0f64..=1000.0),
            1..40,
        )
    }

    proptest! {
        /// Property: any sequence of handle drags keeps the region valid.
        #[test]
        fn prop_region_stays_valid(
            w in 30.0f64..=800.0,
            h in 30.0f64..=600.0,
            drags in drag_strategy(),
        ) {
            let bounds = Size::new(w, h);
            let mut s = CropState::new(bounds, 0.1, MIN_CROP_SIZE);
            prop_assert!(s.region().is_within(bounds, MIN_CROP_SIZE));

            for (handle, x, y) in drags {
                s.begin_drag(handle);
                s.drag_to(Point::new(x, y));
                let r = s.region();
                prop_assert!(
                    r.is_within(bounds, MIN_CROP_SIZE),
                    "{:?} escaped {:?} after {:?} to ({}, {})", r, bounds, handle, x, y
                );
            }
        }

        /// Property: moving never changes the region size.
        #[test]
        fn prop_move_preserves_size(
            x in -500.0f64..=1500.0,
            y in -500.0f64..=1000.0,
        ) {
            let bounds = Size::new(800.0, 400.0);
            let mut s = CropState::new(bounds, 0.1, MIN_CROP_SIZE);
            let before = s.region().size();
            s.begin_drag(CropHandle::Move);
            s.drag_to(Point::new(x, y));
            prop_assert_eq!(s.region().size(), before);
        }
    }
}
