//! Layout-to-world conversion for tile quads.
//!
//! World space is centered on the viewport with y pointing up; one world unit
//! is one logical pixel (see `veil_engine::camera`).

use veil_engine::coords::{Rect, Vec2, Viewport};

/// World-space size and center of a tile.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TileBounds {
    pub size: Vec2,
    pub offset: Vec2,
}

/// Converts an element's on-screen rectangle into world-space bounds.
pub fn compute_bounds(rect: Rect, viewport: Viewport) -> TileBounds {
    let (w, h) = (rect.width(), rect.height());
    TileBounds {
        size: Vec2::new(w, h),
        offset: Vec2::new(
            rect.left() - viewport.width / 2.0 + w / 2.0,
            -rect.top() + viewport.height / 2.0 - h / 2.0,
        ),
    }
}

/// Last-known bounds of one element.
#[derive(Debug, Clone, Default)]
pub struct BoundsTracker {
    bounds: TileBounds,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> TileBounds {
        self.bounds
    }

    pub fn size(&self) -> Vec2 {
        self.bounds.size
    }

    pub fn offset(&self) -> Vec2 {
        self.bounds.offset
    }

    /// Recomputes bounds. Each component is only written when it differs from
    /// the stored value; returns whether anything changed.
    pub fn refresh(&mut self, rect: Rect, viewport: Viewport) -> bool {
        let next = compute_bounds(rect, viewport);
        let mut changed = false;

        if next.size != self.bounds.size {
            self.bounds.size = next.size;
            changed = true;
        }
        if next.offset != self.bounds.offset {
            self.bounds.offset = next.offset;
            changed = true;
        }

        changed
    }
}
