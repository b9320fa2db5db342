//! Axis-aligned box geometry
//!
//! Two hit policies live side by side here and are deliberately different:
//! box/box overlap is strict (touching edges never collide), while the
//! point test is inclusive of every edge, far edges included.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Integer axis-aligned box in field-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height (both positive)
    pub size: IVec2,
}

impl Rect {
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    /// Far corner (exclusive for overlap, inclusive for point hits)
    #[inline]
    pub fn max(&self) -> IVec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos.as_vec2() + self.size.as_vec2() * 0.5
    }

    /// Strict overlap test; shared edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && a_max.x > other.pos.x && self.pos.y < b_max.y && a_max.y > other.pos.y
    }

    /// Inclusive point test over `[x, x+w] x [y, y+h]`
    pub fn contains_point(&self, point: IVec2) -> bool {
        let max = self.max();
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// True if the whole box lies inside `[0, bounds.x] x [0, bounds.y]`
    pub fn fits_within(&self, bounds: IVec2) -> bool {
        let max = self.max();
        self.pos.x >= 0 && self.pos.y >= 0 && max.x <= bounds.x && max.y <= bounds.y
    }
}
