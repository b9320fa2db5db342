//! Flea entities and their combat transition

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Stable handle issued by the field when a flea is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleaId(pub u32);

/// Flea variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleaKind {
    /// Dies on the first hit
    Normal,
    /// Degrades to a normal flea on the first hit
    Mutant,
}

impl FleaKind {
    /// Box size for this variant
    pub fn size(&self) -> IVec2 {
        match self {
            FleaKind::Normal => IVec2::splat(NORMAL_FLEA_SIZE),
            FleaKind::Mutant => IVec2::splat(MUTANT_FLEA_SIZE),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FleaKind::Normal => "normal",
            FleaKind::Mutant => "mutant",
        }
    }
}

/// A flea on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flea {
    pub id: FleaId,
    pub kind: FleaKind,
    /// Top-left corner
    pub pos: IVec2,
}

impl Flea {
    /// Build a flea at `pos`. Bounds and collisions are the field's job.
    pub fn spawn_at(id: FleaId, pos: IVec2, kind: FleaKind) -> Self {
        Self { id, kind, pos }
    }

    pub fn size(&self) -> IVec2 {
        self.kind.size()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }

    pub fn overlaps(&self, other: &Flea) -> bool {
        self.rect().overlaps(&other.rect())
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        self.rect().contains_point(point)
    }

    /// Step away from the pointer if it is within reach.
    ///
    /// Moves `EVADE_STEP` along the unit vector from the pointer to the flea
    /// center, clamped so the box stays inside `[0, bounds.x] x [0, bounds.y]`.
    /// Other fleas are ignored here, so evasion can leave two boxes overlapping.
    /// Returns true if the position changed.
    pub fn evade(&mut self, pointer: IVec2, bounds: IVec2) -> bool {
        let away = self.rect().center() - pointer.as_vec2();
        if away.length() >= EVADE_RADIUS {
            return false;
        }

        // Pointer dead center: no direction to flee in
        let dir = away.normalize_or_zero();
        if dir == Vec2::ZERO {
            return false;
        }

        let step = (dir * EVADE_STEP).round().as_ivec2();
        let max = (bounds - self.size()).max(IVec2::ZERO);
        let next = (self.pos + step).clamp(IVec2::ZERO, max);

        let moved = next != self.pos;
        self.pos = next;
        moved
    }

    /// Apply one weapon hit. `None` means the flea died.
    pub fn impact(self) -> Option<Flea> {
        match self.kind {
            FleaKind::Normal => None,
            FleaKind::Mutant => Some(Flea::spawn_at(self.id, self.pos, FleaKind::Normal)),
        }
    }
}
