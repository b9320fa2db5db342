//! The bounded field that owns every flea
//!
//! Placement (spawn and jump) is rejection sampling bounded by
//! `MAX_PLACEMENT_ATTEMPTS`; running out of attempts is a normal outcome,
//! not an error.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::flea::{Flea, FleaId, FleaKind};
use super::weapon::Weapon;
use crate::consts::*;

/// Field state: fleas in insertion order, last pointer, seeded RNG
#[derive(Debug, Clone)]
pub struct Field {
    size: IVec2,
    fleas: Vec<Flea>,
    pointer: Option<IVec2>,
    rng: Pcg32,
    next_id: u32,
}

impl Field {
    /// Create an empty field with the given seed
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self {
            size: IVec2::new(width, height),
            fleas: Vec::new(),
            pointer: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    fn next_flea_id(&mut self) -> FleaId {
        let id = FleaId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Uniform top-left corner over `[0, W-w) x [0, H-h)`, or `None` if the
    /// box cannot fit at all.
    fn random_position(&mut self, size: IVec2) -> Option<IVec2> {
        let span = self.size - size;
        if span.x <= 0 || span.y <= 0 {
            return None;
        }
        Some(IVec2::new(
            self.rng.random_range(0..span.x),
            self.rng.random_range(0..span.y),
        ))
    }

    fn is_free(&self, rect: &Rect, skip: Option<usize>) -> bool {
        self.fleas
            .iter()
            .enumerate()
            .all(|(i, other)| Some(i) == skip || !rect.overlaps(&other.rect()))
    }

    /// Place a flea of `kind` at a random free spot.
    ///
    /// Returns false, leaving the field untouched, when no free spot was
    /// found within the attempt limit.
    pub fn try_spawn(&mut self, kind: FleaKind) -> bool {
        let size = kind.size();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let Some(pos) = self.random_position(size) else {
                break;
            };
            if self.is_free(&Rect::new(pos, size), None) {
                let id = self.next_flea_id();
                self.fleas.push(Flea::spawn_at(id, pos, kind));
                log::debug!("Spawned {} flea {:?} at {}", kind.as_str(), id, pos);
                return true;
            }
        }
        log::debug!("No room for a {} flea ({} on field)", kind.as_str(), self.fleas.len());
        false
    }

    /// Place a flea at an exact position if it fits and collides with nothing
    pub fn add(&mut self, kind: FleaKind, pos: IVec2) -> Option<FleaId> {
        let rect = Rect::new(pos, kind.size());
        if !rect.fits_within(self.size) || !self.is_free(&rect, None) {
            return None;
        }
        let id = self.next_flea_id();
        self.fleas.push(Flea::spawn_at(id, pos, kind));
        Some(id)
    }

    /// Move every flea to a new random free spot.
    ///
    /// Fleas are processed in collection order and each one checks against
    /// the current positions of all others, including ones already moved.
    /// A flea that finds no spot stays where it was. Returns how many moved.
    pub fn jump_all(&mut self) -> usize {
        let mut moved = 0;
        for i in 0..self.fleas.len() {
            let size = self.fleas[i].size();
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let Some(pos) = self.random_position(size) else {
                    break;
                };
                if self.is_free(&Rect::new(pos, size), Some(i)) {
                    self.fleas[i].pos = pos;
                    moved += 1;
                    break;
                }
            }
        }
        if moved < self.fleas.len() {
            log::debug!("Jump: {} of {} fleas stayed put", self.fleas.len() - moved, self.fleas.len());
        }
        moved
    }

    /// Record the latest pointer position for evasion
    pub fn update_pointer(&mut self, x: i32, y: i32) {
        self.pointer = Some(IVec2::new(x, y));
    }

    pub fn pointer(&self) -> Option<IVec2> {
        self.pointer
    }

    /// Run one evasion pass against the stored pointer.
    ///
    /// Overlaps created by evasion are left as they are. Returns how many
    /// fleas moved.
    pub fn tick(&mut self) -> usize {
        let Some(pointer) = self.pointer else {
            return 0;
        };
        let bounds = self.size;
        self.fleas
            .iter_mut()
            .map(|flea| flea.evade(pointer, bounds))
            .filter(|&moved| moved)
            .count()
    }

    /// Resolve one weapon attack; returns the kill count
    pub fn attack(&mut self, weapon: Weapon, x: i32, y: i32) -> u32 {
        weapon.attack(&mut self.fleas, IVec2::new(x, y), &mut self.rng)
    }

    pub fn get(&self, id: FleaId) -> Option<&Flea> {
        self.fleas.iter().find(|f| f.id == id)
    }

    /// Remove a flea by handle, keeping the order of the rest
    pub fn remove(&mut self, id: FleaId) -> Option<Flea> {
        let index = self.fleas.iter().position(|f| f.id == id)?;
        Some(self.fleas.remove(index))
    }

    pub fn clear(&mut self) {
        self.fleas.clear();
    }

    pub fn count(&self) -> usize {
        self.fleas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fleas.is_empty()
    }

    pub fn fleas(&self) -> &[Flea] {
        &self.fleas
    }

    /// Owned copy of the current fleas, for rendering off the lock
    pub fn snapshot(&self) -> Vec<Flea> {
        self.fleas.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_no_overlaps(field: &Field) {
        let fleas = field.fleas();
        for (i, a) in fleas.iter().enumerate() {
            for b in &fleas[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_spawn_places_in_bounds() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 7);
        assert!(field.try_spawn(FleaKind::Normal));
        assert!(field.try_spawn(FleaKind::Mutant));
        assert_eq!(field.count(), 2);
        for flea in field.fleas() {
            assert!(flea.rect().fits_within(field.size()));
        }
        assert_no_overlaps(&field);
    }

    #[test]
    fn test_spawn_ids_are_unique() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 7);
        for _ in 0..10 {
            field.try_spawn(FleaKind::Normal);
        }
        let mut ids: Vec<_> = field.fleas().iter().map(|f| f.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), field.count());
    }

    #[test]
    fn test_spawn_fails_when_full() {
        // Only (0, 0) is a legal corner for a normal flea
        let mut field = Field::new(41, 41, 1);
        assert!(field.try_spawn(FleaKind::Normal));
        assert!(!field.try_spawn(FleaKind::Normal));
        assert_eq!(field.count(), 1);
    }

    #[test]
    fn test_spawn_fails_when_box_cannot_fit() {
        let mut field = Field::new(50, 50, 1);
        assert!(!field.try_spawn(FleaKind::Mutant));
        assert!(field.is_empty());
    }

    #[test]
    fn test_same_seed_same_placements() {
        let mut a = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 99);
        let mut b = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 99);
        for _ in 0..5 {
            a.try_spawn(FleaKind::Normal);
            b.try_spawn(FleaKind::Normal);
        }
        a.jump_all();
        b.jump_all();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_add_rejects_overlap_and_out_of_bounds() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 1);
        assert!(field.add(FleaKind::Normal, IVec2::new(10, 10)).is_some());
        assert!(field.add(FleaKind::Normal, IVec2::new(30, 30)).is_none());
        assert!(field.add(FleaKind::Normal, IVec2::new(50, 10)).is_some());
        assert!(field.add(FleaKind::Mutant, IVec2::new(760, 0)).is_none());
        assert_eq!(field.count(), 2);
    }

    #[test]
    fn test_jump_keeps_position_when_packed() {
        // Four normals tile an 80x80 field; the only free corner for each
        // flea is the one it already has.
        let mut field = Field::new(80, 80, 3);
        let corners = [(0, 0), (40, 0), (0, 40), (40, 40)];
        for (x, y) in corners {
            field.add(FleaKind::Normal, IVec2::new(x, y)).expect("corner is free");
        }
        let before = field.snapshot();
        field.jump_all();
        assert_eq!(field.snapshot(), before);
    }

    #[test]
    fn test_tick_without_pointer_is_noop() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 1);
        field.add(FleaKind::Normal, IVec2::new(100, 100));
        assert_eq!(field.tick(), 0);
        assert_eq!(field.fleas()[0].pos, IVec2::new(100, 100));
    }

    #[test]
    fn test_tick_evades_stored_pointer() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 1);
        field.add(FleaKind::Normal, IVec2::new(100, 100));
        field.add(FleaKind::Normal, IVec2::new(600, 400));
        field.update_pointer(90, 120);
        assert_eq!(field.tick(), 1);
        assert_eq!(field.fleas()[0].pos, IVec2::new(105, 100));
        assert_eq!(field.fleas()[1].pos, IVec2::new(600, 400));
    }

    #[test]
    fn test_evasion_may_leave_overlaps() {
        // Pointer left of both: the left flea steps right into its neighbour
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 1);
        field.add(FleaKind::Normal, IVec2::new(100, 100));
        field.add(FleaKind::Normal, IVec2::new(140, 100));
        field.update_pointer(60, 120);
        field.tick();
        assert!(field.fleas()[0].overlaps(&field.fleas()[1]));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut field = Field::new(FIELD_WIDTH, FIELD_HEIGHT, 1);
        let a = field.add(FleaKind::Normal, IVec2::new(0, 0)).expect("free");
        let b = field.add(FleaKind::Mutant, IVec2::new(100, 0)).expect("free");
        assert_eq!(field.remove(a).map(|f| f.id), Some(a));
        assert!(field.remove(a).is_none());
        assert_eq!(field.count(), 1);
        assert!(field.get(b).is_some());
        field.clear();
        assert!(field.is_empty());
    }

    proptest! {
        #[test]
        fn prop_spawned_fleas_fit_and_never_overlap(
            seed in any::<u64>(),
            width in 60i32..400,
            height in 60i32..400,
            kinds in proptest::collection::vec(any::<bool>(), 1..40),
        ) {
            let mut field = Field::new(width, height, seed);
            for mutant in kinds {
                let kind = if mutant { FleaKind::Mutant } else { FleaKind::Normal };
                let before = field.count();
                let placed = field.try_spawn(kind);
                prop_assert_eq!(field.count(), before + placed as usize);
            }
            for (i, a) in field.fleas().iter().enumerate() {
                prop_assert!(a.rect().fits_within(field.size()));
                for b in &field.fleas()[i + 1..] {
                    prop_assert!(!a.overlaps(b));
                }
            }
        }

        #[test]
        fn prop_jump_keeps_fleas_in_bounds_and_apart(
            seed in any::<u64>(),
            spawns in 1usize..30,
        ) {
            let mut field = Field::new(300, 300, seed);
            for _ in 0..spawns {
                field.try_spawn(FleaKind::Normal);
            }
            let count = field.count();
            field.jump_all();
            prop_assert_eq!(field.count(), count);
            // Start from a non-overlapping layout; each commit keeps it so
            for (i, a) in field.fleas().iter().enumerate() {
                prop_assert!(a.rect().fits_within(field.size()));
                for b in &field.fleas()[i + 1..] {
                    prop_assert!(!a.overlaps(b));
                }
            }
        }
    }
}
