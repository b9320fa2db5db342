//! Weapons: single-target gun and the area missile

use glam::IVec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::flea::{Flea, FleaId};

/// Weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    /// Hits the first flea (in collection order) whose box contains the point
    Point,
    /// Hits a random half of the field (at least one flea); ignores the point
    Area,
}

/// What a single attack did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackReport {
    /// Fleas hit, by pre-attack handle, in hit order
    pub hits: Vec<FleaId>,
    /// Fleas that died
    pub kills: u32,
}

impl Weapon {
    /// Resolve an attack and return the kill count
    pub fn attack<R: Rng + ?Sized>(&self, fleas: &mut Vec<Flea>, target: IVec2, rng: &mut R) -> u32 {
        self.resolve(fleas, target, rng).kills
    }

    /// Resolve an attack and report every flea it hit
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        fleas: &mut Vec<Flea>,
        target: IVec2,
        rng: &mut R,
    ) -> AttackReport {
        let mut report = AttackReport::default();
        match self {
            Weapon::Point => {
                if let Some(index) = fleas.iter().position(|f| f.contains_point(target)) {
                    impact_at(fleas, index, &mut report);
                }
            }
            Weapon::Area => {
                if fleas.is_empty() {
                    return report;
                }
                let target_count = (fleas.len() / 2).max(1);

                // Shuffle handles, not fleas, so each pick is re-found by id
                let mut order: Vec<FleaId> = fleas.iter().map(|f| f.id).collect();
                order.shuffle(rng);

                for id in order.into_iter().take(target_count) {
                    let Some(index) = fleas.iter().position(|f| f.id == id) else {
                        continue;
                    };
                    impact_at(fleas, index, &mut report);
                }
            }
        }
        report
    }
}

/// Hit the flea at `index`: remove it if it dies, swap in the degraded form otherwise
fn impact_at(fleas: &mut Vec<Flea>, index: usize, report: &mut AttackReport) {
    let flea = fleas[index];
    report.hits.push(flea.id);
    match flea.impact() {
        None => {
            fleas.remove(index);
            report.kills += 1;
        }
        Some(degraded) => fleas[index] = degraded,
    }
}
