//! Field simulation module
//!
//! All gameplay rules live here. Nothing in this module knows about threads,
//! timers or persistence:
//! - Seeded RNG only
//! - Stable iteration order (collection order, stable handles)
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod flea;
pub mod weapon;

pub use collision::Rect;
pub use field::Field;
pub use flea::{Flea, FleaId, FleaKind};
pub use weapon::{AttackReport, Weapon};
