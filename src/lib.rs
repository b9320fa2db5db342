//! Flea Buster - a flea-swatting arcade simulation
//!
//! Core modules:
//! - `sim`: Field simulation (placement, evasion, weapons)
//! - `game`: Session orchestration and score keeping
//! - `spawner`: Background periodic flea spawner
//! - `highscores`: Persistent high score store
//! - `settings`: Data-driven configuration

pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod spawner;

pub use game::{Game, RoundSummary, SessionState, SharedField};
pub use highscores::{FileScoreStore, MemoryScoreStore, ScoreStore, ScoreStoreError};
pub use settings::{Settings, SettingsError};
pub use spawner::{Spawner, SpawnerConfig};

/// Game configuration constants
pub mod consts {
    /// Default field dimensions
    pub const FIELD_WIDTH: i32 = 800;
    pub const FIELD_HEIGHT: i32 = 600;

    /// Flea box sizes (square)
    pub const NORMAL_FLEA_SIZE: i32 = 40;
    pub const MUTANT_FLEA_SIZE: i32 = 50;

    /// Random placement attempts before giving up (spawn and jump)
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Pointer distance (center to pointer) that triggers evasion
    pub const EVADE_RADIUS: f32 = 100.0;
    /// Distance moved per evasion step
    pub const EVADE_STEP: f32 = 5.0;

    /// Spawner timing (milliseconds)
    pub const NORMAL_SPAWN_INTERVAL_MS: u64 = 5_000;
    pub const MUTANT_SPAWN_INTERVAL_MS: u64 = 10_000;
    pub const SPAWNER_POLL_MS: u64 = 100;

    /// Driver refresh period (50 Hz)
    pub const TICK_MS: u64 = 20;
}
