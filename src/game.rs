//! Game session: score keeping, the active/inactive state machine and the
//! driver-facing API.
//!
//! The field is shared with the spawner thread behind one mutex. Every
//! operation here takes the lock for exactly one unit of work (a spawn, an
//! attack, a jump, an evasion pass) and never holds it between calls.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::highscores::ScoreStore;
use crate::settings::Settings;
use crate::sim::{Field, Flea, FleaKind, Weapon};
use crate::spawner::{Spawner, SpawnerConfig};

/// Field shared between the driver and the spawner
pub type SharedField = Arc<Mutex<Field>>;

/// Lock the field, recovering from a poisoned lock
pub(crate) fn lock_field(field: &Mutex<Field>) -> MutexGuard<'_, Field> {
    field.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Inactive,
    Active,
}

/// Result of a finished round, for the end-of-round screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u64,
    pub high_score: u64,
    /// This round beat the previous high score
    pub new_record: bool,
}

/// A game session
pub struct Game {
    field: SharedField,
    store: Box<dyn ScoreStore>,
    spawner_config: SpawnerConfig,
    spawner: Option<Spawner>,
    state: SessionState,
    score: u64,
    high_score: u64,
    last_round: Option<RoundSummary>,
}

impl Game {
    /// Create an inactive session from settings
    pub fn new(settings: &Settings, store: Box<dyn ScoreStore>) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Game initialized with seed: {}", seed);

        let field = Field::new(settings.field_width, settings.field_height, seed);
        Self::with_parts(field, store, SpawnerConfig::from_settings(settings))
    }

    /// Create an inactive session around an existing field
    pub fn with_parts(field: Field, store: Box<dyn ScoreStore>, spawner_config: SpawnerConfig) -> Self {
        let high_score = load_high_score(store.as_ref());
        Self {
            field: Arc::new(Mutex::new(field)),
            store,
            spawner_config,
            spawner: None,
            state: SessionState::Inactive,
            score: 0,
            high_score,
            last_round: None,
        }
    }

    /// Activate the session and start the spawner if it is not running
    pub fn start(&mut self) {
        if self.state == SessionState::Inactive {
            log::info!("Game started (score {}, high score {})", self.score, self.high_score);
        }
        self.state = SessionState::Active;
        self.last_round = None;

        if self.spawner.is_none() {
            match Spawner::start(self.field.clone(), self.spawner_config) {
                Ok(spawner) => self.spawner = Some(spawner),
                Err(e) => log::warn!("Failed to start spawner: {e}"),
            }
        }
    }

    /// End the round: stop spawning and commit the score if it is a record
    pub fn stop(&mut self) {
        self.stop_spawner();
        if self.state != SessionState::Active {
            return;
        }
        self.state = SessionState::Inactive;

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
            if let Err(e) = self.store.save(self.high_score) {
                log::warn!("Failed to save high score: {e}");
            }
            log::info!("New high score: {}", self.high_score);
        }

        self.last_round = Some(RoundSummary {
            score: self.score,
            high_score: self.high_score,
            new_record,
        });
        log::info!("Round over: {} fleas eliminated", self.score);
    }

    /// Start over: empty field, zero score, high score re-read from the store
    pub fn reset(&mut self) {
        self.stop_spawner();
        lock_field(&self.field).clear();
        self.score = 0;
        self.high_score = load_high_score(self.store.as_ref());
        self.state = SessionState::Inactive;
        log::info!("Game reset");
        self.start();
    }

    fn stop_spawner(&mut self) {
        if let Some(spawner) = self.spawner.take() {
            spawner.stop();
        }
    }

    /// Evasion pass; fleas are frozen while inactive
    pub fn on_tick(&mut self) {
        if self.is_active() {
            lock_field(&self.field).tick();
        }
    }

    pub fn on_pointer_move(&mut self, x: i32, y: i32) {
        lock_field(&self.field).update_pointer(x, y);
    }

    /// Fire the gun at a point. Returns the kill count.
    pub fn fire_at(&mut self, x: i32, y: i32) -> u32 {
        self.fire(Weapon::Point, x, y)
    }

    /// Launch the area missile. Returns the kill count.
    pub fn fire_area(&mut self) -> u32 {
        self.fire(Weapon::Area, 0, 0)
    }

    fn fire(&mut self, weapon: Weapon, x: i32, y: i32) -> u32 {
        if !self.is_active() {
            return 0;
        }

        let (kills, cleared) = {
            let mut field = lock_field(&self.field);
            let kills = field.attack(weapon, x, y);
            (kills, field.is_empty())
        };

        self.score += u64::from(kills);
        if cleared {
            log::info!("Field cleared");
            self.stop();
        }
        kills
    }

    pub fn jump_all(&mut self) {
        if self.is_active() {
            lock_field(&self.field).jump_all();
        }
    }

    /// Add a normal flea, starting the game if needed
    pub fn spawn_normal(&mut self) -> bool {
        self.spawn(FleaKind::Normal)
    }

    /// Add a mutant flea, starting the game if needed
    pub fn spawn_mutant(&mut self) -> bool {
        self.spawn(FleaKind::Mutant)
    }

    fn spawn(&mut self, kind: FleaKind) -> bool {
        if !self.is_active() {
            self.start();
        }
        lock_field(&self.field).try_spawn(kind)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn last_round(&self) -> Option<RoundSummary> {
        self.last_round
    }

    /// Consistent copy of the fleas for rendering
    pub fn snapshot(&self) -> Vec<Flea> {
        lock_field(&self.field).snapshot()
    }

    /// Guarded access to the shared field
    pub fn field(&self) -> &SharedField {
        &self.field
    }
}

fn load_high_score(store: &dyn ScoreStore) -> u64 {
    store.load().unwrap_or_else(|e| {
        log::warn!("Failed to load high score: {e}; using 0");
        0
    })
}
