//! Game settings
//!
//! Loaded from an optional JSON file; any missing key takes its default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in settings '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: i32,
    pub field_height: i32,

    // === Spawner (milliseconds) ===
    pub normal_spawn_interval_ms: u64,
    pub mutant_spawn_interval_ms: u64,
    pub spawner_poll_ms: u64,

    // === Persistence ===
    /// Plain-text high score file
    pub high_score_path: PathBuf,

    /// Fixed RNG seed; drawn at random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            normal_spawn_interval_ms: NORMAL_SPAWN_INTERVAL_MS,
            mutant_spawn_interval_ms: MUTANT_SPAWN_INTERVAL_MS,
            spawner_poll_ms: SPAWNER_POLL_MS,

            high_score_path: PathBuf::from("high_score.txt"),

            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        // Mutants are the biggest flea; the field must hold at least one
        if self.field_width <= MUTANT_FLEA_SIZE || self.field_height <= MUTANT_FLEA_SIZE {
            return Err(SettingsError::Invalid(format!(
                "field {}x{} is too small for a {}px flea",
                self.field_width, self.field_height, MUTANT_FLEA_SIZE
            )));
        }
        if self.normal_spawn_interval_ms == 0 || self.mutant_spawn_interval_ms == 0 {
            return Err(SettingsError::Invalid("spawn intervals must be non-zero".into()));
        }
        if self.spawner_poll_ms == 0 {
            return Err(SettingsError::Invalid("spawner poll interval must be non-zero".into()));
        }
        Ok(())
    }

    pub fn normal_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.normal_spawn_interval_ms)
    }

    pub fn mutant_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.mutant_spawn_interval_ms)
    }

    pub fn spawner_poll(&self) -> Duration {
        Duration::from_millis(self.spawner_poll_ms)
    }
}
