//! High score persistence
//!
//! A single non-negative integer. The file format is the bare number in
//! plain text (`37`), surrounding whitespace tolerated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Errors raised by a score store
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    /// Backing file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored value is not a non-negative integer.
    #[error("Malformed high score in '{path}': {contents:?}")]
    Malformed { path: PathBuf, contents: String },
}

/// Load/save capability for the persisted high score
pub trait ScoreStore: Send {
    /// Read the stored score. An absent slot reads as 0.
    fn load(&self) -> Result<u64, ScoreStoreError>;

    /// Overwrite the stored score.
    fn save(&self, score: u64) -> Result<(), ScoreStoreError>;
}

/// High score kept in a plain-text file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ScoreStoreError {
        ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<u64, ScoreStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score file at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed.parse::<u64>().map_err(|_| ScoreStoreError::Malformed {
            path: self.path.clone(),
            contents: trimmed.to_string(),
        })
    }

    /// Write to a sibling temp file, then rename over the real one
    fn save(&self, score: u64) -> Result<(), ScoreStoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, score.to_string()).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    slot: Arc<AtomicU64>,
}

impl MemoryScoreStore {
    pub fn new(initial: u64) -> Self {
        Self {
            slot: Arc::new(AtomicU64::new(initial)),
        }
    }

    /// Current stored value
    pub fn get(&self) -> u64 {
        self.slot.load(Ordering::SeqCst)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u64, ScoreStoreError> {
        Ok(self.get())
    }

    fn save(&self, score: u64) -> Result<(), ScoreStoreError> {
        self.slot.store(score, Ordering::SeqCst);
        Ok(())
    }
}
