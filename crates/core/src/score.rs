//! Scoring module - current score plus the persisted best
//!
//! The best score is the only state that survives a session reset. It is read
//! when the tracker is built and written once per game over, as
//! `max(current, stored best)`, so it never decreases.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DongleError, Result};

/// Storage for the single persisted integer.
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load_best(&self) -> Result<Option<u32>>;
    fn save_best(&mut self, best: u32) -> Result<()>;
}

/// In-memory store; survives resets but not the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best: Some(best) }
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> Result<Option<u32>> {
        Ok(self.best)
    }

    fn save_best(&mut self, best: u32) -> Result<()> {
        self.best = Some(best);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    max_score: u32,
}

/// JSON file holding `{"max_score": N}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best(&self) -> Result<Option<u32>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DongleError::StoreIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let file: BestScoreFile =
            serde_json::from_str(&text).map_err(|source| DongleError::StoreCorrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(file.max_score))
    }

    fn save_best(&mut self, best: u32) -> Result<()> {
        let text = serde_json::to_string(&BestScoreFile { max_score: best }).map_err(|source| {
            DongleError::StoreCorrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, text).map_err(|source| DongleError::StoreIo {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScoreTracker<S> {
    store: S,
    current: u32,
    best: u32,
}

impl<S: ScoreStore> ScoreTracker<S> {
    /// Read the stored best (writing 0 when the store is empty).
    pub fn new(store: S) -> Self {
        let mut tracker = Self {
            store,
            current: 0,
            best: 0,
        };
        tracker.best = tracker.load_or_init();
        tracker
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_score(&mut self, delta: u32) {
        self.current = self.current.saturating_add(delta);
    }

    /// Fold the current score into the persisted best and return the new best.
    pub fn record_game_over(&mut self) -> u32 {
        let stored = match self.store.load_best() {
            Ok(stored) => stored.unwrap_or(0),
            Err(e) => {
                log::warn!("could not read best score, keeping {}: {e}", self.best);
                self.best
            }
        };

        let best = self.current.max(stored).max(self.best);
        if let Err(e) = self.store.save_best(best) {
            log::warn!("could not persist best score {best}: {e}");
        }
        self.best = best;
        best
    }

    /// Start a fresh session: current back to 0, best re-read from the store.
    pub fn reset_session(&mut self) {
        self.current = 0;
        self.best = self.load_or_init().max(self.best);
    }

    fn load_or_init(&mut self) -> u32 {
        match self.store.load_best() {
            Ok(Some(best)) => best,
            Ok(None) => {
                if let Err(e) = self.store.save_best(0) {
                    log::warn!("could not initialise best score: {e}");
                }
                0
            }
            Err(e) => {
                log::warn!("could not read best score, starting from 0: {e}");
                0
            }
        }
    }
}
