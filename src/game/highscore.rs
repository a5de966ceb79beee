//! High score persistence.
//!
//! The engine only produces a running score; storing the best one is left to
//! a [`HighScoreStore`]. The default store keeps a JSON file in the user's
//! local data directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Somewhere to keep the best score between games.
pub trait HighScoreStore: Send + Sync {
    fn load_high_score(&self) -> Result<u32>;
    fn save_high_score(&mut self, score: u32) -> Result<()>;
}

/// On-disk format.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// High score kept in a JSON file. A missing file counts as zero.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `<data_local_dir>/hexshot/highscore.json`.
    pub fn in_data_dir() -> Option<Self> {
        dirs::data_local_dir().map(|dir| Self::new(dir.join("hexshot").join("highscore.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self) -> Result<u32> {
        if !self.path.exists() {
            info!("No high score file found at {:?}, starting fresh", self.path);
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path)?;
        let file: HighScoreFile = serde_json::from_str(&contents)?;
        info!("Loaded high score {} from {:?}", file.high_score, self.path);
        Ok(file.high_score)
    }

    fn save_high_score(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&HighScoreFile { high_score: score })?;
        fs::write(&self.path, json)?;
        info!("Saved high score {} to {:?}", score, self.path);
        Ok(())
    }
}

/// High score kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub high_score: u32,
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u32> {
        Ok(self.high_score)
    }

    fn save_high_score(&mut self, score: u32) -> Result<()> {
        self.high_score = score;
        Ok(())
    }
}

/// Load through `store`, falling back to zero with a warning.
pub fn load_or_zero(store: &dyn HighScoreStore) -> u32 {
    match store.load_high_score() {
        Ok(score) => score,
        Err(e) => {
            warn!("Failed to load high score: {}", e);
            0
        }
    }
}
