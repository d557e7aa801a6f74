//! High score persistence
//!
//! A single non-negative integer under one named key. Missing or unreadable
//! values load as zero; failed writes are logged and otherwise ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key (LocalStorage on web)
pub const STORAGE_KEY: &str = "skyline_runner_hi";

/// Where the high score lives between sessions
pub trait HighScoreStore {
    /// Stored high score, `0` when absent or malformed
    fn load(&self) -> u64;
    /// Persist a new high score
    fn save(&mut self, score: u64);
}

/// Internal storage failures, never surfaced past `HighScoreStore`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed high score: {0}")]
    Parse(String),
}

/// Parse a stored value; anything but a non-negative integer is rejected
pub fn parse_score(raw: &str) -> Result<u64, StoreError> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }
    // Older saves may hold a float
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.floor() as u64),
        _ => Err(StoreError::Parse(raw.to_string())),
    }
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    /// Number of writes, for assertions
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    pub fn stored(&self) -> Option<u64> {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, score: u64) {
        self.value = Some(score);
        self.writes += 1;
    }
}

/// JSON file body for the native store
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreFile {
    hi_score: u64,
}

/// JSON file on disk (native)
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn try_load(&self) -> Result<u64, StoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        serde_json::from_str::<HighScoreFile>(&json)
            .map(|f| f.hi_score)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn try_save(&self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreFile { hi_score: score })
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> u64 {
        match self.try_load() {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, self.path.display());
                score
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Ignoring high score file: {}", e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) {
        if let Err(e) = self.try_save(score) {
            log::warn!("Failed to save high score: {}", e);
        }
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    fn try_load() -> Result<u64, StoreError> {
        let raw = Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?;
        match raw {
            Some(raw) => parse_score(&raw),
            None => Ok(0),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        match Self::try_load() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting from 0", e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) {
        let result = Self::storage().and_then(|s| {
            s.set_item(STORAGE_KEY, &score.to_string())
                .map_err(|_| StoreError::Unavailable)
        });
        match result {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
