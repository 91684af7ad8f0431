//! Best score persistence
//!
//! The session only knows the [`BestScoreStore`] capability. Backends:
//! - `MemoryStore`: tests and headless runs
//! - `JsonFileStore`: native, one small JSON file
//! - `LocalStorageStore`: browser LocalStorage (wasm only)

#[cfg(not(target_arch = "wasm32"))]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Single-slot storage for the best score
pub trait BestScoreStore {
    /// Read the stored best score (`None` if nothing saved yet)
    fn load(&self) -> Result<Option<u64>>;
    /// Overwrite the stored best score
    fn save(&mut self, best: u64) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self {
            best: Some(best),
            writes: 0,
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>> {
        Ok(self.best)
    }

    fn save(&mut self, best: u64) -> Result<()> {
        self.best = Some(best);
        self.writes += 1;
        Ok(())
    }
}

/// On-disk record
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u64,
}

/// JSON file store (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u64>> {
        use crate::error::Error;

        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::StoreRead(e.to_string())),
        };
        let record: BestScoreRecord =
            serde_json::from_str(&json).map_err(|e| Error::StoreRead(e.to_string()))?;
        Ok(Some(record.best_score))
    }

    fn save(&mut self, best: u64) -> Result<()> {
        use crate::error::Error;

        let json = serde_json::to_string(&BestScoreRecord { best_score: best })
            .map_err(|e| Error::StoreWrite(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| Error::StoreWrite(e.to_string()))?;
        log::info!("Best score {} saved to {}", best, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage store (wasm)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bestScore";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| crate::error::Error::StoreRead("LocalStorage unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u64>> {
        use crate::error::Error;

        let storage = Self::storage()?;
        let value = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| Error::StoreRead(format!("{:?}", e)))?;
        match value {
            Some(text) => text
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| Error::StoreRead(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&mut self, best: u64) -> Result<()> {
        use crate::error::Error;

        let storage = Self::storage().map_err(|e| Error::StoreWrite(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &best.to_string())
            .map_err(|e| Error::StoreWrite(format!("{:?}", e)))?;
        log::info!("Best score {} saved", best);
        Ok(())
    }
}
