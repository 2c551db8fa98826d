//! Snapshot load/save
//!
//! The snapshot is read whole, mutated in memory and overwritten whole.
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated snapshot behind.

use crate::clock::RandomSource;
use crate::error::PersistenceError;
use crate::state::PetState;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Load/save boundary for one pet.
pub trait PetStore: Send + Sync {
    fn load(&self) -> Result<PetState, PersistenceError>;
    fn save(&self, pet: &PetState) -> Result<(), PersistenceError>;
}

/// One pretty-printed JSON document at a fixed path.
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

    fn io_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PetStore for JsonFileStore {
    fn load(&self) -> Result<PetState, PersistenceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_err(e))?;
        let mut pet: PetState =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        pet.normalize();
        Ok(pet)
    }

    fn save(&self, pet: &PetState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(pet)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        tracing::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and embedding. Holds the serialized form so
/// loads go through the same decoding path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(json: &str) -> Self {
        Self {
            slot: Mutex::new(Some(json.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl PetStore for MemoryStore {
    fn load(&self) -> Result<PetState, PersistenceError> {
        let raw = self.raw().ok_or_else(|| PersistenceError::Io {
            path: PathBuf::from("<memory>"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no snapshot saved"),
        })?;
        let mut pet: PetState =
            serde_json::from_str(&raw).map_err(|source| PersistenceError::Malformed {
                path: PathBuf::from("<memory>"),
                source,
            })?;
        pet.normalize();
        Ok(pet)
    }

    fn save(&self, pet: &PetState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(pet)?;
        match self.slot.lock() {
            Ok(mut guard) => *guard = Some(json),
            Err(poisoned) => *poisoned.into_inner() = Some(json),
        }
        Ok(())
    }
}

/// Load the saved pet, or hatch a fresh one if there is none or it cannot
/// be read. Never fails: an unreadable snapshot is logged and replaced.
pub fn load_or_hatch(
    store: &dyn PetStore,
    name: &str,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> (PetState, bool) {
    match store.load() {
        Ok(pet) => (pet, false),
        Err(e) => {
            if e.is_not_found() {
                tracing::info!("No saved pet found, hatching {}", name);
            } else {
                tracing::warn!("Could not load saved pet ({}), hatching a new one", e);
            }
            (PetState::hatch(name, now, rng), true)
        }
    }
}
