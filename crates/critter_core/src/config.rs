use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CritterConfig {
    pub pet: PetDefaults,
    pub mood: MoodThresholds,
    pub heartbeat: HeartbeatSettings,
}

impl CritterConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: CritterConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::debug!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Default location: `<config_dir>/critter/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("critter").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("critter.toml"))
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CRITTER_SAVE_PATH") {
            self.pet.save_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CRITTER_PET_NAME") {
            if !v.trim().is_empty() {
                self.pet.name = v;
            }
        }
        if let Ok(v) = std::env::var("CRITTER_TICK_SECS") {
            if let Ok(n) = v.parse() {
                self.heartbeat.tick_interval_secs = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PetDefaults {
    /// Name given to a newly hatched pet.
    pub name: String,
    /// Snapshot location. One JSON document per pet.
    pub save_path: PathBuf,
}

impl Default for PetDefaults {
    fn default() -> Self {
        Self {
            name: "Mochi".to_string(),
            save_path: default_save_path(),
        }
    }
}

fn default_save_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("critter").join("pet.json"))
        .unwrap_or_else(|| PathBuf::from("pet.json"))
}

/// Bands for mood selection. The first band that matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoodThresholds {
    pub drowsy_below: i32,
    pub bored_below: i32,
    pub hungry_below: i32,
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self {
            drowsy_below: 30,
            bored_below: 40,
            hungry_below: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeartbeatSettings {
    /// How often the interactive loop wakes up.
    pub tick_interval_secs: u64,
    /// Cadence of the decay pass while interactive.
    pub decay_interval_secs: u64,
    /// Cadence of care-quality checkpoints.
    pub checkpoint_interval_secs: u64,
}

impl Default for HeartbeatSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: 60,
            decay_interval_secs: 3600,
            checkpoint_interval_secs: 3600,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
