//! # critter core
//!
//! Data model and pure building blocks for a virtual pet whose stats evolve
//! over real elapsed time between invocations.
//!
//! - [`state`]: the persisted `PetState` snapshot and its nested types
//! - [`stats`]: decay/recovery functions (no clock, no RNG)
//! - [`traits`] and [`chronotype`]: immutable per-pet modifiers drawn at birth
//! - [`clock`]: injectable `Clock` and `RandomSource`
//! - [`persistence`]: the snapshot gateway
//! - [`config`]: TOML configuration with env overrides

pub mod chronotype;
pub mod clock;
pub mod config;
pub mod error;
pub mod persistence;
pub mod state;
pub mod stats;
pub mod traits;

pub use chronotype::Chronotype;
pub use clock::{Clock, FixedClock, RandomSource, ScriptedRandom, SeededRandom, SystemClock, ThreadRandom};
pub use config::{CritterConfig, HeartbeatSettings, MoodThresholds, PetDefaults};
pub use error::PersistenceError;
pub use persistence::{load_or_hatch, JsonFileStore, MemoryStore, PetStore};
pub use state::{
    ActionKind, ActiveEvent, DeathCause, EventKind, EventOutcome, EventRecord, Form, Interaction,
    LifeStage, Mood, PetState, StatCheckpoint, StatusChange, Vitals,
};
pub use stats::{DecayContext, StatModel};
pub use traits::{DecayModifiers, Modifier, PetTrait, TraitCategory};
