//! # critter simulation
//!
//! The engines that move a pet through time, and the coordinator that runs
//! them in order on every load.
//!
//! ## Pipeline
//!
//! 1. Decay reconstruction over the elapsed gap (`critter_core::stats`)
//! 2. Illness, critical timer and old-age death
//! 3. Mood, autonomous sleep, random events, bond decay, checkpoints
//! 4. Aging and evolution
//!
//! ## Engines
//!
//! Each engine is a set of free functions over `&mut PetState` taking the
//! current instant and, where it rolls dice, a `RandomSource`. None of them
//! read a clock or global RNG.

mod actions;
pub mod bond;
pub mod criticality;
mod display;
pub mod events;
mod heartbeat;
pub mod illness;
pub mod lifecycle;
pub mod mood;
pub mod sleep;
mod system;

pub use actions::ActionOutcome;
pub use display::{
    bond_description, event_display, form_emoji, form_name, stats_report, status_line,
    status_with_label, StatusView,
};
pub use events::EventPass;
pub use heartbeat::{Heartbeat, HeartbeatConfig, TickReport};
pub use sleep::SleepTransition;
pub use system::{Simulation, UpdateReport, MAX_SEGMENTS};
