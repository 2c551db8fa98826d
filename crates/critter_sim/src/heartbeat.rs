//! Heartbeat for the interactive loop
//!
//! The heartbeat decides, on every tick, whether the hourly decay pass and
//! a care checkpoint are due. It does not own a timer; the caller drives
//! `tick` from whatever loop it runs.

use crate::lifecycle;
use crate::system::{Simulation, UpdateReport};
use anyhow::{Context, Result};
use critter_core::{HeartbeatSettings, PetState, PetStore};
use std::time::Duration;

/// Heartbeat cadence
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// How often the loop wakes up (default: 60s)
    pub interval: Duration,
    /// Minimum time between decay passes (default: 1h)
    pub decay_every: chrono::Duration,
    /// Minimum time between checkpoints in one stage (default: 1h)
    pub checkpoint_every: chrono::Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::from_settings(&HeartbeatSettings::default())
    }
}

impl HeartbeatConfig {
    pub fn from_settings(settings: &HeartbeatSettings) -> Self {
        let secs = |n: u64| chrono::Duration::seconds(i64::try_from(n.max(1)).unwrap_or(i64::MAX));
        Self {
            interval: Duration::from_secs(settings.tick_interval_secs.max(1)),
            decay_every: secs(settings.decay_interval_secs),
            checkpoint_every: secs(settings.checkpoint_interval_secs),
        }
    }

    /// Fast heartbeat for watching a pet closely
    pub fn fast() -> Self {
        Self {
            interval: Duration::from_secs(5),
            decay_every: chrono::Duration::minutes(5),
            checkpoint_every: chrono::Duration::minutes(30),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub update: Option<UpdateReport>,
    pub checkpointed: bool,
}

impl TickReport {
    pub fn changed(&self) -> bool {
        self.update.is_some() || self.checkpointed
    }
}

#[derive(Debug, Clone, Default)]
pub struct Heartbeat {
    config: HeartbeatConfig,
}

impl Heartbeat {
    pub fn new(config: HeartbeatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeartbeatConfig {
        &self.config
    }

    pub fn decay_due(&self, pet: &PetState, sim: &Simulation) -> bool {
        sim.now() - pet.last_updated >= self.config.decay_every
    }

    /// Run the decay pass and record a checkpoint when each is due.
    pub fn tick(&self, sim: &mut Simulation, pet: &mut PetState) -> TickReport {
        let mut report = TickReport::default();
        if pet.dead {
            return report;
        }
        if self.decay_due(pet, sim) {
            let update = sim.update(pet);
            report.checkpointed = update.checkpointed;
            report.update = Some(update);
        }
        let now = sim.now();
        if !pet.dead && lifecycle::checkpoint_due(pet, now, self.config.checkpoint_every) {
            lifecycle::record_checkpoint(pet, now);
            report.checkpointed = true;
        }
        report
    }

    /// `tick`, then persist if anything changed.
    pub fn tick_and_save(
        &self,
        sim: &mut Simulation,
        pet: &mut PetState,
        store: &dyn PetStore,
    ) -> Result<TickReport> {
        let report = self.tick(sim, pet);
        if report.changed() {
            store
                .save(pet)
                .with_context(|| format!("Failed to save {} after heartbeat", pet.name))?;
        }
        Ok(report)
    }
}
