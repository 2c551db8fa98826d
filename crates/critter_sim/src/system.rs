//! Simulation coordinator
//!
//! `Simulation` owns the injected clock and RNG and runs the per-load
//! update pipeline over a `PetState`:
//! 1. Reconstruct decay for the time since `last_updated`
//! 2. Illness, then the critical timer and old-age roll
//! 3. If still alive: mood, sleep, events, bond decay
//! 4. Lifecycle (stage and evolution), then a checkpoint for the new stage
//!
//! Probabilistic rolls only happen when time has actually passed, so a
//! second update at the same instant leaves the state untouched.

use crate::events::EventPass;
use crate::sleep::SleepTransition;
use crate::{bond, criticality, events, illness, lifecycle, mood, sleep};
use chrono::{DateTime, Duration, DurationRound, Utc};
use critter_core::{
    load_or_hatch, Clock, CritterConfig, DeathCause, DecayContext, DecayModifiers, Form, Mood,
    MoodThresholds, PetState, PetStore, RandomSource, StatModel, SystemClock, ThreadRandom,
};
use std::sync::Arc;

/// Upper bound on hourly segments per reconstruction. Anything beyond two
/// weeks is folded into one final segment.
pub const MAX_SEGMENTS: usize = 14 * 24;

/// What one update pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Seconds of decay reconstructed (0 for a skewed or repeated load).
    pub elapsed_secs: i64,
    pub segments: usize,
    /// `Some(true)` fell ill, `Some(false)` recovered.
    pub illness: Option<bool>,
    pub died: Option<DeathCause>,
    pub mood: Option<Mood>,
    pub sleep: Option<SleepTransition>,
    pub events: EventPass,
    pub bond_lost: i32,
    pub checkpointed: bool,
    pub evolved: Vec<Form>,
}

pub struct Simulation {
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource>,
    thresholds: MoodThresholds,
    checkpoint_every: Duration,
}

impl Simulation {
    pub fn new(clock: Arc<dyn Clock>, rng: Box<dyn RandomSource>) -> Self {
        Self {
            clock,
            rng,
            thresholds: MoodThresholds::default(),
            checkpoint_every: Duration::hours(1),
        }
    }

    /// Wall clock, thread RNG and settings from `config`.
    pub fn system(config: &CritterConfig) -> Self {
        Self::with_config(Arc::new(SystemClock), Box::new(ThreadRandom), config)
    }

    pub fn with_config(
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
        config: &CritterConfig,
    ) -> Self {
        let secs = i64::try_from(config.heartbeat.checkpoint_interval_secs).unwrap_or(i64::MAX);
        Self {
            clock,
            rng,
            thresholds: config.mood,
            checkpoint_every: Duration::seconds(secs.max(1)),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn thresholds(&self) -> &MoodThresholds {
        &self.thresholds
    }

    pub fn checkpoint_every(&self) -> Duration {
        self.checkpoint_every
    }

    /// Hatch a new pet at the current instant.
    pub fn hatch(&mut self, name: &str) -> PetState {
        let now = self.clock.now();
        let pet = PetState::hatch(name, now, self.rng.as_mut());
        tracing::info!(
            "Hatched {} ({} chronotype, traits: {:?}, bond {})",
            pet.name,
            pet.chronotype.name(),
            pet.traits,
            pet.bond
        );
        pet
    }

    /// Whether `at` falls in the pet's active hours on this clock.
    pub fn is_active_hour(&self, pet: &PetState, at: DateTime<Utc>) -> bool {
        pet.chronotype.is_active_hour(self.clock.local_hour(at))
    }

    /// Load the saved pet, hatching one with this simulation's RNG when the
    /// store is empty or unreadable. The flag is true for a fresh hatch.
    pub fn load_or_hatch(&mut self, store: &dyn PetStore, name: &str) -> (PetState, bool) {
        let now = self.clock.now();
        load_or_hatch(store, name, now, self.rng.as_mut())
    }

    /// Run the full update pipeline for the time since the last update.
    pub fn update(&mut self, pet: &mut PetState) -> UpdateReport {
        self.advance(pet, true)
    }

    /// What the pet looks like right now, without rolling any dice or
    /// touching `pet`. Decay, sleep, expiry and the critical timer still
    /// apply, so repeated previews of one snapshot agree with each other.
    pub fn preview(&mut self, pet: &PetState) -> PetState {
        let mut view = pet.clone();
        self.advance(&mut view, false);
        view
    }

    fn advance(&mut self, pet: &mut PetState, dice: bool) -> UpdateReport {
        let mut report = UpdateReport::default();
        if pet.dead {
            return report;
        }

        let now = self.clock.now();
        let elapsed = now - pet.last_updated;
        if elapsed < Duration::zero() {
            tracing::warn!(
                "Clock moved backwards by {}s since last update; treating as no time passed",
                -elapsed.num_seconds()
            );
        }
        let passed = elapsed > Duration::zero();
        let rolls = dice && passed;

        if passed {
            let from = pet.last_updated;
            report.segments = self.reconstruct(pet, from, now);
            report.elapsed_secs = elapsed.num_seconds();
            pet.last_updated = now;
        }
        pet.age_hours = pet.age_hours.max(pet.age_at(now));

        let rng = self.rng.as_mut();
        report.illness = illness::update_illness(pet, now, rolls, rng);

        report.died = criticality::update_critical(pet, now);
        if rolls {
            if let Some(cause) = criticality::roll_old_age(pet, now, rng) {
                report.died = Some(cause);
            }
        }

        if !pet.dead {
            if dice {
                report.mood = mood::update_mood(pet, now, &self.thresholds, rng);
            }
            let active = pet.chronotype.is_active_hour(self.clock.local_hour(now));
            report.sleep = sleep::update_sleep(pet, now, active);
            report.events = events::update_events(pet, now, rolls, rng);
            report.bond_lost = bond::apply_decay(pet, now);
            report.evolved = lifecycle::update_lifecycle(pet, now);
            if dice && lifecycle::checkpoint_due(pet, now, self.checkpoint_every) {
                lifecycle::record_checkpoint(pet, now);
                report.checkpointed = true;
            }
        }

        tracing::debug!(
            "Update for {}: {}s over {} segments -> {:?}",
            pet.name,
            report.elapsed_secs,
            report.segments,
            pet.vitals
        );
        report
    }

    /// Record a checkpoint now if one is owed for the current stage.
    pub fn record_checkpoint(&self, pet: &mut PetState) -> bool {
        let now = self.clock.now();
        if pet.dead || !lifecycle::checkpoint_due(pet, now, self.checkpoint_every) {
            return false;
        }
        lifecycle::record_checkpoint(pet, now);
        true
    }

    /// Apply decay for `[from, to)`, cut at local hour boundaries so each
    /// slice sees the right chronotype flags. Returns the segment count.
    fn reconstruct(&self, pet: &mut PetState, from: DateTime<Utc>, to: DateTime<Utc>) -> usize {
        let modifiers = DecayModifiers::from_traits(&pet.traits);
        let mut model = StatModel::new(pet.vitals);
        let mut start = from;
        let mut segments = 0;

        while start < to {
            let end = if segments + 1 >= MAX_SEGMENTS {
                to
            } else {
                next_hour(start).min(to)
            };
            let ctx = self.context_at(pet, start, modifiers);
            model.step(hours_between(start, end), &ctx);
            segments += 1;
            start = end;
        }

        pet.vitals = model.finish(&mut pet.energy_remainder);
        segments
    }

    fn context_at(&self, pet: &PetState, at: DateTime<Utc>, modifiers: DecayModifiers) -> DecayContext {
        let hour = self.clock.local_hour(at);
        DecayContext {
            sleeping: pet.sleeping,
            active_hours: pet.chronotype.is_active_hour(hour),
            preferred_sleep: pet.chronotype.is_preferred_sleep_hour(hour),
            modifiers,
        }
    }
}

fn next_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::hours(1)).unwrap_or(at) + Duration::hours(1)
}

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}
