//! Persistent pet state
//!
//! `PetState` is the whole snapshot written to disk between invocations.
//! Every mutation site clamps, so the documented ranges hold for any
//! state reachable through the public API:
//! - vitals and bond in `[0, 100]`
//! - logs and histories capped at their `MAX_*` lengths, oldest dropped
//!
//! The schema is additive: fields introduced after the first release carry
//! `#[serde(default)]` so older snapshots still load.

use crate::chronotype::Chronotype;
use crate::clock::RandomSource;
use crate::traits::{assign_traits, PetTrait};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

pub const MAX_INTERACTIONS: usize = 20;
pub const MAX_EVENT_LOG: usize = 20;
pub const MAX_STATUS_LOG: usize = 50;
pub const MAX_CHECKPOINTS_PER_STAGE: usize = 256;

/// Hours at which the life stage advances.
pub const CHILD_AT_HOURS: u32 = 48;
pub const ADULT_AT_HOURS: u32 = 96;

/// Append to a bounded log, dropping the oldest entries past `max`.
pub fn push_bounded<T>(log: &mut Vec<T>, item: T, max: usize) {
    log.push(item);
    if log.len() > max {
        let excess = log.len() - max;
        log.drain(..excess);
    }
}

pub fn clamp_stat(v: i32) -> i32 {
    v.clamp(STAT_MIN, STAT_MAX)
}

// =============================================================================
// Vitals
// =============================================================================

/// The four core stats, 0 (worst) to 100 (best). Hunger is fullness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hunger: i32,
    pub happiness: i32,
    pub energy: i32,
    pub health: i32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hunger: STAT_MAX,
            happiness: STAT_MAX,
            energy: STAT_MAX,
            health: STAT_MAX,
        }
    }
}

impl Vitals {
    pub fn normalize(&mut self) {
        self.hunger = clamp_stat(self.hunger);
        self.happiness = clamp_stat(self.happiness);
        self.energy = clamp_stat(self.energy);
        self.health = clamp_stat(self.health);
    }

    pub fn lowest(&self) -> i32 {
        self.hunger
            .min(self.happiness)
            .min(self.energy)
            .min(self.health)
    }
}

// =============================================================================
// Life stage and form
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    Baby,
    Child,
    Adult,
}

impl LifeStage {
    /// Stage is a pure function of age in whole hours.
    pub fn from_age(age_hours: u32) -> Self {
        if age_hours >= ADULT_AT_HOURS {
            LifeStage::Adult
        } else if age_hours >= CHILD_AT_HOURS {
            LifeStage::Child
        } else {
            LifeStage::Baby
        }
    }

    pub fn index(self) -> u8 {
        match self {
            LifeStage::Baby => 0,
            LifeStage::Child => 1,
            LifeStage::Adult => 2,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            LifeStage::Baby => Some(LifeStage::Child),
            LifeStage::Child => Some(LifeStage::Adult),
            LifeStage::Adult => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LifeStage::Baby => "Baby",
            LifeStage::Child => "Child",
            LifeStage::Adult => "Adult",
        }
    }
}

/// Evolutionary outcome. Only ever moves forward, at stage boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    #[default]
    Baby,
    HealthyChild,
    TroubledChild,
    SicklyChild,
    EliteAdult,
    StandardAdult,
    GrumpyAdult,
    RedeemedAdult,
    DelinquentAdult,
    WeakAdult,
}

impl Form {
    pub fn stage(self) -> LifeStage {
        match self {
            Form::Baby => LifeStage::Baby,
            Form::HealthyChild | Form::TroubledChild | Form::SicklyChild => LifeStage::Child,
            _ => LifeStage::Adult,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Form::Baby => "Baby",
            Form::HealthyChild => "Healthy Child",
            Form::TroubledChild => "Troubled Child",
            Form::SicklyChild => "Sickly Child",
            Form::EliteAdult => "Elite Adult",
            Form::StandardAdult => "Standard Adult",
            Form::GrumpyAdult => "Grumpy Adult",
            Form::RedeemedAdult => "Redeemed Adult",
            Form::DelinquentAdult => "Delinquent Adult",
            Form::WeakAdult => "Weak Adult",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Form::Baby => "🐣",
            Form::HealthyChild => "🐥",
            Form::TroubledChild => "🐤",
            Form::SicklyChild => "🐛",
            Form::EliteAdult => "🦅",
            Form::StandardAdult => "🐔",
            Form::GrumpyAdult => "🦃",
            Form::RedeemedAdult => "🦢",
            Form::DelinquentAdult => "🦆",
            Form::WeakAdult => "🐦",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Neglect,
    Starvation,
    Sickness,
    OldAge,
}

impl DeathCause {
    pub fn describe(self) -> &'static str {
        match self {
            DeathCause::Neglect => "neglect",
            DeathCause::Starvation => "starvation",
            DeathCause::Sickness => "sickness",
            DeathCause::OldAge => "old age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Normal,
    Playful,
    Lazy,
    Needy,
}

impl Mood {
    pub fn name(self) -> &'static str {
        match self {
            Mood::Normal => "normal",
            Mood::Playful => "playful",
            Mood::Lazy => "lazy",
            Mood::Needy => "needy",
        }
    }
}

// =============================================================================
// Interactions, events, logs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Feed,
    Play,
    Sleep,
    Medicine,
    Respond,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub action: ActionKind,
    pub at: DateTime<Utc>,
}

/// Catalog entries. Behaviour lives in the event engine's dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Nightmare,
    Lonely,
    UpsetTummy,
    Sniffles,
    Zoomies,
    FoundTreasure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub responded: bool,
}

impl ActiveEvent {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Responded,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: EventKind,
    pub at: DateTime<Utc>,
    pub outcome: EventOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCheckpoint {
    pub at: DateTime<Utc>,
    pub hunger: i32,
    pub happiness: i32,
    pub energy: i32,
    pub health: i32,
}

impl StatCheckpoint {
    pub fn of(vitals: &Vitals, at: DateTime<Utc>) -> Self {
        Self {
            at,
            hunger: vitals.hunger,
            happiness: vitals.happiness,
            energy: vitals.energy,
            health: vitals.health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub at: DateTime<Utc>,
    pub message: String,
}

// =============================================================================
// PetState
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    pub name: String,
    /// Immutable. Age is always derived from this.
    pub birth_time: DateTime<Utc>,
    /// Instant the last update pass was computed for.
    pub last_updated: DateTime<Utc>,

    pub vitals: Vitals,
    #[serde(default)]
    pub age_hours: u32,
    #[serde(default)]
    pub life_stage: LifeStage,
    #[serde(default)]
    pub form: Form,

    #[serde(default)]
    pub sleeping: bool,
    #[serde(default)]
    pub sleep_started: Option<DateTime<Utc>>,
    /// Sub-unit sleep recovery carried between updates.
    #[serde(default)]
    pub energy_remainder: f64,

    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub cause_of_death: Option<DeathCause>,
    #[serde(default)]
    pub died_at: Option<DateTime<Utc>>,
    /// Set while the critical condition holds, cleared the moment it lifts.
    #[serde(default)]
    pub critical_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ill: bool,

    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub mood_expires: Option<DateTime<Utc>>,

    #[serde(default)]
    pub chronotype: Chronotype,
    #[serde(default)]
    pub traits: Vec<PetTrait>,

    #[serde(default)]
    pub bond: i32,
    /// Decay periods already charged since the last interaction.
    #[serde(default)]
    pub bond_decay_periods: u32,
    #[serde(default)]
    pub interactions: Vec<Interaction>,

    #[serde(default)]
    pub current_event: Option<ActiveEvent>,
    #[serde(default)]
    pub event_log: Vec<EventRecord>,

    /// Keyed by life stage index (0, 1, 2).
    #[serde(default)]
    pub checkpoints: BTreeMap<u8, Vec<StatCheckpoint>>,
    #[serde(default)]
    pub status_log: Vec<StatusChange>,
}

impl PetState {
    /// Hatch a new pet: full stats, random traits, chronotype and bond.
    pub fn hatch(name: &str, now: DateTime<Utc>, rng: &mut dyn RandomSource) -> Self {
        let traits = assign_traits(rng);
        let chronotype = Chronotype::draw(rng);
        let bond = 20 + (rng.next_f64() * 21.0).floor() as i32;

        let mut pet = Self {
            name: name.to_string(),
            birth_time: now,
            last_updated: now,
            vitals: Vitals::default(),
            age_hours: 0,
            life_stage: LifeStage::Baby,
            form: Form::Baby,
            sleeping: false,
            sleep_started: None,
            energy_remainder: 0.0,
            dead: false,
            cause_of_death: None,
            died_at: None,
            critical_since: None,
            ill: false,
            mood: Mood::Normal,
            mood_expires: None,
            chronotype,
            traits,
            bond: bond.clamp(STAT_MIN, STAT_MAX),
            bond_decay_periods: 0,
            interactions: Vec::new(),
            current_event: None,
            event_log: Vec::new(),
            checkpoints: BTreeMap::new(),
            status_log: Vec::new(),
        };
        pet.log_status(now, format!("{} hatched", name));
        pet
    }

    /// Whole hours since birth. Never negative, even if the clock runs back.
    pub fn age_at(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = now - self.birth_time;
        if elapsed < Duration::zero() {
            0
        } else {
            u32::try_from(elapsed.num_hours()).unwrap_or(u32::MAX)
        }
    }

    pub fn log_status(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        push_bounded(
            &mut self.status_log,
            StatusChange {
                at,
                message: message.into(),
            },
            MAX_STATUS_LOG,
        );
    }

    pub fn log_event(&mut self, record: EventRecord) {
        push_bounded(&mut self.event_log, record, MAX_EVENT_LOG);
    }

    pub fn record_interaction(&mut self, action: ActionKind, at: DateTime<Utc>) {
        push_bounded(
            &mut self.interactions,
            Interaction { action, at },
            MAX_INTERACTIONS,
        );
    }

    pub fn last_interaction(&self) -> Option<&Interaction> {
        self.interactions.last()
    }

    pub fn push_checkpoint(&mut self, stage: LifeStage, checkpoint: StatCheckpoint) {
        let entries = self.checkpoints.entry(stage.index()).or_default();
        push_bounded(entries, checkpoint, MAX_CHECKPOINTS_PER_STAGE);
    }

    pub fn checkpoints_for(&self, stage: LifeStage) -> &[StatCheckpoint] {
        self.checkpoints
            .get(&stage.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Re-establish every documented range. Used after loading a snapshot
    /// that may have been edited by hand.
    pub fn normalize(&mut self) {
        self.vitals.normalize();
        self.bond = clamp_stat(self.bond);
        if !self.energy_remainder.is_finite() || self.energy_remainder < 0.0 {
            self.energy_remainder = 0.0;
        }
        if self.energy_remainder >= 1.0 {
            self.energy_remainder = self.energy_remainder.fract();
        }
        let max_log = |len: usize, max: usize| len.saturating_sub(max);
        let drop = max_log(self.interactions.len(), MAX_INTERACTIONS);
        self.interactions.drain(..drop);
        let drop = max_log(self.event_log.len(), MAX_EVENT_LOG);
        self.event_log.drain(..drop);
        let drop = max_log(self.status_log.len(), MAX_STATUS_LOG);
        self.status_log.drain(..drop);
        for entries in self.checkpoints.values_mut() {
            let drop = max_log(entries.len(), MAX_CHECKPOINTS_PER_STAGE);
            entries.drain(..drop);
        }
    }
}
