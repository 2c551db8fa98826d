//! Stat decay and recovery
//!
//! Pure functions of (previous stats, elapsed hours, sleeping, schedule
//! flags, trait multipliers). Nothing here reads a clock or an RNG; the
//! caller decides how a time gap is cut into segments.
//!
//! Rates per hour:
//! - hunger: -5 awake, -3 asleep
//! - energy: -2.5 awake, +10 asleep (never drains while asleep)
//! - happiness: -2 while hunger < 30 or energy < 30
//! - health: -2 awake, -1 asleep, while any stat < 15

use crate::chronotype::{OFF_HOURS_DRAIN_FACTOR, PREFERRED_SLEEP_RECOVERY_FACTOR};
use crate::state::{clamp_stat, Vitals};
use crate::traits::DecayModifiers;

pub const HUNGER_RATE_AWAKE: f64 = 5.0;
pub const HUNGER_RATE_ASLEEP: f64 = 3.0;
pub const ENERGY_DRAIN_RATE: f64 = 5.0 / 2.0;
pub const ENERGY_RECOVERY_RATE: f64 = 10.0;
pub const HAPPINESS_RATE: f64 = 2.0;
pub const HEALTH_RATE_AWAKE: f64 = 2.0;
pub const HEALTH_RATE_ASLEEP: f64 = 1.0;

/// Happiness sags while hunger or energy sits below this.
pub const UNHAPPY_BELOW: f64 = 30.0;
/// Health erodes while any stat sits below this.
pub const FAILING_BELOW: f64 = 15.0;

/// Conditions that hold for one slice of elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct DecayContext {
    pub sleeping: bool,
    /// Inside the chronotype's active hours.
    pub active_hours: bool,
    /// Inside the chronotype's preferred sleep window.
    pub preferred_sleep: bool,
    pub modifiers: DecayModifiers,
}

impl DecayContext {
    pub fn awake(modifiers: DecayModifiers) -> Self {
        Self {
            sleeping: false,
            active_hours: true,
            preferred_sleep: false,
            modifiers,
        }
    }

    pub fn asleep(modifiers: DecayModifiers) -> Self {
        Self {
            sleeping: true,
            active_hours: false,
            preferred_sleep: true,
            modifiers,
        }
    }
}

pub fn hunger_loss(hours: f64, ctx: &DecayContext) -> f64 {
    let rate = if ctx.sleeping {
        HUNGER_RATE_ASLEEP
    } else {
        HUNGER_RATE_AWAKE
    };
    rate * hours * ctx.modifiers.hunger
}

pub fn energy_drain(hours: f64, ctx: &DecayContext) -> f64 {
    if ctx.sleeping {
        return 0.0;
    }
    let schedule = if ctx.active_hours {
        1.0
    } else {
        OFF_HOURS_DRAIN_FACTOR
    };
    ENERGY_DRAIN_RATE * hours * ctx.modifiers.energy_drain * schedule
}

pub fn energy_recovery(hours: f64, ctx: &DecayContext) -> f64 {
    if !ctx.sleeping {
        return 0.0;
    }
    let schedule = if ctx.preferred_sleep {
        PREFERRED_SLEEP_RECOVERY_FACTOR
    } else {
        1.0
    };
    ENERGY_RECOVERY_RATE * hours * ctx.modifiers.energy_recovery * schedule
}

pub fn happiness_loss(hours: f64, hunger: f64, energy: f64, ctx: &DecayContext) -> f64 {
    if hunger < UNHAPPY_BELOW || energy < UNHAPPY_BELOW {
        HAPPINESS_RATE * hours * ctx.modifiers.happiness
    } else {
        0.0
    }
}

pub fn health_loss(hours: f64, lowest_stat: f64, ctx: &DecayContext) -> f64 {
    if lowest_stat >= FAILING_BELOW {
        return 0.0;
    }
    let rate = if ctx.sleeping {
        HEALTH_RATE_ASLEEP
    } else {
        HEALTH_RATE_AWAKE
    };
    rate * hours * ctx.modifiers.health
}

/// Subtract a fractional loss with truncation, then clamp.
pub fn apply_loss(stat: i32, loss: f64) -> i32 {
    clamp_stat(stat - loss.max(0.0).trunc() as i32)
}

/// Fold `gain` into the carried remainder and hand back the whole units.
/// The fractional part stays in `remainder` for the next update.
pub fn accumulate(remainder: &mut f64, gain: f64) -> i32 {
    let total = *remainder + gain.max(0.0);
    let whole = total.floor();
    *remainder = total - whole;
    whole as i32
}

/// Running totals across the segments of one update.
#[derive(Debug, Clone, Default)]
pub struct DecayLedger {
    pub hunger: f64,
    pub energy_drain: f64,
    pub energy_recovery: f64,
    pub happiness: f64,
    pub health: f64,
}

/// Accumulates decay for a sequence of segments, tracking float shadow
/// stats so threshold rules switch on at the right point inside a long gap.
#[derive(Debug, Clone)]
pub struct StatModel {
    start: Vitals,
    shadow: [f64; 4],
    ledger: DecayLedger,
}

impl StatModel {
    pub fn new(start: Vitals) -> Self {
        Self {
            start,
            shadow: [
                start.hunger as f64,
                start.happiness as f64,
                start.energy as f64,
                start.health as f64,
            ],
            ledger: DecayLedger::default(),
        }
    }

    /// Advance by one slice of `hours` under `ctx`.
    pub fn step(&mut self, hours: f64, ctx: &DecayContext) {
        if hours <= 0.0 {
            return;
        }
        let [hunger, happiness, energy, health] = self.shadow;
        let lowest = hunger.min(happiness).min(energy).min(health);

        let d_hunger = hunger_loss(hours, ctx);
        let d_drain = energy_drain(hours, ctx);
        let d_recover = energy_recovery(hours, ctx);
        let d_happy = happiness_loss(hours, hunger, energy, ctx);
        let d_health = health_loss(hours, lowest, ctx);

        self.ledger.hunger += d_hunger;
        self.ledger.energy_drain += d_drain;
        self.ledger.energy_recovery += d_recover;
        self.ledger.happiness += d_happy;
        self.ledger.health += d_health;

        self.shadow = [
            (hunger - d_hunger).clamp(0.0, 100.0),
            (happiness - d_happy).clamp(0.0, 100.0),
            (energy - d_drain + d_recover).clamp(0.0, 100.0),
            (health - d_health).clamp(0.0, 100.0),
        ];
    }

    pub fn ledger(&self) -> &DecayLedger {
        &self.ledger
    }

    /// Truncate the accumulated losses once and apply them. Sleep recovery
    /// goes through `energy_remainder` instead of being truncated.
    pub fn finish(self, energy_remainder: &mut f64) -> Vitals {
        let ledger = self.ledger;
        let recovered = accumulate(energy_remainder, ledger.energy_recovery);
        let drained = apply_loss(self.start.energy, ledger.energy_drain);
        let mut vitals = Vitals {
            hunger: apply_loss(self.start.hunger, ledger.hunger),
            happiness: apply_loss(self.start.happiness, ledger.happiness),
            energy: clamp_stat(drained + recovered),
            health: apply_loss(self.start.health, ledger.health),
        };
        vitals.normalize();
        vitals
    }
}
