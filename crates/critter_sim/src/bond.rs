//! Trust between pet and owner
//!
//! Bond rises with care, most for care that arrives when it is needed, and
//! erodes when the owner stays away. It feeds back into how well feeding,
//! play and medicine work, and from 70 upwards into illness resistance.

use chrono::{DateTime, Duration, Utc};
use critter_core::state::clamp_stat;
use critter_core::traits::{multiplier, Modifier};
use critter_core::{ActionKind, PetState};

/// A triggering stat below this before the action counts as well timed.
pub const WELL_TIMED_BELOW: i32 = 50;
pub const WELL_TIMED_GAIN: i32 = 2;
pub const ROUTINE_GAIN: i32 = 1;
pub const SPAM_WINDOW_MINUTES: i64 = 60;
pub const GRACE_HOURS: i64 = 24;
pub const DECAY_PERIOD_HOURS: i64 = 12;
pub const RESISTANCE_FROM_BOND: i32 = 70;

/// Base gain before trait scaling.
pub fn base_gain(pet: &PetState, action: ActionKind, stat_before: i32, now: DateTime<Utc>) -> i32 {
    let window = Duration::minutes(SPAM_WINDOW_MINUTES);
    let spam = pet
        .interactions
        .iter()
        .rev()
        .take_while(|i| now - i.at < window)
        .any(|i| i.action == action);
    if spam {
        0
    } else if stat_before < WELL_TIMED_BELOW {
        WELL_TIMED_GAIN
    } else {
        ROUTINE_GAIN
    }
}

/// Scale a positive gain by the pet's sociability. Never rounds a real
/// gain down to nothing.
pub fn scaled_gain(pet: &PetState, base: i32) -> i32 {
    if base <= 0 {
        return 0;
    }
    let scaled = (f64::from(base) * multiplier(&pet.traits, Modifier::BondGain)).round() as i32;
    scaled.max(1)
}

/// Record an accepted action and apply its bond gain. Returns the gain.
pub fn record_interaction(
    pet: &mut PetState,
    action: ActionKind,
    stat_before: i32,
    now: DateTime<Utc>,
) -> i32 {
    let gain = scaled_gain(pet, base_gain(pet, action, stat_before, now));
    pet.bond = clamp_stat(pet.bond + gain);
    pet.bond_decay_periods = 0;
    pet.record_interaction(action, now);
    tracing::debug!("{:?} interaction: bond +{} -> {}", action, gain, pet.bond);
    gain
}

/// Complete decay periods owed for the absence ending at `now`.
pub fn decay_periods(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let past_grace = now - last_seen - Duration::hours(GRACE_HOURS);
    if past_grace < Duration::zero() {
        return 0;
    }
    let periods = past_grace.num_hours() / DECAY_PERIOD_HOURS;
    u32::try_from(periods).unwrap_or(u32::MAX)
}

/// Charge any decay periods not yet charged. Safe to call on every update.
pub fn apply_decay(pet: &mut PetState, now: DateTime<Utc>) -> i32 {
    let last_seen = pet
        .last_interaction()
        .map(|i| i.at)
        .unwrap_or(pet.birth_time);
    let owed = decay_periods(last_seen, now);
    if owed <= pet.bond_decay_periods {
        return 0;
    }
    let due = owed - pet.bond_decay_periods;
    let before = pet.bond;
    pet.bond = clamp_stat(pet.bond - i32::try_from(due).unwrap_or(i32::MAX));
    pet.bond_decay_periods = owed;
    let lost = before - pet.bond;
    if lost > 0 {
        tracing::debug!("Bond decayed by {} after {} periods alone", lost, owed);
    }
    lost
}

/// 0.5 at bond 0, 1.0 at bond 100.
pub fn effectiveness(bond: i32) -> f64 {
    0.5 + 0.5 * f64::from(clamp_stat(bond)) / 100.0
}

/// Multiplier on illness chance: 1.0 below 70, falling linearly to 0.5 at 100.
pub fn illness_resistance(bond: i32) -> f64 {
    let bond = clamp_stat(bond);
    if bond < RESISTANCE_FROM_BOND {
        1.0
    } else {
        1.0 - 0.5 * f64::from(bond - RESISTANCE_FROM_BOND) / f64::from(100 - RESISTANCE_FROM_BOND)
    }
}

pub fn describe(bond: i32) -> &'static str {
    match bond {
        i32::MIN..=19 => "Wary",
        20..=39 => "Tolerant",
        40..=59 => "Friendly",
        60..=79 => "Trusting",
        _ => "Devoted",
    }
}
