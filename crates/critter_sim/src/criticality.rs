//! Critical-state timer and death determination
//!
//! Two independent ways to die, both checked on every update:
//! - neglect: the critical condition held continuously for more than 12h
//! - old age: past 168h, a roll of `(age - 168) / 1000` per update

use chrono::{DateTime, Duration, Utc};
use critter_core::{DeathCause, PetState, RandomSource, Vitals};

pub const CRITICAL_HEALTH_AT_OR_BELOW: i32 = 20;
pub const CRITICAL_OTHER_BELOW: i32 = 10;
pub const CRITICAL_GRACE_HOURS: i64 = 12;
pub const LIFESPAN_HOURS: u32 = 168;

pub fn is_critical(v: &Vitals) -> bool {
    v.health <= CRITICAL_HEALTH_AT_OR_BELOW
        || v.hunger < CRITICAL_OTHER_BELOW
        || v.happiness < CRITICAL_OTHER_BELOW
        || v.energy < CRITICAL_OTHER_BELOW
}

/// Cause attributed when the critical timer runs out.
pub fn neglect_cause(pet: &PetState) -> DeathCause {
    if pet.vitals.hunger <= 0 {
        DeathCause::Starvation
    } else if pet.ill {
        DeathCause::Sickness
    } else {
        DeathCause::Neglect
    }
}

/// Mark the pet dead. A pet only dies once; later calls are ignored.
pub fn declare_death(pet: &mut PetState, cause: DeathCause, now: DateTime<Utc>) -> bool {
    if pet.dead {
        return false;
    }
    pet.dead = true;
    pet.cause_of_death = Some(cause);
    pet.died_at = Some(now);
    pet.current_event = None;
    let name = pet.name.clone();
    pet.log_status(now, format!("{} died of {}", name, cause.describe()));
    tracing::info!("{} died of {}", name, cause.describe());
    true
}

/// Start, hold or reset the critical timer; declare death when it runs out.
pub fn update_critical(pet: &mut PetState, now: DateTime<Utc>) -> Option<DeathCause> {
    match (is_critical(&pet.vitals), pet.critical_since) {
        (true, Some(since)) if now - since > Duration::hours(CRITICAL_GRACE_HOURS) => {
            let cause = neglect_cause(pet);
            declare_death(pet, cause, now).then_some(cause)
        }
        _ => {
            refresh_timer(pet, now);
            None
        }
    }
}

/// Bring the timer in line with the current vitals without judging it.
/// Owner actions call this so a rescued pet starts its next critical
/// episode from zero.
pub fn refresh_timer(pet: &mut PetState, now: DateTime<Utc>) {
    if pet.dead {
        return;
    }
    let critical = is_critical(&pet.vitals);
    if !critical && pet.critical_since.take().is_some() {
        pet.log_status(now, "Out of danger");
        tracing::debug!("{} left the critical state", pet.name);
    } else if critical && pet.critical_since.is_none() {
        pet.critical_since = Some(now);
        pet.log_status(now, "Entered a critical state");
        tracing::info!("{} is in a critical state", pet.name);
    }
}

pub fn old_age_probability(age_hours: u32) -> f64 {
    if age_hours < LIFESPAN_HOURS {
        0.0
    } else {
        (f64::from(age_hours - LIFESPAN_HOURS) / 1000.0).min(1.0)
    }
}

/// Roll for death of old age. Always draws once past the lifespan, so the
/// RNG sequence does not depend on whether the neglect check fired first.
pub fn roll_old_age(
    pet: &mut PetState,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Option<DeathCause> {
    let p = old_age_probability(pet.age_hours);
    if p <= 0.0 {
        return None;
    }
    if rng.chance(p) && declare_death(pet, DeathCause::OldAge, now) {
        return Some(DeathCause::OldAge);
    }
    None
}
