//! Autonomous sleep/wake
//!
//! Awake -> Asleep when energy drops to the threshold (20, or 40 outside
//! the chronotype's active hours).
//! Asleep -> Awake after 8h, or after 6h once energy is back to 80 during
//! active hours. A full battery alone never ends a nap early.

use chrono::{DateTime, Duration, Utc};
use critter_core::PetState;

pub const SLEEP_AT_ENERGY: i32 = 20;
pub const SLEEP_AT_ENERGY_OFF_HOURS: i32 = 40;
pub const MAX_SLEEP_HOURS: i64 = 8;
pub const MIN_SLEEP_HOURS: i64 = 6;
pub const RESTED_ENERGY: i32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTransition {
    FellAsleep,
    WokeUp,
}

pub fn sleep_threshold(active_hours: bool) -> i32 {
    if active_hours {
        SLEEP_AT_ENERGY
    } else {
        SLEEP_AT_ENERGY_OFF_HOURS
    }
}

pub fn fall_asleep(pet: &mut PetState, now: DateTime<Utc>) {
    pet.sleeping = true;
    pet.sleep_started = Some(now);
    pet.log_status(now, "Fell asleep");
}

pub fn wake_up(pet: &mut PetState, now: DateTime<Utc>) {
    pet.sleeping = false;
    pet.sleep_started = None;
    pet.energy_remainder = 0.0;
    pet.log_status(now, "Woke up");
}

/// Evaluate the sleep state machine once. `active_hours` is whether `now`
/// falls inside the pet's chronotype active window.
pub fn update_sleep(
    pet: &mut PetState,
    now: DateTime<Utc>,
    active_hours: bool,
) -> Option<SleepTransition> {
    if pet.dead {
        return None;
    }

    if !pet.sleeping {
        if pet.vitals.energy <= sleep_threshold(active_hours) {
            fall_asleep(pet, now);
            tracing::info!("{} dozed off (energy {})", pet.name, pet.vitals.energy);
            return Some(SleepTransition::FellAsleep);
        }
        return None;
    }

    let started = match pet.sleep_started {
        Some(at) => at,
        None => {
            // Asleep without a start time: count the nap from here.
            pet.sleep_started = Some(now);
            now
        }
    };
    let slept = now - started;
    let done = slept >= Duration::hours(MAX_SLEEP_HOURS)
        || (slept >= Duration::hours(MIN_SLEEP_HOURS)
            && pet.vitals.energy >= RESTED_ENERGY
            && active_hours);
    if done {
        wake_up(pet, now);
        tracing::info!("{} woke up after {}h", pet.name, slept.num_hours());
        return Some(SleepTransition::WokeUp);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use critter_core::ScriptedRandom;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn pet() -> PetState {
        PetState::hatch("Mochi", now(), &mut ScriptedRandom::never())
    }

    #[test]
    fn test_falls_asleep_at_threshold() {
        let mut p = pet();
        p.vitals.energy = 21;
        assert_eq!(update_sleep(&mut p, now(), true), None);
        p.vitals.energy = 20;
        assert_eq!(update_sleep(&mut p, now(), true), Some(SleepTransition::FellAsleep));
        assert!(p.sleeping);
        assert_eq!(p.sleep_started, Some(now()));
    }

    #[test]
    fn test_off_hours_threshold_is_higher() {
        let mut p = pet();
        p.vitals.energy = 35;
        assert_eq!(update_sleep(&mut p, now(), true), None);
        assert_eq!(update_sleep(&mut p, now(), false), Some(SleepTransition::FellAsleep));
    }

    #[test]
    fn test_no_flicker_before_minimum() {
        let mut p = pet();
        fall_asleep(&mut p, now());
        p.vitals.energy = 100;
        assert_eq!(update_sleep(&mut p, now() + Duration::hours(5), true), None);
        assert!(p.sleeping);
    }

    #[test]
    fn test_early_wake_needs_energy_and_active_hours() {
        let mut p = pet();
        fall_asleep(&mut p, now());
        p.vitals.energy = 85;
        let six = now() + Duration::hours(6);
        assert_eq!(update_sleep(&mut p, six, false), None);
        p.vitals.energy = 79;
        assert_eq!(update_sleep(&mut p, six, true), None);
        p.vitals.energy = 80;
        p.energy_remainder = 0.4;
        assert_eq!(update_sleep(&mut p, six, true), Some(SleepTransition::WokeUp));
        assert!(!p.sleeping);
        assert_eq!(p.sleep_started, None);
        assert_eq!(p.energy_remainder, 0.0);
    }

    #[test]
    fn test_always_wakes_after_eight_hours() {
        let mut p = pet();
        fall_asleep(&mut p, now());
        p.vitals.energy = 30;
        assert_eq!(
            update_sleep(&mut p, now() + Duration::hours(8), false),
            Some(SleepTransition::WokeUp)
        );
    }

    #[test]
    fn test_dead_pet_does_not_sleep() {
        let mut p = pet();
        p.dead = true;
        p.vitals.energy = 0;
        assert_eq!(update_sleep(&mut p, now(), true), None);
        assert!(!p.sleeping);
    }
}
