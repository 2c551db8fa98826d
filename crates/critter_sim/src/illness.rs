//! Illness: caught by chance while health is poor, gone once health recovers.

use crate::bond;
use chrono::{DateTime, Utc};
use critter_core::traits::{multiplier, Modifier};
use critter_core::{PetState, RandomSource};

pub const BASE_ILLNESS_CHANCE: f64 = 0.10;
pub const VULNERABLE_BELOW_HEALTH: i32 = 50;

pub fn illness_chance(pet: &PetState) -> f64 {
    BASE_ILLNESS_CHANCE
        * multiplier(&pet.traits, Modifier::IllnessChance)
        * bond::illness_resistance(pet.bond)
}

/// Clear or contract illness. Returns `Some(true)` when the pet fell ill
/// and `Some(false)` when it recovered.
pub fn update_illness(
    pet: &mut PetState,
    now: DateTime<Utc>,
    rolls_enabled: bool,
    rng: &mut dyn RandomSource,
) -> Option<bool> {
    if pet.vitals.health >= VULNERABLE_BELOW_HEALTH {
        if pet.ill {
            pet.ill = false;
            pet.log_status(now, "Recovered from illness");
            tracing::info!("{} recovered from illness", pet.name);
            return Some(false);
        }
        return None;
    }

    if pet.ill || !rolls_enabled {
        return None;
    }

    if rng.chance(illness_chance(pet)) {
        pet.ill = true;
        pet.log_status(now, "Fell ill");
        tracing::info!("{} fell ill", pet.name);
        return Some(true);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use critter_core::{PetTrait, ScriptedRandom};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sickly_pet() -> PetState {
        let mut p = PetState::hatch("Mochi", now(), &mut ScriptedRandom::never());
        p.traits.clear();
        p.bond = 30;
        p.vitals.health = 40;
        p
    }

    #[test]
    fn test_chance_composition() {
        let mut p = sickly_pet();
        assert!((illness_chance(&p) - 0.10).abs() < 1e-12);
        p.traits = vec![PetTrait::Fragile];
        assert!((illness_chance(&p) - 0.15).abs() < 1e-12);
        p.bond = 100;
        assert!((illness_chance(&p) - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_falls_ill_on_successful_roll() {
        let mut p = sickly_pet();
        let mut rng = ScriptedRandom::new([0.5, 0.05], 0.9);
        assert_eq!(update_illness(&mut p, now(), true, &mut rng), None);
        assert_eq!(update_illness(&mut p, now(), true, &mut rng), Some(true));
        assert!(p.ill);
    }

    #[test]
    fn test_no_roll_without_elapsed_time() {
        let mut p = sickly_pet();
        let mut rng = ScriptedRandom::always();
        assert_eq!(update_illness(&mut p, now(), false, &mut rng), None);
        assert!(!p.ill);
    }

    #[test]
    fn test_recovers_when_healthy() {
        let mut p = sickly_pet();
        p.ill = true;
        p.vitals.health = 50;
        assert_eq!(
            update_illness(&mut p, now(), true, &mut ScriptedRandom::always()),
            Some(false)
        );
        assert!(!p.ill);
    }

    #[test]
    fn test_healthy_pet_never_rolls() {
        let mut p = sickly_pet();
        p.vitals.health = 90;
        let mut rng = ScriptedRandom::new([0.0], 0.0);
        update_illness(&mut p, now(), true, &mut rng);
        assert!(!p.ill);
        assert_eq!(rng.remaining(), 1);
    }
}
