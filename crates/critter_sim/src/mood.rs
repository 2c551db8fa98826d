//! Mood re-selection
//!
//! Mood holds for 2-4 hours, then is re-drawn from a weighted table picked
//! by the first matching band: drowsy, bored, hungry, or content.

use chrono::{DateTime, Duration, Utc};
use critter_core::{MoodThresholds, Mood, PetState, RandomSource, Vitals};

pub const MIN_MOOD_HOURS: f64 = 2.0;
pub const MOOD_SPREAD_HOURS: f64 = 2.0;

const DROWSY: &[(Mood, f64)] = &[(Mood::Lazy, 0.6), (Mood::Needy, 0.2), (Mood::Normal, 0.2)];
const BORED: &[(Mood, f64)] = &[(Mood::Needy, 0.5), (Mood::Playful, 0.2), (Mood::Normal, 0.3)];
const HUNGRY: &[(Mood, f64)] = &[(Mood::Needy, 0.5), (Mood::Normal, 0.5)];
const CONTENT: &[(Mood, f64)] = &[
    (Mood::Normal, 0.6),
    (Mood::Playful, 0.2),
    (Mood::Lazy, 0.1),
    (Mood::Needy, 0.1),
];

/// Weighted table for the first band the vitals fall into.
pub fn mood_table(v: &Vitals, thresholds: &MoodThresholds) -> &'static [(Mood, f64)] {
    if v.energy < thresholds.drowsy_below {
        DROWSY
    } else if v.happiness < thresholds.bored_below {
        BORED
    } else if v.hunger < thresholds.hungry_below {
        HUNGRY
    } else {
        CONTENT
    }
}

/// Walk the cumulative weights with a single roll in `[0, 1)`.
pub fn pick(table: &[(Mood, f64)], roll: f64) -> Mood {
    let mut cumulative = 0.0;
    for &(mood, weight) in table {
        cumulative += weight;
        if roll < cumulative {
            return mood;
        }
    }
    table.last().map(|&(m, _)| m).unwrap_or_default()
}

pub fn mood_expired(pet: &PetState, now: DateTime<Utc>) -> bool {
    pet.mood_expires.map_or(true, |at| now >= at)
}

/// Re-draw the mood if the current one has run out. Returns the new mood
/// when it changed.
pub fn update_mood(
    pet: &mut PetState,
    now: DateTime<Utc>,
    thresholds: &MoodThresholds,
    rng: &mut dyn RandomSource,
) -> Option<Mood> {
    if !mood_expired(pet, now) {
        return None;
    }
    let mood = pick(mood_table(&pet.vitals, thresholds), rng.next_f64());
    let hours = MIN_MOOD_HOURS + rng.next_f64() * MOOD_SPREAD_HOURS;
    pet.mood_expires = Some(now + Duration::seconds((hours * 3600.0) as i64));

    if mood == pet.mood {
        return None;
    }
    let previous = pet.mood;
    pet.mood = mood;
    pet.log_status(now, format!("Feeling {}", mood.name()));
    tracing::debug!("{} mood {:?} -> {:?} for {:.1}h", pet.name, previous, mood, hours);
    Some(mood)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use critter_core::ScriptedRandom;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_band_cascade() {
        let t = MoodThresholds::default();
        let mut v = Vitals::default();
        assert_eq!(mood_table(&v, &t), CONTENT);
        v.hunger = 10;
        assert_eq!(mood_table(&v, &t), HUNGRY);
        v.happiness = 10;
        assert_eq!(mood_table(&v, &t), BORED);
        v.energy = 10;
        assert_eq!(mood_table(&v, &t), DROWSY);
    }

    #[test]
    fn test_pick_cumulative() {
        assert_eq!(pick(CONTENT, 0.0), Mood::Normal);
        assert_eq!(pick(CONTENT, 0.59), Mood::Normal);
        assert_eq!(pick(CONTENT, 0.61), Mood::Playful);
        assert_eq!(pick(CONTENT, 0.85), Mood::Lazy);
        assert_eq!(pick(CONTENT, 0.95), Mood::Needy);
        assert_eq!(pick(DROWSY, 0.3), Mood::Lazy);
        assert_eq!(pick(HUNGRY, 0.7), Mood::Normal);
    }

    #[test]
    fn test_reroll_only_after_expiry() {
        let mut p = PetState::hatch("Mochi", now(), &mut ScriptedRandom::never());
        let t = MoodThresholds::default();
        let mut rng = ScriptedRandom::new([0.7, 0.5], 0.0);
        assert_eq!(update_mood(&mut p, now(), &t, &mut rng), Some(Mood::Playful));
        assert_eq!(p.mood_expires, Some(now() + Duration::hours(3)));

        // Still inside the 3h window: nothing drawn.
        let mut rng = ScriptedRandom::new([0.99], 0.99);
        assert_eq!(update_mood(&mut p, now() + Duration::hours(2), &t, &mut rng), None);
        assert_eq!(rng.remaining(), 1);
        assert_eq!(p.mood, Mood::Playful);

        assert_eq!(
            update_mood(&mut p, now() + Duration::hours(3), &t, &mut rng),
            Some(Mood::Needy)
        );
    }

    #[test]
    fn test_duration_bounds() {
        let mut p = PetState::hatch("Mochi", now(), &mut ScriptedRandom::never());
        let t = MoodThresholds::default();
        update_mood(&mut p, now(), &t, &mut ScriptedRandom::new([0.1, 0.0], 0.0));
        assert_eq!(p.mood_expires, Some(now() + Duration::hours(2)));
        p.mood_expires = None;
        update_mood(&mut p, now(), &t, &mut ScriptedRandom::new([0.1, 0.999_999], 0.0));
        let expires = p.mood_expires.unwrap();
        assert!(expires < now() + Duration::hours(4));
        assert!(expires > now() + Duration::minutes(239));
    }
}
