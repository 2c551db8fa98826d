//! Random life events
//!
//! The catalog is a fixed, order-significant list of `EventKind`s. Each kind
//! maps onto a row of pure functions (trigger, odds, duration, ignored
//! consequence, responded reward). One dispatcher walks the list and starts
//! the first event whose trigger holds and whose roll succeeds, so entries
//! earlier in the list take priority over later ones.

use chrono::{DateTime, Duration, Utc};
use critter_core::{
    ActiveEvent, EventKind, EventOutcome, EventRecord, Mood, PetState, RandomSource,
};

/// Declaration order is trigger priority.
pub const CATALOG: [EventKind; 6] = [
    EventKind::Nightmare,
    EventKind::Lonely,
    EventKind::UpsetTummy,
    EventKind::Sniffles,
    EventKind::Zoomies,
    EventKind::FoundTreasure,
];

pub fn triggers(kind: EventKind, pet: &PetState) -> bool {
    let v = &pet.vitals;
    match kind {
        EventKind::Nightmare => pet.sleeping,
        EventKind::Lonely => !pet.sleeping && v.happiness < 50,
        EventKind::UpsetTummy => !pet.sleeping && v.hunger > 85,
        EventKind::Sniffles => !pet.sleeping && !pet.ill && v.health < 70,
        EventKind::Zoomies => !pet.sleeping && v.energy > 80,
        EventKind::FoundTreasure => !pet.sleeping && pet.mood == Mood::Playful,
    }
}

pub fn probability(kind: EventKind) -> f64 {
    match kind {
        EventKind::Nightmare => 0.08,
        EventKind::Lonely => 0.15,
        EventKind::UpsetTummy => 0.10,
        EventKind::Sniffles => 0.05,
        EventKind::Zoomies => 0.10,
        EventKind::FoundTreasure => 0.10,
    }
}

pub fn duration(kind: EventKind) -> Duration {
    match kind {
        EventKind::Nightmare => Duration::hours(1),
        EventKind::Lonely => Duration::hours(2),
        EventKind::UpsetTummy => Duration::hours(2),
        EventKind::Sniffles => Duration::hours(3),
        EventKind::Zoomies => Duration::hours(1),
        EventKind::FoundTreasure => Duration::hours(1),
    }
}

/// Consequence applied when the event runs out unanswered.
pub fn apply_ignored(kind: EventKind, pet: &mut PetState) {
    let v = &mut pet.vitals;
    match kind {
        EventKind::Nightmare => {
            v.happiness -= 15;
            v.energy -= 10;
        }
        EventKind::Lonely => v.happiness -= 10,
        EventKind::UpsetTummy => v.health -= 10,
        EventKind::Sniffles => {
            v.health -= 5;
            pet.ill = true;
        }
        EventKind::Zoomies => {
            v.hunger -= 10;
            v.energy -= 15;
        }
        EventKind::FoundTreasure => v.happiness -= 5,
    }
    pet.vitals.normalize();
}

/// Reward applied when the owner responds in time.
pub fn apply_reward(kind: EventKind, pet: &mut PetState) {
    let v = &mut pet.vitals;
    match kind {
        EventKind::Nightmare => v.happiness += 10,
        EventKind::Lonely => v.happiness += 15,
        EventKind::UpsetTummy => v.health += 5,
        EventKind::Sniffles => v.health += 10,
        EventKind::Zoomies => {
            v.happiness += 10;
            v.energy -= 10;
        }
        EventKind::FoundTreasure => v.happiness += 20,
    }
    pet.vitals.normalize();
}

pub fn headline(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Nightmare => "is having a nightmare",
        EventKind::Lonely => "is feeling lonely",
        EventKind::UpsetTummy => "has an upset tummy",
        EventKind::Sniffles => "has the sniffles",
        EventKind::Zoomies => "has the zoomies",
        EventKind::FoundTreasure => "found something shiny",
    }
}

pub fn emoji(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Nightmare => "😱",
        EventKind::Lonely => "🥺",
        EventKind::UpsetTummy => "🤢",
        EventKind::Sniffles => "🤧",
        EventKind::Zoomies => "💨",
        EventKind::FoundTreasure => "✨",
    }
}

/// What responding looks like, for prompts.
pub fn response_verb(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Nightmare => "comfort",
        EventKind::Lonely => "cuddle",
        EventKind::UpsetTummy => "rub its belly",
        EventKind::Sniffles => "wrap it up warm",
        EventKind::Zoomies => "chase it around",
        EventKind::FoundTreasure => "admire the treasure",
    }
}

/// What the per-update event pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventPass {
    pub ignored: Option<EventKind>,
    pub started: Option<EventKind>,
}

/// Expire the current event if due, then maybe start a new one.
pub fn update_events(
    pet: &mut PetState,
    now: DateTime<Utc>,
    rolls_enabled: bool,
    rng: &mut dyn RandomSource,
) -> EventPass {
    let mut pass = EventPass::default();

    if let Some(active) = pet.current_event.clone() {
        if !active.is_expired(now) {
            return pass;
        }
        if !active.responded {
            apply_ignored(active.kind, pet);
            pet.log_event(EventRecord {
                kind: active.kind,
                at: now,
                outcome: EventOutcome::Ignored,
            });
            let name = pet.name.clone();
            pet.log_status(now, format!("{} {} and nobody came", name, headline(active.kind)));
            tracing::info!("Event {:?} expired unanswered", active.kind);
            pass.ignored = Some(active.kind);
        }
        pet.current_event = None;
    }

    if pet.dead || !rolls_enabled {
        return pass;
    }

    let chosen = CATALOG
        .iter()
        .copied()
        .find(|&kind| triggers(kind, pet) && rng.chance(probability(kind)));

    if let Some(kind) = chosen {
        pet.current_event = Some(ActiveEvent {
            kind,
            started_at: now,
            expires_at: now + duration(kind),
            responded: false,
        });
        let name = pet.name.clone();
        pet.log_status(now, format!("{} {}", name, headline(kind)));
        tracing::info!("Event {:?} started", kind);
        pass.started = Some(kind);
    }
    pass
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondError {
    NoEvent,
    AlreadyResponded,
    Expired,
}

/// Answer the current event: apply its reward, mark it, log it.
pub fn respond(pet: &mut PetState, now: DateTime<Utc>) -> Result<EventKind, RespondError> {
    let active = pet.current_event.as_ref().ok_or(RespondError::NoEvent)?;
    if active.responded {
        return Err(RespondError::AlreadyResponded);
    }
    if active.is_expired(now) {
        return Err(RespondError::Expired);
    }
    let kind = active.kind;
    apply_reward(kind, pet);
    if let Some(active) = pet.current_event.as_mut() {
        active.responded = true;
    }
    pet.log_event(EventRecord {
        kind,
        at: now,
        outcome: EventOutcome::Responded,
    });
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use critter_core::state::MAX_EVENT_LOG;
    use critter_core::ScriptedRandom;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn pet() -> PetState {
        let mut p = PetState::hatch("Mochi", now(), &mut ScriptedRandom::never());
        p.vitals.energy = 60;
        p.vitals.hunger = 60;
        p
    }

    #[test]
    fn test_first_match_wins() {
        let mut p = pet();
        p.vitals.happiness = 40; // Lonely eligible
        p.vitals.hunger = 90; // UpsetTummy eligible
        let mut rng = ScriptedRandom::always();
        let pass = update_events(&mut p, now(), true, &mut rng);
        assert_eq!(pass.started, Some(EventKind::Lonely));
    }

    #[test]
    fn test_failed_roll_falls_through() {
        let mut p = pet();
        p.vitals.happiness = 40;
        p.vitals.hunger = 90;
        // Lonely roll fails, UpsetTummy roll succeeds.
        let mut rng = ScriptedRandom::new([0.5, 0.01], 0.99);
        let pass = update_events(&mut p, now(), true, &mut rng);
        assert_eq!(pass.started, Some(EventKind::UpsetTummy));
        let ev = p.current_event.clone().unwrap();
        assert_eq!(ev.expires_at, now() + Duration::hours(2));
    }

    #[test]
    fn test_only_eligible_entries_roll() {
        let mut p = pet();
        let mut rng = ScriptedRandom::new([0.0], 0.0);
        // Nothing eligible with middling stats and a normal mood.
        let pass = update_events(&mut p, now(), true, &mut rng);
        assert_eq!(pass.started, None);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_active_event_blocks_new_ones() {
        let mut p = pet();
        p.vitals.happiness = 40;
        update_events(&mut p, now(), true, &mut ScriptedRandom::always());
        let pass = update_events(
            &mut p,
            now() + Duration::minutes(30),
            true,
            &mut ScriptedRandom::always(),
        );
        assert_eq!(pass, EventPass::default());
    }

    #[test]
    fn test_ignored_event_applies_consequence() {
        let mut p = pet();
        p.vitals.happiness = 40;
        update_events(&mut p, now(), true, &mut ScriptedRandom::always());
        let pass = update_events(
            &mut p,
            now() + Duration::hours(2),
            true,
            &mut ScriptedRandom::never(),
        );
        assert_eq!(pass.ignored, Some(EventKind::Lonely));
        assert_eq!(pass.started, None);
        assert_eq!(p.vitals.happiness, 30);
        assert!(p.current_event.is_none());
        assert_eq!(p.event_log.last().map(|r| r.outcome), Some(EventOutcome::Ignored));
    }

    #[test]
    fn test_respond_rewards_once() {
        let mut p = pet();
        p.vitals.happiness = 40;
        update_events(&mut p, now(), true, &mut ScriptedRandom::always());
        assert_eq!(respond(&mut p, now()), Ok(EventKind::Lonely));
        assert_eq!(p.vitals.happiness, 55);
        assert_eq!(respond(&mut p, now()), Err(RespondError::AlreadyResponded));

        // Responded events expire quietly.
        let pass = update_events(
            &mut p,
            now() + Duration::hours(2),
            true,
            &mut ScriptedRandom::never(),
        );
        assert_eq!(pass.ignored, None);
        assert_eq!(p.vitals.happiness, 55);
        assert_eq!(p.event_log.len(), 1);
    }

    #[test]
    fn test_respond_errors() {
        let mut p = pet();
        assert_eq!(respond(&mut p, now()), Err(RespondError::NoEvent));
        p.current_event = Some(ActiveEvent {
            kind: EventKind::Zoomies,
            started_at: now() - Duration::hours(2),
            expires_at: now() - Duration::hours(1),
            responded: false,
        });
        assert_eq!(respond(&mut p, now()), Err(RespondError::Expired));
    }

    #[test]
    fn test_sniffles_ignored_causes_illness() {
        let mut p = pet();
        apply_ignored(EventKind::Sniffles, &mut p);
        assert!(p.ill);
    }

    #[test]
    fn test_event_log_bounded() {
        let mut p = pet();
        for i in 0..30 {
            p.log_event(EventRecord {
                kind: EventKind::Zoomies,
                at: now() + Duration::minutes(i),
                outcome: EventOutcome::Responded,
            });
        }
        assert_eq!(p.event_log.len(), MAX_EVENT_LOG);
        assert_eq!(p.event_log[0].at, now() + Duration::minutes(10));
    }

    #[test]
    fn test_no_rolls_without_elapsed_time() {
        let mut p = pet();
        p.vitals.happiness = 40;
        let pass = update_events(&mut p, now(), false, &mut ScriptedRandom::always());
        assert_eq!(pass.started, None);
    }
}
