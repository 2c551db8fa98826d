//! Owner actions
//!
//! Each action either mutates the pet and returns `Done`, or changes nothing
//! and returns `Refused` with the reason. Callers persist afterwards.

use crate::events::RespondError;
use crate::system::Simulation;
use crate::{bond, criticality, events, sleep};
use critter_core::state::clamp_stat;
use critter_core::traits::{multiplier, Modifier};
use chrono::{DateTime, Utc};
use critter_core::{ActionKind, Mood, PetState};
use serde::Serialize;
use std::fmt;

pub const FEED_GAIN: f64 = 30.0;
pub const FULL_AT_HUNGER: i32 = 90;
pub const PLAY_GAIN: f64 = 20.0;
pub const PLAY_ENERGY_COST: i32 = 10;
pub const PLAY_HUNGER_COST: i32 = 5;
pub const TOO_TIRED_BELOW: i32 = 15;
pub const MEDICINE_GAIN: f64 = 25.0;
pub const NO_MEDICINE_AT_HEALTH: i32 = 90;
pub const NEEDY_BONUS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum ActionOutcome {
    Done(String),
    Refused(String),
}

impl ActionOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ActionOutcome::Done(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ActionOutcome::Done(m) | ActionOutcome::Refused(m) => m,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Play multiplier from the current mood.
pub fn mood_play_factor(mood: Mood) -> f64 {
    match mood {
        Mood::Playful => 1.5,
        Mood::Lazy => 0.5,
        _ => 1.0,
    }
}

fn scaled(base: f64, factor: f64) -> i32 {
    (base * factor).round() as i32
}

/// Shared tail of every accepted action: credit the bond and re-check the
/// critical timer against the new vitals.
fn settle(pet: &mut PetState, kind: ActionKind, before: i32, now: DateTime<Utc>) {
    bond::record_interaction(pet, kind, before, now);
    criticality::refresh_timer(pet, now);
}

fn passed_away(pet: &PetState) -> Option<ActionOutcome> {
    pet.dead
        .then(|| ActionOutcome::Refused(format!("{} has passed away", pet.name)))
}

impl Simulation {
    pub fn feed(&self, pet: &mut PetState) -> ActionOutcome {
        if let Some(refused) = passed_away(pet) {
            return refused;
        }
        if pet.sleeping {
            return ActionOutcome::Refused(format!("{} is asleep", pet.name));
        }
        if pet.vitals.hunger >= FULL_AT_HUNGER {
            return ActionOutcome::Refused(format!("{} is too full", pet.name));
        }

        let now = self.now();
        let before = pet.vitals.hunger;
        let gain = scaled(
            FEED_GAIN,
            multiplier(&pet.traits, Modifier::FeedBonus) * bond::effectiveness(pet.bond),
        );
        pet.vitals.hunger = clamp_stat(before + gain);
        if pet.mood == Mood::Needy {
            pet.vitals.happiness = clamp_stat(pet.vitals.happiness + NEEDY_BONUS);
        }
        settle(pet, ActionKind::Feed, before, now);
        tracing::info!("Fed {}: hunger {} -> {}", pet.name, before, pet.vitals.hunger);
        ActionOutcome::Done(format!("{} munches happily (+{} hunger)", pet.name, gain))
    }

    pub fn play(&self, pet: &mut PetState) -> ActionOutcome {
        if let Some(refused) = passed_away(pet) {
            return refused;
        }
        if pet.sleeping {
            return ActionOutcome::Refused(format!("{} is asleep", pet.name));
        }
        if pet.ill {
            return ActionOutcome::Refused(format!("{} is too sick to play", pet.name));
        }
        if pet.vitals.energy < TOO_TIRED_BELOW {
            return ActionOutcome::Refused(format!("{} is too tired", pet.name));
        }

        let now = self.now();
        let before = pet.vitals.happiness;
        let factor = multiplier(&pet.traits, Modifier::PlayBonus)
            * mood_play_factor(pet.mood)
            * bond::effectiveness(pet.bond);
        let mut gain = scaled(PLAY_GAIN, factor);
        if pet.mood == Mood::Needy {
            gain += NEEDY_BONUS;
        }
        pet.vitals.happiness += gain;
        pet.vitals.energy -= PLAY_ENERGY_COST;
        pet.vitals.hunger -= PLAY_HUNGER_COST;
        pet.vitals.normalize();
        settle(pet, ActionKind::Play, before, now);
        tracing::info!("Played with {}: happiness {} -> {}", pet.name, before, pet.vitals.happiness);
        ActionOutcome::Done(format!("{} had fun (+{} happiness)", pet.name, gain))
    }

    pub fn toggle_sleep(&self, pet: &mut PetState) -> ActionOutcome {
        if let Some(refused) = passed_away(pet) {
            return refused;
        }
        let now = self.now();
        let before = pet.vitals.energy;
        let message = if pet.sleeping {
            sleep::wake_up(pet, now);
            format!("{} wakes up", pet.name)
        } else {
            sleep::fall_asleep(pet, now);
            format!("{} curls up for a nap", pet.name)
        };
        settle(pet, ActionKind::Sleep, before, now);
        ActionOutcome::Done(message)
    }

    pub fn administer_medicine(&self, pet: &mut PetState) -> ActionOutcome {
        if let Some(refused) = passed_away(pet) {
            return refused;
        }
        if !pet.ill && pet.vitals.health >= NO_MEDICINE_AT_HEALTH {
            return ActionOutcome::Refused(format!("{} doesn't need medicine", pet.name));
        }

        let now = self.now();
        let before = pet.vitals.health;
        let gain = scaled(MEDICINE_GAIN, bond::effectiveness(pet.bond));
        pet.vitals.health = clamp_stat(before + gain);
        if pet.ill {
            pet.ill = false;
            pet.log_status(now, "Cured by medicine");
        }
        settle(pet, ActionKind::Medicine, before, now);
        tracing::info!("Gave {} medicine: health {} -> {}", pet.name, before, pet.vitals.health);
        ActionOutcome::Done(format!("{} takes the medicine (+{} health)", pet.name, gain))
    }

    pub fn respond_to_event(&self, pet: &mut PetState) -> ActionOutcome {
        if let Some(refused) = passed_away(pet) {
            return refused;
        }
        let now = self.now();
        let before = pet.vitals.happiness;
        match events::respond(pet, now) {
            Ok(kind) => {
                settle(pet, ActionKind::Respond, before, now);
                ActionOutcome::Done(format!(
                    "You {} {}. {} feels better",
                    events::response_verb(kind),
                    pet.name,
                    pet.name
                ))
            }
            Err(RespondError::NoEvent) => {
                ActionOutcome::Refused(format!("Nothing is going on with {}", pet.name))
            }
            Err(RespondError::AlreadyResponded) => {
                ActionOutcome::Refused("You already helped with that".to_string())
            }
            Err(RespondError::Expired) => ActionOutcome::Refused("Too late, it's over".to_string()),
        }
    }
}
