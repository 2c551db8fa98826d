//! Read-only views of a pet for status bars, prompts and JSON output.

use crate::{bond, criticality, events};
use chrono::{DateTime, Utc};
use critter_core::{PetState, Vitals};
use serde::Serialize;
use std::fmt::Write as _;

pub const DEAD_EMOJI: &str = "💀";

pub fn form_name(pet: &PetState) -> &'static str {
    pet.form.name()
}

pub fn form_emoji(pet: &PetState) -> &'static str {
    if pet.dead {
        DEAD_EMOJI
    } else {
        pet.form.emoji()
    }
}

pub fn bond_description(pet: &PetState) -> &'static str {
    bond::describe(pet.bond)
}

fn flags(pet: &PetState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if pet.sleeping {
        out.push_str(" 💤");
    }
    if pet.ill {
        out.push_str(" 🤒");
    }
    if pet.critical_since.is_some() {
        out.push_str(" ⚠️");
    }
    if let Some(event) = pending_event(pet, now) {
        out.push(' ');
        out.push_str(events::emoji(event));
    }
    out
}

fn pending_event(pet: &PetState, now: DateTime<Utc>) -> Option<critter_core::EventKind> {
    pet.current_event
        .as_ref()
        .filter(|e| !e.responded && !e.is_expired(now))
        .map(|e| e.kind)
}

/// One-line status for a terminal status bar.
pub fn status_line(pet: &PetState, now: DateTime<Utc>) -> String {
    if pet.dead {
        let cause = pet.cause_of_death.map_or("unknown causes", |c| c.describe());
        return format!("{} {} ({})", DEAD_EMOJI, pet.name, cause);
    }
    let v = &pet.vitals;
    format!(
        "{} {} 🍖{} 😊{} ⚡{} ❤️{}{}",
        form_emoji(pet),
        pet.name,
        v.hunger,
        v.happiness,
        v.energy,
        v.health,
        flags(pet, now)
    )
}

/// Status line with the stat names spelled out.
pub fn status_with_label(pet: &PetState, now: DateTime<Utc>) -> String {
    if pet.dead {
        return status_line(pet, now);
    }
    let v = &pet.vitals;
    format!(
        "{} {} the {} | Hunger {} | Happy {} | Energy {} | Health {} | {}{}",
        form_emoji(pet),
        pet.name,
        form_name(pet),
        v.hunger,
        v.happiness,
        v.energy,
        v.health,
        pet.mood.name(),
        flags(pet, now)
    )
}

/// Prompt for the current event, if one is waiting for a response.
pub fn event_display(pet: &PetState, now: DateTime<Utc>) -> Option<String> {
    let active = pet.current_event.as_ref()?;
    if active.responded || active.is_expired(now) || pet.dead {
        return None;
    }
    let minutes_left = (active.expires_at - now).num_minutes().max(1);
    Some(format!(
        "{} {} {}! {} min left to {} it",
        events::emoji(active.kind),
        pet.name,
        events::headline(active.kind),
        minutes_left,
        events::response_verb(active.kind)
    ))
}

/// Full multi-line dump.
pub fn stats_report(pet: &PetState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let v = &pet.vitals;
    let _ = writeln!(out, "{} {} ({})", form_emoji(pet), pet.name, form_name(pet));
    let _ = writeln!(
        out,
        "Age: {}h ({}) | Chronotype: {}",
        pet.age_hours,
        pet.life_stage.name(),
        pet.chronotype.name()
    );
    if pet.dead {
        let cause = pet.cause_of_death.map_or("unknown causes", |c| c.describe());
        let _ = writeln!(out, "Passed away from {}", cause);
    }
    let _ = writeln!(out, "Hunger:    {:>3} {}", v.hunger, bar(v.hunger));
    let _ = writeln!(out, "Happiness: {:>3} {}", v.happiness, bar(v.happiness));
    let _ = writeln!(out, "Energy:    {:>3} {}", v.energy, bar(v.energy));
    let _ = writeln!(out, "Health:    {:>3} {}", v.health, bar(v.health));
    let _ = writeln!(
        out,
        "Mood: {} | Sleeping: {} | Ill: {} | Critical: {}",
        pet.mood.name(),
        yes_no(pet.sleeping),
        yes_no(pet.ill),
        yes_no(criticality::is_critical(v) && !pet.dead)
    );
    let _ = writeln!(out, "Bond: {} ({})", pet.bond, bond_description(pet));
    let traits: Vec<&str> = pet.traits.iter().map(|t| t.name()).collect();
    let _ = writeln!(out, "Traits: {}", traits.join(", "));
    if let Some(prompt) = event_display(pet, now) {
        let _ = writeln!(out, "Event: {}", prompt);
    }
    if !pet.status_log.is_empty() {
        let _ = writeln!(out, "Recent:");
        for change in pet.status_log.iter().rev().take(5) {
            let _ = writeln!(out, "  {} {}", change.at.format("%Y-%m-%d %H:%M"), change.message);
        }
    }
    out
}

fn bar(value: i32) -> String {
    let filled = (value.clamp(0, 100) / 10) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Serializable snapshot for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub name: String,
    pub form: &'static str,
    pub emoji: &'static str,
    pub stage: &'static str,
    pub age_hours: u32,
    pub vitals: Vitals,
    pub mood: &'static str,
    pub sleeping: bool,
    pub ill: bool,
    pub critical: bool,
    pub dead: bool,
    pub cause_of_death: Option<&'static str>,
    pub bond: i32,
    pub bond_description: &'static str,
    pub chronotype: &'static str,
    pub traits: Vec<&'static str>,
    pub event: Option<String>,
}

impl StatusView {
    pub fn of(pet: &PetState, now: DateTime<Utc>) -> Self {
        Self {
            name: pet.name.clone(),
            form: form_name(pet),
            emoji: form_emoji(pet),
            stage: pet.life_stage.name(),
            age_hours: pet.age_hours,
            vitals: pet.vitals,
            mood: pet.mood.name(),
            sleeping: pet.sleeping,
            ill: pet.ill,
            critical: pet.critical_since.is_some(),
            dead: pet.dead,
            cause_of_death: pet.cause_of_death.map(|c| c.describe()),
            bond: pet.bond,
            bond_description: bond_description(pet),
            chronotype: pet.chronotype.name(),
            traits: pet.traits.iter().map(|t| t.name()).collect(),
            event: event_display(pet, now),
        }
    }
}
