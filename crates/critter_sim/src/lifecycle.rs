//! Aging, stage transitions and evolution
//!
//! Stage follows age alone. Crossing a stage boundary evolves the form from
//! the care quality recorded during the stage that just ended. Forms only
//! move forward and adults never change again.

use chrono::{DateTime, Duration, Utc};
use critter_core::{Form, LifeStage, PetState, StatCheckpoint};

/// Care quality assumed for a stage with no recorded checkpoints.
pub const DEFAULT_CARE: f64 = 100.0;

pub const CHILD_HEALTHY_AT: f64 = 70.0;
pub const CHILD_TROUBLED_AT: f64 = 40.0;
pub const ADULT_ELITE_AT: f64 = 85.0;
pub const ADULT_STANDARD_AT: f64 = 70.0;
pub const ADULT_REDEEMED_AT: f64 = 70.0;

/// Mean of the per-stat means across `checkpoints`.
pub fn care_quality(checkpoints: &[StatCheckpoint]) -> f64 {
    if checkpoints.is_empty() {
        return DEFAULT_CARE;
    }
    let n = checkpoints.len() as f64;
    let mut sums = [0.0_f64; 4];
    for c in checkpoints {
        sums[0] += f64::from(c.hunger);
        sums[1] += f64::from(c.happiness);
        sums[2] += f64::from(c.energy);
        sums[3] += f64::from(c.health);
    }
    let per_stat = sums.map(|total| total / n);
    per_stat.iter().sum::<f64>() / per_stat.len() as f64
}

/// Next form for a pet leaving its current stage with the given care.
/// Adult forms are final.
pub fn evolve(form: Form, care: f64) -> Form {
    match form {
        Form::Baby => {
            if care >= CHILD_HEALTHY_AT {
                Form::HealthyChild
            } else if care >= CHILD_TROUBLED_AT {
                Form::TroubledChild
            } else {
                Form::SicklyChild
            }
        }
        Form::HealthyChild => {
            if care >= ADULT_ELITE_AT {
                Form::EliteAdult
            } else if care >= ADULT_STANDARD_AT {
                Form::StandardAdult
            } else {
                Form::GrumpyAdult
            }
        }
        Form::TroubledChild => {
            if care >= ADULT_REDEEMED_AT {
                Form::RedeemedAdult
            } else {
                Form::DelinquentAdult
            }
        }
        Form::SicklyChild => Form::WeakAdult,
        adult => adult,
    }
}

/// Bring stage and form up to date with the pet's age. A gap that spans
/// several boundaries evolves through each stage in turn. Returns the
/// forms reached, oldest first.
pub fn update_lifecycle(pet: &mut PetState, now: DateTime<Utc>) -> Vec<Form> {
    pet.age_hours = pet.age_hours.max(pet.age_at(now));
    let target = LifeStage::from_age(pet.age_hours);
    let mut reached = Vec::new();

    while pet.life_stage < target {
        let Some(next) = pet.life_stage.next() else {
            break;
        };
        let care = care_quality(pet.checkpoints_for(pet.life_stage));
        let from = pet.form;
        let to = evolve(from, care);
        pet.life_stage = next;
        if to != from {
            pet.form = to;
            let name = pet.name.clone();
            pet.log_status(now, format!("{} evolved into a {}", name, to.name()));
            tracing::info!(
                "{} evolved {:?} -> {:?} (care {:.1}, stage {})",
                name,
                from,
                to,
                care,
                next.name()
            );
            reached.push(to);
        }
    }
    reached
}

/// Stage the pet is in at `now`, which may be ahead of the stored stage
/// until `update_lifecycle` runs.
fn stage_at(pet: &PetState, now: DateTime<Utc>) -> LifeStage {
    LifeStage::from_age(pet.age_hours.max(pet.age_at(now)))
}

/// Whether a checkpoint is owed for the stage the pet is in at `now`.
pub fn checkpoint_due(pet: &PetState, now: DateTime<Utc>, every: Duration) -> bool {
    match pet.checkpoints_for(stage_at(pet, now)).last() {
        None => true,
        Some(last) => now - last.at >= every,
    }
}

/// Record the current vitals against the stage the pet is in at `now`.
pub fn record_checkpoint(pet: &mut PetState, now: DateTime<Utc>) {
    let checkpoint = StatCheckpoint::of(&pet.vitals, now);
    let stage = stage_at(pet, now);
    pet.push_checkpoint(stage, checkpoint);
    tracing::debug!(
        "Checkpoint for {} at stage {}: {:?}",
        pet.name,
        stage.name(),
        pet.vitals
    );
}
