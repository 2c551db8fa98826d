//! End-to-end scenarios driven by a fixed clock and scripted dice.

use chrono::{DateTime, Duration, TimeZone, Utc};
use critter_core::{
    Chronotype, Clock, DeathCause, FixedClock, Form, JsonFileStore, LifeStage, PetState, PetStore,
    RandomSource, ScriptedRandom, Vitals,
};
use critter_sim::{ActionOutcome, Simulation};
use std::sync::Arc;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn setup_with(rng: impl RandomSource + 'static) -> (Arc<FixedClock>, Simulation, PetState) {
    let clock = Arc::new(FixedClock::new(t0()));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let mut sim = Simulation::new(dyn_clock, Box::new(rng));
    let mut pet = sim.hatch("Mochi");
    pet.traits.clear();
    pet.chronotype = Chronotype::Regular;
    (clock, sim, pet)
}

fn setup() -> (Arc<FixedClock>, Simulation, PetState) {
    setup_with(ScriptedRandom::never())
}

fn set_all(pet: &mut PetState, value: i32) {
    pet.vitals = Vitals {
        hunger: value,
        happiness: value,
        energy: value,
        health: value,
    };
}

#[test]
fn critical_for_thirteen_hours_dies_on_next_load() {
    // Zero elapsed: stats stay put, so hunger never hits 0.
    let (_clock, mut sim, mut pet) = setup();
    pet.vitals = Vitals {
        hunger: 29,
        happiness: 29,
        energy: 29,
        health: 20,
    };
    pet.critical_since = Some(t0() - Duration::hours(13));
    let report = sim.update(&mut pet);
    assert!(pet.dead);
    assert_eq!(report.died, Some(DeathCause::Neglect));
    assert_eq!(pet.cause_of_death, Some(DeathCause::Neglect));

    // Thirteen hours of decay empties the food bowl first.
    let (clock, mut sim, mut pet) = setup();
    pet.vitals = Vitals {
        hunger: 29,
        happiness: 29,
        energy: 29,
        health: 20,
    };
    pet.critical_since = Some(t0());
    clock.advance(Duration::hours(13));
    sim.update(&mut pet);
    assert!(pet.dead);
    assert_eq!(pet.vitals.hunger, 0);
    assert_eq!(pet.cause_of_death, Some(DeathCause::Starvation));
}

#[test]
fn long_absence_starts_the_timer_then_kills() {
    let (clock, mut sim, mut pet) = setup();
    clock.advance(Duration::days(5));
    sim.update(&mut pet);
    assert!(!pet.dead);
    assert_eq!(pet.critical_since, Some(clock.now()));

    clock.advance(Duration::hours(13));
    sim.update(&mut pet);
    assert!(pet.dead);
    assert_eq!(pet.cause_of_death, Some(DeathCause::Starvation));

    // Frozen from here on.
    let frozen = pet.clone();
    clock.advance(Duration::days(2));
    sim.update(&mut pet);
    assert_eq!(pet, frozen);
    assert!(!sim.feed(&mut pet).is_done());
}

#[test]
fn rescue_restarts_the_critical_timer() {
    let (clock, mut sim, mut pet) = setup();
    pet.bond = 100;
    pet.vitals = Vitals {
        hunger: 5,
        happiness: 80,
        energy: 80,
        health: 80,
    };
    pet.critical_since = Some(t0());

    clock.advance(Duration::hours(11));
    sim.update(&mut pet);
    assert!(!pet.dead);
    assert_eq!(pet.critical_since, Some(t0()));

    pet.vitals.happiness = 80;
    pet.vitals.energy = 80;
    pet.vitals.health = 80;
    assert!(sim.feed(&mut pet).is_done());
    assert_eq!(pet.vitals.hunger, 30);
    assert_eq!(pet.critical_since, None);

    // Hungry again five hours later: a fresh episode starts here.
    clock.advance(Duration::hours(5));
    sim.update(&mut pet);
    assert_eq!(pet.critical_since, Some(clock.now()));

    // 22h after the first episode began, but only 6h into this one.
    clock.advance(Duration::hours(6));
    sim.update(&mut pet);
    assert!(!pet.dead, "died of {:?}", pet.cause_of_death);

    clock.advance(Duration::hours(7));
    sim.update(&mut pet);
    assert!(pet.dead);
}

#[test]
fn neglect_and_old_age_checked_in_the_same_update() {
    // Neglect fires first and keeps its cause even though the old-age roll
    // also succeeds.
    let (clock, mut sim, mut pet) = setup_with(ScriptedRandom::always());
    pet.birth_time = t0() - Duration::hours(400);
    pet.vitals.happiness = 5;
    pet.critical_since = Some(t0() - Duration::hours(13));
    clock.advance(Duration::minutes(1));
    sim.update(&mut pet);
    assert!(pet.dead);
    assert_eq!(pet.cause_of_death, Some(DeathCause::Neglect));

    // Healthy but ancient: the roll alone is enough.
    let (clock, mut sim, mut pet) = setup_with(ScriptedRandom::always());
    pet.birth_time = t0() - Duration::hours(400);
    clock.advance(Duration::minutes(1));
    let report = sim.update(&mut pet);
    assert_eq!(report.died, Some(DeathCause::OldAge));
}

#[test]
fn held_at_90_through_babyhood_becomes_healthy_child() {
    let (clock, mut sim, mut pet) = setup();
    for _ in 0..48 {
        clock.advance(Duration::hours(1));
        sim.update(&mut pet);
        set_all(&mut pet, 90);
    }
    assert_eq!(pet.life_stage, LifeStage::Child);
    assert_eq!(pet.form, Form::HealthyChild);
    assert!(pet.status_log.iter().any(|s| s.message.contains("Healthy Child")));
}

#[test]
fn held_at_15_through_babyhood_becomes_sickly_child() {
    let (clock, mut sim, mut pet) = setup();
    for _ in 0..47 {
        set_all(&mut pet, 15);
        assert!(sim.record_checkpoint(&mut pet));
        clock.advance(Duration::hours(1));
    }
    set_all(&mut pet, 15);
    clock.advance(Duration::hours(1));
    sim.update(&mut pet);
    assert_eq!(pet.form, Form::SicklyChild);
}

#[test]
fn evolution_after_a_long_gap_uses_only_baby_checkpoints() {
    let (clock, mut sim, mut pet) = setup();
    assert!(sim.record_checkpoint(&mut pet));

    clock.advance(Duration::hours(60));
    let report = sim.update(&mut pet);
    assert!(!pet.dead);
    assert_eq!(report.evolved, vec![Form::HealthyChild]);
    assert_eq!(pet.form, Form::HealthyChild);

    let baby = pet.checkpoints_for(LifeStage::Baby);
    assert_eq!(baby.len(), 1);
    assert_eq!(baby[0].at, t0());
    // The starved sample from this load opens the child stage instead.
    assert!(report.checkpointed);
    assert_eq!(pet.checkpoints_for(LifeStage::Child).len(), 1);
}

#[test]
fn short_sleep_intervals_keep_fractional_energy() {
    let (clock, mut sim, mut pet) = setup();
    sim.toggle_sleep(&mut pet);
    pet.vitals.energy = 50;

    for _ in 0..3 {
        clock.advance(Duration::seconds(3));
        sim.update(&mut pet);
    }
    assert_eq!(pet.vitals.energy, 50);
    assert!(pet.energy_remainder > 0.02 && pet.energy_remainder < 0.03);

    let mut ticks = 3;
    while pet.vitals.energy == 50 && ticks < 200 {
        clock.advance(Duration::seconds(3));
        sim.update(&mut pet);
        ticks += 1;
    }
    assert_eq!(pet.vitals.energy, 51);
    // 10/h at 3s per tick is 1/120 per tick.
    assert!((120..=121).contains(&ticks), "took {} ticks", ticks);
}

#[test]
fn feeding_at_bond_zero_is_half_as_effective() {
    let (_clock, sim, mut pet) = setup();
    pet.vitals.hunger = 50;
    pet.bond = 100;
    sim.feed(&mut pet);
    let full = pet.vitals.hunger - 50;

    let (_clock, sim, mut pet) = setup();
    pet.vitals.hunger = 50;
    pet.bond = 0;
    sim.feed(&mut pet);
    let half = pet.vitals.hunger - 50;

    assert_eq!(full, 30);
    assert_eq!(half * 2, full);
}

#[test]
fn spamming_the_same_action_earns_no_bond() {
    let (clock, sim, mut pet) = setup();
    pet.bond = 30;
    pet.vitals.hunger = 40;
    sim.feed(&mut pet);
    assert_eq!(pet.bond, 32);
    pet.vitals.hunger = 40;
    clock.advance(Duration::minutes(10));
    sim.feed(&mut pet);
    assert_eq!(pet.bond, 32);
}

#[test]
fn refusals_leave_the_pet_untouched() {
    let (_clock, sim, mut pet) = setup();
    let before = pet.clone();
    assert_eq!(
        sim.feed(&mut pet),
        ActionOutcome::Refused("Mochi is too full".to_string())
    );
    assert!(!sim.administer_medicine(&mut pet).is_done());
    assert!(!sim.respond_to_event(&mut pet).is_done());
    assert_eq!(pet, before);
}

#[test]
fn snapshot_survives_a_file_round_trip() {
    let (clock, mut sim, mut pet) = setup();
    for _ in 0..6 {
        clock.advance(Duration::hours(2));
        sim.update(&mut pet);
        sim.play(&mut pet);
    }
    pet.energy_remainder = 0.5;

    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("pet.json"));
    store.save(&pet).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, pet);
}
