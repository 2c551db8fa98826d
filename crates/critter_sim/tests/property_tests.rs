//! Property-based tests for critter_sim.
//!
//! Drives a simulation through arbitrary sequences of waits and owner
//! actions and checks the invariants that must hold for every reachable
//! state: bounded stats and bond, terminal death, monotonic age, and
//! idempotent zero-elapsed updates.

use chrono::{Duration, TimeZone, Utc};
use critter_core::{Clock, FixedClock, PetState, SeededRandom};
use critter_sim::Simulation;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Wait(i64),
    Feed,
    Play,
    ToggleSleep,
    Medicine,
    Respond,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (1i64..=720).prop_map(Step::Wait),
        1 => Just(Step::Feed),
        1 => Just(Step::Play),
        1 => Just(Step::ToggleSleep),
        1 => Just(Step::Medicine),
        1 => Just(Step::Respond),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(arb_step(), 1..60)
}

struct Harness {
    clock: Arc<FixedClock>,
    sim: Simulation,
    pet: PetState,
}

impl Harness {
    fn new(seed: u64, start_hour: u32) -> Self {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, start_hour, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let mut sim = Simulation::new(dyn_clock, Box::new(SeededRandom::new(seed)));
        let pet = sim.hatch("Prop");
        Self { clock, sim, pet }
    }

    fn run(&mut self, step: &Step) {
        match step {
            Step::Wait(minutes) => {
                self.clock.advance(Duration::minutes(*minutes));
                self.sim.update(&mut self.pet);
            }
            Step::Feed => {
                self.sim.feed(&mut self.pet);
            }
            Step::Play => {
                self.sim.play(&mut self.pet);
            }
            Step::ToggleSleep => {
                self.sim.toggle_sleep(&mut self.pet);
            }
            Step::Medicine => {
                self.sim.administer_medicine(&mut self.pet);
            }
            Step::Respond => {
                self.sim.respond_to_event(&mut self.pet);
            }
        }
    }
}

fn in_range(v: i32) -> bool {
    (0..=100).contains(&v)
}

// ============================================================================
// Simulation Properties
// ============================================================================

proptest! {
    /// **Core invariant**: every reachable state keeps stats and bond in [0, 100].
    #[test]
    fn stats_and_bond_stay_in_range(seed in any::<u64>(), hour in 0u32..24, steps in arb_steps()) {
        let mut h = Harness::new(seed, hour);
        for step in &steps {
            h.run(step);
            let v = h.pet.vitals;
            prop_assert!(in_range(v.hunger), "hunger {}", v.hunger);
            prop_assert!(in_range(v.happiness), "happiness {}", v.happiness);
            prop_assert!(in_range(v.energy), "energy {}", v.energy);
            prop_assert!(in_range(v.health), "health {}", v.health);
            prop_assert!(in_range(h.pet.bond), "bond {}", h.pet.bond);
            prop_assert!(h.pet.energy_remainder >= 0.0 && h.pet.energy_remainder < 1.0);
        }
    }

    /// Once dead, nothing changes the stats or brings the pet back.
    #[test]
    fn death_is_terminal(seed in any::<u64>(), steps in arb_steps()) {
        let mut h = Harness::new(seed, 12);
        // Start near death so runs actually reach it.
        h.pet.vitals.hunger = 5;
        h.pet.vitals.health = 15;
        let mut frozen: Option<PetState> = None;
        for step in &steps {
            h.run(step);
            if let Some(dead) = &frozen {
                prop_assert!(h.pet.dead);
                prop_assert_eq!(h.pet.vitals, dead.vitals);
                prop_assert_eq!(h.pet.bond, dead.bond);
                prop_assert_eq!(h.pet.cause_of_death, dead.cause_of_death);
            } else if h.pet.dead {
                frozen = Some(h.pet.clone());
            }
        }
    }

    /// Age never decreases, however often the pet is loaded.
    #[test]
    fn age_is_monotone(seed in any::<u64>(), steps in arb_steps()) {
        let mut h = Harness::new(seed, 8);
        let mut last = h.pet.age_hours;
        for step in &steps {
            h.run(step);
            prop_assert!(h.pet.age_hours >= last);
            last = h.pet.age_hours;
        }
    }

    /// A second update at the same instant leaves the state untouched.
    #[test]
    fn zero_elapsed_update_is_idempotent(seed in any::<u64>(), steps in arb_steps()) {
        let mut h = Harness::new(seed, 20);
        for step in &steps {
            h.run(step);
        }
        h.sim.update(&mut h.pet);
        let first = h.pet.clone();
        h.sim.update(&mut h.pet);
        prop_assert_eq!(h.pet, first);
    }

    /// Logs and histories never exceed their caps.
    #[test]
    fn histories_stay_bounded(seed in any::<u64>(), steps in arb_steps()) {
        let mut h = Harness::new(seed, 3);
        for step in &steps {
            h.run(step);
        }
        prop_assert!(h.pet.interactions.len() <= critter_core::state::MAX_INTERACTIONS);
        prop_assert!(h.pet.event_log.len() <= critter_core::state::MAX_EVENT_LOG);
        prop_assert!(h.pet.status_log.len() <= critter_core::state::MAX_STATUS_LOG);
    }
}
