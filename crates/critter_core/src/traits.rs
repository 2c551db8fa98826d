//! Birth traits: four immutable categories, each a static multiplier table.

use crate::clock::RandomSource;
use serde::{Deserialize, Serialize};

/// Multiplier keys consulted by the stat model and the action handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    EnergyDecay,
    EnergyRecovery,
    HungerDecay,
    HappinessDecay,
    HealthDecay,
    FeedBonus,
    PlayBonus,
    BondGain,
    IllnessChance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Temperament,
    Appetite,
    Sociability,
    Constitution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetTrait {
    Calm,
    Hyper,
    Glutton,
    Nibbler,
    Social,
    Independent,
    Hardy,
    Fragile,
}

impl PetTrait {
    pub fn category(self) -> TraitCategory {
        match self {
            PetTrait::Calm | PetTrait::Hyper => TraitCategory::Temperament,
            PetTrait::Glutton | PetTrait::Nibbler => TraitCategory::Appetite,
            PetTrait::Social | PetTrait::Independent => TraitCategory::Sociability,
            PetTrait::Hardy | PetTrait::Fragile => TraitCategory::Constitution,
        }
    }

    /// Multipliers this trait defines. Keys it does not list are neutral.
    pub fn modifiers(self) -> &'static [(Modifier, f64)] {
        use Modifier::*;
        match self {
            PetTrait::Calm => &[(EnergyDecay, 0.8), (PlayBonus, 0.9)],
            PetTrait::Hyper => &[(EnergyDecay, 1.3), (PlayBonus, 1.2)],
            PetTrait::Glutton => &[(HungerDecay, 1.3), (FeedBonus, 1.2)],
            PetTrait::Nibbler => &[(HungerDecay, 0.8), (FeedBonus, 0.9)],
            PetTrait::Social => &[(HappinessDecay, 1.2), (BondGain, 1.5)],
            PetTrait::Independent => &[(HappinessDecay, 0.8), (BondGain, 0.75)],
            PetTrait::Hardy => &[(IllnessChance, 0.5), (HealthDecay, 0.8)],
            PetTrait::Fragile => &[
                (IllnessChance, 1.5),
                (HealthDecay, 1.2),
                (EnergyRecovery, 0.9),
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PetTrait::Calm => "Calm",
            PetTrait::Hyper => "Hyper",
            PetTrait::Glutton => "Glutton",
            PetTrait::Nibbler => "Nibbler",
            PetTrait::Social => "Social",
            PetTrait::Independent => "Independent",
            PetTrait::Hardy => "Hardy",
            PetTrait::Fragile => "Fragile",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PetTrait::Calm => "tires slowly, mellow at play",
            PetTrait::Hyper => "burns energy fast, loves to play",
            PetTrait::Glutton => "always hungry, savours every meal",
            PetTrait::Nibbler => "small appetite, picky eater",
            PetTrait::Social => "craves company, bonds quickly",
            PetTrait::Independent => "content alone, slow to trust",
            PetTrait::Hardy => "rarely falls ill",
            PetTrait::Fragile => "catches every bug going",
        }
    }
}

/// The pair of options each category draws between.
const CATEGORY_OPTIONS: [(PetTrait, PetTrait); 4] = [
    (PetTrait::Calm, PetTrait::Hyper),
    (PetTrait::Glutton, PetTrait::Nibbler),
    (PetTrait::Social, PetTrait::Independent),
    (PetTrait::Hardy, PetTrait::Fragile),
];

/// Draw one trait per category, independently.
pub fn assign_traits(rng: &mut dyn RandomSource) -> Vec<PetTrait> {
    CATEGORY_OPTIONS
        .iter()
        .map(|&(a, b)| if rng.chance(0.5) { a } else { b })
        .collect()
}

/// Product of every trait's multiplier for `key`; 1.0 when none defines it.
pub fn multiplier(traits: &[PetTrait], key: Modifier) -> f64 {
    traits
        .iter()
        .flat_map(|t| t.modifiers().iter())
        .filter(|(k, _)| *k == key)
        .map(|(_, m)| *m)
        .product()
}

/// Resolved multipliers for the stat model, so the decay functions never
/// touch the trait table directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayModifiers {
    pub hunger: f64,
    pub energy_drain: f64,
    pub energy_recovery: f64,
    pub happiness: f64,
    pub health: f64,
}

impl Default for DecayModifiers {
    fn default() -> Self {
        Self {
            hunger: 1.0,
            energy_drain: 1.0,
            energy_recovery: 1.0,
            happiness: 1.0,
            health: 1.0,
        }
    }
}

impl DecayModifiers {
    pub fn from_traits(traits: &[PetTrait]) -> Self {
        Self {
            hunger: multiplier(traits, Modifier::HungerDecay),
            energy_drain: multiplier(traits, Modifier::EnergyDecay),
            energy_recovery: multiplier(traits, Modifier::EnergyRecovery),
            happiness: multiplier(traits, Modifier::HappinessDecay),
            health: multiplier(traits, Modifier::HealthDecay),
        }
    }
}
