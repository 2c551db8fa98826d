//! Chronotype: a per-pet daily schedule fixed at birth.

use crate::clock::RandomSource;
use serde::{Deserialize, Serialize};

/// Energy drains this much faster outside active hours.
pub const OFF_HOURS_DRAIN_FACTOR: f64 = 1.5;
/// Sleep recovers this much faster inside the preferred sleep window.
pub const PREFERRED_SLEEP_RECOVERY_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronotype {
    EarlyBird,
    #[default]
    Regular,
    NightOwl,
}

impl Chronotype {
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let roll = rng.next_f64();
        if roll < 1.0 / 3.0 {
            Chronotype::EarlyBird
        } else if roll < 2.0 / 3.0 {
            Chronotype::Regular
        } else {
            Chronotype::NightOwl
        }
    }

    /// First active hour and number of active hours. The window may wrap
    /// past midnight.
    fn active_window(self) -> (u32, u32) {
        match self {
            Chronotype::EarlyBird => (5, 16),
            Chronotype::Regular => (7, 16),
            Chronotype::NightOwl => (10, 16),
        }
    }

    pub fn is_active_hour(self, hour: u32) -> bool {
        let (start, len) = self.active_window();
        (hour % 24 + 24 - start) % 24 < len
    }

    /// The preferred sleep window is the complement of the active window.
    pub fn is_preferred_sleep_hour(self, hour: u32) -> bool {
        !self.is_active_hour(hour)
    }

    pub fn name(self) -> &'static str {
        match self {
            Chronotype::EarlyBird => "Early bird",
            Chronotype::Regular => "Regular",
            Chronotype::NightOwl => "Night owl",
        }
    }
}
