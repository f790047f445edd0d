//! Seasonal environment table and temperature bands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{TEMP_COLD_MAX, TEMP_FREEZING_MAX, TEMP_HOT_MAX, TEMP_MILD_MAX};

/// Fixed rotation order, one block of days per season.
pub const SEASONS: [Season; 4] = [Season::Summer, Season::Fall, Season::Winter, Season::Spring];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Summer,
    Fall,
    Winter,
    Spring,
}

/// Immutable per-season modifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProfile {
    pub base_temp: i32,
    pub hunger_mod: i32,
    pub thirst_mod: i32,
    pub health_mod: i32,
    pub trap_chance: f64,
    pub fire_mod: i32,
    pub description: &'static str,
}

const SUMMER: SeasonProfile = SeasonProfile {
    base_temp: 25,
    hunger_mod: 0,
    thirst_mod: 5,
    health_mod: 0,
    trap_chance: 0.6,
    fire_mod: 2,
    description: "Hot days require more water",
};

const FALL: SeasonProfile = SeasonProfile {
    base_temp: 5,
    hunger_mod: 2,
    thirst_mod: 0,
    health_mod: 0,
    trap_chance: 0.5,
    fire_mod: 1,
    description: "Mild temperatures, good for survival",
};

const WINTER: SeasonProfile = SeasonProfile {
    base_temp: -15,
    hunger_mod: 5,
    thirst_mod: -5,
    health_mod: -2,
    trap_chance: 0.3,
    fire_mod: -2,
    description: "Freezing nights require fire and shelter",
};

const SPRING: SeasonProfile = SeasonProfile {
    base_temp: 10,
    hunger_mod: -2,
    thirst_mod: 0,
    health_mod: 1,
    trap_chance: 0.7,
    fire_mod: 0,
    description: "Cool temperatures, occasional rain",
};

impl Season {
    /// Season for a 1-based day index given the length of one season block.
    #[must_use]
    pub fn from_day(day: u32, days_per_season: u32) -> Self {
        let block = (day.max(1) - 1) / days_per_season.max(1);
        match block % 4 {
            0 => Self::Summer,
            1 => Self::Fall,
            2 => Self::Winter,
            _ => Self::Spring,
        }
    }

    #[must_use]
    pub const fn profile(self) -> &'static SeasonProfile {
        match self {
            Self::Summer => &SUMMER,
            Self::Fall => &FALL,
            Self::Winter => &WINTER,
            Self::Spring => &SPRING,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SEASONS
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Descriptive label for a temperature reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Freezing,
    Cold,
    Mild,
    Hot,
    Scorching,
}

impl TemperatureBand {
    #[must_use]
    pub const fn from_temperature(temperature: i32) -> Self {
        if temperature <= TEMP_FREEZING_MAX {
            Self::Freezing
        } else if temperature <= TEMP_COLD_MAX {
            Self::Cold
        } else if temperature <= TEMP_MILD_MAX {
            Self::Mild
        } else if temperature <= TEMP_HOT_MAX {
            Self::Hot
        } else {
            Self::Scorching
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freezing => "Freezing",
            Self::Cold => "Cold",
            Self::Mild => "Mild",
            Self::Hot => "Hot",
            Self::Scorching => "Scorching",
        }
    }
}

impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
