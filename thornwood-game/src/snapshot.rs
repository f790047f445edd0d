//! Read-only view of the survivor for presentation layers.

use std::fmt;

use serde::Serialize;

use crate::season::{Season, TemperatureBand};
use crate::state::{Attributes, Inventory, PlayerState, Vitals};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub day: u32,
    pub season: Season,
    pub temperature: i32,
    pub band: TemperatureBand,
    pub vitals: Vitals,
    pub inventory: Inventory,
    pub attributes: Attributes,
    pub shelter: bool,
    pub fire: bool,
    pub trap_set: bool,
    /// Active effect names, infection included.
    pub effects: Vec<String>,
}

impl StatusSnapshot {
    #[must_use]
    pub fn capture(state: &PlayerState) -> Self {
        let mut effects: Vec<String> = state
            .status_effects
            .iter()
            .map(|effect| effect.kind.as_str().to_string())
            .collect();
        if state.infection {
            effects.push("infection".to_string());
        }
        Self {
            day: state.day,
            season: state.season,
            temperature: state.temperature,
            band: TemperatureBand::from_temperature(state.temperature),
            vitals: state.vitals,
            inventory: state.inventory,
            attributes: state.attributes,
            shelter: state.shelter,
            fire: state.fire,
            trap_set: state.trap_set,
            effects,
        }
    }
}

impl From<&PlayerState> for StatusSnapshot {
    fn from(state: &PlayerState) -> Self {
        Self::capture(state)
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {} | {} ({}) | Health: {} | Hunger: {} | Thirst: {} | Food: {} | Water: {} | ",
            self.day,
            self.season,
            self.band,
            self.vitals.health,
            self.vitals.hunger,
            self.vitals.thirst,
            self.inventory.food,
            self.inventory.water,
        )?;
        write!(
            f,
            "Str: {} | Agi: {} | End: {} | Shelter: {} | Fire: {} | Effects: ",
            self.attributes.strength,
            self.attributes.agility,
            self.attributes.endurance,
            yes_no(self.shelter),
            yes_no(self.fire),
        )?;
        if self.effects.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&self.effects.join(", "))
        }
    }
}
