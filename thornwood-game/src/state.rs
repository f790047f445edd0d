//! The survivor record and its repair rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ATTRIBUTE_MAX, ATTRIBUTE_MIN, FRESH_FOOD, FRESH_GOLD, FRESH_HEALTH, FRESH_HUNGER,
    FRESH_TEMPERATURE, FRESH_THIRST, FRESH_WATER, VALIDATION_BLEED_PENALTY, VITAL_MAX, VITAL_MIN,
};
use crate::difficulty::DifficultyProfile;
use crate::rng::RandomSource;
use crate::season::Season;
use crate::status::{EffectKind, StatusEffects};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: i32,
    pub hunger: i32,
    pub thirst: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    pub food: u32,
    pub water: u32,
    pub gold: u32,
    pub bandages: u32,
    pub cloth: u32,
    #[serde(default)]
    pub knife: bool,
    #[serde(default)]
    pub hatchet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u8,
    pub agility: u8,
    pub endurance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Agility,
    Endurance,
}

impl Attribute {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Endurance => "endurance",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last thing that hurt the survivor; names the cause of a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCause {
    Injury,
    Combat,
    Predator,
    Frostbite,
    Cold,
    Exposure,
    Starvation,
    Dehydration,
    Exhaustion,
    Poison,
    Bleeding,
    Infection,
}

impl DamageCause {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Injury => "injury",
            Self::Combat => "combat",
            Self::Predator => "predator",
            Self::Frostbite => "frostbite",
            Self::Cold => "cold",
            Self::Exposure => "exposure",
            Self::Starvation => "starvation",
            Self::Dehydration => "dehydration",
            Self::Exhaustion => "exhaustion",
            Self::Poison => "poison",
            Self::Bleeding => "bleeding",
            Self::Infection => "infection",
        }
    }
}

impl fmt::Display for DamageCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<EffectKind> for DamageCause {
    fn from(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Poison => Self::Poison,
            EffectKind::Bleeding => Self::Bleeding,
            EffectKind::Fever => Self::Dehydration,
        }
    }
}

/// Knobs for [`PlayerState::repaired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    /// Subtract a fixed health penalty whenever a bleeding effect is present.
    pub bleed_on_validate: bool,
}

/// One correction applied while repairing a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateRepair {
    Clamped {
        field: &'static str,
        from: i64,
        to: i64,
    },
    MissingField {
        field: &'static str,
    },
    CoercedField {
        field: &'static str,
    },
    StatusEffectsNormalized,
    StatusEffectsReset,
    BleedPenalty {
        amount: i32,
    },
}

impl StateRepair {
    /// Bookkeeping repairs that do not indicate a corrupted record.
    #[must_use]
    pub const fn is_penalty(&self) -> bool {
        matches!(self, Self::BleedPenalty { .. })
    }
}

impl fmt::Display for StateRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamped { field, from, to } => write!(f, "{field} clamped from {from} to {to}"),
            Self::MissingField { field } => write!(f, "{field} missing, default applied"),
            Self::CoercedField { field } => write!(f, "{field} coerced to expected type"),
            Self::StatusEffectsNormalized => f.write_str("status effects normalized"),
            Self::StatusEffectsReset => f.write_str("status effects reset"),
            Self::BleedPenalty { amount } => write!(f, "bleeding cost {amount} health"),
        }
    }
}

/// A corrected copy of a state plus the corrections it needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub state: PlayerState,
    pub repairs: Vec<StateRepair>,
}

impl Repaired {
    /// True when nothing but penalties had to change.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.repairs.iter().all(StateRepair::is_penalty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub day: u32,
    pub season: Season,
    pub temperature: i32,
    pub vitals: Vitals,
    pub inventory: Inventory,
    pub attributes: Attributes,
    #[serde(default)]
    pub shelter: bool,
    #[serde(default)]
    pub fire: bool,
    #[serde(default)]
    pub trap_set: bool,
    #[serde(default)]
    pub infection: bool,
    #[serde(default)]
    pub merchant_hostile: bool,
    #[serde(default)]
    pub status_effects: StatusEffects,
    #[serde(default)]
    pub last_damage: Option<DamageCause>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new_game(&DifficultyProfile::normal())
    }
}

impl PlayerState {
    /// Survivor before any difficulty bonuses.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            day: 1,
            season: Season::Summer,
            temperature: FRESH_TEMPERATURE,
            vitals: Vitals {
                health: FRESH_HEALTH,
                hunger: FRESH_HUNGER,
                thirst: FRESH_THIRST,
            },
            inventory: Inventory {
                food: FRESH_FOOD,
                water: FRESH_WATER,
                gold: FRESH_GOLD,
                ..Inventory::default()
            },
            attributes: Attributes {
                strength: ATTRIBUTE_MIN,
                agility: ATTRIBUTE_MIN,
                endurance: ATTRIBUTE_MIN,
            },
            shelter: false,
            fire: false,
            trap_set: false,
            infection: false,
            merchant_hostile: false,
            status_effects: StatusEffects::new(),
            last_damage: None,
        }
    }

    /// Fresh survivor with the difficulty's starting package applied.
    #[must_use]
    pub fn new_game(difficulty: &DifficultyProfile) -> Self {
        let mut state = Self::fresh();
        state.inventory.gold = difficulty.start_gold;
        state.inventory.food = state.inventory.food.saturating_add(difficulty.start_food);
        state.inventory.water = state.inventory.water.saturating_add(difficulty.start_water);
        let strength =
            i32::from(state.attributes.strength).saturating_add(difficulty.start_strength);
        state.attributes.strength = clamp_attribute(i64::from(strength));
        state
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.vitals.health <= VITAL_MIN
    }

    /// Apply damage, clamp health, and remember the cause. Returns the health lost.
    pub fn damage(&mut self, amount: u32, cause: DamageCause) -> i32 {
        if amount == 0 {
            return 0;
        }
        let before = self.vitals.health;
        self.vitals.health = clamp_vital(i64::from(before) - i64::from(amount));
        self.last_damage = Some(cause);
        before - self.vitals.health
    }

    /// Heal up to the cap. Returns the health gained.
    pub fn heal(&mut self, amount: u32) -> i32 {
        let before = self.vitals.health;
        self.vitals.health = clamp_vital(i64::from(before) + i64::from(amount));
        self.vitals.health - before
    }

    pub fn adjust_hunger(&mut self, delta: i32) {
        self.vitals.hunger = clamp_vital(i64::from(self.vitals.hunger) + i64::from(delta));
    }

    pub fn adjust_thirst(&mut self, delta: i32) {
        self.vitals.thirst = clamp_vital(i64::from(self.vitals.thirst) + i64::from(delta));
    }

    #[must_use]
    pub const fn attribute(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Strength => self.attributes.strength,
            Attribute::Agility => self.attributes.agility,
            Attribute::Endurance => self.attributes.endurance,
        }
    }

    /// Attribute as a roll modifier.
    #[must_use]
    pub fn attribute_bonus(&self, attribute: Attribute) -> i32 {
        i32::from(self.attribute(attribute))
    }

    const fn attribute_mut(&mut self, attribute: Attribute) -> &mut u8 {
        match attribute {
            Attribute::Strength => &mut self.attributes.strength,
            Attribute::Agility => &mut self.attributes.agility,
            Attribute::Endurance => &mut self.attributes.endurance,
        }
    }

    /// One probability draw; on success raise the attribute unless it is maxed.
    /// Returns true when the attribute grew.
    pub fn check_stat_increase<R: RandomSource + ?Sized>(
        &mut self,
        attribute: Attribute,
        chance: f64,
        rng: &mut R,
    ) -> bool {
        if !rng.succeeds(chance) {
            return false;
        }
        let value = self.attribute_mut(attribute);
        if *value >= ATTRIBUTE_MAX {
            return false;
        }
        *value += 1;
        true
    }

    /// Clamp vitals after a mutation step.
    pub fn clamp_vitals(&mut self) {
        self.vitals.health = clamp_vital(i64::from(self.vitals.health));
        self.vitals.hunger = clamp_vital(i64::from(self.vitals.hunger));
        self.vitals.thirst = clamp_vital(i64::from(self.vitals.thirst));
    }

    /// Corrected copy of this state.
    ///
    /// Vitals are clamped to `[0, 100]`, attributes to `[1, 10]`, the day to at
    /// least 1, and malformed status effects are normalized. With
    /// `bleed_on_validate`, an active bleeding effect costs a fixed amount of
    /// health on every call.
    #[must_use]
    pub fn repaired(&self, rules: ValidationRules) -> Repaired {
        let mut state = self.clone();
        let mut repairs = Vec::new();

        if !state.status_effects.is_well_formed() {
            state.status_effects = state.status_effects.normalized();
            repairs.push(StateRepair::StatusEffectsNormalized);
        }

        for (field, slot) in [
            ("health", &mut state.vitals.health),
            ("hunger", &mut state.vitals.hunger),
            ("thirst", &mut state.vitals.thirst),
        ] {
            let clamped = clamp_vital(i64::from(*slot));
            if clamped != *slot {
                repairs.push(StateRepair::Clamped {
                    field,
                    from: i64::from(*slot),
                    to: i64::from(clamped),
                });
                *slot = clamped;
            }
        }

        if rules.bleed_on_validate && state.status_effects.contains(EffectKind::Bleeding) {
            let lost = state.damage(
                u32::try_from(VALIDATION_BLEED_PENALTY).unwrap_or(0),
                DamageCause::Bleeding,
            );
            repairs.push(StateRepair::BleedPenalty { amount: lost });
        }

        for (field, slot) in [
            ("strength", &mut state.attributes.strength),
            ("agility", &mut state.attributes.agility),
            ("endurance", &mut state.attributes.endurance),
        ] {
            let clamped = clamp_attribute(i64::from(*slot));
            if clamped != *slot {
                repairs.push(StateRepair::Clamped {
                    field,
                    from: i64::from(*slot),
                    to: i64::from(clamped),
                });
                *slot = clamped;
            }
        }

        if state.day == 0 {
            repairs.push(StateRepair::Clamped {
                field: "day",
                from: 0,
                to: 1,
            });
            state.day = 1;
        }

        Repaired { state, repairs }
    }

    /// Repair in place. Returns false when the repaired state still fails a
    /// second, penalty-free pass and should be treated as unreliable.
    pub fn validate(&mut self, rules: ValidationRules) -> bool {
        let Repaired { state, repairs } = self.repaired(rules);
        for repair in &repairs {
            if repair.is_penalty() {
                log::debug!("validation: {repair}");
            } else {
                log::warn!("validation repaired state: {repair}");
            }
        }
        *self = state;
        self.repaired(ValidationRules::default()).is_clean()
    }
}

fn clamp_vital(value: i64) -> i32 {
    let clamped = value.clamp(i64::from(VITAL_MIN), i64::from(VITAL_MAX));
    i32::try_from(clamped).unwrap_or(VITAL_MIN)
}

fn clamp_attribute(value: i64) -> u8 {
    let clamped = value.clamp(i64::from(ATTRIBUTE_MIN), i64::from(ATTRIBUTE_MAX));
    u8::try_from(clamped).unwrap_or(ATTRIBUTE_MIN)
}
