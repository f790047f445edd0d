//! Loosely typed initial-state records.
//!
//! Overrides arrive as JSON objects whose fields may be missing, negative,
//! of the wrong type or malformed. [`StateOverride::to_state`] turns one into
//! a valid [`PlayerState`] and reports every correction it had to make.

use std::sync::OnceLock;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::VITAL_MAX;
use crate::season::Season;
use crate::state::{PlayerState, Repaired, StateRepair, ValidationRules};
use crate::status::{EffectKind, StatusEffects};

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("state override must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("failed to parse state override: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Initial-state record plus an optional difficulty label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateOverride {
    fields: Map<String, Value>,
}

impl StateOverride {
    /// Parse an override record.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not JSON or not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, OverrideError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `OverrideError::NotAnObject` for anything but an object.
    pub fn from_value(value: Value) -> Result<Self, OverrideError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(OverrideError::NotAnObject {
                found: value_kind(&other),
            }),
        }
    }

    /// Developer preset: a well-supplied survivor on Normal.
    #[must_use]
    pub fn debug_preset() -> Self {
        static PRESET: OnceLock<StateOverride> = OnceLock::new();
        PRESET
            .get_or_init(|| {
                Self::from_json(include_str!("../assets/debug_state.json")).unwrap_or_else(
                    |err| {
                        log::error!("bundled debug preset rejected: {err}");
                        Self::default()
                    },
                )
            })
            .clone()
    }

    /// Difficulty label carried by the record, if any.
    #[must_use]
    pub fn difficulty_label(&self) -> Option<&str> {
        self.fields.get("difficulty").and_then(Value::as_str)
    }

    /// Replace a single field.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Build a valid state, repairing whatever the record got wrong.
    #[must_use]
    pub fn to_state(&self) -> Repaired {
        let mut reader = Reader {
            fields: &self.fields,
            repairs: Vec::new(),
        };
        let mut state = PlayerState::fresh();

        state.vitals.health = reader.vital("health", VITAL_MAX);
        state.vitals.hunger = reader.vital("hunger", 0);
        state.vitals.thirst = reader.vital("thirst", 0);

        state.inventory.food = reader.counter("food");
        state.inventory.water = reader.counter("water");
        state.inventory.gold = reader.counter("gold");
        state.inventory.bandages = reader.counter("bandages");
        state.inventory.cloth = reader.counter("cloth");

        state.attributes.strength = reader.attribute("strength");
        state.attributes.agility = reader.attribute("agility");
        state.attributes.endurance = reader.attribute("endurance");

        state.day = reader.day();
        state.temperature = reader.optional_int("temperature", state.temperature);
        state.season = reader.season(state.season);

        state.shelter = reader.flag("shelter");
        state.fire = reader.flag("fire");
        state.trap_set = reader.flag("trap_set");
        state.infection = reader.flag("infection");
        state.merchant_hostile = reader.flag("merchant_hostile");
        state.inventory.knife = reader.flag("knife");
        state.inventory.hatchet = reader.flag("hatchet");

        state.status_effects = reader.status_effects();

        let Reader { mut repairs, .. } = reader;
        let checked = state.repaired(ValidationRules::default());
        repairs.extend(checked.repairs);
        Repaired {
            state: checked.state,
            repairs,
        }
    }
}

const REQUIRED: [&str; 11] = [
    "health", "hunger", "thirst", "food", "water", "gold", "strength", "agility", "endurance",
    "bandages", "cloth",
];

struct Reader<'a> {
    fields: &'a Map<String, Value>,
    repairs: Vec<StateRepair>,
}

impl Reader<'_> {
    /// Integer value of a field, coercing booleans, floats and numeric strings.
    /// `None` when the field is absent.
    fn int(&mut self, field: &'static str) -> Option<i64> {
        let value = self.fields.get(field)?;
        let parsed = match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(truncate_f64)),
            Value::Bool(flag) => {
                self.repairs.push(StateRepair::CoercedField { field });
                Some(i64::from(*flag))
            }
            Value::String(text) => {
                let parsed = text.trim().parse::<i64>().ok();
                if parsed.is_some() {
                    self.repairs.push(StateRepair::CoercedField { field });
                }
                parsed
            }
            _ => None,
        };
        if parsed.is_none() {
            self.repairs.push(StateRepair::CoercedField { field });
        }
        parsed
    }

    fn required(&mut self, field: &'static str, default: i64) -> i64 {
        if let Some(value) = self.int(field) {
            return value;
        }
        if !self.fields.contains_key(field) && REQUIRED.contains(&field) {
            self.repairs.push(StateRepair::MissingField { field });
        }
        default
    }

    /// Vitals are range-checked later by the state repair itself.
    fn vital(&mut self, field: &'static str, default: i32) -> i32 {
        let raw = self.required(field, i64::from(default));
        let bounded = raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        i32::try_from(bounded).unwrap_or(default)
    }

    fn counter(&mut self, field: &'static str) -> u32 {
        let raw = self.required(field, 0);
        let clamped = raw.clamp(0, i64::from(u32::MAX));
        if clamped != raw {
            self.repairs.push(StateRepair::Clamped {
                field,
                from: raw,
                to: clamped,
            });
        }
        u32::try_from(clamped).unwrap_or(0)
    }

    /// Attributes are clamped later; here only squeezed into `u8`.
    fn attribute(&mut self, field: &'static str) -> u8 {
        let raw = self.required(field, 1);
        let bounded = raw.clamp(0, i64::from(u8::MAX));
        if bounded != raw {
            self.repairs.push(StateRepair::Clamped {
                field,
                from: raw,
                to: bounded,
            });
        }
        u8::try_from(bounded).unwrap_or(1)
    }

    fn day(&mut self) -> u32 {
        let raw = self.required("day", 1);
        let clamped = raw.clamp(1, i64::from(u32::MAX));
        if clamped != raw {
            self.repairs.push(StateRepair::Clamped {
                field: "day",
                from: raw,
                to: clamped,
            });
        }
        u32::try_from(clamped).unwrap_or(1)
    }

    fn optional_int(&mut self, field: &'static str, default: i32) -> i32 {
        self.int(field)
            .map_or(default, |raw| {
                i32::try_from(raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX)))
                    .unwrap_or(default)
            })
    }

    fn season(&mut self, default: Season) -> Season {
        match self.fields.get("season") {
            None => default,
            Some(Value::String(name)) => name.parse().unwrap_or_else(|()| {
                self.repairs.push(StateRepair::CoercedField { field: "season" });
                default
            }),
            Some(_) => {
                self.repairs.push(StateRepair::CoercedField { field: "season" });
                default
            }
        }
    }

    /// Truthiness of a flag; anything but a JSON boolean is coerced.
    fn flag(&mut self, field: &'static str) -> bool {
        let Some(value) = self.fields.get(field) else {
            return false;
        };
        let truthy = match value {
            Value::Bool(flag) => return *flag,
            Value::Null => false,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => !text.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        };
        self.repairs.push(StateRepair::CoercedField { field });
        truthy
    }

    /// Accepts `{"bleeding": 2}` maps or `[{"kind": "bleeding", "remaining": 2}]`
    /// lists. Any malformed entry resets the whole set.
    fn status_effects(&mut self) -> StatusEffects {
        let parsed = match self.fields.get("status_effects") {
            None | Some(Value::Null) => return StatusEffects::new(),
            Some(Value::Object(map)) => effects_from_map(map),
            Some(list @ Value::Array(_)) => {
                serde_json::from_value::<StatusEffects>(list.clone()).ok()
            }
            Some(_) => None,
        };
        parsed.unwrap_or_else(|| {
            self.repairs.push(StateRepair::StatusEffectsReset);
            StatusEffects::new()
        })
    }
}

fn effects_from_map(map: &Map<String, Value>) -> Option<StatusEffects> {
    let mut effects = StatusEffects::new();
    for (name, turns) in map {
        let kind: EffectKind = name.parse().ok()?;
        let turns = u8::try_from(turns.as_u64()?).ok()?;
        effects.apply(kind, turns);
    }
    Some(effects)
}

fn truncate_f64(value: f64) -> i64 {
    num_traits::cast::cast::<f64, i64>(value.trunc()).unwrap_or(0)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_preset_is_well_supplied() {
        let preset = StateOverride::debug_preset();
        assert_eq!(preset.difficulty_label(), Some("Normal"));
        let repaired = preset.to_state();
        assert!(repaired.repairs.is_empty(), "{:?}", repaired.repairs);
        let state = repaired.state;
        assert_eq!(state.vitals.health, 100);
        assert_eq!(state.vitals.hunger, 0);
        assert_eq!(state.inventory.food, 10);
        assert_eq!(state.inventory.water, 10);
        assert_eq!(state.inventory.bandages, 5);
        assert_eq!(state.inventory.cloth, 2);
        assert_eq!(state.inventory.gold, 50);
        assert_eq!(state.attributes.strength, 3);
        assert!(state.shelter);
        assert!(state.fire);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let repaired = StateOverride::from_json(r#"{"food": 4}"#)
            .expect("object")
            .to_state();
        assert_eq!(repaired.state.inventory.food, 4);
        assert_eq!(repaired.state.vitals.health, 100);
        assert_eq!(repaired.state.vitals.hunger, 0);
        assert_eq!(repaired.state.inventory.gold, 0);
        assert_eq!(repaired.state.attributes.agility, 1);
        let missing = repaired
            .repairs
            .iter()
            .filter(|repair| matches!(repair, StateRepair::MissingField { .. }))
            .count();
        assert_eq!(missing, 10);
    }

    #[test]
    fn wrong_types_and_ranges_are_repaired() {
        let json = r#"{
            "health": 250, "hunger": -3, "thirst": "40",
            "food": -2, "water": 1.9, "gold": true,
            "strength": 0, "agility": 99, "endurance": 2,
            "bandages": 0, "cloth": 0,
            "shelter": 1, "fire": "", "infection": null,
            "season": "Winter", "day": 0
        }"#;
        let repaired = StateOverride::from_json(json).expect("object").to_state();
        let state = &repaired.state;
        assert_eq!(state.vitals.health, 100);
        assert_eq!(state.vitals.hunger, 0);
        assert_eq!(state.vitals.thirst, 40);
        assert_eq!(state.inventory.food, 0);
        assert_eq!(state.inventory.water, 1);
        assert_eq!(state.inventory.gold, 1);
        assert_eq!(state.attributes.strength, 1);
        assert_eq!(state.attributes.agility, 10);
        assert!(state.shelter);
        assert!(!state.fire);
        assert!(!state.infection);
        assert_eq!(state.season, Season::Winter);
        assert_eq!(state.day, 1);
        assert!(!repaired.is_clean());
        assert!(state.repaired(ValidationRules::default()).is_clean());
    }

    #[test]
    fn status_effects_accept_maps_and_lists() {
        let map = StateOverride::from_json(r#"{"status_effects": {"bleeding": 2, "poison": 0}}"#)
            .expect("object")
            .to_state();
        assert_eq!(
            map.state.status_effects.remaining(EffectKind::Bleeding),
            Some(2)
        );
        assert!(!map.state.status_effects.contains(EffectKind::Poison));

        let list = StateOverride::from_json(
            r#"{"status_effects": [{"kind": "fever", "remaining": 3}]}"#,
        )
        .expect("object")
        .to_state();
        assert_eq!(list.state.status_effects.remaining(EffectKind::Fever), Some(3));
    }

    #[test]
    fn malformed_status_effects_reset_to_empty() {
        for json in [
            r#"{"status_effects": "bleeding"}"#,
            r#"{"status_effects": {"curse": 2}}"#,
            r#"{"status_effects": {"poison": -1}}"#,
        ] {
            let repaired = StateOverride::from_json(json).expect("object").to_state();
            assert!(repaired.state.status_effects.is_empty());
            assert!(repaired.repairs.contains(&StateRepair::StatusEffectsReset));
        }
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            StateOverride::from_json("[1, 2]"),
            Err(OverrideError::NotAnObject { found: "an array" })
        ));
        assert!(matches!(
            StateOverride::from_json("{not json"),
            Err(OverrideError::Parse(_))
        ));
    }

    #[test]
    fn set_replaces_fields() {
        let mut preset = StateOverride::debug_preset();
        preset.set("gold", Value::from(7));
        preset.set("difficulty", Value::from("Hard"));
        assert_eq!(preset.difficulty_label(), Some("Hard"));
        assert_eq!(preset.to_state().state.inventory.gold, 7);
        assert_eq!(preset.get("gold"), Some(&Value::from(7)));
    }
}
