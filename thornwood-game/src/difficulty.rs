//! Difficulty presets: starting resources and roll/probability modifiers.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::RandomSource;

const DEFAULT_LABEL: &str = "Normal";

/// Errors raised while resolving or loading difficulty presets.
#[derive(Debug, Error)]
pub enum DifficultyError {
    #[error("unknown difficulty `{label}`")]
    UnknownLabel { label: String },
    #[error("difficulty `{label}` has invalid {field} ({value})")]
    InvalidModifier {
        label: String,
        field: &'static str,
        value: f64,
    },
    #[error("difficulty catalog is empty")]
    EmptyCatalog,
    #[error("failed to parse difficulty catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Named bundle of starting resources and modifiers, fixed for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub label: String,
    #[serde(default)]
    pub start_gold: u32,
    #[serde(default)]
    pub start_food: u32,
    #[serde(default)]
    pub start_water: u32,
    #[serde(default)]
    pub start_strength: i32,
    #[serde(default = "DifficultyProfile::default_modifier")]
    pub bandit_multiplier: f64,
    #[serde(default = "DifficultyProfile::default_modifier")]
    pub trap_success_mod: f64,
    #[serde(default = "DifficultyProfile::default_modifier")]
    pub merchant_chance_mod: f64,
    #[serde(default)]
    pub player_roll_bonus: i32,
}

impl DifficultyProfile {
    const fn default_modifier() -> f64 {
        1.0
    }

    /// Built-in Normal preset, independent of the bundled catalog.
    #[must_use]
    pub fn normal() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            start_gold: 5,
            start_food: 1,
            start_water: 1,
            start_strength: 1,
            bandit_multiplier: Self::default_modifier(),
            trap_success_mod: Self::default_modifier(),
            merchant_chance_mod: Self::default_modifier(),
            player_roll_bonus: 0,
        }
    }

    /// Resolve a preset by label, falling back to Normal for unknown labels.
    #[must_use]
    pub fn from_label_or_default(label: &str) -> Self {
        select_difficulty(label).unwrap_or_else(|err| {
            log::warn!("{err}; using {DEFAULT_LABEL}");
            DifficultyCatalog::builtin()
                .get(DEFAULT_LABEL)
                .cloned()
                .unwrap_or_else(Self::normal)
        })
    }

    /// The player's d20 check with the difficulty bonus applied exactly once.
    pub fn player_roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> i32 {
        crate::numbers::roll_to_i32(rng.roll_die(20)) + self.player_roll_bonus
    }

    /// Check that every modifier is a finite, non-negative multiplier.
    ///
    /// # Errors
    ///
    /// Returns `DifficultyError::InvalidModifier` naming the first offending field.
    pub fn validate(&self) -> Result<(), DifficultyError> {
        for (field, value) in [
            ("bandit_multiplier", self.bandit_multiplier),
            ("trap_success_mod", self.trap_success_mod),
            ("merchant_chance_mod", self.merchant_chance_mod),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DifficultyError::InvalidModifier {
                    label: self.label.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::normal()
    }
}

impl fmt::Display for DifficultyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (gold {}, food +{}, water +{}, roll {:+})",
            self.label, self.start_gold, self.start_food, self.start_water, self.player_roll_bonus
        )
    }
}

/// Ordered catalog of difficulty presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DifficultyCatalog(pub Vec<DifficultyProfile>);

impl DifficultyCatalog {
    /// Load presets from a JSON array, preserving order.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, the list is empty, or a
    /// preset carries an invalid modifier.
    pub fn from_json(json: &str) -> Result<Self, DifficultyError> {
        let profiles: Vec<DifficultyProfile> = serde_json::from_str(json)?;
        if profiles.is_empty() {
            return Err(DifficultyError::EmptyCatalog);
        }
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self(profiles))
    }

    /// Presets bundled with the engine.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<DifficultyCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::from_json(include_str!("../assets/difficulty.json")).unwrap_or_else(|err| {
                log::error!("bundled difficulty catalog rejected: {err}");
                Self(vec![DifficultyProfile::normal()])
            })
        })
    }

    /// Case-insensitive lookup by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&DifficultyProfile> {
        let wanted = label.trim();
        self.0
            .iter()
            .find(|profile| profile.label.eq_ignore_ascii_case(wanted))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|profile| profile.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DifficultyProfile> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve a bundled preset by label.
///
/// # Errors
///
/// Returns `DifficultyError::UnknownLabel` when no preset matches.
pub fn select_difficulty(label: &str) -> Result<DifficultyProfile, DifficultyError> {
    DifficultyCatalog::builtin()
        .get(label)
        .cloned()
        .ok_or_else(|| DifficultyError::UnknownLabel {
            label: label.to_string(),
        })
}
