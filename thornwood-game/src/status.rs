//! Timed status effects and the nightly tick that drives them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::FEVER_THIRST;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Poison,
    Bleeding,
    Fever,
}

/// What one tick of an effect does to the survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectProfile {
    /// Die rolled for health damage each tick.
    pub damage_die: Option<u32>,
    /// Added to thirst each tick.
    pub thirst_delta: i32,
}

impl EffectKind {
    pub const ALL: [Self; 3] = [Self::Poison, Self::Bleeding, Self::Fever];

    #[must_use]
    pub const fn profile(self) -> EffectProfile {
        match self {
            Self::Poison => EffectProfile {
                damage_die: Some(4),
                thirst_delta: 0,
            },
            Self::Bleeding => EffectProfile {
                damage_die: Some(3),
                thirst_delta: 0,
            },
            Self::Fever => EffectProfile {
                damage_die: None,
                thirst_delta: FEVER_THIRST,
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poison => "poison",
            Self::Bleeding => "bleeding",
            Self::Fever => "fever",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub remaining: u8,
}

/// Result of ticking one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTick {
    pub kind: EffectKind,
    pub damage: u32,
    pub thirst_delta: i32,
    pub expired: bool,
}

/// At most one entry per kind, each with a positive remaining duration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffects(SmallVec<[StatusEffect; 3]>);

impl StatusEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an effect's remaining duration, replacing any previous entry.
    /// A zero duration removes the effect.
    pub fn apply(&mut self, kind: EffectKind, turns: u8) {
        self.0.retain(|effect| effect.kind != kind);
        if turns > 0 {
            self.0.push(StatusEffect {
                kind,
                remaining: turns,
            });
            self.0.sort_by_key(|effect| effect.kind);
        }
    }

    /// Remove an effect, reporting whether it was present.
    pub fn remove(&mut self, kind: EffectKind) -> bool {
        let before = self.0.len();
        self.0.retain(|effect| effect.kind != kind);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.0.iter().any(|effect| effect.kind == kind)
    }

    #[must_use]
    pub fn remaining(&self, kind: EffectKind) -> Option<u8> {
        self.0
            .iter()
            .find(|effect| effect.kind == kind)
            .map(|effect| effect.remaining)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
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

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// True when no entry has expired and no kind appears twice.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().enumerate().all(|(idx, effect)| {
            effect.remaining > 0 && self.0[..idx].iter().all(|prior| prior.kind != effect.kind)
        })
    }

    /// Copy with expired entries dropped and duplicates collapsed to their
    /// longest duration.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = Self::new();
        for effect in self.0.iter().filter(|effect| effect.remaining > 0) {
            let longest = out
                .remaining(effect.kind)
                .map_or(effect.remaining, |current| current.max(effect.remaining));
            out.apply(effect.kind, longest);
        }
        out
    }

    /// Advance every effect by one turn, in kind order.
    ///
    /// Each effect rolls its damage die (if any), reports its thirst delta,
    /// and loses one turn; effects reaching zero are removed.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> SmallVec<[EffectTick; 3]> {
        self.0.sort_by_key(|effect| effect.kind);
        let mut ticks = SmallVec::new();
        for effect in &mut self.0 {
            let profile = effect.kind.profile();
            let damage = profile.damage_die.map_or(0, |die| rng.roll_die(die));
            effect.remaining = effect.remaining.saturating_sub(1);
            ticks.push(EffectTick {
                kind: effect.kind,
                damage,
                thirst_delta: profile.thirst_delta,
                expired: effect.remaining == 0,
            });
        }
        self.0.retain(|effect| effect.remaining > 0);
        ticks
    }
}

impl FromIterator<StatusEffect> for StatusEffects {
    fn from_iter<T: IntoIterator<Item = StatusEffect>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
