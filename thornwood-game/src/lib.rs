//! Thornwood Game Engine
//!
//! Deterministic core of the Thornwood wilderness survival game.
//! A survivor spends a small budget of actions each day, then weathers the
//! night: temperature, hunger, thirst and a roll on the danger tables. The
//! crate has no I/O; presentation layers drive a [`SurvivalSession`] and render
//! its [`ActionOutcome`]s.

pub mod actions;
pub mod combat;
mod constants;
pub mod difficulty;
pub mod night;
pub mod numbers;
pub mod overrides;
pub mod rng;
pub mod season;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod status;
pub mod trade;

// Re-export commonly used types
pub use actions::{ActionError, ActionId, ActionReport, OutcomeTier, perform};
pub use combat::{
    BanditOutcome, BanditReport, BanditResponse, CautiousDecider, Combat, CombatCommand,
    CombatError, CombatPhase, CombatResult, EncounterDecider, Enemy, EnemyKind, WildlifeReport,
    resolve_bandits, resolve_combat, resolve_wildlife,
};
pub use difficulty::{DifficultyCatalog, DifficultyError, DifficultyProfile, select_difficulty};
pub use night::{
    DangerReport, EventDecisionTrace, NightEvent, NightOutcome, NightReport, Tool,
    apply_night_effects, danger_event, morning_discovery,
};
pub use overrides::{OverrideError, StateOverride};
pub use rng::{CountingRng, RandomSource, RngBundle, ScriptedRolls};
pub use season::{Season, TemperatureBand};
pub use session::{
    ActionOutcome, EngineFault, LossCause, SessionConfig, SessionConfigError, SessionError,
    SessionPhase, SurvivalSession,
};
pub use snapshot::StatusSnapshot;
pub use state::{
    Attribute, Attributes, DamageCause, Inventory, PlayerState, Repaired, StateRepair,
    ValidationRules, Vitals,
};
pub use status::{EffectKind, StatusEffect, StatusEffects};
pub use trade::{TradeOrder, TradeReport, trade};
