//! Day/night progression for a single survival run.
//!
//! A [`SurvivalSession`] owns the survivor, the difficulty, the RNG streams and
//! the encounter decider. Callers spend the day's action budget through
//! [`SurvivalSession::request_action`]; the last action of a day runs the night
//! and, unless the run ended, opens the next day.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{ActionError, ActionId, ActionReport, perform};
use crate::combat::{BanditOutcome, CautiousDecider, EncounterDecider};
use crate::constants::{
    DEFAULT_ACTIONS_PER_DAY, DEFAULT_DAYS_PER_SEASON, DEFAULT_MAX_DAYS,
    DEFAULT_MORNING_FIND_CHANCE, VITAL_MAX, VITAL_MIN,
};
use crate::difficulty::DifficultyProfile;
use crate::night::{
    NightEvent, NightOutcome, apply_night_effects, danger_event, morning_discovery,
};
use crate::overrides::StateOverride;
use crate::rng::RngBundle;
use crate::season::Season;
use crate::snapshot::StatusSnapshot;
use crate::state::{DamageCause, PlayerState, Repaired, ValidationRules};

/// Tunable knobs of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_max_days")]
    pub max_days: u32,
    #[serde(default = "SessionConfig::default_actions_per_day")]
    pub actions_per_day: u8,
    #[serde(default = "SessionConfig::default_days_per_season")]
    pub days_per_season: u32,
    #[serde(default = "SessionConfig::default_morning_find_chance")]
    pub morning_find_chance: f64,
    /// Charge bleeding survivors 5 health on every validation pass.
    #[serde(default)]
    pub legacy_validation_bleed: bool,
}

impl SessionConfig {
    #[must_use]
    pub const fn default_max_days() -> u32 {
        DEFAULT_MAX_DAYS
    }

    #[must_use]
    pub const fn default_actions_per_day() -> u8 {
        DEFAULT_ACTIONS_PER_DAY
    }

    #[must_use]
    pub const fn default_days_per_season() -> u32 {
        DEFAULT_DAYS_PER_SEASON
    }

    #[must_use]
    pub const fn default_morning_find_chance() -> f64 {
        DEFAULT_MORNING_FIND_CHANCE
    }

    #[must_use]
    pub const fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            bleed_on_validate: self.legacy_validation_bleed,
        }
    }

    /// Validate configuration bounds.
    ///
    /// # Errors
    ///
    /// Returns `SessionConfigError::RangeViolation` for the first field out of range.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        check_range("max_days", f64::from(self.max_days), 1.0, 365.0)?;
        check_range("actions_per_day", f64::from(self.actions_per_day), 1.0, 10.0)?;
        check_range("days_per_season", f64::from(self.days_per_season), 1.0, 90.0)?;
        check_range("morning_find_chance", self.morning_find_chance, 0.0, 1.0)?;
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_days: Self::default_max_days(),
            actions_per_day: Self::default_actions_per_day(),
            days_per_season: Self::default_days_per_season(),
            morning_find_chance: Self::default_morning_find_chance(),
            legacy_validation_bleed: false,
        }
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), SessionConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        return Ok(());
    }
    Err(SessionConfigError::RangeViolation {
        field,
        min,
        max,
        value,
    })
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Why a run was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCause {
    Damage(DamageCause),
    /// Health reached zero with no recorded cause.
    Unknown,
    /// The state could not be trusted after recovery.
    Corrupted,
}

impl fmt::Display for LossCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage(cause) => write!(f, "{cause}"),
            Self::Unknown => f.write_str("unknown"),
            Self::Corrupted => f.write_str("corrupted state"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Active,
    Won,
    Lost(LossCause),
    Quit,
}

impl SessionPhase {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Won => f.write_str("won"),
            Self::Lost(cause) => write!(f, "lost ({cause})"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Problems the engine noticed and handled while running.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineFault {
    #[error("invalid state repaired: {detail}")]
    InvalidState { detail: String },
    #[error("invalid enemy skipped: {detail}")]
    InvalidEnemy { detail: String },
    #[error("transient fault after {stage}: {detail}")]
    TransientRuntimeFault { stage: &'static str, detail: String },
    #[error("fatal state after {stage}: {detail}")]
    FatalState { stage: &'static str, detail: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("session already finished ({phase})")]
    Finished { phase: SessionPhase },
    #[error(transparent)]
    UnknownAction(#[from] ActionError),
    #[error("invalid session config: {0}")]
    Config(#[from] SessionConfigError),
}

/// Everything one request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub action: ActionId,
    pub report: ActionReport,
    /// Action lines followed by any end-of-run line.
    pub narrative: Vec<String>,
    pub success: bool,
    pub snapshot: StatusSnapshot,
    /// Present when this action closed the day.
    pub night: Option<NightOutcome>,
    pub phase: SessionPhase,
    pub actions_left: u8,
    pub faults: Vec<EngineFault>,
}

pub struct SurvivalSession {
    state: PlayerState,
    difficulty: DifficultyProfile,
    config: SessionConfig,
    seed: u64,
    rngs: RngBundle,
    decider: Box<dyn EncounterDecider>,
    phase: SessionPhase,
    actions_left: u8,
    day_went_well: bool,
    faults: Vec<EngineFault>,
}

impl SurvivalSession {
    /// Start a run with the default configuration.
    ///
    /// Without an initial state the survivor starts fresh with the difficulty's
    /// package; a supplied state is used as-is apart from validation.
    #[must_use]
    pub fn start(difficulty: DifficultyProfile, initial: Option<PlayerState>, seed: u64) -> Self {
        Self::build(difficulty, initial, seed, SessionConfig::default())
    }

    /// Start a run with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` when the configuration is out of range.
    pub fn with_config(
        difficulty: DifficultyProfile,
        initial: Option<PlayerState>,
        seed: u64,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self::build(difficulty, initial, seed, config))
    }

    /// Start from a loosely typed override record. The record's difficulty
    /// label picks the preset, falling back to Normal.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` when the configuration is out of range.
    pub fn from_override(
        record: &StateOverride,
        seed: u64,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let difficulty = DifficultyProfile::from_label_or_default(
            record.difficulty_label().unwrap_or("Normal"),
        );
        let Repaired { state, repairs } = record.to_state();
        let mut session = Self::build(difficulty, Some(state), seed, config);
        let mut faults: Vec<EngineFault> = repairs
            .iter()
            .map(|repair| {
                log::warn!("override repaired: {repair}");
                EngineFault::InvalidState {
                    detail: repair.to_string(),
                }
            })
            .collect();
        faults.append(&mut session.faults);
        session.faults = faults;
        Ok(session)
    }

    fn build(
        difficulty: DifficultyProfile,
        initial: Option<PlayerState>,
        seed: u64,
        config: SessionConfig,
    ) -> Self {
        let state = initial.unwrap_or_else(|| PlayerState::new_game(&difficulty));
        log::info!(
            "session start: difficulty {}, seed {seed}, {} days",
            difficulty.label,
            config.max_days
        );
        let actions_left = config.actions_per_day;
        let mut session = Self {
            state,
            difficulty,
            config,
            seed,
            rngs: RngBundle::from_user_seed(seed),
            decider: Box::new(CautiousDecider),
            phase: SessionPhase::Active,
            actions_left,
            day_went_well: true,
            faults: Vec::new(),
        };
        let mut faults = Vec::new();
        session.begin_day(&mut faults);
        session.faults = faults;
        session
    }

    /// Replace the encounter decider.
    #[must_use]
    pub fn with_decider(mut self, decider: impl EncounterDecider + 'static) -> Self {
        self.decider = Box::new(decider);
        self
    }

    /// Parse an action id and run it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownAction` for an id outside the catalogue,
    /// or `SessionError::Finished` once the run is over.
    pub fn request_action_id(&mut self, id: &str) -> Result<ActionOutcome, SessionError> {
        let action: ActionId = id.parse()?;
        self.request_action(action)
    }

    /// Spend one action of the day's budget.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the run is over; nothing is applied.
    pub fn request_action(&mut self, action: ActionId) -> Result<ActionOutcome, SessionError> {
        self.ensure_active()?;
        let mut faults = Vec::new();

        let report = perform(
            action,
            &mut self.state,
            &mut *self.rngs.actions(),
            &self.difficulty,
        );
        if action.is_gathering() && !report.success {
            self.day_went_well = false;
        }
        self.state.clamp_vitals();
        self.audit("action", &mut faults);

        let mut narrative = report.narrative.clone();
        let mut night = None;
        if !self.phase.is_over() && self.check_death() {
            narrative.push("You have collapsed from your injuries.".to_string());
        } else if !self.phase.is_over() {
            self.actions_left = self.actions_left.saturating_sub(1);
            if self.actions_left == 0 {
                night = Some(self.run_night(&mut faults));
            }
        }
        narrative.extend(self.closing_line());

        self.faults.extend(faults.iter().cloned());
        Ok(ActionOutcome {
            action,
            success: report.success,
            report,
            narrative,
            snapshot: self.snapshot(),
            night,
            phase: self.phase,
            actions_left: self.actions_left,
            faults,
        })
    }

    /// Answer the quit prompt. Declining leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the run is over.
    pub fn confirm_quit(&mut self, confirmed: bool) -> Result<SessionPhase, SessionError> {
        self.ensure_active()?;
        if confirmed {
            self.phase = SessionPhase::Quit;
            log::info!("session quit on day {}", self.state.day);
        }
        Ok(self.phase)
    }

    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.state)
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Apply a closure to the mutable survivor state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut PlayerState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> PlayerState {
        self.state
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub const fn difficulty(&self) -> &DifficultyProfile {
        &self.difficulty
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn actions_left(&self) -> u8 {
        self.actions_left
    }

    /// Every fault recorded since the session started.
    #[must_use]
    pub fn faults(&self) -> &[EngineFault] {
        &self.faults
    }

    /// Total random draws consumed across all streams.
    #[must_use]
    pub fn rng_draws(&self) -> u64 {
        self.rngs.total_draws()
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.phase.is_over() {
            return Err(SessionError::Finished { phase: self.phase });
        }
        Ok(())
    }

    fn begin_day(&mut self, faults: &mut Vec<EngineFault>) {
        let Repaired { state, repairs } = self.state.repaired(self.config.validation_rules());
        for repair in &repairs {
            if repair.is_penalty() {
                log::debug!("day {}: {repair}", state.day);
            } else {
                log::warn!("day {}: repaired {repair}", state.day);
                faults.push(EngineFault::InvalidState {
                    detail: repair.to_string(),
                });
            }
        }
        self.state = state;

        let season = Season::from_day(self.state.day, self.config.days_per_season);
        if season != self.state.season {
            log::info!("day {}: {season} has arrived", self.state.day);
        }
        self.state.season = season;
        self.actions_left = self.config.actions_per_day;
        self.day_went_well = true;
        log::info!("day {} begins ({season})", self.state.day);
        self.check_death();
    }

    fn run_night(&mut self, faults: &mut Vec<EngineFault>) -> NightOutcome {
        let effects = apply_night_effects(
            &mut self.state,
            &mut *self.rngs.night(),
            self.day_went_well,
        );
        self.audit("night effects", faults);

        let mut danger = None;
        if !self.phase.is_over() && !self.state.is_dead() {
            let report = danger_event(
                &mut self.state,
                &mut *self.rngs.night(),
                &self.difficulty,
                self.decider.as_mut(),
            );
            for event in &report.events {
                if let Some(detail) = aborted_encounter(event) {
                    faults.push(EngineFault::InvalidEnemy { detail });
                }
            }
            danger = Some(report);
            self.audit("danger event", faults);
        }

        let mut outcome = NightOutcome {
            effects,
            danger,
            discovery: None,
        };
        if self.phase.is_over() || self.check_death() {
            return outcome;
        }

        self.state.day = self.state.day.saturating_add(1);
        if self.state.day > self.config.max_days {
            self.phase = SessionPhase::Won;
            log::info!("session won after {} days", self.config.max_days);
            return outcome;
        }
        outcome.discovery = morning_discovery(
            &mut self.state,
            &mut *self.rngs.discovery(),
            self.config.morning_find_chance,
        );
        self.begin_day(faults);
        outcome
    }

    /// Verify the state after a mutation step; reset status effects and
    /// re-validate when it is malformed.
    fn audit(&mut self, stage: &'static str, faults: &mut Vec<EngineFault>) {
        let vitals = self.state.vitals;
        let vitals_ok = [vitals.health, vitals.hunger, vitals.thirst]
            .iter()
            .all(|value| (VITAL_MIN..=VITAL_MAX).contains(value));
        let effects_ok = self.state.status_effects.is_well_formed();
        if vitals_ok && effects_ok {
            return;
        }

        let detail =
            format!("vitals in range: {vitals_ok}, status effects well formed: {effects_ok}");
        log::warn!("transient fault after {stage}: {detail}");
        faults.push(EngineFault::TransientRuntimeFault { stage, detail });
        self.state.status_effects.clear();
        if !self.state.validate(ValidationRules::default()) {
            let detail = "state still unreliable after recovery".to_string();
            log::error!("fatal state after {stage}: {detail}");
            faults.push(EngineFault::FatalState { stage, detail });
            self.phase = SessionPhase::Lost(LossCause::Corrupted);
        }
    }

    /// Move to `Lost` when health is gone. Returns true if the survivor is dead.
    fn check_death(&mut self) -> bool {
        if !self.state.is_dead() {
            return false;
        }
        if !self.phase.is_over() {
            let cause = self
                .state
                .last_damage
                .map_or(LossCause::Unknown, LossCause::Damage);
            self.phase = SessionPhase::Lost(cause);
            log::info!("session lost on day {}: {cause}", self.state.day);
        }
        true
    }

    fn closing_line(&self) -> Option<String> {
        match self.phase {
            SessionPhase::Active | SessionPhase::Quit => None,
            SessionPhase::Won => Some(format!(
                "You survived {} days in the wilderness!",
                self.config.max_days
            )),
            SessionPhase::Lost(LossCause::Corrupted) => {
                Some("Fatal error: the game state is corrupted.".to_string())
            }
            SessionPhase::Lost(_) => {
                Some("You succumbed to your injuries and the harsh wilds.".to_string())
            }
        }
    }
}

fn aborted_encounter(event: &NightEvent) -> Option<String> {
    match event {
        NightEvent::EncounterAborted { reason } => Some(reason.clone()),
        NightEvent::Bandits { report } if report.outcome == BanditOutcome::Aborted => {
            Some(format!("bandit group of {}", report.bandits))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::status::{EffectKind, StatusEffect};

    fn normal() -> DifficultyProfile {
        DifficultyProfile::normal()
    }

    #[test]
    fn config_defaults_and_bounds() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_days, 20);
        assert_eq!(config.actions_per_day, 2);

        let parsed: SessionConfig =
            serde_json::from_str(r#"{"max_days": 30}"#).expect("config json");
        assert_eq!(parsed.max_days, 30);
        assert_eq!(parsed.days_per_season, 5);
        assert!(!parsed.legacy_validation_bleed);

        let mut bad = SessionConfig::default();
        bad.max_days = 0;
        assert!(matches!(
            bad.validate(),
            Err(SessionConfigError::RangeViolation {
                field: "max_days",
                ..
            })
        ));
        let mut bad = SessionConfig::default();
        bad.morning_find_chance = 1.5;
        assert!(bad.validate().is_err());
        assert!(SurvivalSession::with_config(normal(), None, 1, bad).is_err());
    }

    #[test]
    fn new_session_opens_day_one() {
        let session = SurvivalSession::start(normal(), None, 7);
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.state().day, 1);
        assert_eq!(session.state().season, Season::Summer);
        assert_eq!(session.actions_left(), 2);
        assert_eq!(session.state().inventory.food, 2);
        assert!(session.faults().is_empty());
    }

    #[test]
    fn supplied_state_skips_difficulty_package() {
        let record = StateOverride::debug_preset();
        let state = record.to_state().state;
        let session = SurvivalSession::start(normal(), Some(state), 7);
        assert_eq!(session.state().inventory.gold, 50);
        assert_eq!(session.state().inventory.food, 10);
    }

    #[test]
    fn spending_the_budget_runs_the_night() {
        let mut session = SurvivalSession::start(normal(), None, 11);
        let first = session.request_action(ActionId::Rest).expect("rest");
        assert!(first.night.is_none());
        assert_eq!(first.actions_left, 1);

        let second = session.request_action(ActionId::Rest).expect("rest");
        let night = second.night.expect("night after last action");
        assert!(night.danger.is_some());
        assert_eq!(second.phase, SessionPhase::Active);
        assert_eq!(second.actions_left, 2);
        assert_eq!(session.state().day, 2);
        assert_eq!(second.snapshot.day, 2);
    }

    #[test]
    fn declining_quit_costs_nothing() {
        let mut session = SurvivalSession::start(normal(), None, 3);
        let before = session.state().clone();
        assert_eq!(session.confirm_quit(false), Ok(SessionPhase::Active));
        assert_eq!(session.actions_left(), 2);
        assert_eq!(session.state(), &before);

        assert_eq!(session.confirm_quit(true), Ok(SessionPhase::Quit));
        assert_eq!(
            session.request_action(ActionId::Rest),
            Err(SessionError::Finished {
                phase: SessionPhase::Quit
            })
        );
        assert!(session.confirm_quit(true).is_err());
    }

    #[test]
    fn unknown_action_ids_are_rejected() {
        let mut session = SurvivalSession::start(normal(), None, 3);
        assert!(matches!(
            session.request_action_id("dance"),
            Err(SessionError::UnknownAction(_))
        ));
        assert_eq!(session.actions_left(), 2);
        assert!(session.request_action_id("trade:leave").is_ok());
    }

    #[test]
    fn death_ends_the_run_once() {
        let mut state = PlayerState::default();
        state.day = 11;
        state.vitals.health = 1;
        let mut session = SurvivalSession::start(normal(), Some(state), 5);
        assert_eq!(session.state().season, Season::Winter);

        session.request_action(ActionId::Eat).expect("eat");
        let last = session.request_action(ActionId::Eat).expect("eat");
        assert!(matches!(last.phase, SessionPhase::Lost(LossCause::Damage(_))));
        assert_eq!(session.state().day, 11);
        assert!(last.narrative.iter().any(|line| line.contains("succumbed")));
        let night = last.night.expect("night ran");
        assert!(night.danger.is_none());

        let frozen = session.state().clone();
        assert!(matches!(
            session.request_action(ActionId::Rest),
            Err(SessionError::Finished { .. })
        ));
        assert_eq!(session.state(), &frozen);
    }

    #[test]
    fn action_death_ends_the_day_early() {
        let mut lost = None;
        for seed in 1..200 {
            let mut state = PlayerState::default();
            state.vitals.health = 1;
            let mut session = SurvivalSession::start(normal(), Some(state), seed);
            let outcome = session.request_action(ActionId::Forage).expect("forage");
            if outcome.phase.is_over() {
                lost = Some((session, outcome));
                break;
            }
        }
        let (mut session, outcome) = lost.expect("a seed where foraging fails");
        assert_eq!(outcome.phase, SessionPhase::Lost(LossCause::Damage(DamageCause::Injury)));
        assert!(outcome.night.is_none());
        assert_eq!(outcome.actions_left, 2);
        assert_eq!(session.state().day, 1);

        let frozen = session.state().clone();
        assert!(matches!(
            session.request_action(ActionId::Rest),
            Err(SessionError::Finished { .. })
        ));
        assert_eq!(session.state(), &frozen);
    }

    #[test]
    fn extreme_override_day_wins_instead_of_overflowing() {
        let record = StateOverride::from_json(r#"{"day": 4294967295}"#).expect("record");
        let mut session =
            SurvivalSession::from_override(&record, 3, SessionConfig::default()).expect("session");
        assert_eq!(session.state().day, u32::MAX);
        session.request_action(ActionId::Rest).expect("rest");
        let last = session.request_action(ActionId::Rest).expect("rest");
        assert_eq!(last.phase, SessionPhase::Won);
        assert_eq!(session.state().day, u32::MAX);
        assert!(session.request_action(ActionId::Rest).is_err());
    }

    #[test]
    fn surviving_max_days_wins() {
        let config = SessionConfig {
            max_days: 1,
            ..SessionConfig::default()
        };
        let mut session = SurvivalSession::from_override(&StateOverride::debug_preset(), 9, config)
            .expect("valid config");
        session.request_action(ActionId::Rest).expect("rest");
        let last = session.request_action(ActionId::Rest).expect("rest");
        assert_eq!(last.phase, SessionPhase::Won);
        assert!(last.narrative.iter().any(|line| line.contains("survived 1 days")));
        assert!(session.request_action(ActionId::Rest).is_err());
    }

    #[test]
    fn same_seed_same_transcript() {
        let script = [
            ActionId::Forage,
            ActionId::Hunt,
            ActionId::BuildShelter,
            ActionId::MakeFire,
            ActionId::ExploreRiver,
            ActionId::Eat,
        ];
        let run = |seed: u64| {
            let mut session = SurvivalSession::start(normal(), None, seed);
            script
                .iter()
                .map_while(|action| session.request_action(*action).ok())
                .map(|outcome| serde_json::to_string(&outcome).expect("serialize outcome"))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert!(!run(42).is_empty());
    }

    #[test]
    fn malformed_effects_are_a_transient_fault() {
        let mut session = SurvivalSession::start(normal(), None, 5);
        session.with_state_mut(|state| {
            state.status_effects = [
                StatusEffect {
                    kind: EffectKind::Poison,
                    remaining: 2,
                },
                StatusEffect {
                    kind: EffectKind::Poison,
                    remaining: 0,
                },
            ]
            .into_iter()
            .collect();
        });
        let outcome = session.request_action(ActionId::Rest).expect("rest");
        assert!(matches!(
            outcome.faults.as_slice(),
            [EngineFault::TransientRuntimeFault { stage: "action", .. }]
        ));
        assert!(session.state().status_effects.is_empty());
        assert_eq!(outcome.phase, SessionPhase::Active);
    }

    #[test]
    fn legacy_bleed_applies_on_day_start() {
        let mut state = PlayerState::default();
        state.vitals.health = 50;
        state.status_effects.apply(EffectKind::Bleeding, 5);

        let legacy = SessionConfig {
            legacy_validation_bleed: true,
            ..SessionConfig::default()
        };
        let bleeding =
            SurvivalSession::with_config(normal(), Some(state.clone()), 1, legacy).expect("config");
        assert_eq!(bleeding.state().vitals.health, 45);

        let modern = SurvivalSession::start(normal(), Some(state), 1);
        assert_eq!(modern.state().vitals.health, 50);
    }

    #[test]
    fn override_repairs_are_reported() {
        let record = StateOverride::from_json(r#"{"health": 300, "difficulty": "Hard"}"#)
            .expect("record");
        let session =
            SurvivalSession::from_override(&record, 1, SessionConfig::default()).expect("session");
        assert_eq!(session.difficulty().label, "Hard");
        assert_eq!(session.state().vitals.health, 100);
        assert!(
            session
                .faults()
                .iter()
                .all(|fault| matches!(fault, EngineFault::InvalidState { .. }))
        );
        assert!(!session.faults().is_empty());
    }
}
