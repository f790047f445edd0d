use std::hash::Hasher;

use anyhow::{Context, Result};
use serde::Serialize;
use thornwood_game::{
    ActionId, DifficultyProfile, EngineFault, LossCause, PlayerState, SessionConfig, SessionPhase,
    StateOverride, StatusSnapshot, SurvivalSession,
};
use twox_hash::XxHash64;

use crate::logic::policy::GameplayStrategy;

/// How a simulated run begins.
#[derive(Debug, Clone)]
pub enum StartState {
    /// New game package for the chosen difficulty.
    Fresh,
    /// Loosely typed override record; its difficulty label wins.
    Override(StateOverride),
}

/// Configuration for a single simulated run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub difficulty: DifficultyProfile,
    pub strategy: GameplayStrategy,
    pub session: SessionConfig,
    pub start: StartState,
    /// Confirm quit once this day is reached.
    pub quit_on_day: Option<u32>,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(difficulty: DifficultyProfile, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            difficulty,
            strategy,
            session: SessionConfig::default(),
            start: StartState::Fresh,
            quit_on_day: None,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: StartState) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub const fn with_quit_on_day(mut self, day: Option<u32>) -> Self {
        self.quit_on_day = day;
        self
    }
}

/// One requested action and what came of it.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub day: u32,
    pub action: ActionId,
    pub rationale: &'static str,
    pub success: bool,
    pub night: bool,
    pub phase: SessionPhase,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub difficulty: String,
    pub strategy: &'static str,
    pub phase: SessionPhase,
    pub days_survived: u32,
    pub turns: Vec<TurnRecord>,
    pub final_snapshot: StatusSnapshot,
    pub faults: Vec<EngineFault>,
    /// Invariant breaches observed after any turn.
    pub violations: Vec<String>,
    pub rng_draws: u64,
    /// xxHash64 over every serialized outcome, in order.
    pub transcript_digest: u64,
}

impl SimulationSummary {
    #[must_use]
    pub fn ending_message(&self) -> String {
        match self.phase {
            SessionPhase::Active => "still active".to_string(),
            SessionPhase::Won => format!("survived {} days", self.days_survived),
            SessionPhase::Lost(cause) => {
                format!("lost on day {} ({cause})", self.final_snapshot.day)
            }
            SessionPhase::Quit => format!("quit on day {}", self.final_snapshot.day),
        }
    }

    #[must_use]
    pub const fn survived(&self) -> bool {
        matches!(self.phase, SessionPhase::Won)
    }

    #[must_use]
    pub const fn corrupted(&self) -> bool {
        matches!(self.phase, SessionPhase::Lost(LossCause::Corrupted))
    }
}

/// Play one run to completion with the configured strategy.
///
/// # Errors
///
/// Returns an error if the session rejects its configuration or a request
/// fails while the run is still active.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationSummary> {
    let session = match &config.start {
        StartState::Fresh => SurvivalSession::with_config(
            config.difficulty.clone(),
            None,
            config.seed,
            config.session.clone(),
        ),
        StartState::Override(record) => {
            SurvivalSession::from_override(record, config.seed, config.session.clone())
        }
    }
    .context("failed to start session")?;
    let mut session = session.with_decider(config.strategy.create_decider());
    let mut policy = config.strategy.create_policy(config.seed);

    let turn_limit =
        config.session.max_days as usize * usize::from(config.session.actions_per_day) + 1;
    let mut turns = Vec::new();
    let mut violations = Vec::new();
    let mut hasher = XxHash64::with_seed(0);

    while !session.phase().is_over() && turns.len() < turn_limit {
        if config
            .quit_on_day
            .is_some_and(|day| session.state().day >= day)
        {
            session.confirm_quit(true)?;
            break;
        }

        let decision = policy.choose_action(session.state());
        let day = session.state().day;
        let outcome = session
            .request_action(decision.action)
            .with_context(|| format!("day {day}: {} rejected", decision.action))?;
        log::debug!(
            "seed {} day {day}: {} chose {} ({}) -> {}",
            config.seed,
            policy.name(),
            decision.action,
            decision.rationale,
            outcome.success
        );

        let encoded = serde_json::to_vec(&outcome)?;
        hasher.write(&encoded);
        violations.extend(
            check_invariants(session.state())
                .into_iter()
                .map(|breach| format!("day {day} after {}: {breach}", decision.action)),
        );
        turns.push(TurnRecord {
            day,
            action: decision.action,
            rationale: decision.rationale,
            success: outcome.success,
            night: outcome.night.is_some(),
            phase: outcome.phase,
        });
    }

    let phase = session.phase();
    let days_survived = match phase {
        SessionPhase::Won => session.config().max_days,
        _ => session.state().day.saturating_sub(1),
    };
    Ok(SimulationSummary {
        seed: config.seed,
        difficulty: session.difficulty().label.clone(),
        strategy: config.strategy.label(),
        phase,
        days_survived,
        turns,
        final_snapshot: session.snapshot(),
        faults: session.faults().to_vec(),
        violations,
        rng_draws: session.rng_draws(),
        transcript_digest: hasher.finish(),
    })
}

/// Range checks every state must pass after a turn.
#[must_use]
pub fn check_invariants(state: &PlayerState) -> Vec<String> {
    let mut breaches = Vec::new();
    let vitals = [
        ("health", state.vitals.health),
        ("hunger", state.vitals.hunger),
        ("thirst", state.vitals.thirst),
    ];
    for (name, value) in vitals {
        if !(0..=100).contains(&value) {
            breaches.push(format!("{name} {value} outside 0..=100"));
        }
    }
    let attributes = [
        ("strength", state.attributes.strength),
        ("agility", state.attributes.agility),
        ("endurance", state.attributes.endurance),
    ];
    for (name, value) in attributes {
        if !(1..=10).contains(&value) {
            breaches.push(format!("{name} {value} outside 1..=10"));
        }
    }
    if !state.status_effects.is_well_formed() {
        breaches.push("status effects malformed".to_string());
    }
    breaches
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;

    #[test]
    fn fresh_run_terminates_cleanly() {
        let config =
            SimulationConfig::new(DifficultyProfile::normal(), GameplayStrategy::Cautious, 1337);
        let summary = run_simulation(&config).unwrap();
        assert!(summary.phase.is_over());
        assert!(summary.violations.is_empty());
        assert!(!summary.turns.is_empty());
        assert!(summary.days_survived <= 20);
    }

    #[test]
    fn same_seed_same_digest() {
        let config =
            SimulationConfig::new(DifficultyProfile::normal(), GameplayStrategy::Balanced, 42);
        let first = run_simulation(&config).unwrap();
        let second = run_simulation(&config).unwrap();
        assert_eq!(first.transcript_digest, second.transcript_digest);
        assert_eq!(first.turns.len(), second.turns.len());
    }

    #[test]
    fn quit_day_stops_the_run() {
        let config =
            SimulationConfig::new(DifficultyProfile::normal(), GameplayStrategy::Cautious, 3)
                .with_quit_on_day(Some(1));
        let summary = run_simulation(&config).unwrap();
        assert_eq!(summary.phase, SessionPhase::Quit);
        assert!(summary.turns.is_empty());
        assert_eq!(summary.ending_message(), "quit on day 1");
    }

    #[test]
    fn override_start_uses_record_difficulty() {
        let config = SimulationConfig::new(
            DifficultyProfile::normal(),
            GameplayStrategy::Cautious,
            5,
        )
        .with_start(StartState::Override(StateOverride::debug_preset()))
        .with_session(SessionConfig {
            max_days: 2,
            ..SessionConfig::default()
        });
        let summary = run_simulation(&config).unwrap();
        assert_eq!(summary.difficulty, "Normal");
        assert!(summary.faults.is_empty());
    }

    #[test]
    fn invariant_check_reports_breaches() {
        let mut state = PlayerState::default();
        assert!(check_invariants(&state).is_empty());
        state.vitals.health = 140;
        state.attributes.agility = 0;
        let breaches = check_invariants(&state);
        assert_eq!(breaches.len(), 2);
        assert!(breaches[0].contains("health"));
    }
}
