//! Named playthrough scenarios the tester can run.

use anyhow::{Result, bail};
use thornwood_game::{
    DifficultyProfile, EngineFault, SessionConfig, SessionPhase, StateOverride,
};

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{SimulationConfig, SimulationSummary, StartState};

pub type Expectation = fn(&SimulationSummary) -> Result<()>;

/// Everything needed to run one scenario for a given seed and strategy.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    /// Preset used when the CLI does not name one.
    pub default_difficulty: &'static str,
    pub session: SessionConfig,
    pub start: StartState,
    pub quit_on_day: Option<u32>,
    /// Run twice and compare transcript digests.
    pub replay_check: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    fn new(default_difficulty: &'static str) -> Self {
        Self {
            default_difficulty,
            session: SessionConfig::default(),
            start: StartState::Fresh,
            quit_on_day: None,
            replay_check: false,
            expectations: vec![expect_terminated, expect_invariants, expect_no_corruption],
        }
    }

    #[must_use]
    pub fn config_for(
        &self,
        difficulty: &DifficultyProfile,
        strategy: GameplayStrategy,
        seed: u64,
    ) -> SimulationConfig {
        SimulationConfig::new(difficulty.clone(), strategy, seed)
            .with_session(self.session.clone())
            .with_start(self.start.clone())
            .with_quit_on_day(self.quit_on_day)
    }
}

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: String,
    pub plan: SimulationPlan,
}

const SCENARIOS: [(&str, &str); 6] = [
    ("smoke", "Full Normal run terminates with invariants intact"),
    (
        "deterministic-replay",
        "Same seed and strategy replay to an identical transcript",
    ),
    (
        "debug-preset",
        "Well-supplied developer preset survives a short season",
    ),
    (
        "legacy-bleed",
        "Bleeding start with validation penalties enabled",
    ),
    ("quit-flow", "Quit on day three ends the run cleanly"),
    (
        "long-haul",
        "Forty-day run crossing every season twice",
    ),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

#[must_use]
pub fn scenario_keys() -> Vec<&'static str> {
    SCENARIOS.iter().map(|(key, _)| *key).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let wanted = key.trim().to_ascii_lowercase();
    let &(key, _) = SCENARIOS.iter().find(|(candidate, _)| *candidate == wanted)?;
    let plan = match key {
        "smoke" => SimulationPlan::new("Normal"),
        "deterministic-replay" => SimulationPlan {
            replay_check: true,
            ..SimulationPlan::new("Normal")
        },
        "debug-preset" => {
            let mut plan = SimulationPlan::new("Normal");
            plan.start = StartState::Override(StateOverride::debug_preset());
            plan.session.max_days = 5;
            plan.expectations.push(expect_clean_start);
            plan
        }
        "legacy-bleed" => {
            let mut plan = SimulationPlan::new("Normal");
            let mut record = StateOverride::debug_preset();
            record.set(
                "status_effects",
                serde_json::json!({ "bleeding": 3 }),
            );
            plan.start = StartState::Override(record);
            plan.session.legacy_validation_bleed = true;
            plan.session.max_days = 5;
            plan
        }
        "quit-flow" => {
            let mut plan = SimulationPlan::new("Easy");
            plan.quit_on_day = Some(3);
            plan.expectations = vec![expect_invariants, expect_quit_or_loss];
            plan
        }
        "long-haul" => {
            let mut plan = SimulationPlan::new("Easy");
            plan.session.max_days = 40;
            plan
        }
        _ => return None,
    };
    Some(TestScenario {
        key,
        name: scenario_title(key),
        plan,
    })
}

fn scenario_title(key: &str) -> String {
    key.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expand `all` into every known scenario key, keeping order.
#[must_use]
pub fn expand_scenarios(tokens: &[String]) -> Vec<String> {
    let mut scenarios: Vec<String> = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            scenarios.extend(scenario_keys().into_iter().map(str::to_string));
        } else {
            scenarios.push(token.clone());
        }
    }
    let mut seen = Vec::new();
    scenarios.retain(|scenario| {
        if seen.contains(scenario) {
            return false;
        }
        seen.push(scenario.clone());
        true
    });
    scenarios
}

fn expect_terminated(summary: &SimulationSummary) -> Result<()> {
    if summary.phase == SessionPhase::Active {
        bail!("run still active after {} turns", summary.turns.len());
    }
    Ok(())
}

fn expect_invariants(summary: &SimulationSummary) -> Result<()> {
    if let Some(first) = summary.violations.first() {
        bail!(
            "{} invariant breaches, first: {first}",
            summary.violations.len()
        );
    }
    Ok(())
}

fn expect_no_corruption(summary: &SimulationSummary) -> Result<()> {
    if summary.corrupted() {
        bail!("session ended with a corrupted state");
    }
    let fatal = summary
        .faults
        .iter()
        .find(|fault| matches!(fault, EngineFault::FatalState { .. }));
    if let Some(fault) = fatal {
        bail!("fatal fault recorded: {fault}");
    }
    Ok(())
}

fn expect_clean_start(summary: &SimulationSummary) -> Result<()> {
    let repaired = summary
        .faults
        .iter()
        .filter(|fault| matches!(fault, EngineFault::InvalidState { .. }))
        .count();
    if repaired > 0 {
        bail!("developer preset needed {repaired} repairs");
    }
    Ok(())
}

fn expect_quit_or_loss(summary: &SimulationSummary) -> Result<()> {
    match summary.phase {
        SessionPhase::Quit | SessionPhase::Lost(_) => Ok(()),
        other => bail!("expected quit, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).expect("listed scenario resolves");
            assert_eq!(scenario.key, key);
            assert!(!scenario.plan.expectations.is_empty());
        }
        assert!(get_scenario("missing").is_none());
    }

    #[test]
    fn titles_are_capitalized() {
        assert_eq!(scenario_title("deterministic-replay"), "Deterministic Replay");
        assert_eq!(get_scenario("SMOKE").unwrap().name, "Smoke");
    }

    #[test]
    fn expands_all_keyword_without_duplicates() {
        let expanded = expand_scenarios(&["smoke".to_string(), "all".to_string()]);
        assert_eq!(expanded.len(), SCENARIOS.len());
        assert_eq!(expanded[0], "smoke");
    }

    #[test]
    fn expand_preserves_unknown_names() {
        let expanded = expand_scenarios(&["smoke".to_string(), "real-game".to_string()]);
        assert_eq!(expanded, vec!["smoke".to_string(), "real-game".to_string()]);
    }

    #[test]
    fn legacy_bleed_plan_enables_penalty() {
        let scenario = get_scenario("legacy-bleed").unwrap();
        assert!(scenario.plan.session.legacy_validation_bleed);
        assert!(matches!(scenario.plan.start, StartState::Override(_)));
    }
}
