use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thornwood_game::{DifficultyProfile, select_difficulty};

use crate::logic::policy::GameplayStrategy;
use crate::logic::scenarios::{SimulationPlan, TestScenario};
use crate::logic::seeds::SeedInfo;
use crate::logic::simulation::{SimulationSummary, run_simulation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub difficulty: String,
    pub strategy: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Per-run row kept for CSV output and aggregate stats.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub scenario: String,
    pub difficulty: String,
    pub strategy: String,
    pub seed: u64,
    pub outcome: String,
    pub survived: bool,
    pub days_survived: u32,
    pub turns: usize,
    pub final_health: i32,
    pub faults: usize,
    pub rng_draws: u64,
}

impl RunRecord {
    fn from_summary(scenario: &str, summary: &SimulationSummary) -> Self {
        Self {
            scenario: scenario.to_string(),
            difficulty: summary.difficulty.clone(),
            strategy: summary.strategy.to_string(),
            seed: summary.seed,
            outcome: summary.phase.to_string(),
            survived: summary.survived(),
            days_survived: summary.days_survived,
            turns: summary.turns.len(),
            final_health: summary.final_snapshot.vitals.health,
            faults: summary.faults.len(),
            rng_draws: summary.rng_draws,
        }
    }
}

/// Seeds, strategies and difficulties to sweep for each scenario.
#[derive(Debug, Clone)]
pub struct RunMatrix {
    pub seeds: Vec<SeedInfo>,
    pub strategies: Vec<GameplayStrategy>,
    /// `None` uses each scenario's own preset.
    pub difficulties: Option<Vec<DifficultyProfile>>,
    pub iterations: usize,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        matrix: &RunMatrix,
    ) -> (Vec<ScenarioResult>, Vec<RunRecord>) {
        let difficulties = match &matrix.difficulties {
            Some(list) => list.clone(),
            None => vec![
                select_difficulty(scenario.plan.default_difficulty)
                    .unwrap_or_else(|_| DifficultyProfile::normal()),
            ],
        };

        let mut results = Vec::new();
        let mut records = Vec::new();
        for difficulty in &difficulties {
            for &strategy in &matrix.strategies {
                for seed in &matrix.seeds {
                    if self.verbose {
                        println!(
                            "🧪 Testing scenario: {} [{}] ({} / {} seed: {})",
                            scenario.name.bright_white(),
                            scenario.key,
                            difficulty.label,
                            strategy,
                            seed.label()
                        );
                    }
                    let (result, mut runs) = self.run_single_scenario(
                        scenario,
                        difficulty,
                        strategy,
                        seed.seed,
                        matrix.iterations,
                    );
                    results.push(result);
                    records.append(&mut runs);
                }
            }
        }
        (results, records)
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        difficulty: &DifficultyProfile,
        strategy: GameplayStrategy,
        seed: u64,
        iterations: usize,
    ) -> (ScenarioResult, Vec<RunRecord>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut records = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match run_iteration(&scenario.plan, difficulty, strategy, iteration_seed) {
                Ok(summary) => {
                    records.push(RunRecord::from_summary(&scenario.name, &summary));
                    if let Some(err) = evaluate_expectations(&scenario.plan, &summary) {
                        failures.push(format!(
                            "Iteration {} (seed {}, turns {}, {}): {} | {}",
                            i + 1,
                            summary.seed,
                            summary.turns.len(),
                            summary.ending_message(),
                            err,
                            summary.final_snapshot
                        ));
                        if self.verbose {
                            println!(
                                "  ❌ Iteration {}/{} failed: {}",
                                i + 1,
                                iterations,
                                err.red()
                            );
                        }
                    } else {
                        successes += 1;
                        let duration = start_time.elapsed();
                        performance_data.push(duration);
                        if self.verbose {
                            println!(
                                "  ✅ Iteration {}/{} passed ({duration:?}) days:{} ending:{}",
                                i + 1,
                                iterations,
                                summary.days_survived,
                                summary.ending_message()
                            );
                        }
                    }
                }
                Err(err) => {
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        let result = ScenarioResult {
            scenario_name: scenario.name.clone(),
            difficulty: difficulty.label.clone(),
            strategy: strategy.label().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        };
        (result, records)
    }
}

fn run_iteration(
    plan: &SimulationPlan,
    difficulty: &DifficultyProfile,
    strategy: GameplayStrategy,
    seed: u64,
) -> anyhow::Result<SimulationSummary> {
    let config = plan.config_for(difficulty, strategy, seed);
    let summary = run_simulation(&config)?;
    if plan.replay_check {
        let replay = run_simulation(&config)?;
        if replay.transcript_digest != summary.transcript_digest {
            anyhow::bail!(
                "replay diverged: {:016x} vs {:016x}",
                summary.transcript_digest,
                replay.transcript_digest
            );
        }
    }
    Ok(summary)
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation(summary) {
            return Some(err.to_string());
        }
    }
    None
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
