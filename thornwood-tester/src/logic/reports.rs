use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use super::{RunRecord, ScenarioResult};

/// Survival stats for one difficulty/strategy pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeAggregate {
    pub difficulty: String,
    pub strategy: String,
    pub runs: usize,
    pub wins: usize,
    pub mean_days: f64,
}

impl OutcomeAggregate {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        ratio(self.wins, self.runs)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

#[must_use]
pub fn aggregate_outcomes(records: &[RunRecord]) -> Vec<OutcomeAggregate> {
    let mut groups: BTreeMap<(String, String), Vec<&RunRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.difficulty.clone(), record.strategy.clone()))
            .or_default()
            .push(record);
    }
    groups
        .into_iter()
        .map(|((difficulty, strategy), runs)| {
            let wins = runs.iter().filter(|run| run.survived).count();
            let total_days: u64 = runs.iter().map(|run| u64::from(run.days_survived)).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean_days = total_days as f64 / runs.len().max(1) as f64;
            OutcomeAggregate {
                difficulty,
                strategy,
                runs: runs.len(),
                wins,
                mean_days,
            }
        })
        .collect()
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    aggregates: &[OutcomeAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    let success_rate = ratio(passed_tests, total_tests.max(1)) * 100.0;
    writeln!(out, "Success rate: {success_rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} [{} / {} / seed {}]",
            status,
            result.scenario_name.bold(),
            result.difficulty,
            result.strategy,
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if !aggregates.is_empty() {
        writeln!(out, "{}", "🌲 Survival Summary".bright_green().bold())?;
        writeln!(out, "{}", "===================".green())?;
        for aggregate in aggregates {
            writeln!(
                out,
                "{:<10} {:<10} runs {:>3}  wins {:>5.1}%  mean days {:>5.1}",
                aggregate.difficulty,
                aggregate.strategy,
                aggregate.runs,
                aggregate.win_rate() * 100.0,
                aggregate.mean_days
            )?;
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Thornwood Logic Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    let success_rate = ratio(passed_tests, total_tests.max(1)) * 100.0;
    writeln!(out, "- **Success rate**: {success_rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "### {} {} ({} / {} / seed {})\n",
            status, result.scenario_name, result.difficulty, result.strategy, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

const CSV_HEADER: &str =
    "scenario,difficulty,strategy,seed,outcome,days_survived,turns,final_health,faults,rng_draws";

pub fn generate_csv_report(out: &mut dyn Write, records: &[RunRecord]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&record.scenario),
            csv_field(&record.difficulty),
            csv_field(&record.strategy),
            record.seed,
            csv_field(&record.outcome),
            record.days_survived,
            record.turns,
            record.final_health,
            record.faults,
            record.rng_draws
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
