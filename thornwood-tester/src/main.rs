mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use thornwood_game::{DifficultyCatalog, DifficultyProfile, select_difficulty};

use logic::reports::{OutcomeAggregate, aggregate_outcomes};
use logic::{
    LogicTester, RunMatrix, RunRecord, ScenarioResult, expand_scenarios, get_scenario,
    list_scenarios, resolve_seed_inputs, resolve_strategies,
};

#[derive(Debug, Parser)]
#[command(name = "thornwood-tester", version = "0.1.0")]
#[command(about = "Automated playthroughs and QA sweeps for the Thornwood survival engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers, 0x hex, or phrase:<text>)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario, seed and strategy
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Difficulty presets to sweep (comma-separated, or `all`); defaults to each scenario's own
    #[arg(long)]
    difficulty: Option<String>,

    /// Play strategies (cautious,balanced,aggressive,random, or `all`)
    #[arg(long, default_value = "cautious")]
    strategies: String,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let matrix = build_matrix(&args)?;
    let scenarios = expand_scenarios(&split_csv(&args.scenarios));
    let (results, records) = run_logic_scenarios(&args, &scenarios, &matrix);
    let aggregates = aggregate_outcomes(&records);

    write_reports(&args, &results, &records, &aggregates, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🌲 Thornwood Automated Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn resolve_difficulties(arg: Option<&str>) -> Result<Option<Vec<DifficultyProfile>>> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    let mut profiles: Vec<DifficultyProfile> = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            profiles.extend(DifficultyCatalog::builtin().iter().cloned());
            continue;
        }
        let profile = select_difficulty(&token)
            .with_context(|| format!("unknown difficulty {token}"))?;
        profiles.push(profile);
    }
    let mut seen: Vec<String> = Vec::new();
    profiles.retain(|profile| {
        if seen.contains(&profile.label) {
            return false;
        }
        seen.push(profile.label.clone());
        true
    });
    if profiles.is_empty() {
        bail!("no difficulties selected");
    }
    Ok(Some(profiles))
}

fn build_matrix(args: &Args) -> Result<RunMatrix> {
    Ok(RunMatrix {
        seeds: resolve_seed_inputs(&split_csv(&args.seeds))?,
        strategies: resolve_strategies(&split_csv(&args.strategies))?,
        difficulties: resolve_difficulties(args.difficulty.as_deref())?,
        iterations: args.iterations.max(1),
    })
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    matrix: &RunMatrix,
) -> (Vec<ScenarioResult>, Vec<RunRecord>) {
    let mut results = Vec::new();
    let mut records = Vec::new();

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);
    for scenario_name in scenarios {
        let Some(scenario) = get_scenario(scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        let (mut scenario_results, mut scenario_records) =
            logic_tester.run_scenario(&scenario, matrix);
        results.append(&mut scenario_results);
        records.append(&mut scenario_records);
    }

    (results, records)
}

fn write_reports(
    args: &Args,
    results: &[ScenarioResult],
    records: &[RunRecord],
    aggregates: &[OutcomeAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Thornwood Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, records)?,
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    aggregates,
                    duration,
                )?;
            }
        }
    }

    if matches!(args.report.as_str(), "console" | "markdown") {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            difficulty: None,
            strategies: "cautious".to_string(),
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("thornwood-main-{label}-{}", std::process::id()))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke".to_string(),
            difficulty: "Normal".to_string(),
            strategy: "Cautious".to_string(),
            seed: 1337,
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_millis(4),
            performance_data: vec![Duration::from_millis(4)],
        }
    }

    #[test]
    fn split_csv_trims_and_filters() {
        assert_eq!(
            split_csv(" alpha, ,beta,  gamma "),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn difficulties_default_to_scenario_presets() {
        assert!(resolve_difficulties(None).unwrap().is_none());
        let all = resolve_difficulties(Some("all")).unwrap().unwrap();
        assert_eq!(all.len(), DifficultyCatalog::builtin().len());
        let picked = resolve_difficulties(Some("hard,Hard")).unwrap().unwrap();
        assert_eq!(picked.len(), 1);
        assert!(resolve_difficulties(Some("nightmare")).is_err());
    }

    #[test]
    fn build_matrix_clamps_iterations() {
        let args = Args {
            iterations: 0,
            strategies: "all".to_string(),
            ..base_args()
        };
        let matrix = build_matrix(&args).unwrap();
        assert_eq!(matrix.iterations, 1);
        assert_eq!(matrix.strategies.len(), 4);
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("deterministic-replay"));
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let matrix = build_matrix(&base_args()).unwrap();
        let (results, records) =
            run_logic_scenarios(&base_args(), &["nope".to_string()], &matrix);
        assert!(results.is_empty());
        assert!(records.is_empty());
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("empty.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], &[], &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_json_for_results() {
        let temp = temp_path("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], &[], &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["scenario_name"], "Smoke");
    }

    #[test]
    fn write_reports_console_lists_failures() {
        let temp = temp_path("console.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(false)], &[], &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("failure"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
