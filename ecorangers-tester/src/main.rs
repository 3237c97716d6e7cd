mod common;
mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use ecorangers_game::{GameConfig, GameMode};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{challenge_level_for_date, date_millis, parse_date, split_csv};
use logic::{
    GameTester, LogicTester, PlanOverrides, ScenarioResult, expand_scenarios, get_scenario,
    list_scenarios, resolve_seed_inputs,
};

#[derive(Debug, Parser)]
#[command(name = "ecorangers-tester", version)]
#[command(about = "Simulated play-throughs and invariant checks for the Eco Rangers game logic")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers, hex, or `random`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of runs per scenario and seed
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Force every scenario into this game mode
    #[arg(long, value_parser = parse_mode)]
    mode: Option<GameMode>,

    /// Probability the scripted player picks the right bin
    #[arg(long)]
    accuracy: Option<f64>,

    /// Day used for the daily challenge (YYYY-MM-DD, UTC); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Game configuration JSON (catalog seed, item seed, sound preference)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_mode(raw: &str) -> Result<GameMode, String> {
    raw.parse::<GameMode>()
        .map_err(|()| format!("unknown mode '{raw}' (adventure, zen, timeattack, challenge)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let config = load_config(args.config.as_ref())?;
    let challenge_day = parse_date(args.date.as_deref())?;
    let now_millis = date_millis(challenge_day)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let overrides = build_overrides(&args)?;
    let scenarios = expand_scenarios(&split_csv(&args.scenarios));

    println!(
        "📅 Daily challenge for {challenge_day}: level {}",
        challenge_level_for_date(challenge_day)?
    );
    log::info!(
        "running {} scenario(s) over {} seed(s), {} run(s) each",
        scenarios.len(),
        seeds.len(),
        args.runs
    );

    let tester = GameTester::new(config, now_millis, args.verbose);
    let logic_tester = LogicTester::new(tester, overrides, args.verbose);
    let results = run_scenarios(&logic_tester, &scenarios, &seeds, args.runs, now_millis);

    write_reports(&args, &results, start_time)?;

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
        writeln!(output_target.writer(), "  {key:18} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "♻️  Eco Rangers Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GameConfig::from_json(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

fn build_overrides(args: &Args) -> Result<PlanOverrides> {
    if let Some(accuracy) = args.accuracy
        && !(0.0..=1.0).contains(&accuracy)
    {
        bail!("--accuracy must be between 0 and 1, got {accuracy}");
    }
    Ok(PlanOverrides {
        mode: args.mode,
        accuracy: args.accuracy,
    })
}

fn run_scenarios(
    logic_tester: &LogicTester,
    scenarios: &[String],
    seeds: &[u64],
    runs: usize,
    now_millis: u64,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Simulations".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name, now_millis) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, runs));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Eco Rangers Simulation Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
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
