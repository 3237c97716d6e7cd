use colored::Colorize;
use ecorangers_game::GameMode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};
use crate::logic::scenarios::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub mode: GameMode,
    pub seed: u64,
    pub catalog_fingerprint: u64,
    pub passed: bool,
    pub runs: usize,
    pub successful_runs: usize,
    pub failures: Vec<String>,
    pub average_score: u64,
    pub levels_completed: usize,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

/// Command-line overrides applied on top of every scenario plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOverrides {
    pub mode: Option<GameMode>,
    pub accuracy: Option<f64>,
}

impl PlanOverrides {
    #[must_use]
    pub fn apply(&self, plan: &SimulationPlan) -> SimulationPlan {
        let mut plan = plan.clone();
        if let Some(mode) = self.mode {
            plan.mode = mode;
        }
        if let Some(accuracy) = self.accuracy {
            plan.accuracy = accuracy;
        }
        plan
    }
}

pub struct LogicTester {
    tester: GameTester,
    overrides: PlanOverrides,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(tester: GameTester, overrides: PlanOverrides, verbose: bool) -> Self {
        Self {
            tester,
            overrides,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        runs: usize,
    ) -> Vec<ScenarioResult> {
        let plan = self.overrides.apply(&scenario.plan);
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (mode: {} seed: {})",
                    scenario.name.bright_white(),
                    plan.mode,
                    seed
                );
            }
            results.push(self.run_single_scenario(&scenario.name, &plan, seed, runs));
        }

        results
    }

    fn run_single_scenario(
        &self,
        name: &str,
        plan: &SimulationPlan,
        seed: u64,
        runs: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut total_score = 0u64;
        let mut levels_completed = 0;
        let mut catalog_fingerprint = 0;

        for i in 0..runs {
            let start_time = Instant::now();
            let run_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = self.tester.run_plan(plan, run_seed);
            durations.push(start_time.elapsed());
            total_score = total_score.saturating_add(summary.final_state.score);
            levels_completed += summary.levels_completed();
            catalog_fingerprint = summary.catalog_fingerprint;

            if let Some(err) = evaluate_expectations(plan, &summary) {
                failures.push(format!(
                    "Run {} (mode {}, seed {}, level {}, score {}): {err}",
                    i + 1,
                    summary.mode,
                    summary.seed,
                    summary.final_state.level,
                    summary.final_state.score
                ));
                if self.verbose {
                    println!("  ❌ Run {}/{} failed: {}", i + 1, runs, err.red());
                }
            } else {
                successes += 1;
                if self.verbose {
                    println!(
                        "  ✅ Run {}/{} passed ({:?}) levels:{} score:{}",
                        i + 1,
                        runs,
                        durations.last().copied().unwrap_or_default(),
                        summary.levels_completed(),
                        summary.final_state.score
                    );
                }
            }
        }

        let run_count = u32::try_from(runs.max(1)).unwrap_or(u32::MAX);
        let average_duration = durations.iter().sum::<Duration>() / run_count;

        ScenarioResult {
            scenario_name: name.to_string(),
            mode: plan.mode,
            seed,
            catalog_fingerprint,
            passed: failures.is_empty(),
            runs,
            successful_runs: successes,
            failures,
            average_score: total_score / u64::from(run_count),
            levels_completed,
            average_duration,
        }
    }
}

/// First failure among the invariant log and the plan's expectations.
fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(first) = summary.violations.first() {
        return Some(format!(
            "invariant violated: {first} ({} total)",
            summary.violations.len()
        ));
    }
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
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
