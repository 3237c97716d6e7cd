use anyhow::ensure;
use ecorangers_game::{GameMode, constants::LEVEL_COUNT, daily_challenge_level};

use crate::logic::game_tester::{SimulationPlan, SimulationSummary};

/// Named simulation with its expectations.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const SCENARIOS: [(&str, &str); 6] = [
    ("smoke", "Three adventure levels with a mostly accurate player"),
    (
        "full-adventure",
        "All 100 adventure levels with a perfect player",
    ),
    ("zen", "Ten zen levels; the clock must never run"),
    (
        "time-attack",
        "Ten time attack levels with the shortened clock",
    ),
    (
        "daily-challenge",
        "Five levels of today's challenge with streak time bonuses",
    ),
    (
        "save-resume",
        "Adventure run that saves, quits and resumes at every level",
    ),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

/// Expand `all` into every known scenario, keeping other names in order.
#[must_use]
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = names.iter().filter(|n| *n != "all").cloned().collect();
    if names.iter().any(|n| n == "all") {
        for (key, _) in SCENARIOS {
            if !expanded.iter().any(|n| n == key) {
                expanded.push(key.to_string());
            }
        }
    }
    expanded
}

fn completes_requested_levels(levels: usize) -> impl Fn(&SimulationSummary) -> anyhow::Result<()> {
    move |summary| {
        ensure!(
            summary.levels_completed() >= levels || summary.game_complete,
            "completed {} of {levels} levels",
            summary.levels_completed()
        );
        Ok(())
    }
}

fn smoke() -> SimulationPlan {
    SimulationPlan::new(GameMode::Adventure)
        .with_max_levels(3)
        .with_expectation(completes_requested_levels(3))
        .with_expectation(|summary: &SimulationSummary| {
            ensure!(summary.correct_sorts > 0, "no item was ever sorted");
            Ok(())
        })
}

fn full_adventure() -> SimulationPlan {
    SimulationPlan::new(GameMode::Adventure)
        .with_max_levels(LEVEL_COUNT)
        .with_accuracy(1.0)
        .with_expectation(|summary: &SimulationSummary| {
            ensure!(summary.game_complete, "game never reached completion");
            ensure!(
                summary.final_state.level == LEVEL_COUNT,
                "finished on level {}",
                summary.final_state.level
            );
            Ok(())
        })
}

fn zen() -> SimulationPlan {
    SimulationPlan::new(GameMode::Zen)
        .with_max_levels(10)
        .with_expectation(completes_requested_levels(10))
        .with_expectation(|summary: &SimulationSummary| {
            if summary.mode != GameMode::Zen {
                return Ok(());
            }
            ensure!(summary.ticks == 0, "zen clock ticked {} times", summary.ticks);
            ensure!(
                summary.levels.iter().all(|level| level.perfect),
                "a zen level ended before the field was cleared"
            );
            Ok(())
        })
}

fn time_attack() -> SimulationPlan {
    SimulationPlan::new(GameMode::TimeAttack)
        .with_max_levels(10)
        .with_expectation(completes_requested_levels(10))
}

fn daily_challenge(now_millis: u64) -> SimulationPlan {
    let expected_level = daily_challenge_level(now_millis);
    SimulationPlan::new(GameMode::Challenge)
        .with_max_levels(5)
        .with_expectation(completes_requested_levels(5))
        .with_expectation(move |summary: &SimulationSummary| {
            if summary.mode != GameMode::Challenge {
                return Ok(());
            }
            ensure!(
                summary.starting_level == expected_level,
                "challenge started on level {} instead of {expected_level}",
                summary.starting_level
            );
            ensure!(
                summary.time_bonuses.iter().all(|secs| (1..=5).contains(secs)),
                "time bonus outside 1..=5: {:?}",
                summary.time_bonuses
            );
            Ok(())
        })
}

fn save_resume() -> SimulationPlan {
    SimulationPlan::new(GameMode::Adventure)
        .with_max_levels(6)
        .with_save_resume_every(1)
        .with_expectation(|summary: &SimulationSummary| {
            ensure!(
                summary.save_round_trips >= 5,
                "only {} save round trips succeeded",
                summary.save_round_trips
            );
            Ok(())
        })
}

#[must_use]
pub fn get_scenario(name: &str, now_millis: u64) -> Option<TestScenario> {
    let plan = match name {
        "smoke" => smoke(),
        "full-adventure" => full_adventure(),
        "zen" => zen(),
        "time-attack" => time_attack(),
        "daily-challenge" => daily_challenge(now_millis),
        "save-resume" => save_resume(),
        _ => return None,
    };
    Some(TestScenario::simulation(name, plan))
}
