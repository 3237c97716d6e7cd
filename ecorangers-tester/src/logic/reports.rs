use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    // Overall stats
    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
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
            "{} {} [{} seed {}]",
            status,
            result.scenario_name.bold(),
            result.mode,
            result.seed
        )?;
        writeln!(
            out,
            "   Runs: {}/{} successful",
            result.successful_runs, result.runs
        )?;
        writeln!(
            out,
            "   Levels completed: {} | Average score: {}",
            result.levels_completed, result.average_score
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        writeln!(out, "   Catalog: {:016x}", result.catalog_fingerprint)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(best), Some(slowest)) = (
        results.iter().max_by_key(|r| r.average_score),
        results.iter().max_by_key(|r| r.average_duration),
    ) {
        writeln!(out, "{}", "⚡ Highlights".bright_yellow().bold())?;
        writeln!(out, "{}", "============".yellow())?;
        writeln!(
            out,
            "Best score: {} ({})",
            best.scenario_name.green(),
            best.average_score
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
    writeln!(out, "# Eco Rangers Simulation Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {}", total_tests - passed_tests)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(out, "| Scenario | Mode | Seed | Runs | Levels | Avg score | Status |")?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} | {} | {} | {}/{} | {} | {} | {status} |",
            result.scenario_name,
            result.mode,
            result.seed,
            result.successful_runs,
            result.runs,
            result.levels_completed,
            result.average_score
        )?;
    }

    let failing: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {} (seed {})\n", result.scenario_name, result.seed)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecorangers_game::GameMode;

    fn result(name: &str, passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: name.to_string(),
            mode: GameMode::Adventure,
            seed: 7,
            catalog_fingerprint: 0x1234,
            passed,
            runs: 1,
            successful_runs: usize::from(passed),
            failures: if passed {
                Vec::new()
            } else {
                vec!["invariant violated: level 0 out of range (1 total)".to_string()]
            },
            average_score: 320,
            levels_completed: 3,
            average_duration: Duration::from_millis(4),
        }
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn markdown_lists_failures_separately() {
        let results = [result("smoke", true), result("zen", false)];
        let text = render(|out| generate_markdown_report(out, &results));
        assert!(text.starts_with("# Eco Rangers Simulation Results"));
        assert!(text.contains("| smoke | adventure | 7 | 1/1 | 3 | 320 | ✅ |"));
        assert!(text.contains("### zen (seed 7)"));
        assert!(text.contains("- **Success rate**: 50.0%"));
    }

    #[test]
    fn json_report_is_an_array() {
        let results = [result("smoke", true)];
        let text = render(|out| generate_json_report(out, &results));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["scenario_name"], "smoke");
    }

    #[test]
    fn console_report_mentions_every_scenario() {
        colored::control::set_override(false);
        let results = [result("smoke", true), result("save-resume", false)];
        let text = render(|out| generate_console_report(out, &results, Duration::from_secs(1)));
        assert!(text.contains("Total scenarios: 2"));
        assert!(text.contains("smoke [adventure seed 7]"));
        assert!(text.contains("level 0 out of range"));
    }
}
