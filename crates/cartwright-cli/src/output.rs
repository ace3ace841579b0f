//! Output formatting and progress reporting

use crate::runner::{RunReport, ScenarioReport};
use crate::scenarios::ScenarioInfo;
use cartwright::{Money, MoneyParseError};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for scenario execution.
///
/// Report lines go to stdout; the progress bar draws on stderr and only when
/// stderr is a terminal.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !Term::stderr().is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(text);
            }),
            None => {
                let _ = self.term.write_line(text);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// Print one scenario's checks
    pub fn scenario(&self, report: &ScenarioReport) {
        self.header(&format!("{} ({} ms)", report.name, report.duration_ms));
        for check in &report.checks {
            let text = format!("{}: {}", check.name, check.detail);
            if check.passed {
                self.success(&text);
            } else {
                self.failure(&format!("{}: {text}", report.name));
            }
        }
        if let Some(ref error) = report.error {
            self.failure(&format!("{}: aborted: {error}", report.name));
        }
    }

    /// Print run summary
    pub fn summary(&self, report: &RunReport) {
        let passed = report.passed();
        let failed = report.failed();
        if self.quiet && failed == 0 {
            return;
        }

        self.line("");

        let total = passed + failed;
        let duration_secs = report.duration_ms as f64 / 1000.0;

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}

/// One line per scenario: name, padded, then description
#[must_use]
pub fn render_scenario_list(scenarios: &[ScenarioInfo]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    scenarios
        .iter()
        .map(|s| format!("{:<width$}  {}\n", s.name, s.description))
        .collect()
}

/// One line per input: the parsed amount or the parse error
#[must_use]
pub fn render_money(results: &[(String, Result<Money, MoneyParseError>)]) -> String {
    results
        .iter()
        .map(|(input, result)| match result {
            Ok(money) => format!("{input:?} => {money} ({} minor units)\n", money.minor()),
            Err(e) => format!("{input:?} => error: {e}\n"),
        })
        .collect()
}

/// Pretty JSON for a run report
///
/// # Errors
///
/// Returns error if serialization fails
pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scenarios::{Check, SCENARIOS};

    fn report(passed: bool) -> RunReport {
        RunReport {
            driver: "mock".to_string(),
            base_url: "https://storefront.mock".to_string(),
            scenarios: vec![ScenarioReport {
                name: "login".to_string(),
                passed,
                checks: vec![Check::new("session marker visible", passed, "Anonymous")],
                error: None,
                duration_ms: 12,
            }],
            duration_ms: 15,
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_scenario_list_aligns_descriptions() {
            let text = render_scenario_list(SCENARIOS);
            let width = SCENARIOS.iter().map(|s| s.name.len()).max().unwrap();
            assert_eq!(text.lines().count(), SCENARIOS.len());
            for (line, scenario) in text.lines().zip(SCENARIOS) {
                assert!(line.starts_with(scenario.name));
                assert_eq!(line.find(scenario.description), Some(width + 2));
            }
        }

        #[test]
        fn test_money_lines() {
            let inputs = ["Rs. 1,200", "abc"];
            let results: Vec<_> = inputs
                .iter()
                .map(|s| (s.to_string(), Money::parse(s)))
                .collect();
            let text = render_money(&results);
            assert!(text.contains("\"Rs. 1,200\" => Rs. 1,200 (120000 minor units)"));
            assert!(text.contains("\"abc\" => error:"));
        }

        #[test]
        fn test_json_report() {
            let json = render_json(&report(false)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["driver"], "mock");
            assert_eq!(value["scenarios"][0]["name"], "login");
            assert_eq!(value["scenarios"][0]["checks"][0]["passed"], false);
        }
    }

    mod reporter_tests {
        use super::*;

        #[test]
        fn test_quiet_reporter_has_no_progress() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(3, "scenarios");
            assert!(reporter.progress_bar.is_none());
            reporter.increment(1);
            reporter.finish();
        }

        #[test]
        fn test_default_reporter() {
            let reporter = ProgressReporter::default();
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }
    }
}
