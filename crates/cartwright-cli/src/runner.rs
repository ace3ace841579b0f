//! Scenario runner: one session, scenarios in order, one report

use crate::commands::DriverArg;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::scenarios::{self, Check, ScenarioInfo};
use cartwright::mock::MockStorefront;
use cartwright::{Driver, HarnessConfig, Storefront};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Every check held and no error aborted the run
    pub passed: bool,
    /// Checks made before completion or abort
    pub checks: Vec<Check>,
    /// Error that aborted the scenario
    pub error: Option<String>,
    /// Wall-clock duration
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Build a report from a scenario's result
    #[must_use]
    pub fn from_result(
        name: &str,
        result: cartwright::CartwrightResult<Vec<Check>>,
        duration_ms: u64,
    ) -> Self {
        let (checks, error) = match result {
            Ok(checks) => (checks, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };
        let passed = error.is_none() && !checks.is_empty() && checks.iter().all(|c| c.passed);
        Self {
            name: name.to_string(),
            passed,
            checks,
            error,
            duration_ms,
        }
    }
}

/// Aggregated run results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Driver used
    pub driver: String,
    /// Storefront root URL
    pub base_url: String,
    /// Per-scenario reports, in run order
    pub scenarios: Vec<ScenarioReport>,
    /// Total duration
    pub duration_ms: u64,
}

impl RunReport {
    /// Get number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    /// Get number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// `Ok` when every scenario passed, `ScenariosFailed` otherwise
    ///
    /// # Errors
    ///
    /// Returns `ScenariosFailed` with the counts when any scenario failed
    pub fn verdict(&self) -> CliResult<()> {
        if self.all_passed() {
            Ok(())
        } else {
            Err(CliError::ScenariosFailed {
                failed: self.failed(),
                total: self.scenarios.len(),
            })
        }
    }
}

/// Runs scenarios sequentially over one storefront session
#[derive(Debug)]
pub struct ScenarioRunner<D: Driver + ?Sized> {
    shop: Storefront<D>,
    driver_name: String,
    fail_fast: bool,
}

impl<D: Driver + ?Sized> ScenarioRunner<D> {
    /// Create a runner over `driver`
    #[must_use]
    pub fn new(driver: Arc<D>, config: HarnessConfig, driver_name: impl Into<String>) -> Self {
        Self {
            shop: Storefront::new(driver, config),
            driver_name: driver_name.into(),
            fail_fast: false,
        }
    }

    /// Stop after the first failing scenario
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// The storefront the scenarios drive
    #[must_use]
    pub const fn storefront(&self) -> &Storefront<D> {
        &self.shop
    }

    /// Run `selected` in order, reporting each as it finishes
    pub async fn run(
        &self,
        selected: &[&ScenarioInfo],
        reporter: &mut ProgressReporter,
    ) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport {
            driver: self.driver_name.clone(),
            base_url: self.shop.config().base_url.clone(),
            ..RunReport::default()
        };

        reporter.start_progress(selected.len() as u64, "scenarios");
        for scenario in selected {
            reporter.set_message(scenario.name);
            let begun = Instant::now();
            let result = scenarios::execute(scenario.name, &self.shop).await;
            let outcome = ScenarioReport::from_result(
                scenario.name,
                result,
                begun.elapsed().as_millis() as u64,
            );
            if outcome.passed {
                info!(scenario = scenario.name, "scenario passed");
            } else {
                warn!(scenario = scenario.name, error = ?outcome.error, "scenario failed");
            }
            reporter.increment(1);

            let stop = self.fail_fast && !outcome.passed;
            report.scenarios.push(outcome);
            if stop {
                reporter.info("stopping after first failure (--fail-fast)");
                break;
            }
        }
        reporter.finish();

        report.duration_ms = started.elapsed().as_millis() as u64;
        report
    }

    /// Release the driver
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails to close
    pub async fn close(&self) -> CliResult<()> {
        self.shop.surface().driver().close().await?;
        Ok(())
    }
}

/// Open the selected driver
///
/// # Errors
///
/// Returns error if the browser cannot be launched, or `Config` when the
/// chromium driver was not compiled in
#[cfg_attr(not(feature = "browser"), allow(unused_variables, clippy::unused_async))]
pub async fn connect(driver: DriverArg, config: &HarnessConfig) -> CliResult<Arc<dyn Driver>> {
    match driver {
        DriverArg::Mock => Ok(Arc::new(MockStorefront::new())),
        #[cfg(feature = "browser")]
        DriverArg::Chromium => Ok(Arc::new(
            cartwright::ChromiumDriver::launch(&config.browser).await?,
        )),
        #[cfg(not(feature = "browser"))]
        DriverArg::Chromium => Err(CliError::config(
            "the chromium driver requires building cartwright-cli with --features browser",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cartwright::CartwrightError;

    fn mock_runner() -> (Arc<MockStorefront>, ScenarioRunner<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        (Arc::clone(&mock), ScenarioRunner::new(Arc::clone(&mock), config, "mock"))
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_error_fails_scenario() {
            let report = ScenarioReport::from_result(
                "login",
                Err(CartwrightError::driver("socket closed")),
                3,
            );
            assert!(!report.passed);
            assert!(report.checks.is_empty());
            assert_eq!(report.error.as_deref(), Some("Driver error: socket closed"));
        }

        #[test]
        fn test_no_checks_is_not_a_pass() {
            assert!(!ScenarioReport::from_result("login", Ok(Vec::new()), 0).passed);
        }

        #[test]
        fn test_verdict_counts() {
            let mut run = RunReport::default();
            run.scenarios.push(ScenarioReport::from_result(
                "a",
                Ok(vec![Check::new("x", true, "")]),
                0,
            ));
            assert!(run.verdict().is_ok());
            run.scenarios.push(ScenarioReport::from_result(
                "b",
                Ok(vec![Check::new("y", false, "")]),
                0,
            ));
            assert!(matches!(
                run.verdict(),
                Err(CliError::ScenariosFailed { failed: 1, total: 2 })
            ));
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_runs_selected_in_order() {
            let (_, runner) = mock_runner();
            let selected = scenarios::select(&["empty-cart".into(), "login".into()]).unwrap();
            let mut reporter = ProgressReporter::new(false, true);
            let report = runner.run(&selected, &mut reporter).await;
            let names: Vec<&str> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["empty-cart", "login"]);
            assert!(report.all_passed());
            assert_eq!(report.driver, "mock");
        }

        #[tokio::test(start_paused = true)]
        async fn test_fail_fast_stops_early() {
            let (mock, runner) = mock_runner();
            let runner = runner.with_fail_fast(true);
            mock.reject_logins(true);
            let selected = scenarios::select(&[]).unwrap();
            let mut reporter = ProgressReporter::new(false, true);
            let report = runner.run(&selected, &mut reporter).await;
            assert_eq!(report.scenarios.len(), 1);
            assert_eq!(report.failed(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_close_releases_driver() {
            let (mock, runner) = mock_runner();
            runner.close().await.unwrap();
            assert_eq!(mock.calls_matching("close"), 1);
        }

        #[tokio::test]
        async fn test_connect_mock() {
            let config = HarnessConfig::default();
            assert!(connect(DriverArg::Mock, &config).await.is_ok());
        }

        #[cfg(not(feature = "browser"))]
        #[tokio::test]
        async fn test_connect_chromium_without_feature() {
            let err = connect(DriverArg::Chromium, &HarnessConfig::default())
                .await
                .err()
                .unwrap();
            assert!(err.to_string().contains("--features browser"));
        }
    }
}
