//! Harness configuration.
//!
//! Loaded from YAML (every field optional, defaults below), then overridden by
//! `CARTWRIGHT_*` environment variables.
//!
//! ```yaml
//! base_url: https://automationexercise.com
//! credentials:
//!   email: someone@example.com
//!   password: secret
//! settle:
//!   mode: poll
//! convergence:
//!   max_attempts: 3
//! ```

use crate::result::{CartwrightError, CartwrightResult};
use crate::wait::{Settle, WaitOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storefront the harness drives when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://automationexercise.com";

/// Environment variable overriding [`HarnessConfig::base_url`]
pub const ENV_BASE_URL: &str = "CARTWRIGHT_BASE_URL";
/// Environment variable overriding the login email
pub const ENV_EMAIL: &str = "CARTWRIGHT_EMAIL";
/// Environment variable overriding the login password
pub const ENV_PASSWORD: &str = "CARTWRIGHT_PASSWORD";
/// Environment variable overriding headless mode (`true`/`false`/`1`/`0`)
pub const ENV_HEADLESS: &str = "CARTWRIGHT_HEADLESS";

/// Login credentials for the default test account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "emaildaautomacaoplaywrightprogit".to_string(),
            password: "Senha@123".to_string(),
        }
    }
}

/// Per-call timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Auto-wait budget for a mutator's target to attach
    pub action_ms: u64,
    /// Budget for explicit `wait_for_element` calls
    pub wait_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: 5_000,
            wait_ms: 30_000,
        }
    }
}

impl Timeouts {
    /// Action timeout as a duration
    #[must_use]
    pub const fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    /// Wait timeout as a duration
    #[must_use]
    pub const fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// How settle points pause after a state change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleMode {
    /// Poll for the expected post-condition, bounded by the settle duration
    #[default]
    Poll,
    /// Sleep for the settle duration
    Fixed,
}

/// Settle durations and polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    /// Poll or sleep
    pub mode: SettleMode,
    /// Pause after removing a cart row
    pub removal_ms: u64,
    /// Pause between add-to-cart iterations
    pub add_to_cart_ms: u64,
    /// Pause after each cart-emptying attempt
    pub convergence_ms: u64,
    /// First poll interval
    pub poll_interval_ms: u64,
    /// Poll interval multiplier
    pub backoff: f64,
    /// Poll interval ceiling
    pub max_poll_interval_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            mode: SettleMode::Poll,
            removal_ms: 1_000,
            add_to_cart_ms: 500,
            convergence_ms: 1_500,
            poll_interval_ms: 50,
            backoff: 1.5,
            max_poll_interval_ms: 500,
        }
    }
}

impl SettleConfig {
    fn settle(&self, ms: u64) -> Settle {
        match self.mode {
            SettleMode::Fixed => Settle::fixed_ms(ms),
            SettleMode::Poll => Settle::Poll(
                WaitOptions::new()
                    .with_timeout(ms)
                    .with_poll_interval(self.poll_interval_ms)
                    .with_backoff(self.backoff)
                    .with_max_poll_interval(self.max_poll_interval_ms),
            ),
        }
    }

    /// Settle used after removing one cart row
    #[must_use]
    pub fn removal(&self) -> Settle {
        self.settle(self.removal_ms)
    }

    /// Settle used between add-to-cart iterations
    #[must_use]
    pub fn add_to_cart(&self) -> Settle {
        self.settle(self.add_to_cart_ms)
    }

    /// Settle used after each convergence attempt
    #[must_use]
    pub fn convergence(&self) -> Settle {
        self.settle(self.convergence_ms)
    }

    /// Settle that never pauses
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            mode: SettleMode::Fixed,
            removal_ms: 0,
            add_to_cart_ms: 0,
            convergence_ms: 0,
            poll_interval_ms: 50,
            backoff: 1.5,
            max_poll_interval_ms: 500,
        }
    }
}

/// Bounds for the cart-emptying convergence loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Maximum number of sweep attempts
    pub max_attempts: u32,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Storefront root URL; relative routes are joined onto it
    pub base_url: String,
    /// Default login credentials
    pub credentials: Credentials,
    /// Per-call timeouts
    pub timeouts: Timeouts,
    /// Settle behaviour
    pub settle: SettleConfig,
    /// Convergence bounds
    pub convergence: ConvergenceConfig,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            timeouts: Timeouts::default(),
            settle: SettleConfig::default(),
            convergence: ConvergenceConfig::default(),
            browser: BrowserConfig::default(),
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

impl HarnessConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid or validation fails.
    pub fn from_yaml(yaml: &str) -> CartwrightResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CartwrightResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CartwrightError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> CartwrightResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `CARTWRIGHT_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if an override has an invalid value.
    pub fn apply_env_overrides(&mut self) -> CartwrightResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `CARTWRIGHT_*` overrides from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns error if an override has an invalid value.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> CartwrightResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(email) = lookup(ENV_EMAIL) {
            self.credentials.email = email;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.credentials.password = password;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.browser.headless = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(CartwrightError::config(format!(
                        "{ENV_HEADLESS} must be true or false, got {other:?}"
                    )))
                }
            };
        }
        self.validate()
    }

    /// Check invariants the harness relies on.
    ///
    /// # Errors
    ///
    /// Returns error on an empty base URL, zero convergence attempts, or a
    /// backoff below 1.0.
    pub fn validate(&self) -> CartwrightResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(CartwrightError::config("base_url must not be empty"));
        }
        if self.convergence.max_attempts == 0 {
            return Err(CartwrightError::config(
                "convergence.max_attempts must be at least 1",
            ));
        }
        if !self.settle.backoff.is_finite() || self.settle.backoff < 1.0 {
            return Err(CartwrightError::config(format!(
                "settle.backoff must be >= 1.0, got {}",
                self.settle.backoff
            )));
        }
        if self.settle.poll_interval_ms == 0 {
            return Err(CartwrightError::config(
                "settle.poll_interval_ms must be positive",
            ));
        }
        Ok(())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default credentials
    #[must_use]
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials {
            email: email.into(),
            password: password.into(),
        };
        self
    }

    /// Set the settle configuration
    #[must_use]
    pub const fn with_settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    /// Set the maximum convergence attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.convergence.max_attempts = max_attempts;
        self
    }

    /// Set the timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, action_ms: u64, wait_ms: u64) -> Self {
        self.timeouts = Timeouts { action_ms, wait_ms };
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set the browser settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    mod default_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = HarnessConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.timeouts.action_ms, 5_000);
            assert_eq!(config.timeouts.wait(), Duration::from_secs(30));
            assert_eq!(config.settle.mode, SettleMode::Poll);
            assert_eq!(config.settle.removal_ms, 1_000);
            assert_eq!(config.settle.add_to_cart_ms, 500);
            assert_eq!(config.settle.convergence_ms, 1_500);
            assert_eq!(config.convergence.max_attempts, 3);
            assert!(config.browser.headless);
            assert_eq!(config.screenshot_dir, PathBuf::from("screenshots"));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_settle_modes() {
            let fixed = SettleConfig {
                mode: SettleMode::Fixed,
                ..SettleConfig::default()
            };
            assert_eq!(fixed.removal(), Settle::fixed_ms(1_000));
            match SettleConfig::default().convergence() {
                Settle::Poll(opts) => {
                    assert_eq!(opts.timeout, Duration::from_millis(1_500));
                    assert_eq!(opts.poll_interval, Duration::from_millis(50));
                }
                Settle::Fixed(_) => panic!("default settle should poll"),
            }
            assert_eq!(SettleConfig::immediate().add_to_cart(), Settle::none());
        }

        #[test]
        fn test_removal_settle_is_bounded_by_removal_ms() {
            let config = HarnessConfig::default();
            match config.settle.removal() {
                Settle::Poll(opts) => {
                    assert_eq!(opts.timeout, Duration::from_millis(config.settle.removal_ms));
                    assert!(opts.timeout < config.timeouts.wait());
                }
                Settle::Fixed(_) => panic!("default settle should poll"),
            }
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = HarnessConfig::from_yaml(
                "base_url: http://localhost:8080\nsettle:\n  mode: fixed\n  removal_ms: 10\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:8080");
            assert_eq!(config.settle.mode, SettleMode::Fixed);
            assert_eq!(config.settle.removal_ms, 10);
            assert_eq!(config.settle.convergence_ms, 1_500);
            assert_eq!(config.convergence.max_attempts, 3);
        }

        #[test]
        fn test_yaml_round_trip() {
            let config = HarnessConfig::default().with_max_attempts(5);
            let yaml = config.to_yaml().unwrap();
            assert_eq!(HarnessConfig::from_yaml(&yaml).unwrap(), config);
        }

        #[test]
        fn test_invalid_yaml_is_error() {
            let err = HarnessConfig::from_yaml("timeouts: fast").unwrap_err();
            assert!(matches!(err, CartwrightError::Yaml(_)));
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cartwright.yaml");
            std::fs::write(&path, "convergence:\n  max_attempts: 7\n").unwrap();
            let config = HarnessConfig::load(&path).unwrap();
            assert_eq!(config.convergence.max_attempts, 7);
        }

        #[test]
        fn test_load_missing_file_is_config_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = HarnessConfig::load(dir.path().join("absent.yaml")).unwrap_err();
            assert!(matches!(err, CartwrightError::Config { .. }));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_rejects_empty_base_url() {
            assert!(HarnessConfig::default().with_base_url("  ").validate().is_err());
        }

        #[test]
        fn test_rejects_zero_attempts() {
            assert!(HarnessConfig::default().with_max_attempts(0).validate().is_err());
        }

        #[test]
        fn test_rejects_shrinking_backoff() {
            let settle = SettleConfig {
                backoff: 0.5,
                ..SettleConfig::default()
            };
            let err = HarnessConfig::default().with_settle(settle).validate().unwrap_err();
            assert!(err.to_string().contains("backoff"));
        }
    }

    mod env_tests {
        use super::*;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn test_overrides_apply() {
            let mut config = HarnessConfig::default();
            config
                .apply_overrides_from(lookup(&[
                    (ENV_BASE_URL, "http://shop.test"),
                    (ENV_EMAIL, "qa@shop.test"),
                    (ENV_PASSWORD, "pw"),
                    (ENV_HEADLESS, "false"),
                ]))
                .unwrap();
            assert_eq!(config.base_url, "http://shop.test");
            assert_eq!(config.credentials.email, "qa@shop.test");
            assert_eq!(config.credentials.password, "pw");
            assert!(!config.browser.headless);
        }

        #[test]
        fn test_bad_headless_value() {
            let mut config = HarnessConfig::default();
            let err = config
                .apply_overrides_from(lookup(&[(ENV_HEADLESS, "maybe")]))
                .unwrap_err();
            assert!(err.to_string().contains(ENV_HEADLESS));
        }

        #[test]
        fn test_no_overrides_is_noop() {
            let mut config = HarnessConfig::default();
            config.apply_overrides_from(lookup(&[])).unwrap();
            assert_eq!(config, HarnessConfig::default());
        }
    }
}
