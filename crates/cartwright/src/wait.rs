//! Wait mechanisms for synchronising with an asynchronously rendering page.
//!
//! Two primitives live here:
//!
//! - [`poll_until`]: bounded poll of an async probe with multiplicative
//!   backoff, failing with [`CartwrightError::Timeout`].
//! - [`Settle`]: the pause taken after a state-changing action. It is either a
//!   fixed delay or a poll for the expected post-condition.
//!
//! All timing uses `tokio::time`, so tests can run on paused virtual time.

use crate::result::{CartwrightError, CartwrightResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default backoff multiplier applied to the poll interval
pub const DEFAULT_BACKOFF: f64 = 1.5;

/// Default ceiling for the poll interval (500ms)
pub const DEFAULT_MAX_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// ELEMENT STATE
// =============================================================================

/// Element states a caller can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// At least one match is rendered and visible
    Visible,
    /// No match is visible (absent elements count as hidden)
    Hidden,
    /// At least one match exists in the document
    Attached,
}

impl ElementState {
    /// Lowercase state name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitOptions {
    /// Overall bound on the wait
    pub timeout: Duration,
    /// First delay between probes
    pub poll_interval: Duration,
    /// Multiplier applied to the delay after every failed probe
    pub backoff: f64,
    /// Ceiling for the delay between probes
    pub max_poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            backoff: DEFAULT_BACKOFF,
            max_poll_interval: Duration::from_millis(DEFAULT_MAX_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Set the first polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval = Duration::from_millis(poll_interval_ms);
        self
    }

    /// Set the backoff multiplier (values below 1.0 are treated as 1.0)
    #[must_use]
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the polling interval ceiling in milliseconds
    #[must_use]
    pub const fn with_max_poll_interval(mut self, max_poll_interval_ms: u64) -> Self {
        self.max_poll_interval = Duration::from_millis(max_poll_interval_ms);
        self
    }

    /// Delay to use after a probe that waited `current`
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn next_interval(&self, current: Duration) -> Duration {
        let ceiling = self.max_poll_interval.max(self.poll_interval);
        if !self.backoff.is_finite() || self.backoff <= 1.0 {
            return current.min(ceiling);
        }
        let grown_nanos = (current.as_nanos() as f64 * self.backoff).round();
        if grown_nanos >= ceiling.as_nanos() as f64 {
            return ceiling;
        }
        Duration::from_nanos(grown_nanos as u64)
    }

    /// Timeout in whole milliseconds
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of probes issued
    pub attempts: u32,
    /// What was waited for
    pub waited_for: String,
}

/// Poll `probe` until it reports `true` or `options.timeout` elapses.
///
/// The probe always runs at least once, and once more at the deadline, so a
/// condition that is already true never sleeps.
///
/// # Errors
///
/// Returns [`CartwrightError::Timeout`] when the deadline passes, or the
/// probe's own error.
pub async fn poll_until<F, Fut>(
    options: &WaitOptions,
    description: impl Into<String>,
    mut probe: F,
) -> CartwrightResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CartwrightResult<bool>>,
{
    let waited_for = description.into();
    let start = Instant::now();
    let mut interval = options.poll_interval;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if probe().await? {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                attempts,
                waited_for,
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= options.timeout {
            debug!(%waited_for, attempts, "wait timed out");
            return Err(CartwrightError::Timeout {
                ms: options.timeout_ms(),
                waited_for,
            });
        }

        tokio::time::sleep(interval.min(options.timeout - elapsed)).await;
        interval = options.next_interval(interval);
    }
}

// =============================================================================
// SETTLE
// =============================================================================

/// Pause taken after a state-changing action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settle {
    /// Sleep for a fixed duration without observing the page
    Fixed(Duration),
    /// Poll the expected post-condition with backoff
    Poll(WaitOptions),
}

impl Settle {
    /// Fixed settle of `ms` milliseconds
    #[must_use]
    pub const fn fixed_ms(ms: u64) -> Self {
        Self::Fixed(Duration::from_millis(ms))
    }

    /// No pause at all
    #[must_use]
    pub const fn none() -> Self {
        Self::Fixed(Duration::ZERO)
    }

    /// Wait for the page to settle.
    ///
    /// `Fixed` ignores the probe and reports `true`. `Poll` reports whether
    /// the post-condition held before the deadline. A missed deadline is
    /// logged, not raised: callers re-observe the page themselves.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by the probe.
    pub async fn wait<F, Fut>(
        &self,
        description: &str,
        probe: F,
    ) -> CartwrightResult<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CartwrightResult<bool>>,
    {
        match self {
            Self::Fixed(delay) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(true)
            }
            Self::Poll(options) => match poll_until(options, description, probe).await {
                Ok(_) => Ok(true),
                Err(CartwrightError::Timeout { ms, waited_for }) => {
                    warn!(ms, %waited_for, "page did not settle");
                    Ok(false)
                }
                Err(e) => Err(e),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    mod element_state_tests {
        use super::*;

        #[test]
        fn test_names() {
            assert_eq!(ElementState::Visible.to_string(), "visible");
            assert_eq!(ElementState::Hidden.as_str(), "hidden");
            assert_eq!(ElementState::Attached.as_str(), "attached");
        }
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout, Duration::from_secs(30));
            assert_eq!(opts.poll_interval, Duration::from_millis(50));
            assert_eq!(opts.max_poll_interval, Duration::from_millis(500));
        }

        #[test]
        fn test_builder_chain() {
            let opts = WaitOptions::new()
                .with_timeout(1_000)
                .with_poll_interval(10)
                .with_backoff(2.0)
                .with_max_poll_interval(40);
            assert_eq!(opts.timeout_ms(), 1_000);
            assert_eq!(opts.next_interval(Duration::from_millis(10)), Duration::from_millis(20));
            assert_eq!(opts.next_interval(Duration::from_millis(30)), Duration::from_millis(40));
        }

        #[test]
        fn test_no_growth_without_backoff() {
            let opts = WaitOptions::new().with_poll_interval(25).with_backoff(1.0);
            assert_eq!(opts.next_interval(Duration::from_millis(25)), Duration::from_millis(25));
            let nan = WaitOptions::new().with_backoff(f64::NAN);
            assert_eq!(nan.next_interval(Duration::from_millis(50)), Duration::from_millis(50));
        }
    }

    mod poll_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_immediate_success_does_not_sleep() {
            let result = poll_until(&WaitOptions::new(), "ready", || async { Ok(true) })
                .await
                .unwrap();
            assert_eq!(result.attempts, 1);
            assert_eq!(result.elapsed, Duration::ZERO);
            assert_eq!(result.waited_for, "ready");
        }

        #[tokio::test(start_paused = true)]
        async fn test_succeeds_after_some_probes() {
            let calls = Arc::new(AtomicU32::new(0));
            let probe_calls = Arc::clone(&calls);
            let result = poll_until(&WaitOptions::new(), "third probe", move || {
                let calls = Arc::clone(&probe_calls);
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2) }
            })
            .await
            .unwrap();
            assert_eq!(result.attempts, 3);
            assert_eq!(calls.load(Ordering::SeqCst), 3);
            // 50ms then 75ms of backoff
            assert_eq!(result.elapsed, Duration::from_millis(125));
        }

        #[tokio::test(start_paused = true)]
        async fn test_timeout_reports_deadline() {
            let opts = WaitOptions::new().with_timeout(200);
            let err = poll_until(&opts, "never", || async { Ok(false) })
                .await
                .unwrap_err();
            match err {
                CartwrightError::Timeout { ms, waited_for } => {
                    assert_eq!(ms, 200);
                    assert_eq!(waited_for, "never");
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_probe_error_propagates() {
            let err = poll_until(&WaitOptions::new(), "broken", || async {
                Err(CartwrightError::driver("disconnected"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, CartwrightError::Driver { .. }));
        }
    }

    mod settle_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_fixed_sleeps_and_ignores_probe() {
            let start = Instant::now();
            let settled = Settle::fixed_ms(1_000)
                .wait("removal", || async { Ok(false) })
                .await
                .unwrap();
            assert!(settled);
            assert_eq!(start.elapsed(), Duration::from_millis(1_000));
        }

        #[tokio::test(start_paused = true)]
        async fn test_poll_timeout_is_not_an_error() {
            let settle = Settle::Poll(WaitOptions::new().with_timeout(100));
            let settled = settle.wait("row gone", || async { Ok(false) }).await.unwrap();
            assert!(!settled);
        }

        #[tokio::test(start_paused = true)]
        async fn test_none_returns_immediately() {
            let start = Instant::now();
            assert!(Settle::none().wait("noop", || async { Ok(false) }).await.unwrap());
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }
}
