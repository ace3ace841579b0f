//! Interaction surface: the capability set page models are built from.
//!
//! [`Surface`] wraps a [`Driver`] with the harness policies that sit between
//! page models and raw primitives:
//!
//! - mutators auto-wait for their target to attach (`timeouts.action_ms`)
//!   and fail with `ElementNotFound` when it never does
//! - reads never fail: absence and transport errors collapse to `""`,
//!   `false` or `0` (use [`Surface::get_text_opt`] to tell absent from empty)
//! - [`Surface::wait_for_element`] is the one read that insists on
//!   readiness and propagates `Timeout`
//!
//! The surface has no retry policy of its own beyond the auto-wait.

use crate::config::{HarnessConfig, SettleConfig, Timeouts};
use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{CartwrightError, CartwrightResult};
use crate::wait::{poll_until, ElementState, WaitOptions, WaitResult};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Interaction surface over a shared driver
pub struct Surface<D: Driver + ?Sized> {
    driver: Arc<D>,
    base_url: String,
    timeouts: Timeouts,
    poll: WaitOptions,
    screenshot_dir: PathBuf,
}

impl<D: Driver + ?Sized> Clone for Surface<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            base_url: self.base_url.clone(),
            timeouts: self.timeouts,
            poll: self.poll,
            screenshot_dir: self.screenshot_dir.clone(),
        }
    }
}

impl<D: Driver + ?Sized> fmt::Debug for Surface<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .field("screenshot_dir", &self.screenshot_dir)
            .finish_non_exhaustive()
    }
}

impl<D: Driver + ?Sized> Surface<D> {
    /// Create a surface over `driver` using the harness configuration
    #[must_use]
    pub fn new(driver: Arc<D>, config: &HarnessConfig) -> Self {
        Self {
            driver,
            base_url: config.base_url.clone(),
            timeouts: config.timeouts,
            poll: poll_options(&config.settle),
            screenshot_dir: config.screenshot_dir.clone(),
        }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Storefront root URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured timeouts
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Poll options bounded by `timeout`
    #[must_use]
    pub const fn wait_options(&self, timeout: Duration) -> WaitOptions {
        let mut options = self.poll;
        options.timeout = timeout;
        options
    }

    /// Absolute URL for a route; absolute URLs pass through unchanged
    #[must_use]
    pub fn resolve_url(&self, route: &str) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            return route.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to a route (joined onto the base URL) or absolute URL
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails to navigate
    pub async fn navigate(&self, route: &str) -> CartwrightResult<()> {
        let url = self.resolve_url(route);
        info!(%url, "navigate");
        self.driver.navigate(&url).await
    }

    /// Current page URL (empty when the driver cannot report it)
    pub async fn current_url(&self) -> String {
        match self.driver.current_url().await {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "current_url unavailable");
                String::new()
            }
        }
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    async fn await_target(&self, locator: &Locator) -> CartwrightResult<()> {
        let options = self.wait_options(self.timeouts.action());
        match self
            .wait_for_element_with(locator, ElementState::Attached, &options)
            .await
        {
            Ok(_) => Ok(()),
            Err(CartwrightError::Timeout { .. }) => Err(CartwrightError::ElementNotFound {
                selector: locator.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Click the first match
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn click(&self, locator: &Locator) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, "click");
        self.driver.click(locator).await
    }

    /// Replace the value of the first match
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn fill(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, "fill");
        self.driver.fill(locator, value).await
    }

    /// Type text into the first match
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn type_text(&self, locator: &Locator, text: &str) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, "type");
        self.driver.type_text(locator, text).await
    }

    /// Select an option of a `<select>`
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn select_option(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, value, "select");
        self.driver.select_option(locator, value).await
    }

    /// Check a checkbox or radio
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn check(&self, locator: &Locator) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, "check");
        self.driver.set_checked(locator, true).await
    }

    /// Uncheck a checkbox
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn uncheck(&self, locator: &Locator) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        debug!(%locator, "uncheck");
        self.driver.set_checked(locator, false).await
    }

    /// Scroll the first match into view
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing attaches within the action timeout
    pub async fn scroll_into_view(&self, locator: &Locator) -> CartwrightResult<()> {
        self.await_target(locator).await?;
        self.driver.scroll_into_view(locator).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Whether the first match is visible
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        self.driver.is_visible(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "is_visible defaulted to false");
            false
        })
    }

    /// Whether the first match is enabled
    pub async fn is_enabled(&self, locator: &Locator) -> bool {
        self.driver.is_enabled(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "is_enabled defaulted to false");
            false
        })
    }

    /// Text of the first match, `None` when absent
    pub async fn get_text_opt(&self, locator: &Locator) -> Option<String> {
        self.driver.text_content(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "text_content defaulted to absent");
            None
        })
    }

    /// Text of the first match, `""` when absent
    pub async fn get_text(&self, locator: &Locator) -> String {
        self.get_text_opt(locator).await.unwrap_or_default()
    }

    /// Input value of the first match, `None` when absent
    pub async fn get_value_opt(&self, locator: &Locator) -> Option<String> {
        self.driver.input_value(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "input_value defaulted to absent");
            None
        })
    }

    /// Input value of the first match, `""` when absent
    pub async fn get_value(&self, locator: &Locator) -> String {
        self.get_value_opt(locator).await.unwrap_or_default()
    }

    /// Number of matches, `0` when the page cannot be queried
    pub async fn get_count(&self, locator: &Locator) -> usize {
        self.driver.count(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "count defaulted to 0");
            0
        })
    }

    // =========================================================================
    // Waits
    // =========================================================================

    async fn probe_state(&self, locator: &Locator, state: ElementState) -> bool {
        match state {
            ElementState::Visible => self.is_visible(locator).await,
            ElementState::Hidden => !self.is_visible(locator).await,
            ElementState::Attached => self.get_count(locator).await > 0,
        }
    }

    /// Wait until the locator reaches `state` within `timeouts.wait_ms`
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the state is not reached in time
    pub async fn wait_for_element(
        &self,
        locator: &Locator,
        state: ElementState,
    ) -> CartwrightResult<WaitResult> {
        let options = self.wait_options(self.timeouts.wait());
        self.wait_for_element_with(locator, state, &options).await
    }

    /// Wait until the locator reaches `state` under explicit options
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the state is not reached in time
    pub async fn wait_for_element_with(
        &self,
        locator: &Locator,
        state: ElementState,
        options: &WaitOptions,
    ) -> CartwrightResult<WaitResult> {
        poll_until(options, format!("{locator} {state}"), move || async move {
            Ok(self.probe_state(locator, state).await)
        })
        .await
    }

    /// Sleep for a fixed duration
    pub async fn sleep(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Capture a screenshot to `<screenshot_dir>/<name>.png`
    ///
    /// # Errors
    ///
    /// Returns error if capture or the file write fails
    pub async fn screenshot(&self, name: &str) -> CartwrightResult<PathBuf> {
        let bytes = self.driver.screenshot().await?;
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;
        let path = self.screenshot_dir.join(format!("{name}.png"));
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }
}

fn poll_options(settle: &SettleConfig) -> WaitOptions {
    WaitOptions::new()
        .with_poll_interval(settle.poll_interval_ms)
        .with_backoff(settle.backoff)
        .with_max_poll_interval(settle.max_poll_interval_ms)
}
