//! Driver - the primitive capability set behind the interaction surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Storefront / page models                                    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Surface<D>   auto-wait, default-on-absence reads, timeouts  │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Driver (trait)                                              │
//! │  ┌──────────────────────┐   ┌─────────────────────────────┐  │
//! │  │  ChromiumDriver      │   │  MockStorefront             │  │
//! │  │  (feature "browser") │   │  in-memory shop for tests   │  │
//! │  │  CDP (chromiumoxide) │   │  and the `mock` CLI driver  │  │
//! │  └──────────────────────┘   └─────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers resolve a [`Locator`] afresh on every call. Reads distinguish an
//! absent element (`None`) from an empty one (`Some("")`); mutators on an
//! absent element fail with [`CartwrightError::ElementNotFound`].
//!
//! [`CartwrightError::ElementNotFound`]: crate::result::CartwrightError::ElementNotFound

use crate::locator::Locator;
use crate::result::CartwrightResult;
use async_trait::async_trait;

/// Abstract driver trait for storefront automation.
///
/// All methods take `&self`: one driver owns one page, and calls are issued
/// strictly in program order by a single workflow.
///
/// # Implementations
///
/// - `ChromiumDriver` - real browser over the Chrome DevTools Protocol
/// - `MockStorefront` - in-memory storefront for tests
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> CartwrightResult<()>;

    /// Get current URL
    async fn current_url(&self) -> CartwrightResult<String>;

    /// Number of elements the locator currently resolves to
    async fn count(&self, locator: &Locator) -> CartwrightResult<usize>;

    /// Click the first match
    async fn click(&self, locator: &Locator) -> CartwrightResult<()>;

    /// Replace the value of the first match
    async fn fill(&self, locator: &Locator, value: &str) -> CartwrightResult<()>;

    /// Append text to the first match, one keystroke at a time
    async fn type_text(&self, locator: &Locator, text: &str) -> CartwrightResult<()>;

    /// Select the option with the given value (or label) in a `<select>`
    async fn select_option(&self, locator: &Locator, value: &str) -> CartwrightResult<()>;

    /// Set the checked state of a checkbox or radio
    async fn set_checked(&self, locator: &Locator, checked: bool) -> CartwrightResult<()>;

    /// Scroll the first match into view
    async fn scroll_into_view(&self, locator: &Locator) -> CartwrightResult<()>;

    /// Whether the first match is rendered and visible (`false` when absent)
    async fn is_visible(&self, locator: &Locator) -> CartwrightResult<bool>;

    /// Whether the first match is enabled (`false` when absent)
    async fn is_enabled(&self, locator: &Locator) -> CartwrightResult<bool>;

    /// Text content of the first match, `None` when absent
    async fn text_content(&self, locator: &Locator) -> CartwrightResult<Option<String>>;

    /// Input value of the first match, `None` when absent
    async fn input_value(&self, locator: &Locator) -> CartwrightResult<Option<String>>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> CartwrightResult<Vec<u8>>;

    /// Close the page and release the browser
    async fn close(&self) -> CartwrightResult<()>;
}
