//! Cartwright: page-object harness for an e-commerce storefront
//!
//! Cartwright drives a live shop through a browser and brings it to verified
//! states: signed in, cart emptied, items added, checkout reviewed. Page
//! models encapsulate every locator; a workflow orchestrator composes them
//! into bounded, observable procedures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  CARTWRIGHT Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Storefront │    │ Page       │    │ Surface<D> │            │
//! │   │ workflows  │───►│ models     │───►│ auto-wait  │            │
//! │   └─────┬──────┘    └─────┬──────┘    └─────┬──────┘            │
//! │         │ Convergence     │ LineItemTable   │ Driver            │
//! │         ▼                 ▼                 ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Settle /   │    │ Money      │    │ Chromium / │            │
//! │   │ poll_until │    │ parsing    │    │ Mock       │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwright::prelude::*;
//! use std::sync::Arc;
//!
//! let mock = Arc::new(MockStorefront::new());
//! let config = HarnessConfig::default().with_base_url(mock.base_url());
//! let shop = Storefront::new(mock, config);
//! shop.login_with_defaults().await?;
//! assert!(shop.ensure_cart_is_empty().await?.is_converged());
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod convergence;
mod driver;
mod line_item;
mod locator;
mod money;
mod page_object;
mod result;
mod surface;
mod wait;
mod workflow;

/// In-memory storefront driver for tests and dry runs
pub mod mock;

/// Page models, one per storefront surface
pub mod pages;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{
    BrowserConfig, ConvergenceConfig, Credentials, HarnessConfig, SettleConfig, SettleMode,
    Timeouts, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_EMAIL, ENV_HEADLESS, ENV_PASSWORD,
};
pub use convergence::{Convergence, ConvergencePolicy};
pub use driver::Driver;
pub use line_item::{expected_total, LineItem, LineItemTable};
pub use locator::{Locator, Position, Selector};
pub use money::{Money, MoneyParseError, CURRENCY_PREFIX};
pub use page_object::{url_path, PageObject, UrlMatcher};
pub use result::{CartwrightError, CartwrightResult};
pub use surface::Surface;
pub use wait::{poll_until, ElementState, Settle, WaitOptions, WaitResult};
pub use workflow::{CheckoutReview, LoginOutcome, SessionState, SignupOutcome, Storefront};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::browser::ChromiumDriver;
    pub use super::config::*;
    pub use super::convergence::*;
    pub use super::driver::*;
    pub use super::line_item::*;
    pub use super::locator::*;
    pub use super::mock::{MockStorefront, MOCK_BASE_URL};
    pub use super::money::*;
    pub use super::page_object::*;
    pub use super::pages::{
        AccountDetails, AddressDetails, CartPage, CatalogEntry, CheckoutPage, HomePage, LoginPage,
        NewAccount, ProductsPage, SignupPage, Title,
    };
    pub use super::result::*;
    pub use super::surface::*;
    pub use super::wait::*;
    pub use super::workflow::*;
}
