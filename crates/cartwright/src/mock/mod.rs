//! In-memory storefront implementing [`Driver`].
//!
//! [`MockStorefront`] keeps catalog, accounts, session and cart in memory,
//! renders a node tree for the current route on every call and resolves
//! locators against it, the same way a browser re-queries the live DOM.
//! Every primitive call is appended to a history log (`count:<locator>`,
//! `click:<locator>`, `navigate:<url>`, ...) so tests can assert on what a
//! workflow actually touched.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cartwright::mock::MockStorefront;
//!
//! let mock = Arc::new(MockStorefront::new());
//! mock.seed_cart_item("Blue Top", 1)?;
//! mock.ignore_deletes(1); // first delete click is swallowed
//! let shop = Storefront::new(mock.clone(), config);
//! ```

mod dom;
mod store;

pub use store::{MockAccount, MockProduct};

use crate::driver::Driver;
use crate::locator::Locator;
use crate::page_object::url_path;
use crate::result::{CartwrightError, CartwrightResult};
use async_trait::async_trait;
use dom::{Control, Dom, Element};
use std::sync::{Mutex, MutexGuard, PoisonError};
use store::Store;

/// Root URL the mock storefront answers to
pub const MOCK_BASE_URL: &str = "https://storefront.mock";

/// 1x1 transparent PNG returned by [`Driver::screenshot`]
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// In-memory storefront driver
#[derive(Debug)]
pub struct MockStorefront {
    store: Mutex<Store>,
}

impl Default for MockStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorefront {
    /// A storefront with the standard catalog, one registered account
    /// ([`MockAccount::standard`]), an empty cart and no page loaded
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::new()),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Root URL to configure the harness with
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        MOCK_BASE_URL
    }

    /// Path of the loaded page (`""` before the first navigation)
    #[must_use]
    pub fn current_path(&self) -> String {
        self.store().path().to_string()
    }

    /// The catalog, in listing order
    #[must_use]
    pub fn catalog(&self) -> Vec<MockProduct> {
        self.store().catalog.clone()
    }

    /// Put `quantity` of the named product in the cart without touching the UI
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the catalog has no such product
    pub fn seed_cart_item(&self, name: &str, quantity: u32) -> CartwrightResult<()> {
        let mut store = self.store();
        let id = store
            .catalog
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .ok_or_else(|| CartwrightError::ProductNotFound {
                name: name.to_string(),
            })?;
        store.add_to_cart(id, quantity);
        Ok(())
    }

    /// Product names in the cart, in cart order
    #[must_use]
    pub fn cart_names(&self) -> Vec<String> {
        self.store().cart_names()
    }

    /// Number of cart lines
    #[must_use]
    pub fn cart_len(&self) -> usize {
        self.store().cart.len()
    }

    /// Names of removed lines, in removal order
    #[must_use]
    pub fn removed_log(&self) -> Vec<String> {
        self.store().removed.clone()
    }

    /// Swallow the next `count` delete clicks (`usize::MAX`: all of them)
    pub fn ignore_deletes(&self, count: usize) {
        self.store().sticky_deletes = count;
    }

    /// Reject every login attempt regardless of credentials
    pub fn reject_logins(&self, reject: bool) {
        self.store().reject_logins = reject;
    }

    /// The pre-registered account
    #[must_use]
    pub fn default_account(&self) -> MockAccount {
        MockAccount::standard()
    }

    /// Register an account; `false` if the email is taken
    pub fn register(&self, account: MockAccount) -> bool {
        let mut store = self.store();
        if store.account(&account.email).is_some() {
            return false;
        }
        store.accounts.push(account);
        true
    }

    /// Whether an account exists for `email`
    #[must_use]
    pub fn has_account(&self, email: &str) -> bool {
        self.store().account(email).is_some()
    }

    /// Start a session for `email` without the login form
    pub fn sign_in(&self, email: &str) -> bool {
        let mut store = self.store();
        if store.account(email).is_none() {
            return false;
        }
        store.session = Some(email.to_string());
        true
    }

    /// Display name of the signed-in account
    #[must_use]
    pub fn session_user(&self) -> Option<String> {
        self.store().session_account().map(|a| a.name.clone())
    }

    /// Comment submitted with the last placed order
    #[must_use]
    pub fn order_comment(&self) -> Option<String> {
        self.store().order_comment.clone()
    }

    /// Value of a form field on the current page
    #[must_use]
    pub fn field_value(&self, field: &str) -> Option<String> {
        self.store().field_opt(field)
    }

    /// Every primitive call so far
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.store().history.clone()
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        self.store().history.clear();
    }

    /// Number of recorded calls starting with `prefix`
    #[must_use]
    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.store()
            .history
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Record a read and evaluate `f` against the rendered page
    fn read<T>(
        &self,
        verb: &str,
        locator: &Locator,
        f: impl FnOnce(&Store, &Dom, Option<usize>) -> CartwrightResult<T>,
    ) -> CartwrightResult<T> {
        let mut store = self.store();
        store.history.push(format!("{verb}:{locator}"));
        let dom = store.render();
        let index = dom.first(locator);
        f(&store, &dom, index)
    }

    /// Record a mutation and apply `f` to the first match
    fn act(
        &self,
        verb: &str,
        locator: &Locator,
        f: impl FnOnce(&mut Store, &Element) -> CartwrightResult<()>,
    ) -> CartwrightResult<()> {
        let mut store = self.store();
        store.history.push(format!("{verb}:{locator}"));
        let dom = store.render();
        let element = dom
            .first(locator)
            .and_then(|i| dom.get(i))
            .ok_or_else(|| CartwrightError::ElementNotFound {
                selector: locator.to_string(),
            })?;
        if !element.enabled {
            return Err(CartwrightError::driver(format!(
                "element is disabled: {locator}"
            )));
        }
        f(&mut store, element)
    }
}

fn not_a(kind: &str, locator: &Locator) -> CartwrightError {
    CartwrightError::driver(format!("element is not {kind}: {locator}"))
}

#[async_trait]
impl Driver for MockStorefront {
    async fn navigate(&self, url: &str) -> CartwrightResult<()> {
        let mut store = self.store();
        store.history.push(format!("navigate:{url}"));
        if !url.starts_with(MOCK_BASE_URL) {
            return Err(CartwrightError::Navigation {
                url: url.to_string(),
                message: "host not reachable".to_string(),
            });
        }
        let path = url_path(url);
        let query = url
            .split_once('?')
            .map(|(_, q)| q.split('#').next().unwrap_or_default());
        store
            .navigate(path, query)
            .map_err(|message| CartwrightError::Navigation {
                url: url.to_string(),
                message,
            })
    }

    async fn current_url(&self) -> CartwrightResult<String> {
        Ok(self.store().current_url(MOCK_BASE_URL))
    }

    async fn count(&self, locator: &Locator) -> CartwrightResult<usize> {
        let mut store = self.store();
        store.history.push(format!("count:{locator}"));
        Ok(store.render().resolve(locator).len())
    }

    async fn click(&self, locator: &Locator) -> CartwrightResult<()> {
        self.act("click", locator, |store, element| {
            if !element.visible {
                return Err(not_a("visible", locator));
            }
            match &element.control {
                Some(Control::Checkbox { field }) => {
                    if store.field_opt(field).is_some() {
                        store.clear_field(field);
                    } else {
                        store.set_field(field, "on");
                    }
                }
                Some(Control::Radio { group, value }) => store.set_field(group, value.as_str()),
                _ => {}
            }
            if let Some(action) = element.on_click.clone() {
                store.apply(action);
            }
            Ok(())
        })
    }

    async fn fill(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
        self.act("fill", locator, |store, element| match &element.control {
            Some(Control::Text { field }) => {
                store.set_field(field, value);
                Ok(())
            }
            _ => Err(not_a("fillable", locator)),
        })
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> CartwrightResult<()> {
        self.act("type", locator, |store, element| match &element.control {
            Some(Control::Text { field }) => {
                let typed = format!("{}{text}", store.field(field));
                store.set_field(field, typed);
                Ok(())
            }
            _ => Err(not_a("editable", locator)),
        })
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> CartwrightResult<()> {
        self.act("select", locator, |store, element| match &element.control {
            Some(Control::Select { field, options }) => {
                let chosen = options
                    .iter()
                    .find(|(v, label)| v == value || label == value)
                    .ok_or_else(|| {
                        CartwrightError::driver(format!("no option {value:?} in {locator}"))
                    })?;
                store.set_field(field, chosen.0.as_str());
                Ok(())
            }
            _ => Err(not_a("a select", locator)),
        })
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> CartwrightResult<()> {
        self.act("check", locator, |store, element| match &element.control {
            Some(Control::Checkbox { field }) => {
                if checked {
                    store.set_field(field, "on");
                } else {
                    store.clear_field(field);
                }
                Ok(())
            }
            Some(Control::Radio { group, value }) if checked => {
                store.set_field(group, value.as_str());
                Ok(())
            }
            Some(Control::Radio { .. }) => Err(CartwrightError::driver(format!(
                "cannot uncheck a radio: {locator}"
            ))),
            _ => Err(not_a("checkable", locator)),
        })
    }

    async fn scroll_into_view(&self, locator: &Locator) -> CartwrightResult<()> {
        self.act("scroll", locator, |_, _| Ok(()))
    }

    async fn is_visible(&self, locator: &Locator) -> CartwrightResult<bool> {
        self.read("visible", locator, |_, dom, index| {
            Ok(index.and_then(|i| dom.get(i)).is_some_and(|e| e.visible))
        })
    }

    async fn is_enabled(&self, locator: &Locator) -> CartwrightResult<bool> {
        self.read("enabled", locator, |_, dom, index| {
            Ok(index.and_then(|i| dom.get(i)).is_some_and(|e| e.enabled))
        })
    }

    async fn text_content(&self, locator: &Locator) -> CartwrightResult<Option<String>> {
        self.read("text", locator, |_, dom, index| {
            Ok(index.map(|i| dom.text_content(i)))
        })
    }

    async fn input_value(&self, locator: &Locator) -> CartwrightResult<Option<String>> {
        self.read("value", locator, |store, dom, index| {
            let Some(element) = index.and_then(|i| dom.get(i)) else {
                return Ok(None);
            };
            match &element.control {
                Some(Control::Text { field }) => Ok(Some(store.field(field))),
                Some(Control::Select { field, options }) => Ok(store
                    .field_opt(field)
                    .or_else(|| options.first().map(|(v, _)| v.clone()))),
                Some(Control::Checkbox { .. }) => Ok(Some("on".to_string())),
                Some(Control::Radio { value, .. }) => Ok(Some(value.clone())),
                None => Err(not_a("an input", locator)),
            }
        })
    }

    async fn screenshot(&self) -> CartwrightResult<Vec<u8>> {
        self.store().history.push("screenshot".to_string());
        Ok(PIXEL_PNG.to_vec())
    }

    async fn close(&self) -> CartwrightResult<()> {
        self.store().history.push("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;
    use crate::pages::{listing, login};

    async fn at(path: &str) -> MockStorefront {
        let mock = MockStorefront::new();
        mock.navigate(&format!("{MOCK_BASE_URL}{path}")).await.unwrap();
        mock
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_blank_until_first_navigation() {
            let mock = MockStorefront::new();
            assert_eq!(mock.current_url().await.unwrap(), "about:blank");
            assert_eq!(mock.count(&Locator::new("a")).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_foreign_host_and_unknown_route_fail() {
            let mock = MockStorefront::new();
            let err = mock.navigate("https://elsewhere.test/").await.unwrap_err();
            assert!(matches!(err, CartwrightError::Navigation { .. }));
            let err = mock
                .navigate(&format!("{MOCK_BASE_URL}/nope"))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("404"));
        }

        #[tokio::test]
        async fn test_history_records_calls_in_order() {
            let mock = at("/login").await;
            let email = Locator::new(login::selectors::LOGIN_EMAIL);
            mock.fill(&email, "a@b.c").await.unwrap();
            mock.count(&email).await.unwrap();
            let history = mock.history();
            assert_eq!(history[0], format!("navigate:{MOCK_BASE_URL}/login"));
            assert_eq!(history[1], format!("fill:{email}"));
            assert_eq!(history[2], format!("count:{email}"));
            mock.clear_history();
            assert!(mock.history().is_empty());
        }
    }

    mod primitive_tests {
        use super::*;

        #[tokio::test]
        async fn test_mutator_on_absent_element() {
            let mock = at("/").await;
            let err = mock.click(&Locator::new("#ghost")).await.unwrap_err();
            assert!(matches!(err, CartwrightError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_fill_and_type_accumulate() {
            let mock = at("/login").await;
            let email = Locator::new(login::selectors::LOGIN_EMAIL);
            mock.fill(&email, "qa").await.unwrap();
            mock.type_text(&email, "@shop.test").await.unwrap();
            assert_eq!(
                mock.input_value(&email).await.unwrap().as_deref(),
                Some("qa@shop.test")
            );
            assert_eq!(mock.field_value("login_email").as_deref(), Some("qa@shop.test"));
        }

        #[tokio::test]
        async fn test_value_of_non_input_is_an_error() {
            let mock = at("/").await;
            let heading: Locator = Selector::text("Subscription").into();
            assert!(mock.input_value(&heading).await.is_err());
            assert_eq!(mock.input_value(&Locator::new("#ghost")).await.unwrap(), None);
        }

        #[tokio::test]
        async fn test_hidden_element_cannot_be_clicked() {
            let mock = at("/products").await;
            let err = mock
                .click(&Selector::role("button", "Continue Shopping").into())
                .await
                .unwrap_err();
            assert!(err.to_string().contains("not visible"));
        }

        #[tokio::test]
        async fn test_screenshot_is_png() {
            let mock = MockStorefront::new();
            let png = mock.screenshot().await.unwrap();
            assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        }
    }

    mod state_tests {
        use super::*;

        #[tokio::test]
        async fn test_seeded_rows_render_in_cart() {
            let mock = MockStorefront::new();
            mock.seed_cart_item("Winter Top", 2).unwrap();
            mock.seed_cart_item("Blue Top", 1).unwrap();
            mock
                .navigate(&format!("{MOCK_BASE_URL}/view_cart"))
                .await
                .unwrap();
            let rows = listing::table();
            assert_eq!(mock.count(rows.rows()).await.unwrap(), 2);
            assert_eq!(
                mock.text_content(&rows.name_cell(0)).await.unwrap().as_deref(),
                Some("Winter Top")
            );
        }

        #[test]
        fn test_seed_unknown_product() {
            let mock = MockStorefront::new();
            let err = mock.seed_cart_item("Jetpack", 1).unwrap_err();
            assert!(matches!(err, CartwrightError::ProductNotFound { .. }));
        }

        #[test]
        fn test_accounts() {
            let mock = MockStorefront::new();
            let standard = mock.default_account();
            assert!(mock.has_account(&standard.email));
            assert!(!mock.register(standard.clone()));
            let mut other = standard;
            other.email = "other@shop.test".to_string();
            assert!(mock.register(other));
            assert!(mock.sign_in("other@shop.test"));
            assert_eq!(mock.session_user().as_deref(), Some("QA Automation"));
            assert!(!mock.sign_in("ghost@shop.test"));
        }
    }
}
