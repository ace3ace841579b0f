//! Home page: header navigation, session marker, newsletter footer.

use crate::driver::Driver;
use crate::page_object::PageObject;
use crate::result::CartwrightResult;
use crate::surface::Surface;
use tracing::info;

/// Locators of the home page header and footer
pub mod selectors {
    use crate::locator::{Locator, Selector};

    /// Prefix of the session marker text
    pub const LOGGED_IN_PREFIX: &str = "Logged in as";
    /// Newsletter email input (the id is misspelled in the storefront markup)
    pub const SUBSCRIBE_EMAIL: &str = "#susbscribe_email";
    /// Newsletter submit button
    pub const SUBSCRIBE_BUTTON: &str = "#subscribe";
    /// Newsletter confirmation
    pub const SUBSCRIBE_SUCCESS: &str = ".alert-success";
    /// "Account Deleted!" heading
    pub const ACCOUNT_DELETED: &str = "h2[data-qa=\"account-deleted\"]";

    /// Header link to the sign-in page
    #[must_use]
    pub fn signup_login_link() -> Locator {
        Selector::role("link", "Signup / Login").into()
    }

    /// Header logout link
    #[must_use]
    pub fn logout_link() -> Locator {
        Selector::role("link", "Logout").into()
    }

    /// Header products link
    #[must_use]
    pub fn products_link() -> Locator {
        Selector::role("link", "Products").into()
    }

    /// Header cart link
    #[must_use]
    pub fn cart_link() -> Locator {
        Selector::role("link", " Cart").into()
    }

    /// Header delete-account link
    #[must_use]
    pub fn delete_account_link() -> Locator {
        Selector::role("link", "Delete Account").into()
    }

    /// "Logged in as <name>" marker
    #[must_use]
    pub fn logged_in_as() -> Locator {
        Selector::css_with_text("a", LOGGED_IN_PREFIX).into()
    }

    /// Newsletter email input
    #[must_use]
    pub fn subscribe_email() -> Locator {
        Locator::new(SUBSCRIBE_EMAIL)
    }

    /// Newsletter submit button
    #[must_use]
    pub fn subscribe_button() -> Locator {
        Locator::new(SUBSCRIBE_BUTTON)
    }

    /// Newsletter confirmation message
    #[must_use]
    pub fn subscribe_success() -> Locator {
        Locator::new(SUBSCRIBE_SUCCESS)
    }

    /// Account deletion confirmation
    #[must_use]
    pub fn account_deleted() -> Locator {
        Locator::new(ACCOUNT_DELETED)
    }
}

/// Home page model
#[derive(Debug)]
pub struct HomePage<D: Driver + ?Sized> {
    surface: Surface<D>,
}

impl<D: Driver + ?Sized> PageObject for HomePage<D> {
    fn route(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "Home"
    }
}

impl<D: Driver + ?Sized> HomePage<D> {
    /// Create the page model
    #[must_use]
    pub const fn new(surface: Surface<D>) -> Self {
        Self { surface }
    }

    /// Navigate to the home page
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(&self) -> CartwrightResult<()> {
        self.surface.navigate(self.route()).await
    }

    /// Follow the header "Signup / Login" link
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn go_to_signup_login(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::signup_login_link()).await
    }

    /// Follow the header "Products" link
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn go_to_products(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::products_link()).await
    }

    /// Follow the header "Cart" link
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn go_to_cart(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::cart_link()).await
    }

    /// Log out of the current session
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn logout(&self) -> CartwrightResult<()> {
        info!("logout");
        self.surface.click(&selectors::logout_link()).await
    }

    /// Delete the signed-in account
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn delete_account(&self) -> CartwrightResult<()> {
        info!("delete account");
        self.surface.click(&selectors::delete_account_link()).await
    }

    /// Subscribe `email` to the newsletter
    ///
    /// # Errors
    ///
    /// Returns error if the footer form is missing
    pub async fn subscribe_newsletter(&self, email: &str) -> CartwrightResult<()> {
        self.surface.fill(&selectors::subscribe_email(), email).await?;
        self.surface.click(&selectors::subscribe_button()).await
    }

    /// Whether the "Logged in as" marker is visible
    pub async fn is_user_logged_in(&self) -> bool {
        self.surface.is_visible(&selectors::logged_in_as()).await
    }

    /// Name shown in the session marker, `None` when anonymous
    pub async fn logged_in_username(&self) -> Option<String> {
        let text = self.surface.get_text_opt(&selectors::logged_in_as()).await?;
        let name = text
            .trim()
            .strip_prefix(selectors::LOGGED_IN_PREFIX)
            .unwrap_or(text.trim())
            .trim();
        Some(name.to_string())
    }

    /// Whether the newsletter confirmation is visible
    pub async fn is_subscription_successful(&self) -> bool {
        self.surface.is_visible(&selectors::subscribe_success()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::mock::MockStorefront;
    use std::sync::Arc;

    fn page() -> (Arc<MockStorefront>, HomePage<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        let surface = Surface::new(Arc::clone(&mock), &config);
        (mock, HomePage::new(surface))
    }

    #[tokio::test(start_paused = true)]
    async fn test_header_navigation() {
        let (mock, home) = page();
        home.open().await.unwrap();
        home.go_to_products().await.unwrap();
        assert_eq!(mock.current_path(), "/products");
        home.go_to_cart().await.unwrap();
        assert_eq!(mock.current_path(), "/view_cart");
        home.go_to_signup_login().await.unwrap();
        assert_eq!(mock.current_path(), "/login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_anonymous_session_marker() {
        let (_, home) = page();
        home.open().await.unwrap();
        assert!(!home.is_user_logged_in().await);
        assert_eq!(home.logged_in_username().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_in_session_marker() {
        let (mock, home) = page();
        assert!(mock.sign_in(&mock.default_account().email));
        home.open().await.unwrap();
        assert!(home.is_user_logged_in().await);
        assert_eq!(
            home.logged_in_username().await.as_deref(),
            Some(mock.default_account().name.as_str())
        );
        home.logout().await.unwrap();
        assert!(!home.is_user_logged_in().await);
        assert_eq!(mock.current_path(), "/login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newsletter_subscription() {
        let (_, home) = page();
        home.open().await.unwrap();
        assert!(!home.is_subscription_successful().await);
        home.subscribe_newsletter("qa@shop.test").await.unwrap();
        assert!(home.is_subscription_successful().await);
    }

    #[test]
    fn test_route() {
        let (_, home) = page();
        assert_eq!(home.route(), "/");
        assert!(home.is_current("https://storefront.mock/"));
    }
}
