//! Workflow orchestrator: multi-page procedures over one storefront session.
//!
//! [`Storefront`] owns one instance of every page model over a shared
//! [`Surface`] and composes them into procedures that drive the remote shop to
//! a target state (signed in, empty cart, account registered) and report a
//! typed outcome instead of leaving callers to re-observe the page.

use crate::config::HarnessConfig;
use crate::convergence::{Convergence, ConvergencePolicy};
use crate::driver::Driver;
use crate::line_item::{expected_total, LineItem};
use crate::money::Money;
use crate::page_object::PageObject;
use crate::pages::{
    home, login, signup, CartPage, CheckoutPage, HomePage, LoginPage, NewAccount, ProductsPage,
    SignupPage,
};
use crate::result::{CartwrightError, CartwrightResult};
use crate::surface::Surface;
use crate::wait::{poll_until, ElementState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication state as rendered by the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No session marker visible
    Anonymous,
    /// "Logged in as <username>" visible
    Authenticated {
        /// Name shown in the marker
        username: String,
    },
}

impl SessionState {
    /// Check if a user is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    /// The session marker appeared
    Authenticated {
        /// Name shown in the marker
        username: String,
    },
    /// The storefront rejected the credentials
    InvalidCredentials {
        /// Rejection message as rendered
        message: String,
    },
    /// Neither signal appeared in time
    Error {
        /// What went wrong
        reason: String,
    },
}

impl LoginOutcome {
    /// Check if the login succeeded
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Result of registering an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignupOutcome {
    /// Account created and confirmed
    Created,
    /// The email is already registered
    EmailAlreadyExists {
        /// Rejection message as rendered
        message: String,
    },
}

/// Order listing and totals read from the checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReview {
    /// Order rows
    pub items: Vec<LineItem>,
    /// Sum of the row totals
    pub expected_total: Money,
    /// Total rendered by the storefront
    pub displayed_total: Money,
}

impl CheckoutReview {
    /// Whether the rendered total equals the sum of the rows
    #[must_use]
    pub fn totals_match(&self) -> bool {
        self.expected_total == self.displayed_total
    }
}

/// Every page model over one shared session
#[derive(Debug)]
pub struct Storefront<D: Driver + ?Sized> {
    config: HarnessConfig,
    surface: Surface<D>,
    home: HomePage<D>,
    login: LoginPage<D>,
    signup: SignupPage<D>,
    products: ProductsPage<D>,
    cart: CartPage<D>,
    checkout: CheckoutPage<D>,
}

impl<D: Driver + ?Sized> Storefront<D> {
    /// Build every page model over `driver`
    #[must_use]
    pub fn new(driver: Arc<D>, config: HarnessConfig) -> Self {
        let surface = Surface::new(driver, &config);
        Self {
            home: HomePage::new(surface.clone()),
            login: LoginPage::new(surface.clone()),
            signup: SignupPage::new(surface.clone()),
            products: ProductsPage::new(surface.clone()),
            cart: CartPage::new(surface.clone()),
            checkout: CheckoutPage::new(surface.clone()),
            surface,
            config,
        }
    }

    /// Harness configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Shared interaction surface
    #[must_use]
    pub const fn surface(&self) -> &Surface<D> {
        &self.surface
    }

    /// Home page model
    #[must_use]
    pub const fn home(&self) -> &HomePage<D> {
        &self.home
    }

    /// Login page model
    #[must_use]
    pub const fn login_page(&self) -> &LoginPage<D> {
        &self.login
    }

    /// Signup page model
    #[must_use]
    pub const fn signup_page(&self) -> &SignupPage<D> {
        &self.signup
    }

    /// Catalog page model
    #[must_use]
    pub const fn products(&self) -> &ProductsPage<D> {
        &self.products
    }

    /// Cart page model
    #[must_use]
    pub const fn cart(&self) -> &CartPage<D> {
        &self.cart
    }

    /// Checkout page model
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutPage<D> {
        &self.checkout
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Authentication state of the loaded page, re-read on every call
    pub async fn session_state(&self) -> SessionState {
        match self.home.logged_in_username().await {
            Some(username) => SessionState::Authenticated { username },
            None => SessionState::Anonymous,
        }
    }

    /// Sign in and report what the storefront rendered.
    ///
    /// Opens the home page first; an existing session whose header lacks the
    /// sign-in link is reported as `Authenticated` without touching the form.
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails or a form control is missing
    pub async fn login(&self, email: &str, password: &str) -> CartwrightResult<LoginOutcome> {
        self.home.open().await?;
        if !self
            .surface
            .is_visible(&home::selectors::signup_login_link())
            .await
        {
            if let Some(username) = self.home.logged_in_username().await {
                info!(%username, "session already established");
                return Ok(LoginOutcome::Authenticated { username });
            }
        }

        self.home.go_to_signup_login().await?;
        self.login.login(email, password).await?;

        let marker = home::selectors::logged_in_as();
        let rejection = login::selectors::login_error();
        let (marker, rejection) = (&marker, &rejection);
        let options = self.surface.wait_options(self.config.timeouts.action());
        let observed = poll_until(&options, "login outcome", move || async move {
            Ok(self.surface.is_visible(marker).await || self.surface.is_visible(rejection).await)
        })
        .await;

        match observed {
            Ok(_) => {
                if let Some(username) = self.home.logged_in_username().await {
                    info!(%username, "logged in");
                    Ok(LoginOutcome::Authenticated { username })
                } else {
                    let message = self.login.login_error_message().await;
                    warn!(email, %message, "login rejected");
                    Ok(LoginOutcome::InvalidCredentials { message })
                }
            }
            Err(CartwrightError::Timeout { ms, .. }) => {
                let reason =
                    format!("neither session marker nor login error appeared within {ms}ms");
                warn!(email, %reason, "login outcome unknown");
                Ok(LoginOutcome::Error { reason })
            }
            Err(e) => Err(e),
        }
    }

    /// Sign in with the configured credentials
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails or a form control is missing
    pub async fn login_with_defaults(&self) -> CartwrightResult<LoginOutcome> {
        let credentials = &self.config.credentials;
        self.login(&credentials.email, &credentials.password).await
    }

    /// Sign in with the configured credentials and land on the catalog
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails or a form control is missing
    pub async fn login_and_go_to_products(&self) -> CartwrightResult<LoginOutcome> {
        let outcome = self.login_with_defaults().await?;
        if outcome.is_authenticated() {
            self.products.open().await?;
        }
        Ok(outcome)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Open the catalog and add the cards at `indexes`, in order
    ///
    /// # Errors
    ///
    /// Returns the first add failure
    pub async fn add_products_to_cart(&self, indexes: &[usize]) -> CartwrightResult<()> {
        self.products.open().await?;
        self.products
            .add_multiple_products_to_cart(indexes, &self.config.settle.add_to_cart())
            .await
    }

    /// Single best-effort pass removing every row; returns rows removed
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails or a delete control is missing
    pub async fn clear_cart(&self) -> CartwrightResult<usize> {
        self.cart.open().await?;
        self.cart
            .remove_all_products(&self.config.settle.removal())
            .await
    }

    /// Drive the cart to empty within the configured attempt budget.
    ///
    /// Each attempt sweeps at most the observed number of rows, then settles
    /// until the cart reads empty. Exhaustion is reported, not raised.
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails or a delete control is missing
    pub async fn ensure_cart_is_empty(&self) -> CartwrightResult<Convergence> {
        self.cart.open().await?;
        let policy = ConvergencePolicy::new(
            self.config.convergence.max_attempts,
            self.config.settle.convergence(),
        );
        let removal = self.config.settle.removal();
        let (cart, removal) = (&self.cart, &removal);
        policy
            .run(
                "empty cart",
                || cart.items_count(),
                move |remaining| cart.sweep(remaining, removal),
            )
            .await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Register a new account through the signup flow
    ///
    /// # Errors
    ///
    /// Returns error if a form control is missing or the confirmation never
    /// shows
    pub async fn register_account(&self, account: &NewAccount) -> CartwrightResult<SignupOutcome> {
        self.login.open().await?;
        self.login.signup(&account.name, &account.email).await?;

        let rejection = login::selectors::signup_error();
        let form = signup::selectors::css(signup::selectors::PASSWORD);
        let (rejection, form) = (&rejection, &form);
        let options = self.surface.wait_options(self.config.timeouts.action());
        poll_until(&options, "signup form or rejection", move || async move {
            Ok(self.surface.is_visible(rejection).await || self.surface.get_count(form).await > 0)
        })
        .await?;

        if self.login.is_signup_error_visible().await {
            let message = self.login.signup_error_message().await;
            warn!(email = %account.email, %message, "signup rejected");
            return Ok(SignupOutcome::EmailAlreadyExists { message });
        }

        self.signup
            .complete_signup(&account.account, &account.address)
            .await?;
        self.surface
            .wait_for_element(
                &signup::selectors::css(signup::selectors::ACCOUNT_CREATED),
                ElementState::Visible,
            )
            .await?;
        self.signup.click_continue().await?;
        info!(email = %account.email, "account created");
        Ok(SignupOutcome::Created)
    }

    /// Delete the signed-in account and confirm
    ///
    /// # Errors
    ///
    /// Returns error if no account is signed in or the confirmation never
    /// shows
    pub async fn delete_account(&self) -> CartwrightResult<()> {
        self.home.delete_account().await?;
        self.surface
            .wait_for_element(&home::selectors::account_deleted(), ElementState::Visible)
            .await?;
        self.signup.click_continue().await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Proceed from the cart to checkout and read the order listing
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if checkout never renders (anonymous session) and a
    /// money error if a total is malformed
    pub async fn review_checkout(&self) -> CartwrightResult<CheckoutReview> {
        self.cart.open().await?;
        self.cart.proceed_to_checkout().await?;
        self.surface
            .wait_for_element(
                &crate::pages::checkout::selectors::review_order_heading(),
                ElementState::Visible,
            )
            .await?;
        let current = self.surface.current_url().await;
        if !self.checkout.is_current(&current) {
            warn!(url = %current, "review heading visible outside checkout");
        }
        let items = self.checkout.get_all_products().await;
        let expected_total = expected_total(&items)?;
        let displayed_total = self.checkout.total_amount_value().await?;
        Ok(CheckoutReview {
            items,
            expected_total,
            displayed_total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SettleConfig;
    use crate::mock::MockStorefront;
    use crate::pages::listing;

    fn shop() -> (Arc<MockStorefront>, Storefront<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        (Arc::clone(&mock), Storefront::new(mock, config))
    }

    mod login_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_valid_credentials_authenticate() {
            let (mock, shop) = shop();
            assert_eq!(shop.session_state().await, SessionState::Anonymous);
            let outcome = shop.login_with_defaults().await.unwrap();
            let name = mock.default_account().name;
            assert_eq!(
                outcome,
                LoginOutcome::Authenticated {
                    username: name.clone()
                }
            );
            assert_eq!(
                shop.session_state().await,
                SessionState::Authenticated { username: name }
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_login_is_idempotent() {
            let (mock, shop) = shop();
            shop.login_with_defaults().await.unwrap();
            mock.clear_history();
            let again = shop.login_with_defaults().await.unwrap();
            assert!(again.is_authenticated());
            assert_eq!(mock.calls_matching("fill:"), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_wrong_password_is_invalid_credentials() {
            let (mock, shop) = shop();
            let email = mock.default_account().email;
            let outcome = shop.login(&email, "nope").await.unwrap();
            assert_eq!(
                outcome,
                LoginOutcome::InvalidCredentials {
                    message: login::selectors::LOGIN_ERROR_TEXT.to_string()
                }
            );
            assert!(!shop.session_state().await.is_authenticated());
        }

        #[tokio::test(start_paused = true)]
        async fn test_rejected_logins_surface_as_invalid() {
            let (mock, shop) = shop();
            mock.reject_logins(true);
            assert!(matches!(
                shop.login_with_defaults().await.unwrap(),
                LoginOutcome::InvalidCredentials { .. }
            ));
        }

        #[tokio::test(start_paused = true)]
        async fn test_login_and_go_to_products() {
            let (mock, shop) = shop();
            assert!(shop.login_and_go_to_products().await.unwrap().is_authenticated());
            assert_eq!(mock.current_path(), "/products");
        }
    }

    mod convergence_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_empty_cart_is_a_no_op() {
            let (mock, shop) = shop();
            let outcome = shop.ensure_cart_is_empty().await.unwrap();
            assert_eq!(
                outcome,
                Convergence::Converged {
                    attempts: 0,
                    removed: 0
                }
            );
            let rows = format!("count:{}", listing::table().rows());
            assert_eq!(mock.calls_matching(&rows), 1);
            assert_eq!(mock.calls_matching("click:"), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_full_cart_converges_then_stays_converged() {
            let (mock, shop) = shop();
            for name in ["Blue Top", "Men Tshirt", "Winter Top"] {
                mock.seed_cart_item(name, 1).unwrap();
            }
            assert_eq!(
                shop.ensure_cart_is_empty().await.unwrap(),
                Convergence::Converged {
                    attempts: 1,
                    removed: 3
                }
            );
            assert_eq!(mock.cart_len(), 0);
            assert_eq!(
                shop.ensure_cart_is_empty().await.unwrap(),
                Convergence::Converged {
                    attempts: 0,
                    removed: 0
                }
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_transient_sticky_row_needs_a_second_attempt() {
            let (mock, shop) = shop();
            mock.seed_cart_item("Blue Top", 1).unwrap();
            mock.seed_cart_item("Men Tshirt", 1).unwrap();
            mock.ignore_deletes(1);
            assert_eq!(
                shop.ensure_cart_is_empty().await.unwrap(),
                Convergence::Converged {
                    attempts: 2,
                    removed: 2
                }
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_permanently_sticky_rows_exhaust_attempts() {
            let (mock, shop) = shop();
            mock.seed_cart_item("Blue Top", 1).unwrap();
            mock.seed_cart_item("Men Tshirt", 1).unwrap();
            mock.ignore_deletes(usize::MAX);
            assert_eq!(
                shop.ensure_cart_is_empty().await.unwrap(),
                Convergence::AttemptsExhausted {
                    attempts: 3,
                    remaining: 2
                }
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_fixed_settle_mode_still_converges() {
            let mock = Arc::new(MockStorefront::new());
            mock.seed_cart_item("Blue Top", 2).unwrap();
            let config = HarnessConfig::default()
                .with_base_url(mock.base_url())
                .with_settle(SettleConfig::immediate());
            let shop = Storefront::new(Arc::clone(&mock), config);
            assert!(shop.ensure_cart_is_empty().await.unwrap().is_converged());
        }

        #[tokio::test(start_paused = true)]
        async fn test_clear_cart_single_pass() {
            let (mock, shop) = shop();
            mock.seed_cart_item("Blue Top", 1).unwrap();
            mock.seed_cart_item("Stylish Dress", 1).unwrap();
            assert_eq!(shop.clear_cart().await.unwrap(), 2);
            assert!(shop.cart().is_cart_empty().await);
        }
    }

    mod round_trip_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_added_products_come_back_in_order() {
            let (mock, shop) = shop();
            shop.add_products_to_cart(&[0, 1, 2]).await.unwrap();
            shop.cart().open().await.unwrap();
            let names: Vec<String> = shop
                .cart()
                .get_all_products()
                .await
                .into_iter()
                .map(|item| item.name)
                .collect();
            let catalog: Vec<String> = mock.catalog().into_iter().take(3).map(|p| p.name).collect();
            assert_eq!(names, catalog);
        }

        #[tokio::test(start_paused = true)]
        async fn test_review_checkout_totals() {
            let (mock, shop) = shop();
            shop.login_with_defaults().await.unwrap();
            mock.seed_cart_item("Blue Top", 2).unwrap();
            mock.seed_cart_item("Fancy Green Top", 1).unwrap();
            let review = shop.review_checkout().await.unwrap();
            assert_eq!(review.items.len(), 2);
            assert_eq!(review.expected_total, Money::from_major(1_700));
            assert!(review.totals_match());
        }

        #[tokio::test(start_paused = true)]
        async fn test_review_checkout_requires_session() {
            let (mock, shop) = shop();
            mock.seed_cart_item("Blue Top", 1).unwrap();
            let err = shop.review_checkout().await.unwrap_err();
            assert!(err.is_timeout());
            assert!(shop.cart().is_checkout_login_prompt_visible().await);
        }
    }

    mod account_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_register_then_delete() {
            let (mock, shop) = shop();
            let account = NewAccount::sample("New Shopper", "shopper@shop.test");
            assert_eq!(
                shop.register_account(&account).await.unwrap(),
                SignupOutcome::Created
            );
            assert!(mock.has_account("shopper@shop.test"));
            assert_eq!(mock.session_user().as_deref(), Some("New Shopper"));

            shop.delete_account().await.unwrap();
            assert!(!mock.has_account("shopper@shop.test"));
            assert_eq!(mock.current_path(), "/");
            assert_eq!(shop.session_state().await, SessionState::Anonymous);
        }

        #[tokio::test(start_paused = true)]
        async fn test_register_existing_email() {
            let (mock, shop) = shop();
            let email = mock.default_account().email;
            let outcome = shop
                .register_account(&NewAccount::sample("Dup", email))
                .await
                .unwrap();
            assert!(matches!(outcome, SignupOutcome::EmailAlreadyExists { .. }));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_outcomes_serialize_tagged() {
            let json = serde_json::to_string(&LoginOutcome::Authenticated {
                username: "QA".into(),
            })
            .unwrap();
            assert_eq!(json, r#"{"outcome":"authenticated","username":"QA"}"#);
            let json = serde_json::to_string(&SessionState::Anonymous).unwrap();
            assert_eq!(json, r#"{"state":"anonymous"}"#);
        }
    }
}
