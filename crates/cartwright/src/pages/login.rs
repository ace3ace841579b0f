//! Login / signup entry page.

use crate::driver::Driver;
use crate::page_object::PageObject;
use crate::result::CartwrightResult;
use crate::surface::Surface;
use tracing::info;

/// Locators of the sign-in and new-user forms
pub mod selectors {
    use crate::locator::{Locator, Selector};

    /// Login email input
    pub const LOGIN_EMAIL: &str = "input[data-qa=\"login-email\"]";
    /// Login password input
    pub const LOGIN_PASSWORD: &str = "input[data-qa=\"login-password\"]";
    /// Login submit button
    pub const LOGIN_BUTTON: &str = "button[data-qa=\"login-button\"]";
    /// New-user name input
    pub const SIGNUP_NAME: &str = "input[data-qa=\"signup-name\"]";
    /// New-user email input
    pub const SIGNUP_EMAIL: &str = "input[data-qa=\"signup-email\"]";
    /// New-user submit button
    pub const SIGNUP_BUTTON: &str = "button[data-qa=\"signup-button\"]";
    /// Text shown on a rejected login
    pub const LOGIN_ERROR_TEXT: &str = "Your email or password is incorrect!";
    /// Text shown when the signup email is taken
    pub const SIGNUP_ERROR_TEXT: &str = "Email Address already exist!";

    /// Login email input
    #[must_use]
    pub fn login_email() -> Locator {
        Locator::new(LOGIN_EMAIL)
    }

    /// Login password input
    #[must_use]
    pub fn login_password() -> Locator {
        Locator::new(LOGIN_PASSWORD)
    }

    /// Login submit button
    #[must_use]
    pub fn login_button() -> Locator {
        Locator::new(LOGIN_BUTTON)
    }

    /// New-user name input
    #[must_use]
    pub fn signup_name() -> Locator {
        Locator::new(SIGNUP_NAME)
    }

    /// New-user email input
    #[must_use]
    pub fn signup_email() -> Locator {
        Locator::new(SIGNUP_EMAIL)
    }

    /// New-user submit button
    #[must_use]
    pub fn signup_button() -> Locator {
        Locator::new(SIGNUP_BUTTON)
    }

    /// Rejected-login message
    #[must_use]
    pub fn login_error() -> Locator {
        Selector::css_with_text("p", LOGIN_ERROR_TEXT).into()
    }

    /// Email-taken message
    #[must_use]
    pub fn signup_error() -> Locator {
        Selector::css_with_text("p", SIGNUP_ERROR_TEXT).into()
    }
}

/// Login page model
#[derive(Debug)]
pub struct LoginPage<D: Driver + ?Sized> {
    surface: Surface<D>,
}

impl<D: Driver + ?Sized> PageObject for LoginPage<D> {
    fn route(&self) -> &str {
        "/login"
    }

    fn page_name(&self) -> &str {
        "Login"
    }
}

impl<D: Driver + ?Sized> LoginPage<D> {
    /// Create the page model
    #[must_use]
    pub const fn new(surface: Surface<D>) -> Self {
        Self { surface }
    }

    /// Navigate to the login page
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(&self) -> CartwrightResult<()> {
        self.surface.navigate(self.route()).await
    }

    /// Submit the sign-in form
    ///
    /// # Errors
    ///
    /// Returns error if a form control is missing
    pub async fn login(&self, email: &str, password: &str) -> CartwrightResult<()> {
        info!(email, "submitting login form");
        self.surface.fill(&selectors::login_email(), email).await?;
        self.surface
            .fill(&selectors::login_password(), password)
            .await?;
        self.surface.click(&selectors::login_button()).await
    }

    /// Submit the new-user form
    ///
    /// # Errors
    ///
    /// Returns error if a form control is missing
    pub async fn signup(&self, name: &str, email: &str) -> CartwrightResult<()> {
        info!(email, "submitting signup form");
        self.surface.fill(&selectors::signup_name(), name).await?;
        self.surface.fill(&selectors::signup_email(), email).await?;
        self.surface.click(&selectors::signup_button()).await
    }

    /// Whether the rejected-login message is visible
    pub async fn is_login_error_visible(&self) -> bool {
        self.surface.is_visible(&selectors::login_error()).await
    }

    /// Whether the email-taken message is visible
    pub async fn is_signup_error_visible(&self) -> bool {
        self.surface.is_visible(&selectors::signup_error()).await
    }

    /// Text of the rejected-login message
    pub async fn login_error_message(&self) -> String {
        self.surface
            .get_text(&selectors::login_error())
            .await
            .trim()
            .to_string()
    }

    /// Text of the email-taken message
    pub async fn signup_error_message(&self) -> String {
        self.surface
            .get_text(&selectors::signup_error())
            .await
            .trim()
            .to_string()
    }
}
