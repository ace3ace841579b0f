//! Account information page reached after submitting the new-user form.

use crate::driver::Driver;
use crate::page_object::PageObject;
use crate::result::CartwrightResult;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Locators of the account-information form
pub mod selectors {
    use crate::locator::Locator;

    /// "Mr" title radio
    pub const TITLE_MR: &str = "#id_gender1";
    /// "Mrs" title radio
    pub const TITLE_MRS: &str = "#id_gender2";
    /// Password input
    pub const PASSWORD: &str = "#password";
    /// Birth day select
    pub const DAYS: &str = "#days";
    /// Birth month select
    pub const MONTHS: &str = "#months";
    /// Birth year select
    pub const YEARS: &str = "#years";
    /// Newsletter checkbox
    pub const NEWSLETTER: &str = "#newsletter";
    /// Partner offers checkbox
    pub const SPECIAL_OFFERS: &str = "#optin";
    /// First name input
    pub const FIRST_NAME: &str = "#first_name";
    /// Last name input
    pub const LAST_NAME: &str = "#last_name";
    /// Company input
    pub const COMPANY: &str = "#company";
    /// Address line 1 input
    pub const ADDRESS1: &str = "#address1";
    /// Address line 2 input
    pub const ADDRESS2: &str = "#address2";
    /// Country select
    pub const COUNTRY: &str = "#country";
    /// State input
    pub const STATE: &str = "#state";
    /// City input
    pub const CITY: &str = "#city";
    /// Zipcode input
    pub const ZIPCODE: &str = "#zipcode";
    /// Mobile number input
    pub const MOBILE_NUMBER: &str = "#mobile_number";
    /// Create account button
    pub const CREATE_ACCOUNT: &str = "button[data-qa=\"create-account\"]";
    /// "Account Created!" heading
    pub const ACCOUNT_CREATED: &str = "h2[data-qa=\"account-created\"]";
    /// Continue button on the confirmation page
    pub const CONTINUE: &str = "a[data-qa=\"continue-button\"]";

    /// Locator for one of the constants above
    #[must_use]
    pub fn css(selector: &str) -> Locator {
        Locator::new(selector)
    }
}

/// Salutation radio choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Title {
    /// Mr
    Mr,
    /// Mrs
    Mrs,
}

impl Title {
    const fn selector(self) -> &'static str {
        match self {
            Self::Mr => selectors::TITLE_MR,
            Self::Mrs => selectors::TITLE_MRS,
        }
    }
}

/// "Enter Account Information" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Salutation
    pub title: Title,
    /// Account password
    pub password: String,
    /// Birth day (`"1"`..`"31"`)
    pub day: String,
    /// Birth month (`"1"`..`"12"`)
    pub month: String,
    /// Birth year
    pub year: String,
    /// Sign up for the newsletter
    #[serde(default)]
    pub newsletter: bool,
    /// Receive partner offers
    #[serde(default)]
    pub special_offers: bool,
}

/// "Address Information" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Company (optional)
    #[serde(default)]
    pub company: Option<String>,
    /// Address line 1
    pub address1: String,
    /// Address line 2 (optional)
    #[serde(default)]
    pub address2: Option<String>,
    /// Country option
    pub country: String,
    /// State
    pub state: String,
    /// City
    pub city: String,
    /// Zipcode
    pub zipcode: String,
    /// Mobile number
    pub mobile_number: String,
}

/// Everything needed to register one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Display name entered on the login page
    pub name: String,
    /// Account email
    pub email: String,
    /// Account section
    pub account: AccountDetails,
    /// Address section
    pub address: AddressDetails,
}

impl NewAccount {
    /// A fully populated account for `email`
    #[must_use]
    pub fn sample(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            account: AccountDetails {
                title: Title::Mr,
                password: "Password@123".to_string(),
                day: "15".to_string(),
                month: "6".to_string(),
                year: "1990".to_string(),
                newsletter: true,
                special_offers: true,
            },
            address: AddressDetails {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                company: Some("Test Company".to_string()),
                address1: "123 Test Street".to_string(),
                address2: Some("Apt 4B".to_string()),
                country: "India".to_string(),
                state: "Test State".to_string(),
                city: "Test City".to_string(),
                zipcode: "12345".to_string(),
                mobile_number: "1234567890".to_string(),
            },
        }
    }
}

/// Signup page model
#[derive(Debug)]
pub struct SignupPage<D: Driver + ?Sized> {
    surface: Surface<D>,
}

impl<D: Driver + ?Sized> PageObject for SignupPage<D> {
    fn route(&self) -> &str {
        "/signup"
    }

    fn page_name(&self) -> &str {
        "Signup"
    }
}

impl<D: Driver + ?Sized> SignupPage<D> {
    /// Create the page model
    #[must_use]
    pub const fn new(surface: Surface<D>) -> Self {
        Self { surface }
    }

    /// Pick the salutation radio
    ///
    /// # Errors
    ///
    /// Returns error if the radio is missing
    pub async fn select_title(&self, title: Title) -> CartwrightResult<()> {
        self.surface.check(&selectors::css(title.selector())).await
    }

    /// Fill the password
    ///
    /// # Errors
    ///
    /// Returns error if the input is missing
    pub async fn fill_password(&self, password: &str) -> CartwrightResult<()> {
        self.surface
            .fill(&selectors::css(selectors::PASSWORD), password)
            .await
    }

    /// Select day, month and year of birth
    ///
    /// # Errors
    ///
    /// Returns error if a select is missing or lacks the option
    pub async fn select_date_of_birth(
        &self,
        day: &str,
        month: &str,
        year: &str,
    ) -> CartwrightResult<()> {
        self.surface
            .select_option(&selectors::css(selectors::DAYS), day)
            .await?;
        self.surface
            .select_option(&selectors::css(selectors::MONTHS), month)
            .await?;
        self.surface
            .select_option(&selectors::css(selectors::YEARS), year)
            .await
    }

    /// Tick the newsletter box
    ///
    /// # Errors
    ///
    /// Returns error if the checkbox is missing
    pub async fn check_newsletter(&self) -> CartwrightResult<()> {
        self.surface
            .check(&selectors::css(selectors::NEWSLETTER))
            .await
    }

    /// Tick the partner-offers box
    ///
    /// # Errors
    ///
    /// Returns error if the checkbox is missing
    pub async fn check_special_offers(&self) -> CartwrightResult<()> {
        self.surface
            .check(&selectors::css(selectors::SPECIAL_OFFERS))
            .await
    }

    /// Fill the account section
    ///
    /// # Errors
    ///
    /// Returns error if a control is missing
    pub async fn fill_account_information(&self, data: &AccountDetails) -> CartwrightResult<()> {
        self.select_title(data.title).await?;
        self.fill_password(&data.password).await?;
        self.select_date_of_birth(&data.day, &data.month, &data.year)
            .await?;
        if data.newsletter {
            self.check_newsletter().await?;
        }
        if data.special_offers {
            self.check_special_offers().await?;
        }
        Ok(())
    }

    /// Fill the address section; optional fields are skipped when `None`
    ///
    /// # Errors
    ///
    /// Returns error if a control is missing
    pub async fn fill_address_information(&self, data: &AddressDetails) -> CartwrightResult<()> {
        let s = &self.surface;
        s.fill(&selectors::css(selectors::FIRST_NAME), &data.first_name)
            .await?;
        s.fill(&selectors::css(selectors::LAST_NAME), &data.last_name)
            .await?;
        if let Some(company) = &data.company {
            s.fill(&selectors::css(selectors::COMPANY), company).await?;
        }
        s.fill(&selectors::css(selectors::ADDRESS1), &data.address1)
            .await?;
        if let Some(address2) = &data.address2 {
            s.fill(&selectors::css(selectors::ADDRESS2), address2).await?;
        }
        s.select_option(&selectors::css(selectors::COUNTRY), &data.country)
            .await?;
        s.fill(&selectors::css(selectors::STATE), &data.state).await?;
        s.fill(&selectors::css(selectors::CITY), &data.city).await?;
        s.fill(&selectors::css(selectors::ZIPCODE), &data.zipcode)
            .await?;
        s.fill(&selectors::css(selectors::MOBILE_NUMBER), &data.mobile_number)
            .await
    }

    /// Fill both sections and submit
    ///
    /// # Errors
    ///
    /// Returns error if a control is missing
    pub async fn complete_signup(
        &self,
        account: &AccountDetails,
        address: &AddressDetails,
    ) -> CartwrightResult<()> {
        self.fill_account_information(account).await?;
        self.fill_address_information(address).await?;
        self.create_account().await
    }

    /// Scroll to and press "Create Account"
    ///
    /// # Errors
    ///
    /// Returns error if the button is missing
    pub async fn create_account(&self) -> CartwrightResult<()> {
        let button = selectors::css(selectors::CREATE_ACCOUNT);
        self.surface.scroll_into_view(&button).await?;
        info!("creating account");
        self.surface.click(&button).await
    }

    /// Press "Continue" on the confirmation page
    ///
    /// # Errors
    ///
    /// Returns error if the button is missing
    pub async fn click_continue(&self) -> CartwrightResult<()> {
        self.surface
            .click(&selectors::css(selectors::CONTINUE))
            .await
    }

    /// Whether the "Account Created!" heading is visible
    pub async fn is_account_created(&self) -> bool {
        self.surface
            .is_visible(&selectors::css(selectors::ACCOUNT_CREATED))
            .await
    }

    /// Text of the confirmation heading
    pub async fn account_created_message(&self) -> String {
        self.surface
            .get_text(&selectors::css(selectors::ACCOUNT_CREATED))
            .await
            .trim()
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::mock::MockStorefront;
    use crate::pages::login::LoginPage;
    use std::sync::Arc;

    async fn on_signup_form(
        email: &str,
    ) -> (Arc<MockStorefront>, SignupPage<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        let surface = Surface::new(Arc::clone(&mock), &config);
        let login = LoginPage::new(surface.clone());
        login.open().await.unwrap();
        login.signup("Test User", email).await.unwrap();
        (mock, SignupPage::new(surface))
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_signup_creates_account() {
        let (mock, signup) = on_signup_form("fresh@shop.test").await;
        let new = NewAccount::sample("Test User", "fresh@shop.test");
        signup.complete_signup(&new.account, &new.address).await.unwrap();
        assert!(signup.is_account_created().await);
        assert_eq!(signup.account_created_message().await, "Account Created!");
        assert!(mock.has_account("fresh@shop.test"));
        signup.click_continue().await.unwrap();
        assert_eq!(mock.current_path(), "/");
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimum_fields() {
        let (mock, signup) = on_signup_form("minimal@shop.test").await;
        let mut new = NewAccount::sample("Minimal", "minimal@shop.test");
        new.account.title = Title::Mrs;
        new.account.newsletter = false;
        new.account.special_offers = false;
        new.address.company = None;
        new.address.address2 = None;
        signup.complete_signup(&new.account, &new.address).await.unwrap();
        assert!(signup.is_account_created().await);
        assert!(mock.has_account("minimal@shop.test"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_required_field_does_not_create() {
        let (mock, signup) = on_signup_form("partial@shop.test").await;
        let new = NewAccount::sample("Partial", "partial@shop.test");
        signup.fill_account_information(&new.account).await.unwrap();
        signup.create_account().await.unwrap();
        assert!(!signup.is_account_created().await);
        assert!(!mock.has_account("partial@shop.test"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_birth_month_is_rejected() {
        let (_, signup) = on_signup_form("month@shop.test").await;
        let err = signup.select_date_of_birth("1", "13", "2000").await.unwrap_err();
        assert!(err.to_string().contains("13"));
    }
}
