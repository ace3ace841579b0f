//! Named acceptance scenarios.
//!
//! A scenario drives a [`Storefront`] through one user journey and returns
//! the checks it made. Scenarios run sequentially on one session, so each
//! one establishes its own preconditions (signed in or out, cart empty) and
//! leaves the cart empty behind it.

use crate::error::{CliError, CliResult};
use cartwright::pages::{login, NewAccount};
use cartwright::{
    CartwrightError, CartwrightResult, Convergence, Driver, LineItem, LoginOutcome, Money,
    SessionState, SignupOutcome, Storefront,
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Password no storefront account uses
const WRONG_PASSWORD: &str = "not-the-password-0000";

/// Name that no catalog product contains
const UNKNOWN_PRODUCT: &str = "No Such Product";

/// Catalog cards added by the cart scenarios
const PICKS: [usize; 3] = [0, 1, 2];

/// A runnable scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioInfo {
    /// Name used on the command line
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
}

/// Every scenario, in default run order
pub const SCENARIOS: &[ScenarioInfo] = &[
    ScenarioInfo {
        name: "login",
        description: "Sign in with the configured credentials and see the session marker",
    },
    ScenarioInfo {
        name: "invalid-login",
        description: "A wrong password is rejected with the storefront's error message",
    },
    ScenarioInfo {
        name: "cart-round-trip",
        description: "Products added from the catalog appear in the cart in the same order",
    },
    ScenarioInfo {
        name: "remove-by-name",
        description: "Removing a product by name removes exactly that row; unknown names fail",
    },
    ScenarioInfo {
        name: "empty-cart",
        description: "Emptying the cart converges, and emptying an empty cart does nothing",
    },
    ScenarioInfo {
        name: "checkout-total",
        description: "The checkout total equals the sum of the line totals",
    },
    ScenarioInfo {
        name: "signup",
        description: "Register a fresh account, see it signed in, then delete it",
    },
];

/// Resolve requested scenario names; an empty request selects all
///
/// # Errors
///
/// Returns `InvalidArgument` naming the first unknown scenario
pub fn select(names: &[String]) -> CliResult<Vec<&'static ScenarioInfo>> {
    if names.is_empty() {
        return Ok(SCENARIOS.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            find(name).ok_or_else(|| {
                let known: Vec<&str> = SCENARIOS.iter().map(|s| s.name).collect();
                CliError::invalid_argument(format!(
                    "unknown scenario '{name}' (available: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

/// Look up a scenario by name
#[must_use]
pub fn find(name: &str) -> Option<&'static ScenarioInfo> {
    SCENARIOS.iter().find(|s| s.name == name)
}

/// One verified expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// What was expected
    pub name: String,
    /// Whether it held
    pub passed: bool,
    /// What was observed
    pub detail: String,
}

impl Check {
    /// A check with an explicit verdict
    #[must_use]
    pub fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }

    /// Passes when `actual == expected`
    #[must_use]
    pub fn equal<T: PartialEq + Debug>(name: impl Into<String>, expected: &T, actual: &T) -> Self {
        let passed = expected == actual;
        let detail = if passed {
            format!("{actual:?}")
        } else {
            format!("expected {expected:?}, got {actual:?}")
        };
        Self::new(name, passed, detail)
    }
}

/// Run the named scenario
///
/// # Errors
///
/// Returns the first driver or page error the journey hits; failed
/// expectations are reported as checks, not errors
pub async fn execute<D: Driver + ?Sized>(
    name: &str,
    shop: &Storefront<D>,
) -> CartwrightResult<Vec<Check>> {
    info!(scenario = name, "starting scenario");
    match name {
        "login" => login_succeeds(shop).await,
        "invalid-login" => invalid_login_rejected(shop).await,
        "cart-round-trip" => cart_round_trip(shop).await,
        "remove-by-name" => remove_by_name(shop).await,
        "empty-cart" => empty_cart(shop).await,
        "checkout-total" => checkout_total(shop).await,
        "signup" => signup_and_delete(shop).await,
        other => Err(CartwrightError::config(format!("unknown scenario '{other}'"))),
    }
}

async fn sign_out<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<()> {
    shop.home().open().await?;
    if shop.session_state().await.is_authenticated() {
        shop.home().logout().await?;
    }
    Ok(())
}

async fn cart_names<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<Vec<String>> {
    shop.cart().open().await?;
    Ok(shop
        .cart()
        .get_all_products()
        .await
        .into_iter()
        .map(|item| item.name.trim().to_string())
        .collect())
}

fn converged(name: &str, outcome: &Convergence) -> Check {
    Check::new(name, outcome.is_converged(), format!("{outcome:?}"))
}

async fn login_succeeds<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<Vec<Check>> {
    let outcome = shop.login_with_defaults().await?;
    let state = shop.session_state().await;
    Ok(vec![
        Check::new(
            "login reports authenticated",
            outcome.is_authenticated(),
            format!("{outcome:?}"),
        ),
        Check::new(
            "session marker visible",
            state.is_authenticated(),
            format!("{state:?}"),
        ),
    ])
}

async fn invalid_login_rejected<D: Driver + ?Sized>(
    shop: &Storefront<D>,
) -> CartwrightResult<Vec<Check>> {
    sign_out(shop).await?;
    let email = shop.config().credentials.email.clone();
    let outcome = shop.login(&email, WRONG_PASSWORD).await?;
    let message = match &outcome {
        LoginOutcome::InvalidCredentials { message } => Some(message.clone()),
        _ => None,
    };
    let state = shop.session_state().await;
    Ok(vec![
        Check::new(
            "login reports invalid credentials",
            message.is_some(),
            format!("{outcome:?}"),
        ),
        Check::equal(
            "rejection message",
            &Some(login::selectors::LOGIN_ERROR_TEXT.to_string()),
            &message,
        ),
        Check::equal("session stays anonymous", &SessionState::Anonymous, &state),
    ])
}

async fn cart_round_trip<D: Driver + ?Sized>(
    shop: &Storefront<D>,
) -> CartwrightResult<Vec<Check>> {
    let cleared = shop.ensure_cart_is_empty().await?;
    shop.products().open().await?;
    let catalog = shop.products().all_product_names().await;
    let expected: Vec<String> = PICKS
        .iter()
        .filter_map(|&i| catalog.get(i).map(|name| name.trim().to_string()))
        .collect();

    shop.add_products_to_cart(&PICKS).await?;
    let names = cart_names(shop).await?;
    let tidy = shop.ensure_cart_is_empty().await?;

    Ok(vec![
        converged("cart starts empty", &cleared),
        Check::equal("catalog has enough products", &PICKS.len(), &expected.len()),
        Check::equal("cart lists added products in order", &expected, &names),
        converged("cart emptied afterwards", &tidy),
    ])
}

async fn remove_by_name<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<Vec<Check>> {
    let removal = shop.config().settle.removal();
    shop.ensure_cart_is_empty().await?;
    shop.add_products_to_cart(&PICKS[..2]).await?;
    let before = cart_names(shop).await?;

    let mut checks = vec![Check::equal("two rows in cart", &2, &before.len())];
    if let Some(target) = before.get(1) {
        shop.cart().remove_product_by_name(target, &removal).await?;
        let after = cart_names(shop).await?;
        checks.push(Check::new(
            format!("'{target}' removed"),
            !after.contains(target),
            format!("{after:?}"),
        ));
        checks.push(Check::equal("other row kept", &before[..1].to_vec(), &after));
    }

    let missing = shop
        .cart()
        .remove_product_by_name(UNKNOWN_PRODUCT, &removal)
        .await;
    checks.push(Check::new(
        "unknown name fails with product not found",
        matches!(&missing, Err(CartwrightError::ProductNotFound { name }) if name == UNKNOWN_PRODUCT),
        format!("{missing:?}"),
    ));

    checks.push(converged("cart emptied afterwards", &shop.ensure_cart_is_empty().await?));
    Ok(checks)
}

async fn empty_cart<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<Vec<Check>> {
    shop.add_products_to_cart(&PICKS[..2]).await?;
    let first = shop.ensure_cart_is_empty().await?;
    let empty = shop.cart().is_cart_empty().await;
    let second = shop.ensure_cart_is_empty().await?;
    Ok(vec![
        converged("filled cart converges to empty", &first),
        Check::new("no rows left", empty, format!("empty: {empty}")),
        Check::equal(
            "empty cart needs no attempts",
            &Convergence::Converged {
                attempts: 0,
                removed: 0,
            },
            &second,
        ),
    ])
}

fn line_total_consistent(item: &LineItem) -> bool {
    match (item.price_amount(), item.quantity_value(), item.total_amount()) {
        (Ok(price), Some(quantity), Ok(total)) => {
            Money::from_minor(price.minor() * i64::from(quantity)) == total
        }
        _ => false,
    }
}

async fn checkout_total<D: Driver + ?Sized>(shop: &Storefront<D>) -> CartwrightResult<Vec<Check>> {
    let outcome = shop.login_with_defaults().await?;
    if !outcome.is_authenticated() {
        return Ok(vec![Check::new(
            "signed in before checkout",
            false,
            format!("{outcome:?}"),
        )]);
    }
    shop.ensure_cart_is_empty().await?;
    shop.add_products_to_cart(&PICKS).await?;
    let review = shop.review_checkout().await?;
    let inconsistent: Vec<&str> = review
        .items
        .iter()
        .filter(|item| !line_total_consistent(item))
        .map(|item| item.name.as_str())
        .collect();
    let checks = vec![
        Check::equal("order lists every product", &PICKS.len(), &review.items.len()),
        Check::new(
            "line totals equal price times quantity",
            inconsistent.is_empty(),
            format!("inconsistent: {inconsistent:?}"),
        ),
        Check::new(
            "order total equals sum of line totals",
            review.totals_match(),
            format!(
                "expected {}, displayed {}",
                review.expected_total, review.displayed_total
            ),
        ),
        converged("cart emptied afterwards", &shop.ensure_cart_is_empty().await?),
    ];
    Ok(checks)
}

fn unique_email() -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("cartwright+{stamp}@example.test")
}

async fn signup_and_delete<D: Driver + ?Sized>(
    shop: &Storefront<D>,
) -> CartwrightResult<Vec<Check>> {
    sign_out(shop).await?;
    let account = NewAccount::sample("Cartwright Shopper", unique_email());
    let outcome = shop.register_account(&account).await?;
    let state = shop.session_state().await;
    let mut checks = vec![
        Check::equal("account created", &SignupOutcome::Created, &outcome),
        Check::equal(
            "signed in as the new account",
            &SessionState::Authenticated {
                username: account.name.clone(),
            },
            &state,
        ),
    ];
    if outcome == SignupOutcome::Created {
        shop.delete_account().await?;
        let after = shop.session_state().await;
        checks.push(Check::equal(
            "signed out after deletion",
            &SessionState::Anonymous,
            &after,
        ));
    }
    Ok(checks)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cartwright::mock::MockStorefront;
    use cartwright::HarnessConfig;
    use std::sync::Arc;

    fn shop() -> (Arc<MockStorefront>, Storefront<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        (Arc::clone(&mock), Storefront::new(mock, config))
    }

    fn all_passed(checks: &[Check]) -> bool {
        !checks.is_empty() && checks.iter().all(|c| c.passed)
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_empty_selects_all_in_order() {
            let all = select(&[]).unwrap();
            assert_eq!(all.len(), SCENARIOS.len());
            assert_eq!(all[0].name, "login");
        }

        #[test]
        fn test_unknown_name_lists_available() {
            let err = select(&["login".to_string(), "nope".to_string()]).unwrap_err();
            let text = err.to_string();
            assert!(text.contains("'nope'"));
            assert!(text.contains("empty-cart"));
        }

        #[test]
        fn test_names_are_unique() {
            for (i, s) in SCENARIOS.iter().enumerate() {
                assert!(SCENARIOS[i + 1..].iter().all(|o| o.name != s.name));
            }
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn test_equal_detail() {
            let ok = Check::equal("count", &3, &3);
            assert!(ok.passed);
            assert_eq!(ok.detail, "3");
            let bad = Check::equal("count", &3, &2);
            assert!(!bad.passed);
            assert_eq!(bad.detail, "expected 3, got 2");
        }

        #[test]
        fn test_line_total_consistency() {
            assert!(line_total_consistent(&LineItem::new("Blue Top", "Rs. 500", "2", "Rs. 1000")));
            assert!(!line_total_consistent(&LineItem::new("Blue Top", "Rs. 500", "2", "Rs. 500")));
            assert!(!line_total_consistent(&LineItem::new("Blue Top", "Rs. 500", "x", "Rs. 500")));
        }
    }

    mod scenario_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_every_scenario_passes_on_mock_in_sequence() {
            let (_, shop) = shop();
            for scenario in SCENARIOS {
                let checks = execute(scenario.name, &shop).await.unwrap();
                assert!(all_passed(&checks), "{}: {checks:?}", scenario.name);
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_login_fails_when_storefront_rejects() {
            let (mock, shop) = shop();
            mock.reject_logins(true);
            let checks = execute("login", &shop).await.unwrap();
            assert!(!all_passed(&checks));
        }

        #[tokio::test(start_paused = true)]
        async fn test_empty_cart_reports_sticky_rows() {
            let (mock, shop) = shop();
            mock.ignore_deletes(usize::MAX);
            let checks = execute("empty-cart", &shop).await.unwrap();
            assert!(!checks[0].passed);
            assert!(checks[0].detail.contains("AttemptsExhausted"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_signup_leaves_no_account_behind() {
            let (mock, shop) = shop();
            let checks = execute("signup", &shop).await.unwrap();
            assert!(all_passed(&checks));
            assert!(mock.session_user().is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn test_unknown_scenario_is_an_error() {
            let (_, shop) = shop();
            assert!(execute("nope", &shop).await.is_err());
        }
    }
}
