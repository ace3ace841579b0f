//! In-memory storefront state and per-route page rendering.

use super::dom::{Dom, Node};
use crate::config::Credentials;
use crate::line_item::name_matches;
use crate::money::Money;
use crate::pages::signup::{AddressDetails, Title};
use crate::pages::{cart, checkout, home, listing, login, products, signup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const CATALOG: &[(&str, i64)] = &[
    ("Blue Top", 500),
    ("Men Tshirt", 400),
    ("Sleeveless Dress", 1_000),
    ("Stylish Dress", 1_500),
    ("Winter Top", 600),
    ("Summer White Top", 400),
    ("Madame Top For Women", 1_000),
    ("Fancy Green Top", 700),
];

const COUNTRIES: &[&str] = &[
    "India",
    "United States",
    "Canada",
    "Australia",
    "Israel",
    "New Zealand",
    "Singapore",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Fields a new account must carry before "Create Account" succeeds
const REQUIRED_SIGNUP_FIELDS: &[&str] = &[
    "name",
    "email",
    "password",
    "first_name",
    "last_name",
    "address1",
    "state",
    "city",
    "zipcode",
    "mobile_number",
];

/// What clicking a node does
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Navigate(String),
    AddToCart(usize),
    CloseModal,
    DeleteLine(usize),
    SubmitLogin,
    SubmitSignup,
    CreateAccount,
    Logout,
    DeleteAccount,
    SubmitSearch,
    PlaceOrder,
    Subscribe,
    ProceedToCheckout,
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProduct {
    /// One-based id used in `/product_details/<id>`
    pub id: usize,
    /// Product name
    pub name: String,
    /// Unit price
    pub price: Money,
}

/// A registered storefront account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockAccount {
    /// Display name shown in the session marker
    pub name: String,
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Salutation used on address blocks
    pub title: Title,
    /// Delivery and billing address
    pub address: AddressDetails,
}

impl MockAccount {
    /// The account matching the default harness credentials
    #[must_use]
    pub fn standard() -> Self {
        let credentials = Credentials::default();
        Self {
            name: "QA Automation".to_string(),
            email: credentials.email,
            password: credentials.password,
            title: Title::Mr,
            address: AddressDetails {
                first_name: "QA".to_string(),
                last_name: "Automation".to_string(),
                company: Some("QA Labs".to_string()),
                address1: "221B Market Road".to_string(),
                address2: None,
                country: "India".to_string(),
                state: "Karnataka".to_string(),
                city: "Bengaluru".to_string(),
                zipcode: "560001".to_string(),
                mobile_number: "9876543210".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CartLine {
    pub(crate) product: usize,
    pub(crate) quantity: u32,
}

/// Everything the storefront remembers between driver calls
#[derive(Debug)]
pub(crate) struct Store {
    pub(crate) catalog: Vec<MockProduct>,
    pub(crate) accounts: Vec<MockAccount>,
    /// Email of the signed-in account
    pub(crate) session: Option<String>,
    pub(crate) cart: Vec<CartLine>,
    pub(crate) removed: Vec<String>,
    /// Deletes to swallow; `usize::MAX` swallows forever
    pub(crate) sticky_deletes: usize,
    pub(crate) reject_logins: bool,
    pub(crate) order_comment: Option<String>,
    pub(crate) history: Vec<String>,
    path: String,
    search: Option<String>,
    fields: BTreeMap<String, String>,
    cart_modal: bool,
    checkout_modal: bool,
    login_error: bool,
    signup_error: bool,
    subscribed: bool,
}

impl Store {
    pub(crate) fn new() -> Self {
        let catalog = CATALOG
            .iter()
            .enumerate()
            .map(|(i, (name, price))| MockProduct {
                id: i + 1,
                name: (*name).to_string(),
                price: Money::from_major(*price),
            })
            .collect();
        Self {
            catalog,
            accounts: vec![MockAccount::standard()],
            session: None,
            cart: Vec::new(),
            removed: Vec::new(),
            sticky_deletes: 0,
            reject_logins: false,
            order_comment: None,
            history: Vec::new(),
            path: String::new(),
            search: None,
            fields: BTreeMap::new(),
            cart_modal: false,
            checkout_modal: false,
            login_error: false,
            signup_error: false,
            subscribed: false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn current_url(&self, base: &str) -> String {
        if self.path.is_empty() {
            return "about:blank".to_string();
        }
        match &self.search {
            Some(query) => format!("{base}{}?search={}", self.path, query.replace(' ', "+")),
            None => format!("{base}{}", self.path),
        }
    }

    pub(crate) fn product(&self, id: usize) -> Option<&MockProduct> {
        self.catalog.iter().find(|p| p.id == id)
    }

    pub(crate) fn account(&self, email: &str) -> Option<&MockAccount> {
        self.accounts.iter().find(|a| a.email == email)
    }

    pub(crate) fn session_account(&self) -> Option<&MockAccount> {
        self.session.as_deref().and_then(|email| self.account(email))
    }

    pub(crate) fn cart_names(&self) -> Vec<String> {
        self.cart
            .iter()
            .filter_map(|line| self.product(line.product).map(|p| p.name.clone()))
            .collect()
    }

    fn line_total(&self, line: &CartLine) -> Option<Money> {
        let product = self.product(line.product)?;
        Some(Money::from_minor(
            product.price.minor() * i64::from(line.quantity),
        ))
    }

    pub(crate) fn field(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub(crate) fn field_opt(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub(crate) fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub(crate) fn clear_field(&mut self, name: &str) {
        self.fields.remove(name);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Load a route; unknown routes are an error message
    pub(crate) fn navigate(&mut self, path: &str, query: Option<&str>) -> Result<(), String> {
        if !self.is_route(path) {
            return Err(format!("404 Not Found: {path}"));
        }
        self.goto(path);
        if path == "/products" {
            self.search = query
                .and_then(|q| q.strip_prefix("search="))
                .map(|q| q.replace('+', " "))
                .filter(|q| !q.is_empty());
        }
        Ok(())
    }

    fn is_route(&self, path: &str) -> bool {
        match path {
            "/" | "/login" | "/signup" | "/account_created" | "/delete_account" | "/products"
            | "/view_cart" | "/checkout" | "/payment" => true,
            other => other
                .strip_prefix("/product_details/")
                .and_then(|id| id.parse::<usize>().ok())
                .is_some_and(|id| self.product(id).is_some()),
        }
    }

    fn goto(&mut self, path: &str) {
        self.path = path.to_string();
        self.search = None;
        self.fields.clear();
        self.cart_modal = false;
        self.checkout_modal = false;
        self.login_error = false;
        self.signup_error = false;
        self.subscribed = false;
    }

    pub(crate) fn add_to_cart(&mut self, product: usize, quantity: u32) {
        match self.cart.iter_mut().find(|line| line.product == product) {
            Some(line) => line.quantity += quantity,
            None => self.cart.push(CartLine { product, quantity }),
        }
    }

    pub(crate) fn apply(&mut self, action: Action) {
        debug!(?action, "mock storefront action");
        match action {
            Action::Navigate(path) => self.goto(&path),
            Action::AddToCart(product) => {
                self.add_to_cart(product, 1);
                self.cart_modal = true;
            }
            Action::CloseModal => {
                self.cart_modal = false;
                self.checkout_modal = false;
            }
            Action::DeleteLine(line) => self.delete_line(line),
            Action::SubmitLogin => self.submit_login(),
            Action::SubmitSignup => self.submit_signup(),
            Action::CreateAccount => self.create_account(),
            Action::Logout => {
                self.session = None;
                self.goto("/login");
            }
            Action::DeleteAccount => {
                if let Some(email) = self.session.take() {
                    self.accounts.retain(|a| a.email != email);
                }
                self.goto("/delete_account");
            }
            Action::SubmitSearch => {
                let query = self.field("search");
                self.goto("/products");
                self.search = Some(query).filter(|q| !q.trim().is_empty());
            }
            Action::PlaceOrder => {
                self.order_comment = Some(self.field("message"));
                self.goto("/payment");
            }
            Action::Subscribe => {
                if self.field("subscribe_email").contains('@') {
                    self.subscribed = true;
                }
            }
            Action::ProceedToCheckout => {
                if self.session.is_some() {
                    self.goto("/checkout");
                } else {
                    self.checkout_modal = true;
                }
            }
        }
    }

    fn delete_line(&mut self, line: usize) {
        if line >= self.cart.len() {
            return;
        }
        if self.sticky_deletes > 0 {
            if self.sticky_deletes != usize::MAX {
                self.sticky_deletes -= 1;
            }
            debug!(line, "delete swallowed");
            return;
        }
        let removed = self.cart.remove(line);
        let name = self.product(removed.product).map(|p| p.name.clone());
        self.removed.extend(name);
    }

    fn submit_login(&mut self) {
        let email = self.field("login_email");
        let password = self.field("login_password");
        let accepted = !self.reject_logins
            && self
                .account(&email)
                .is_some_and(|account| account.password == password);
        if accepted {
            self.goto("/");
            self.session = Some(email);
        } else {
            self.login_error = true;
        }
    }

    fn submit_signup(&mut self) {
        let name = self.field("signup_name");
        let email = self.field("signup_email");
        if name.trim().is_empty() || email.trim().is_empty() {
            return;
        }
        if self.account(&email).is_some() {
            self.signup_error = true;
            return;
        }
        self.goto("/signup");
        self.set_field("name", name);
        self.set_field("email", email);
    }

    fn create_account(&mut self) {
        if let Some(missing) = REQUIRED_SIGNUP_FIELDS
            .iter()
            .find(|f| self.field(f).trim().is_empty())
        {
            debug!(field = *missing, "signup form incomplete");
            return;
        }
        let email = self.field("email");
        if self.account(&email).is_some() {
            return;
        }
        let optional = |value: String| Some(value).filter(|v| !v.is_empty());
        let account = MockAccount {
            name: self.field("name"),
            email: email.clone(),
            password: self.field("password"),
            title: if self.field("title") == "Mrs" {
                Title::Mrs
            } else {
                Title::Mr
            },
            address: AddressDetails {
                first_name: self.field("first_name"),
                last_name: self.field("last_name"),
                company: optional(self.field("company")),
                address1: self.field("address1"),
                address2: optional(self.field("address2")),
                country: self
                    .field_opt("country")
                    .unwrap_or_else(|| COUNTRIES[0].to_string()),
                state: self.field("state"),
                city: self.field("city"),
                zipcode: self.field("zipcode"),
                mobile_number: self.field("mobile_number"),
            },
        };
        self.accounts.push(account);
        self.session = Some(email);
        self.goto("/account_created");
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the current route
    pub(crate) fn render(&self) -> Dom {
        if self.path.is_empty() {
            return Dom::default();
        }
        let mut roots = vec![self.header()];
        roots.extend(self.body());
        roots.push(self.footer());
        Dom::from_roots(roots)
    }

    fn header(&self) -> Node {
        let nav = Node::new("#header")
            .child(Node::link("Home", Action::Navigate("/".into())))
            .child(Node::link("Products", Action::Navigate("/products".into())))
            .child(Node::link("Cart", Action::Navigate("/view_cart".into())));
        match self.session_account() {
            None => nav.child(Node::link("Signup / Login", Action::Navigate("/login".into()))),
            Some(account) => nav
                .child(Node::link("Logout", Action::Logout))
                .child(Node::link("Delete Account", Action::DeleteAccount))
                .child(
                    Node::new("a").text(format!("{} {}", home::selectors::LOGGED_IN_PREFIX, account.name)),
                ),
        }
    }

    fn footer(&self) -> Node {
        Node::new("#footer")
            .child(Node::new("h2").text("Subscription"))
            .child(Node::new(home::selectors::SUBSCRIBE_EMAIL).input("subscribe_email"))
            .child(Node::button(home::selectors::SUBSCRIBE_BUTTON, "", Action::Subscribe))
            .child(
                Node::new(home::selectors::SUBSCRIBE_SUCCESS)
                    .text("You have been successfully subscribed!")
                    .visible(self.subscribed),
            )
    }

    fn body(&self) -> Vec<Node> {
        match self.path.as_str() {
            "/" => vec![Node::new(products::selectors::LISTING)
                .child(Node::new(products::selectors::TITLE).text("Features Items"))],
            "/login" => self.login_page(),
            "/signup" => vec![self.signup_form()],
            "/account_created" => vec![
                Node::new(signup::selectors::ACCOUNT_CREATED).text("Account Created!"),
                Node::link("Continue", Action::Navigate("/".into())).key(signup::selectors::CONTINUE),
            ],
            "/delete_account" => vec![
                Node::new(home::selectors::ACCOUNT_DELETED).text("Account Deleted!"),
                Node::link("Continue", Action::Navigate("/".into())).key(signup::selectors::CONTINUE),
            ],
            "/products" => self.products_page(),
            "/view_cart" => self.cart_page(),
            "/checkout" => self.checkout_page(),
            "/payment" => vec![Node::new(checkout::selectors::HEADING).text("Payment")],
            other => other
                .strip_prefix("/product_details/")
                .and_then(|id| id.parse().ok())
                .and_then(|id| self.product(id))
                .map(|p| {
                    vec![Node::new(".product-information")
                        .child(Node::new("h2").text(&p.name))
                        .child(Node::new("span").text(p.price.to_string()))]
                })
                .unwrap_or_default(),
        }
    }

    fn login_page(&self) -> Vec<Node> {
        use login::selectors as s;
        let mut login_form = Node::new(".login-form")
            .child(Node::new("h2").text("Login to your account"))
            .child(Node::new(s::LOGIN_EMAIL).input("login_email"))
            .child(Node::new(s::LOGIN_PASSWORD).input("login_password"))
            .child(Node::button(s::LOGIN_BUTTON, "Login", Action::SubmitLogin));
        if self.login_error {
            login_form = login_form.child(Node::new("p").text(s::LOGIN_ERROR_TEXT));
        }
        let mut signup_form = Node::new(".signup-form")
            .child(Node::new("h2").text("New User Signup!"))
            .child(Node::new(s::SIGNUP_NAME).input("signup_name"))
            .child(Node::new(s::SIGNUP_EMAIL).input("signup_email"))
            .child(Node::button(s::SIGNUP_BUTTON, "Signup", Action::SubmitSignup));
        if self.signup_error {
            signup_form = signup_form.child(Node::new("p").text(s::SIGNUP_ERROR_TEXT));
        }
        vec![login_form, signup_form]
    }

    fn signup_form(&self) -> Node {
        use signup::selectors as s;
        let numbered = |range: std::ops::RangeInclusive<u32>| -> Vec<(String, String)> {
            range.map(|n| (n.to_string(), n.to_string())).collect()
        };
        let months = MONTHS
            .iter()
            .enumerate()
            .map(|(i, m)| ((i + 1).to_string(), (*m).to_string()))
            .collect();
        let countries = COUNTRIES
            .iter()
            .map(|c| ((*c).to_string(), (*c).to_string()))
            .collect();
        let mut years = numbered(1900..=2021);
        years.reverse();

        Node::new(".login-form")
            .child(Node::new("h2").text("Enter Account Information"))
            .child(Node::new(s::TITLE_MR).radio("title", "Mr"))
            .child(Node::new(s::TITLE_MRS).radio("title", "Mrs"))
            .child(Node::new("#name").input("name"))
            .child(Node::new("#email").input("email").enabled(false))
            .child(Node::new(s::PASSWORD).input("password"))
            .child(Node::new(s::DAYS).select("days", numbered(1..=31)))
            .child(Node::new(s::MONTHS).select("months", months))
            .child(Node::new(s::YEARS).select("years", years))
            .child(Node::new(s::NEWSLETTER).checkbox("newsletter"))
            .child(Node::new(s::SPECIAL_OFFERS).checkbox("optin"))
            .child(Node::new("h2").text("Address Information"))
            .child(Node::new(s::FIRST_NAME).input("first_name"))
            .child(Node::new(s::LAST_NAME).input("last_name"))
            .child(Node::new(s::COMPANY).input("company"))
            .child(Node::new(s::ADDRESS1).input("address1"))
            .child(Node::new(s::ADDRESS2).input("address2"))
            .child(Node::new(s::COUNTRY).select("country", countries))
            .child(Node::new(s::STATE).input("state"))
            .child(Node::new(s::CITY).input("city"))
            .child(Node::new(s::ZIPCODE).input("zipcode"))
            .child(Node::new(s::MOBILE_NUMBER).input("mobile_number"))
            .child(Node::button(
                s::CREATE_ACCOUNT,
                "Create Account",
                Action::CreateAccount,
            ))
    }

    fn products_page(&self) -> Vec<Node> {
        use products::selectors as s;
        let title = if self.search.is_some() {
            "Searched Products"
        } else {
            s::ALL_PRODUCTS_TEXT
        };
        let cards = self
            .catalog
            .iter()
            .filter(|p| {
                self.search
                    .as_deref()
                    .map_or(true, |query| name_matches(&p.name, query))
            })
            .map(|p| {
                Node::new(s::CARD)
                    .child(
                        Node::new(".productinfo")
                            .child(Node::new(s::CARD_PRICE).text(p.price.to_string()))
                            .child(Node::new(s::CARD_NAME).text(&p.name))
                            .child(
                                Node::new(s::CARD_ADD)
                                    .text("Add to cart")
                                    .on_click(Action::AddToCart(p.id)),
                            ),
                    )
                    .child(
                        Node::new(".choose").child(
                            Node::new(s::CARD_VIEW)
                                .text("View Product")
                                .on_click(Action::Navigate(format!("/product_details/{}", p.id))),
                        ),
                    )
            });

        vec![
            Node::new(s::SEARCH_INPUT).input("search"),
            Node::button(s::SEARCH_BUTTON, "", Action::SubmitSearch),
            Node::new(s::LISTING)
                .child(Node::new(s::TITLE).text(title))
                .children(cards),
            Node::new(s::CART_MODAL)
                .visible(self.cart_modal)
                .child(Node::new("h4").text("Added!"))
                .child(Node::new("p").text("Your product has been added to cart."))
                .child(Node::link("View Cart", Action::Navigate("/view_cart".into())))
                .child(Node::button("button", "Continue Shopping", Action::CloseModal)),
        ]
    }

    fn rows(&self, deletable: bool) -> Vec<Node> {
        self.cart
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let product = self.product(line.product)?;
                let total = self.line_total(line)?;
                let mut row = Node::new(listing::ROWS)
                    .key(&format!("#product-{}", product.id))
                    .child(
                        Node::new(".cart_description").child(
                            Node::link(
                                &product.name,
                                Action::Navigate(format!("/product_details/{}", product.id)),
                            )
                            .key(listing::NAME),
                        ),
                    )
                    .child(Node::new(listing::PRICE).text(product.price.to_string()))
                    .child(Node::new(listing::QUANTITY).text(line.quantity.to_string()))
                    .child(Node::new(listing::TOTAL).text(total.to_string()));
                if deletable {
                    row = row.child(
                        Node::new(cart::selectors::DELETE).on_click(Action::DeleteLine(index)),
                    );
                }
                Some(row)
            })
            .collect()
    }

    fn cart_page(&self) -> Vec<Node> {
        use cart::selectors as s;
        let mut nodes = vec![
            Node::new(listing::TABLE).children(self.rows(true)),
            Node::new(s::EMPTY_CART)
                .child(Node::new("b").text("Cart is empty!"))
                .child(Node::link("Click here", Action::Navigate("/products".into())))
                .visible(self.cart.is_empty()),
        ];
        if !self.cart.is_empty() {
            nodes.push(
                Node::new(s::CHECKOUT)
                    .text("Proceed To Checkout")
                    .on_click(Action::ProceedToCheckout),
            );
        }
        nodes.push(
            Node::new(s::CHECKOUT_MODAL)
                .visible(self.checkout_modal)
                .child(Node::new("p").text("Register / Login account to proceed on checkout."))
                .child(Node::link("Register / Login", Action::Navigate("/login".into())))
                .child(Node::button("button", "Continue On Cart", Action::CloseModal)),
        );
        nodes
    }

    fn checkout_page(&self) -> Vec<Node> {
        use checkout::selectors as s;
        let mut nodes = vec![Node::new(s::HEADING).text("Address Details")];
        if let Some(account) = self.session_account() {
            nodes.push(address_block(s::DELIVERY, "Your delivery address", account));
            nodes.push(address_block(s::BILLING, "Your billing address", account));
        }
        let total: Money = self
            .cart
            .iter()
            .filter_map(|line| self.line_total(line))
            .sum();
        nodes.push(Node::new(s::HEADING).text("Review Your Order"));
        nodes.push(
            Node::new(listing::TABLE).children(self.rows(false)).child(
                Node::new("tr")
                    .child(Node::new("h4").text("Total Amount"))
                    .child(Node::new(listing::TOTAL).text(total.to_string())),
            ),
        );
        nodes.push(Node::new(s::COMMENT).input("message"));
        nodes.push(Node::link("Place Order", Action::PlaceOrder).key(s::PLACE_ORDER));
        nodes
    }
}

fn address_block(key: &str, heading: &str, account: &MockAccount) -> Node {
    use checkout::selectors as s;
    let a = &account.address;
    let title = match account.title {
        Title::Mr => "Mr",
        Title::Mrs => "Mrs",
    };
    Node::new(key)
        .child(Node::new(".page-subheading").text(heading))
        .child(Node::new(s::ADDRESS_NAME).text(format!("{title}. {} {}", a.first_name, a.last_name)))
        .children(a.company.iter().map(|c| Node::new(s::ADDRESS_STREET).text(c)))
        .child(Node::new(s::ADDRESS_STREET).text(&a.address1))
        .children(a.address2.iter().map(|l| Node::new(s::ADDRESS_STREET).text(l)))
        .child(Node::new(".address_city").text(format!("{} {} {}", a.city, a.state, a.zipcode)))
        .child(Node::new(".address_country_name").text(&a.country))
        .child(Node::new(".address_phone").text(&a.mobile_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_route_is_rejected() {
        let mut store = Store::new();
        assert!(store.navigate("/nowhere", None).is_err());
        assert!(store.navigate("/product_details/99", None).is_err());
        assert!(store.navigate("/product_details/1", None).is_ok());
    }

    #[test]
    fn test_search_query_round_trips_through_url() {
        let mut store = Store::new();
        store.navigate("/products", Some("search=blue+top")).ok();
        assert_eq!(
            store.current_url("https://shop.test"),
            "https://shop.test/products?search=blue+top"
        );
    }

    #[test]
    fn test_adding_same_product_bumps_quantity() {
        let mut store = Store::new();
        store.apply(Action::AddToCart(1));
        store.apply(Action::AddToCart(1));
        assert_eq!(store.cart, vec![CartLine { product: 1, quantity: 2 }]);
    }

    #[test]
    fn test_sticky_deletes_count_down() {
        let mut store = Store::new();
        store.add_to_cart(1, 1);
        store.sticky_deletes = 1;
        store.apply(Action::DeleteLine(0));
        assert_eq!(store.cart.len(), 1);
        store.apply(Action::DeleteLine(0));
        assert!(store.cart.is_empty());
        assert_eq!(store.removed, vec!["Blue Top"]);
    }

    #[test]
    fn test_navigation_clears_transient_state() {
        let mut store = Store::new();
        store.navigate("/products", None).ok();
        store.apply(Action::AddToCart(2));
        store.set_field("search", "x");
        store.apply(Action::Navigate("/".into()));
        assert!(!store.cart_modal);
        assert_eq!(store.field_opt("search"), None);
    }
}
