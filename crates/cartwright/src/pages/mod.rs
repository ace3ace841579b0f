//! Page models, one per storefront surface.
//!
//! Each model owns a [`Surface`](crate::surface::Surface) clone and a fixed set
//! of locators (exposed through its `selectors` module), and offers three
//! kinds of operation: navigation to its route, single-action mutators, and
//! queries/extraction.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod login;
pub mod products;
pub mod signup;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use products::{CatalogEntry, ProductsPage};
pub use signup::{AccountDetails, AddressDetails, NewAccount, SignupPage, Title};

/// Cart and checkout listings share one table layout
pub mod listing {
    use crate::line_item::LineItemTable;
    use crate::locator::{Locator, Selector};

    /// One product row of the cart/checkout table
    pub const ROWS: &str = "#cart_info tbody tr[id^=\"product-\"]";
    /// Product name link inside a row
    pub const NAME: &str = ".cart_description h4 a";
    /// Unit price inside a row
    pub const PRICE: &str = ".cart_price p";
    /// Quantity inside a row
    pub const QUANTITY: &str = ".cart_quantity button";
    /// Line total inside a row (also used for the order total)
    pub const TOTAL: &str = ".cart_total_price";
    /// Table wrapper
    pub const TABLE: &str = "#cart_info";

    /// Row-scoped view over the listing
    #[must_use]
    pub fn table() -> LineItemTable {
        LineItemTable::new(
            Locator::new(ROWS),
            Selector::css(NAME),
            Selector::css(PRICE),
            Selector::css(QUANTITY),
            Selector::css(TOTAL),
        )
    }
}
