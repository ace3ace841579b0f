//! Cart page: line-item extraction, removal, checkout entry.

use crate::driver::Driver;
use crate::line_item::{LineItem, LineItemTable};
use crate::money::Money;
use crate::page_object::PageObject;
use crate::pages::listing;
use crate::result::{CartwrightError, CartwrightResult};
use crate::surface::Surface;
use crate::wait::Settle;
use tracing::{info, warn};

/// Locators specific to the cart page
pub mod selectors {
    use crate::locator::{Locator, Selector};

    /// Delete control inside a cart row
    pub const DELETE: &str = ".cart_quantity_delete";
    /// "Proceed To Checkout" button
    pub const CHECKOUT: &str = ".btn.btn-default.check_out";
    /// Empty-cart message
    pub const EMPTY_CART: &str = "#empty_cart";
    /// Login prompt shown to anonymous users on checkout
    pub const CHECKOUT_MODAL: &str = "#checkoutModal";

    /// Delete control of the row at `index`
    #[must_use]
    pub fn delete(index: usize) -> Locator {
        super::listing::table().cell(index, &Selector::css(DELETE))
    }

    /// Checkout button
    #[must_use]
    pub fn checkout() -> Locator {
        Locator::new(CHECKOUT)
    }

    /// Empty-cart message
    #[must_use]
    pub fn empty_cart() -> Locator {
        Locator::new(EMPTY_CART)
    }

    /// Anonymous checkout prompt
    #[must_use]
    pub fn checkout_modal() -> Locator {
        Locator::new(CHECKOUT_MODAL)
    }
}

/// Cart page model
#[derive(Debug)]
pub struct CartPage<D: Driver + ?Sized> {
    surface: Surface<D>,
    table: LineItemTable,
}

impl<D: Driver + ?Sized> PageObject for CartPage<D> {
    fn route(&self) -> &str {
        "/view_cart"
    }

    fn page_name(&self) -> &str {
        "Cart"
    }
}

impl<D: Driver + ?Sized> CartPage<D> {
    /// Create the page model
    #[must_use]
    pub fn new(surface: Surface<D>) -> Self {
        Self {
            surface,
            table: listing::table(),
        }
    }

    /// Row-scoped view over the cart listing
    #[must_use]
    pub const fn table(&self) -> &LineItemTable {
        &self.table
    }

    /// Navigate to the cart
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(&self) -> CartwrightResult<()> {
        self.surface.navigate(self.route()).await
    }

    /// Number of product rows
    pub async fn items_count(&self) -> usize {
        self.table.count(&self.surface).await
    }

    /// Name of the row at `index`
    pub async fn product_name_by_index(&self, index: usize) -> String {
        self.table.name_at(&self.surface, index).await
    }

    /// Unit price of the row at `index`
    pub async fn product_price_by_index(&self, index: usize) -> String {
        self.table.price_at(&self.surface, index).await
    }

    /// Quantity of the row at `index`
    pub async fn product_quantity_by_index(&self, index: usize) -> String {
        self.table.quantity_at(&self.surface, index).await
    }

    /// Line total of the row at `index`
    pub async fn product_total_by_index(&self, index: usize) -> String {
        self.table.total_at(&self.surface, index).await
    }

    /// Every row, in cart order
    pub async fn get_all_products(&self) -> Vec<LineItem> {
        self.table.all(&self.surface).await
    }

    /// Whether any row's name contains `name` (case-insensitive)
    pub async fn is_product_in_cart(&self, name: &str) -> bool {
        self.table.contains(&self.surface, name).await
    }

    /// Whether the cart has no rows
    pub async fn is_cart_empty(&self) -> bool {
        self.items_count().await == 0
    }

    /// Whether the empty-cart message is visible
    pub async fn is_empty_cart_message_visible(&self) -> bool {
        self.surface.is_visible(&selectors::empty_cart()).await
    }

    /// Delete the row at `index`, then settle until the row count drops
    ///
    /// # Errors
    ///
    /// Returns error if the row has no delete control
    pub async fn remove_product_by_index(
        &self,
        index: usize,
        settle: &Settle,
    ) -> CartwrightResult<()> {
        let before = self.items_count().await;
        self.surface.click(&selectors::delete(index)).await?;
        settle
            .wait("cart row removed", move || async move {
                Ok(self.items_count().await < before)
            })
            .await?;
        info!(index, before, "removed cart row");
        Ok(())
    }

    /// Delete the first row whose name contains `name`
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if no row matches
    pub async fn remove_product_by_name(&self, name: &str, settle: &Settle) -> CartwrightResult<()> {
        match self.table.position_of(&self.surface, name).await {
            Some(index) => self.remove_product_by_index(index, settle).await,
            None => Err(CartwrightError::ProductNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Remove rows at index 0 until the cart is empty.
    ///
    /// Stops early when a deletion leaves the row count unchanged. Returns
    /// the number of rows that actually disappeared.
    ///
    /// # Errors
    ///
    /// Returns error if a delete control is missing
    pub async fn remove_all_products(&self, settle: &Settle) -> CartwrightResult<usize> {
        let mut removed = 0;
        loop {
            let before = self.items_count().await;
            if before == 0 {
                return Ok(removed);
            }
            self.remove_product_by_index(0, settle).await?;
            let after = self.items_count().await;
            if after >= before {
                warn!(remaining = after, "cart row did not disappear, stopping");
                return Ok(removed);
            }
            removed += before - after;
        }
    }

    /// Issue up to `limit` index-0 deletions and report how many rows went away
    ///
    /// # Errors
    ///
    /// Returns error if a delete control is missing
    pub async fn sweep(&self, limit: usize, settle: &Settle) -> CartwrightResult<usize> {
        let before = self.items_count().await;
        for _ in 0..limit.min(before) {
            if self.items_count().await == 0 {
                break;
            }
            self.remove_product_by_index(0, settle).await?;
        }
        let after = self.items_count().await;
        Ok(before.saturating_sub(after))
    }

    /// Press "Proceed To Checkout"
    ///
    /// # Errors
    ///
    /// Returns error if the button is missing
    pub async fn proceed_to_checkout(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::checkout()).await
    }

    /// Whether the anonymous checkout prompt is visible
    pub async fn is_checkout_login_prompt_visible(&self) -> bool {
        self.surface.is_visible(&selectors::checkout_modal()).await
    }

    /// Sum of every row's total
    ///
    /// # Errors
    ///
    /// Returns a money error for the first malformed total
    pub async fn calculate_expected_total(&self) -> CartwrightResult<Money> {
        self.table.expected_total(&self.surface).await
    }
}
