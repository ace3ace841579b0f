//! Product catalog: listing, search, add-to-cart modal.

use crate::driver::Driver;
use crate::line_item::name_matches;
use crate::money::Money;
use crate::page_object::PageObject;
use crate::result::CartwrightResult;
use crate::surface::Surface;
use crate::wait::{ElementState, Settle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Locators of the catalog page
pub mod selectors {
    use crate::locator::{Locator, Selector};

    /// Page heading ("All Products" / "Searched Products")
    pub const TITLE: &str = ".title.text-center";
    /// Heading text of the unfiltered listing
    pub const ALL_PRODUCTS_TEXT: &str = "All Products";
    /// Search input
    pub const SEARCH_INPUT: &str = "#search_product";
    /// Search submit button
    pub const SEARCH_BUTTON: &str = "#submit_search";
    /// Listing container
    pub const LISTING: &str = ".features_items";
    /// One product card
    pub const CARD: &str = ".single-products";
    /// Product name inside a card
    pub const CARD_NAME: &str = ".productinfo p";
    /// Product price inside a card
    pub const CARD_PRICE: &str = ".productinfo h2";
    /// "View Product" link container inside a card
    pub const CARD_VIEW: &str = ".choose a";
    /// Add-to-cart button inside a card
    pub const CARD_ADD: &str = ".productinfo a.add-to-cart";
    /// Add-to-cart confirmation modal
    pub const CART_MODAL: &str = "#cartModal";

    /// Every product card
    #[must_use]
    pub fn cards() -> Locator {
        Locator::new(CARD)
    }

    /// Card at `index`
    #[must_use]
    pub fn card(index: usize) -> Locator {
        cards().nth(index)
    }

    /// Name of the card at `index`
    #[must_use]
    pub fn card_name(index: usize) -> Locator {
        card(index).within(Selector::css(CARD_NAME))
    }

    /// Price of the card at `index`
    #[must_use]
    pub fn card_price(index: usize) -> Locator {
        card(index).within(Selector::css(CARD_PRICE))
    }

    /// "View Product" link of the card at `index`
    #[must_use]
    pub fn card_view(index: usize) -> Locator {
        card(index).within(Selector::css_with_text(CARD_VIEW, "View Product"))
    }

    /// Add-to-cart button of the card at `index`
    #[must_use]
    pub fn card_add(index: usize) -> Locator {
        card(index).within(Selector::css(CARD_ADD))
    }

    /// "All Products" heading
    #[must_use]
    pub fn all_products_title() -> Locator {
        Selector::css_with_text(TITLE, ALL_PRODUCTS_TEXT).into()
    }

    /// Search input
    #[must_use]
    pub fn search_input() -> Locator {
        Locator::new(SEARCH_INPUT)
    }

    /// Search submit button
    #[must_use]
    pub fn search_button() -> Locator {
        Locator::new(SEARCH_BUTTON)
    }

    /// Add-to-cart confirmation modal
    #[must_use]
    pub fn cart_modal() -> Locator {
        Locator::new(CART_MODAL)
    }

    /// Modal "Continue Shopping" button
    #[must_use]
    pub fn continue_shopping() -> Locator {
        Selector::role("button", "Continue Shopping").into()
    }

    /// Modal "View Cart" link
    #[must_use]
    pub fn view_cart() -> Locator {
        Selector::role("link", "View Cart").into()
    }
}

/// A product card as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product name
    pub name: String,
    /// Price text (`Rs. 500`)
    pub price: String,
}

impl CatalogEntry {
    /// Parsed price
    ///
    /// # Errors
    ///
    /// Returns a money error if the price text is malformed
    pub fn price_amount(&self) -> CartwrightResult<Money> {
        Ok(Money::parse(&self.price)?)
    }
}

/// Catalog page model
#[derive(Debug)]
pub struct ProductsPage<D: Driver + ?Sized> {
    surface: Surface<D>,
}

impl<D: Driver + ?Sized> PageObject for ProductsPage<D> {
    fn route(&self) -> &str {
        "/products"
    }

    fn page_name(&self) -> &str {
        "Products"
    }
}

impl<D: Driver + ?Sized> ProductsPage<D> {
    /// Create the page model
    #[must_use]
    pub const fn new(surface: Surface<D>) -> Self {
        Self { surface }
    }

    /// Navigate to the catalog
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(&self) -> CartwrightResult<()> {
        self.surface.navigate(self.route()).await
    }

    /// Search the catalog
    ///
    /// # Errors
    ///
    /// Returns error if the search form is missing
    pub async fn search_product(&self, query: &str) -> CartwrightResult<()> {
        info!(query, "search products");
        self.surface.fill(&selectors::search_input(), query).await?;
        self.surface.click(&selectors::search_button()).await
    }

    /// Number of product cards rendered
    pub async fn products_count(&self) -> usize {
        self.surface.get_count(&selectors::cards()).await
    }

    /// Name on the card at `index`
    pub async fn product_name_by_index(&self, index: usize) -> String {
        self.surface
            .get_text(&selectors::card_name(index))
            .await
            .trim()
            .to_string()
    }

    /// Price on the card at `index`
    pub async fn product_price_by_index(&self, index: usize) -> String {
        self.surface
            .get_text(&selectors::card_price(index))
            .await
            .trim()
            .to_string()
    }

    /// Every product name, in listing order
    pub async fn all_product_names(&self) -> Vec<String> {
        let count = self.products_count().await;
        let mut names = Vec::with_capacity(count);
        for index in 0..count {
            names.push(self.product_name_by_index(index).await);
        }
        names
    }

    /// Every card as a name/price entry, in listing order
    pub async fn all_products(&self) -> Vec<CatalogEntry> {
        let count = self.products_count().await;
        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            entries.push(CatalogEntry {
                name: self.product_name_by_index(index).await,
                price: self.product_price_by_index(index).await,
            });
        }
        debug!(cards = count, "extracted catalog");
        entries
    }

    /// Open the detail page of the card at `index`
    ///
    /// # Errors
    ///
    /// Returns error if the card is missing
    pub async fn view_product_by_index(&self, index: usize) -> CartwrightResult<()> {
        self.surface.click(&selectors::card_view(index)).await
    }

    /// Add the card at `index` to the cart and wait for the confirmation modal
    ///
    /// # Errors
    ///
    /// Returns error if the card is missing or the modal never shows
    pub async fn add_product_to_cart_by_index(&self, index: usize) -> CartwrightResult<()> {
        info!(index, "add to cart");
        self.surface.click(&selectors::card_add(index)).await?;
        let options = self.surface.wait_options(self.surface.timeouts().action());
        self.surface
            .wait_for_element_with(&selectors::cart_modal(), ElementState::Visible, &options)
            .await?;
        Ok(())
    }

    /// Add several cards in order, dismissing the modal after each
    ///
    /// # Errors
    ///
    /// Returns the first add or dismiss failure
    pub async fn add_multiple_products_to_cart(
        &self,
        indexes: &[usize],
        settle: &Settle,
    ) -> CartwrightResult<()> {
        for &index in indexes {
            self.add_product_to_cart_by_index(index).await?;
            self.continue_shopping().await?;
            let modal = selectors::cart_modal();
            let modal = &modal;
            settle
                .wait("cart modal closed", move || async move {
                    Ok(!self.surface.is_visible(modal).await)
                })
                .await?;
        }
        Ok(())
    }

    /// Dismiss the modal with "Continue Shopping"
    ///
    /// # Errors
    ///
    /// Returns error if the button is missing
    pub async fn continue_shopping(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::continue_shopping()).await
    }

    /// Follow the modal "View Cart" link
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn go_to_cart_from_modal(&self) -> CartwrightResult<()> {
        self.surface.click(&selectors::view_cart()).await
    }

    /// Whether the add-to-cart modal is showing
    pub async fn is_cart_modal_visible(&self) -> bool {
        self.surface.is_visible(&selectors::cart_modal()).await
    }

    /// Whether the "All Products" heading is visible
    pub async fn is_all_products_title_visible(&self) -> bool {
        self.surface
            .is_visible(&selectors::all_products_title())
            .await
    }

    /// Whether any listed name contains `name` (case-insensitive)
    pub async fn is_product_in_list(&self, name: &str) -> bool {
        self.all_product_names()
            .await
            .iter()
            .any(|listed| name_matches(listed, name))
    }

    /// Number of cards after a search, once the first card is visible
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no card shows within the wait timeout
    pub async fn searched_products_count(&self) -> CartwrightResult<usize> {
        self.surface
            .wait_for_element(&selectors::card(0), ElementState::Visible)
            .await?;
        Ok(self.products_count().await)
    }
}
