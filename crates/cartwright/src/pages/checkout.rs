//! Checkout page: address review, order listing, comment, place order.

use crate::driver::Driver;
use crate::line_item::{LineItem, LineItemTable};
use crate::money::Money;
use crate::page_object::PageObject;
use crate::pages::listing;
use crate::result::CartwrightResult;
use crate::surface::Surface;
use tracing::info;

/// Locators of the checkout page
pub mod selectors {
    use crate::locator::{Locator, Selector};

    /// Delivery address block
    pub const DELIVERY: &str = "#address_delivery";
    /// Billing address block
    pub const BILLING: &str = "#address_invoice";
    /// Full name line inside an address block
    pub const ADDRESS_NAME: &str = ".address_firstname";
    /// Street lines inside an address block
    pub const ADDRESS_STREET: &str = ".address_address1";
    /// Section heading
    pub const HEADING: &str = ".heading";
    /// Order comment textarea
    pub const COMMENT: &str = "textarea[name=\"message\"]";
    /// "Place Order" link
    pub const PLACE_ORDER: &str = "a[href=\"/payment\"]";

    /// Delivery address block
    #[must_use]
    pub fn delivery() -> Locator {
        Locator::new(DELIVERY)
    }

    /// Billing address block
    #[must_use]
    pub fn billing() -> Locator {
        Locator::new(BILLING)
    }

    /// Name line of an address block
    #[must_use]
    pub fn name_in(section: &Locator) -> Locator {
        section.within(Selector::css(ADDRESS_NAME))
    }

    /// First street line of an address block (the company line when one exists)
    #[must_use]
    pub fn street_in(section: &Locator) -> Locator {
        section.within(Selector::css(ADDRESS_STREET)).first()
    }

    /// Order total: the last total cell of the listing
    #[must_use]
    pub fn order_total() -> Locator {
        Locator::new(super::listing::TOTAL).last()
    }

    /// "Address Details" heading
    #[must_use]
    pub fn address_details_heading() -> Locator {
        Selector::css_with_text(HEADING, "Address Details").into()
    }

    /// "Review Your Order" heading
    #[must_use]
    pub fn review_order_heading() -> Locator {
        Selector::css_with_text(HEADING, "Review Your Order").into()
    }

    /// Order comment textarea
    #[must_use]
    pub fn comment() -> Locator {
        Locator::new(COMMENT)
    }

    /// Place-order link
    #[must_use]
    pub fn place_order() -> Locator {
        Locator::new(PLACE_ORDER)
    }
}

/// Checkout page model
#[derive(Debug)]
pub struct CheckoutPage<D: Driver + ?Sized> {
    surface: Surface<D>,
    table: LineItemTable,
}

impl<D: Driver + ?Sized> PageObject for CheckoutPage<D> {
    fn route(&self) -> &str {
        "/checkout"
    }

    fn page_name(&self) -> &str {
        "Checkout"
    }
}

impl<D: Driver + ?Sized> CheckoutPage<D> {
    /// Create the page model
    #[must_use]
    pub fn new(surface: Surface<D>) -> Self {
        Self {
            surface,
            table: listing::table(),
        }
    }

    /// Navigate to checkout
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn open(&self) -> CartwrightResult<()> {
        self.surface.navigate(self.route()).await
    }

    async fn text(&self, locator: &crate::locator::Locator) -> String {
        self.surface.get_text(locator).await.trim().to_string()
    }

    /// Name line of the delivery address
    pub async fn delivery_name(&self) -> String {
        self.text(&selectors::name_in(&selectors::delivery())).await
    }

    /// Name line of the billing address
    pub async fn billing_name(&self) -> String {
        self.text(&selectors::name_in(&selectors::billing())).await
    }

    /// First street line of the delivery address
    pub async fn delivery_address(&self) -> String {
        self.text(&selectors::street_in(&selectors::delivery())).await
    }

    /// First street line of the billing address
    pub async fn billing_address(&self) -> String {
        self.text(&selectors::street_in(&selectors::billing())).await
    }

    /// Whole delivery block text
    pub async fn full_delivery_address(&self) -> String {
        self.text(&selectors::delivery()).await
    }

    /// Whole billing block text
    pub async fn full_billing_address(&self) -> String {
        self.text(&selectors::billing()).await
    }

    /// Number of order rows
    pub async fn products_count(&self) -> usize {
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

    /// Every order row
    pub async fn get_all_products(&self) -> Vec<LineItem> {
        self.table.all(&self.surface).await
    }

    /// Whether any row's name contains `name` (case-insensitive)
    pub async fn is_product_in_checkout(&self, name: &str) -> bool {
        self.table.contains(&self.surface, name).await
    }

    /// Displayed order total text
    pub async fn total_amount(&self) -> String {
        self.text(&selectors::order_total()).await
    }

    /// Displayed order total, parsed
    ///
    /// # Errors
    ///
    /// Returns a money error if the total text is malformed or missing
    pub async fn total_amount_value(&self) -> CartwrightResult<Money> {
        Ok(Money::parse(&self.total_amount().await)?)
    }

    /// Sum of every row's total
    ///
    /// # Errors
    ///
    /// Returns a money error for the first malformed total
    pub async fn calculate_expected_total(&self) -> CartwrightResult<Money> {
        self.table.expected_total(&self.surface).await
    }

    /// Type an order comment
    ///
    /// # Errors
    ///
    /// Returns error if the textarea is missing
    pub async fn add_order_comment(&self, comment: &str) -> CartwrightResult<()> {
        self.surface.fill(&selectors::comment(), comment).await
    }

    /// Current order comment
    pub async fn order_comment(&self) -> String {
        self.surface.get_value(&selectors::comment()).await
    }

    /// Press "Place Order"
    ///
    /// # Errors
    ///
    /// Returns error if the link is missing
    pub async fn place_order(&self) -> CartwrightResult<()> {
        info!("placing order");
        self.surface.click(&selectors::place_order()).await
    }

    /// Comment, then place the order
    ///
    /// # Errors
    ///
    /// Returns error if either control is missing
    pub async fn add_comment_and_place_order(&self, comment: &str) -> CartwrightResult<()> {
        self.add_order_comment(comment).await?;
        self.place_order().await
    }

    /// Whether the delivery block is visible
    pub async fn is_delivery_address_visible(&self) -> bool {
        self.surface.is_visible(&selectors::delivery()).await
    }

    /// Whether the billing block is visible
    pub async fn is_billing_address_visible(&self) -> bool {
        self.surface.is_visible(&selectors::billing()).await
    }

    /// Whether the "Address Details" heading is visible
    pub async fn is_address_details_visible(&self) -> bool {
        self.surface
            .is_visible(&selectors::address_details_heading())
            .await
    }

    /// Whether the "Review Your Order" heading is visible
    pub async fn is_review_order_visible(&self) -> bool {
        self.surface
            .is_visible(&selectors::review_order_heading())
            .await
    }

    /// Whether the place-order link is visible
    pub async fn is_place_order_visible(&self) -> bool {
        self.surface.is_visible(&selectors::place_order()).await
    }

    /// Whether delivery and billing blocks carry the same address.
    ///
    /// The blocks differ only in their headings, so the first non-empty line
    /// of each is ignored.
    pub async fn verify_addresses_match(&self) -> bool {
        let delivery = self.full_delivery_address().await;
        let billing = self.full_billing_address().await;
        let delivery = address_body(&delivery);
        !delivery.is_empty() && delivery == address_body(&billing)
    }
}

fn address_body(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::mock::MockStorefront;
    use std::sync::Arc;

    async fn checkout_with(names: &[&str]) -> (Arc<MockStorefront>, CheckoutPage<MockStorefront>) {
        let mock = Arc::new(MockStorefront::new());
        assert!(mock.sign_in(&mock.default_account().email));
        for name in names {
            mock.seed_cart_item(name, 1).unwrap();
        }
        let config = HarnessConfig::default().with_base_url(mock.base_url());
        let page = CheckoutPage::new(Surface::new(Arc::clone(&mock), &config));
        page.open().await.unwrap();
        (mock, page)
    }

    mod address_tests {
        use super::*;

        #[test]
        fn test_address_body_skips_heading() {
            let block = "\n Your delivery address \nMr. QA Automation\n  Main St  \n";
            assert_eq!(address_body(block), vec!["Mr. QA Automation", "Main St"]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_addresses_come_from_account() {
            let (mock, checkout) = checkout_with(&["Blue Top"]).await;
            let account = mock.default_account();
            assert!(checkout.is_address_details_visible().await);
            assert!(checkout.is_delivery_address_visible().await);
            assert!(checkout.is_billing_address_visible().await);
            assert!(checkout.delivery_name().await.contains(&account.address.first_name));
            assert_eq!(checkout.delivery_name().await, checkout.billing_name().await);
            assert_eq!(checkout.delivery_address().await, checkout.billing_address().await);
            assert!(checkout.verify_addresses_match().await);
        }
    }

    mod order_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_displayed_total_matches_rows() {
            let (_, checkout) = checkout_with(&["Blue Top", "Men Tshirt", "Stylish Dress"]).await;
            assert!(checkout.is_review_order_visible().await);
            assert_eq!(checkout.products_count().await, 3);
            assert!(checkout.is_product_in_checkout("stylish").await);
            assert_eq!(checkout.total_amount().await, "Rs. 2,400");
            assert_eq!(
                checkout.total_amount_value().await.unwrap(),
                checkout.calculate_expected_total().await.unwrap()
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_comment_and_place_order() {
            let (mock, checkout) = checkout_with(&["Blue Top"]).await;
            assert!(checkout.is_place_order_visible().await);
            checkout
                .add_comment_and_place_order("Leave at the door")
                .await
                .unwrap();
            assert_eq!(mock.current_path(), "/payment");
            assert_eq!(mock.order_comment().as_deref(), Some("Leave at the door"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_order_comment_round_trip() {
            let (_, checkout) = checkout_with(&["Blue Top"]).await;
            assert_eq!(checkout.order_comment().await, "");
            checkout.add_order_comment("Gift wrap").await.unwrap();
            assert_eq!(checkout.order_comment().await, "Gift wrap");
        }
    }
}
