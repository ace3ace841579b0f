//! Line items and row-scoped extraction of listing tables.
//!
//! A [`LineItemTable`] yields one locator per row and reads every field from
//! inside that row, so a record never mixes cells from different rows.

use crate::driver::Driver;
use crate::locator::{Locator, Selector};
use crate::money::{Money, MoneyParseError};
use crate::result::CartwrightResult;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of a cart or checkout listing, as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name
    pub name: String,
    /// Unit price, currency formatted (`Rs. 500`)
    pub price: String,
    /// Quantity text
    pub quantity: String,
    /// Line total, currency formatted
    pub total: String,
}

impl LineItem {
    /// Create a line item
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
            total: total.into(),
        }
    }

    /// Parsed line total
    ///
    /// # Errors
    ///
    /// Returns a money error if the total text is malformed
    pub fn total_amount(&self) -> CartwrightResult<Money> {
        Ok(Money::parse(&self.total)?)
    }

    /// Parsed unit price
    ///
    /// # Errors
    ///
    /// Returns a money error if the price text is malformed
    pub fn price_amount(&self) -> CartwrightResult<Money> {
        Ok(Money::parse(&self.price)?)
    }

    /// Parsed quantity, `None` if the text is not a whole number
    #[must_use]
    pub fn quantity_value(&self) -> Option<u32> {
        self.quantity.trim().parse().ok()
    }

    /// Case-insensitive substring match on the name
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        name_matches(&self.name, query)
    }
}

pub(crate) fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Sum of every item's parsed total
///
/// # Errors
///
/// Returns a money error for the first malformed total, or `Overflow`
/// naming the total that pushed the sum out of range
pub fn expected_total(items: &[LineItem]) -> CartwrightResult<Money> {
    items.iter().try_fold(Money::ZERO, |sum, item| {
        sum.checked_add(item.total_amount()?).ok_or_else(|| {
            MoneyParseError::Overflow {
                input: item.total.clone(),
            }
            .into()
        })
    })
}

/// Row-scoped view over a listing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemTable {
    rows: Locator,
    name: Selector,
    price: Selector,
    quantity: Selector,
    total: Selector,
}

impl LineItemTable {
    /// Create a table view from a row locator and per-row field selectors
    #[must_use]
    pub const fn new(
        rows: Locator,
        name: Selector,
        price: Selector,
        quantity: Selector,
        total: Selector,
    ) -> Self {
        Self {
            rows,
            name,
            price,
            quantity,
            total,
        }
    }

    /// Locator matching every row
    #[must_use]
    pub const fn rows(&self) -> &Locator {
        &self.rows
    }

    /// Locator for the row at `index`
    #[must_use]
    pub fn row(&self, index: usize) -> Locator {
        self.rows.nth(index)
    }

    /// Locator for `selector` inside the row at `index`
    #[must_use]
    pub fn cell(&self, index: usize, selector: &Selector) -> Locator {
        self.row(index).within(selector.clone())
    }

    /// Locator for the name cell of the row at `index`
    #[must_use]
    pub fn name_cell(&self, index: usize) -> Locator {
        self.cell(index, &self.name)
    }

    async fn read<D: Driver + ?Sized>(
        &self,
        surface: &Surface<D>,
        index: usize,
        selector: &Selector,
    ) -> String {
        surface
            .get_text(&self.cell(index, selector))
            .await
            .trim()
            .to_string()
    }

    /// Number of rows currently rendered
    pub async fn count<D: Driver + ?Sized>(&self, surface: &Surface<D>) -> usize {
        surface.get_count(&self.rows).await
    }

    /// Name of the row at `index` (`""` when absent)
    pub async fn name_at<D: Driver + ?Sized>(&self, surface: &Surface<D>, index: usize) -> String {
        self.read(surface, index, &self.name).await
    }

    /// Price of the row at `index`
    pub async fn price_at<D: Driver + ?Sized>(&self, surface: &Surface<D>, index: usize) -> String {
        self.read(surface, index, &self.price).await
    }

    /// Quantity of the row at `index`
    pub async fn quantity_at<D: Driver + ?Sized>(
        &self,
        surface: &Surface<D>,
        index: usize,
    ) -> String {
        self.read(surface, index, &self.quantity).await
    }

    /// Total of the row at `index`
    pub async fn total_at<D: Driver + ?Sized>(&self, surface: &Surface<D>, index: usize) -> String {
        self.read(surface, index, &self.total).await
    }

    /// The full record for the row at `index`
    pub async fn item_at<D: Driver + ?Sized>(
        &self,
        surface: &Surface<D>,
        index: usize,
    ) -> LineItem {
        LineItem {
            name: self.name_at(surface, index).await,
            price: self.price_at(surface, index).await,
            quantity: self.quantity_at(surface, index).await,
            total: self.total_at(surface, index).await,
        }
    }

    /// Every row, in rendering order
    pub async fn all<D: Driver + ?Sized>(&self, surface: &Surface<D>) -> Vec<LineItem> {
        let count = self.count(surface).await;
        let mut items = Vec::with_capacity(count);
        for index in 0..count {
            items.push(self.item_at(surface, index).await);
        }
        debug!(rows = count, "extracted line items");
        items
    }

    /// Index of the first row whose name contains `query` (case-insensitive)
    pub async fn position_of<D: Driver + ?Sized>(
        &self,
        surface: &Surface<D>,
        query: &str,
    ) -> Option<usize> {
        let count = self.count(surface).await;
        for index in 0..count {
            if name_matches(&self.name_at(surface, index).await, query) {
                return Some(index);
            }
        }
        None
    }

    /// Whether any row's name contains `query`
    pub async fn contains<D: Driver + ?Sized>(&self, surface: &Surface<D>, query: &str) -> bool {
        self.position_of(surface, query).await.is_some()
    }

    /// Sum of the parsed totals of every row
    ///
    /// # Errors
    ///
    /// Returns a money error for the first malformed total
    pub async fn expected_total<D: Driver + ?Sized>(
        &self,
        surface: &Surface<D>,
    ) -> CartwrightResult<Money> {
        expected_total(&self.all(surface).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::mock::MockStorefront;
    use crate::pages::listing;
    use crate::result::CartwrightError;
    use std::sync::Arc;

    fn item(name: &str, total: &str) -> LineItem {
        LineItem::new(name, total, "1", total)
    }

    mod line_item_tests {
        use super::*;

        #[test]
        fn test_expected_total_of_synthetic_cart() {
            let items = vec![
                item("Blue Top", "Rs. 500"),
                item("Sleeveless Dress", "Rs. 1,200"),
                item("Men Tshirt", "Rs. 300"),
            ];
            assert_eq!(expected_total(&items).unwrap(), Money::from_major(2000));
        }

        #[test]
        fn test_expected_total_of_nothing_is_zero() {
            assert_eq!(expected_total(&[]).unwrap(), Money::ZERO);
        }

        #[test]
        fn test_malformed_total_is_an_error_not_nan() {
            let items = vec![item("Blue Top", "Rs. 500"), item("Broken", "N/A")];
            let err = expected_total(&items).unwrap_err();
            assert!(matches!(err, CartwrightError::Money(_)));
        }

        #[test]
        fn test_total_out_of_range_is_an_error() {
            let huge = "Rs. 50,000,000,000,000,000";
            let items = vec![item("Blue Top", huge), item("Winter Top", huge)];
            let err = expected_total(&items).unwrap_err();
            assert!(matches!(
                err,
                CartwrightError::Money(MoneyParseError::Overflow { ref input }) if input == huge
            ));
        }

        #[test]
        fn test_name_matching_is_case_insensitive_substring() {
            let blue = item("Blue Top", "Rs. 500");
            assert!(blue.name_matches("top"));
            assert!(blue.name_matches("BLUE"));
            assert!(!blue.name_matches("dress"));
        }

        #[test]
        fn test_quantity_value() {
            assert_eq!(LineItem::new("x", "Rs. 1", " 4 ", "Rs. 4").quantity_value(), Some(4));
            assert_eq!(LineItem::new("x", "Rs. 1", "four", "Rs. 4").quantity_value(), None);
        }
    }

    mod table_tests {
        use super::*;

        fn surface_with_cart(names: &[&str]) -> (Arc<MockStorefront>, Surface<MockStorefront>) {
            let mock = Arc::new(MockStorefront::new());
            for name in names {
                mock.seed_cart_item(name, 1).unwrap();
            }
            let config = HarnessConfig::default().with_base_url(mock.base_url());
            (Arc::clone(&mock), Surface::new(mock, &config))
        }

        #[tokio::test(start_paused = true)]
        async fn test_extraction_matches_count() {
            for n in 0..=4 {
                let names = ["Blue Top", "Men Tshirt", "Sleeveless Dress", "Winter Top"];
                let (_, surface) = surface_with_cart(&names[..n]);
                surface.navigate("/view_cart").await.unwrap();
                let table = listing::table();
                assert_eq!(table.all(&surface).await.len(), table.count(&surface).await);
                assert_eq!(table.count(&surface).await, n);
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_row_fields_come_from_the_same_row() {
            let (_, surface) = surface_with_cart(&["Blue Top", "Stylish Dress"]);
            surface.navigate("/view_cart").await.unwrap();
            let items = listing::table().all(&surface).await;
            assert_eq!(items[0], LineItem::new("Blue Top", "Rs. 500", "1", "Rs. 500"));
            assert_eq!(
                items[1],
                LineItem::new("Stylish Dress", "Rs. 1,500", "1", "Rs. 1,500")
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_position_of_first_match_wins() {
            let (_, surface) = surface_with_cart(&["Men Tshirt", "Blue Top", "Winter Top"]);
            surface.navigate("/view_cart").await.unwrap();
            let table = listing::table();
            assert_eq!(table.position_of(&surface, "Top").await, Some(1));
            assert!(table.contains(&surface, "tshirt").await);
            assert_eq!(table.position_of(&surface, "DoesNotExist").await, None);
        }

        #[tokio::test(start_paused = true)]
        async fn test_expected_total_over_live_rows() {
            let (_, surface) = surface_with_cart(&["Blue Top", "Men Tshirt"]);
            surface.navigate("/view_cart").await.unwrap();
            assert_eq!(
                listing::table().expected_total(&surface).await.unwrap(),
                Money::from_major(900)
            );
        }
    }
}
