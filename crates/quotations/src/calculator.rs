//! Quotation totals.
//!
//! Pure arithmetic with no rounding. Negative inputs are not rejected here and
//! simply propagate; rounding to cents only happens when a value is shown
//! (see [`format_amount`]).

use serde::{Deserialize, Serialize};

use crate::model::QuotationItem;

pub fn item_total(quantity: i64, unit_price: f64) -> f64 {
    quantity as f64 * unit_price
}

/// Sum of line totals; `0.0` for no lines.
pub fn subtotal(items: &[QuotationItem]) -> f64 {
    items
        .iter()
        .fold(0.0, |acc, item| acc + item_total(item.quantity, item.unit_price))
}

pub fn grand_total(subtotal: f64, tax_percent: f64, discount_percent: f64) -> f64 {
    let tax = subtotal * tax_percent / 100.0;
    let discount = subtotal * discount_percent / 100.0;
    subtotal + tax - discount
}

/// All derived amounts of a quotation at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub grand_total: f64,
}

impl Totals {
    pub fn compute(items: &[QuotationItem], tax_percent: f64, discount_percent: f64) -> Self {
        let subtotal = subtotal(items);
        Self {
            subtotal,
            tax_amount: subtotal * tax_percent / 100.0,
            discount_amount: subtotal * discount_percent / 100.0,
            grand_total: grand_total(subtotal, tax_percent, discount_percent),
        }
    }
}

/// Two-decimal presentation of an amount.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(quantity: i64, unit_price: f64) -> QuotationItem {
        QuotationItem::new("1", "line", quantity, unit_price)
    }

    #[test]
    fn empty_items_have_zero_subtotal() {
        assert_eq!(subtotal(&[]), 0.0);
        assert_eq!(Totals::compute(&[], 10.0, 5.0).grand_total, 0.0);
    }

    #[test]
    fn tax_and_discount_apply_to_subtotal() {
        let total = grand_total(100.0, 10.0, 5.0);
        assert_eq!(total, 105.0);
        assert_eq!(format_amount(total), "105.00");
    }

    #[test]
    fn totals_bundle_is_consistent() {
        let items = vec![item(2, 50.0), item(1, 25.0)];
        let totals = Totals::compute(&items, 20.0, 10.0);
        assert_eq!(totals.subtotal, 125.0);
        assert_eq!(totals.tax_amount, 25.0);
        assert_eq!(totals.discount_amount, 12.5);
        assert_eq!(totals.grand_total, 137.5);
    }

    #[test]
    fn negative_values_propagate() {
        assert_eq!(item_total(-2, 10.0), -20.0);
        assert_eq!(subtotal(&[item(-2, 10.0), item(1, 5.0)]), -15.0);
    }

    #[test]
    fn no_internal_rounding() {
        let total = grand_total(10.0, 33.0, 0.0);
        assert!((total - 13.3).abs() < 1e-12);
        assert_eq!(format_amount(13.456), "13.46");
        assert_eq!(format_amount(subtotal(&[])), "0.00");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: subtotal is the sum of quantity * unit price over all lines.
        #[test]
        fn subtotal_is_sum_of_lines(
            lines in prop::collection::vec((0i64..1_000, 0u32..1_000_000), 0..20)
        ) {
            let items: Vec<QuotationItem> = lines
                .iter()
                .map(|(q, cents)| item(*q, *cents as f64 / 100.0))
                .collect();

            let mut expected = 0.0;
            for (q, cents) in &lines {
                expected += *q as f64 * (*cents as f64 / 100.0);
            }

            prop_assert_eq!(subtotal(&items), expected);
        }

        /// Property: grand total equals subtotal * (1 + tax/100 - discount/100).
        #[test]
        fn grand_total_matches_closed_form(
            sub in 0.0f64..1_000_000.0,
            tax in 0.0f64..100.0,
            discount in 0.0f64..100.0,
        ) {
            let expected = sub * (1.0 + tax / 100.0 - discount / 100.0);
            let actual = grand_total(sub, tax, discount);
            prop_assert!((actual - expected).abs() <= 1e-6 * sub.max(1.0));
        }
    }
}
