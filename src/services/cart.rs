//! Cart pricing in fixed-point points

use crate::error::LedgerError;
use crate::models::order::{CartItem, ProductId};
use crate::models::points::Points;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub points_per_item: Points,
    pub line_total: Points,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Points,
}

/// Validate a cart and price every line exactly.
///
/// Fails with `InvalidAmount` on an empty cart, a quantity below one, a
/// negative or sub-cent price, or a total that overflows.
pub fn price_cart(items: &[CartItem]) -> Result<PricedCart, LedgerError> {
    if items.is_empty() {
        return Err(LedgerError::InvalidAmount("cart is empty".to_string()));
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = Points::ZERO;

    for item in items {
        if item.quantity < 1 {
            return Err(LedgerError::InvalidAmount(format!(
                "quantity for product {} must be at least 1, got {}",
                item.product_id, item.quantity
            )));
        }
        if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
            return Err(LedgerError::InvalidAmount(format!(
                "price for product {} must not be negative",
                item.product_id
            )));
        }

        let points_per_item = Points::from_dollars(item.unit_price)?;
        let line_total = points_per_item
            .checked_mul(i64::from(item.quantity))
            .ok_or_else(|| overflow(&item.product_id))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| overflow(&item.product_id))?;

        lines.push(PricedLine {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            points_per_item,
            line_total,
        });
    }

    Ok(PricedCart { lines, total })
}

fn overflow(product_id: &ProductId) -> LedgerError {
    LedgerError::InvalidAmount(format!("cart total overflows at product {}", product_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(product: &str, price: Decimal, quantity: i32) -> CartItem {
        CartItem {
            product_id: ProductId(product.to_string()),
            unit_price: price,
            quantity,
        }
    }

    #[test]
    fn test_prices_lines_and_total() {
        let cart = price_cart(&[item("a", dec!(4.99), 3), item("b", dec!(0.02), 1)]).unwrap();

        assert_eq!(cart.lines[0].points_per_item, Points::new(499));
        assert_eq!(cart.lines[0].line_total, Points::new(1497));
        assert_eq!(cart.lines[1].line_total, Points::new(2));
        assert_eq!(cart.total, Points::new(1499));
    }

    #[test]
    fn test_free_items_are_allowed() {
        let cart = price_cart(&[item("sample", dec!(0.00), 2)]).unwrap();
        assert_eq!(cart.total, Points::ZERO);
    }

    #[test]
    fn test_rejects_empty_cart() {
        assert!(matches!(price_cart(&[]), Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let result = price_cart(&[item("a", dec!(1.00), 0)]);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = price_cart(&[item("a", dec!(-1.00), 1)]);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_sub_cent_price() {
        let result = price_cart(&[item("a", dec!(0.001), 1)]);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_overflowing_total() {
        let result = price_cart(&[
            item("a", Decimal::from(i64::MAX / 100), 1),
            item("b", Decimal::from(i64::MAX / 100), 1),
        ]);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    proptest! {
        // Summing priced lines never drifts from the exact cent arithmetic
        #[test]
        fn prop_total_is_exact_sum_of_cents(
            lines in prop::collection::vec((0i64..100_000, 1i32..50), 1..20)
        ) {
            let items: Vec<CartItem> = lines
                .iter()
                .enumerate()
                .map(|(i, (cents, qty))| item(&i.to_string(), Decimal::new(*cents, 2), *qty))
                .collect();

            let cart = price_cart(&items).unwrap();
            let expected: i64 = lines.iter().map(|(cents, qty)| cents * i64::from(*qty)).sum();

            prop_assert_eq!(cart.total, Points::new(expected));
            prop_assert_eq!(
                cart.total.to_dollars(),
                items.iter().map(|i| i.unit_price * Decimal::from(i.quantity)).sum::<Decimal>()
            );
        }
    }
}
