//! Fixed-point point amounts
//!
//! Points are integer minor units: one point is one cent of catalog price.
//! Every balance, order total and audit amount is held as `Points`; dollars
//! only appear at the API boundary as an exact 2-scale `Decimal`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Points per catalog dollar
pub const POINTS_PER_DOLLAR: i64 = 100;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(i64);

impl Points {
    pub const ZERO: Points = Points(0);

    pub const fn new(value: i64) -> Self {
        Points(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Convert a dollar price into points.
    ///
    /// Rejects prices with sub-cent precision instead of rounding them.
    pub fn from_dollars(dollars: Decimal) -> Result<Self, LedgerError> {
        let scaled = dollars
            .checked_mul(Decimal::from(POINTS_PER_DOLLAR))
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{} is out of range", dollars)))?;

        if !scaled.fract().is_zero() {
            return Err(LedgerError::InvalidAmount(format!(
                "{} has more than two decimal places",
                dollars
            )));
        }

        scaled
            .to_i64()
            .map(Points)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{} is out of range", dollars)))
    }

    /// Dollar value with exactly two decimal places
    pub fn to_dollars(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn checked_add(self, other: Points) -> Option<Points> {
        self.0.checked_add(other.0).map(Points)
    }

    pub fn checked_mul(self, quantity: i64) -> Option<Points> {
        self.0.checked_mul(quantity).map(Points)
    }

    pub fn checked_neg(self) -> Option<Points> {
        self.0.checked_neg().map(Points)
    }
}

impl std::fmt::Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_dollars_exact() {
        assert_eq!(Points::from_dollars(dec!(10.00)).unwrap(), Points::new(1000));
        assert_eq!(Points::from_dollars(dec!(19.99)).unwrap(), Points::new(1999));
        assert_eq!(Points::from_dollars(dec!(0)).unwrap(), Points::ZERO);
        assert_eq!(Points::from_dollars(dec!(0.5)).unwrap(), Points::new(50));
    }

    #[test]
    fn test_from_dollars_rejects_sub_cent_precision() {
        let result = Points::from_dollars(dec!(1.005));
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_from_dollars_rejects_overflow() {
        let result = Points::from_dollars(Decimal::MAX);
        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_to_dollars_has_two_decimal_places() {
        assert_eq!(Points::new(-1000).to_dollars(), dec!(-10.00));
        assert_eq!(Points::new(1999).to_dollars().to_string(), "19.99");
        assert_eq!(Points::new(500).to_dollars().to_string(), "5.00");
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Points::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    proptest! {
        #[test]
        fn prop_dollar_conversion_is_lossless(cents in -1_000_000_000i64..1_000_000_000i64) {
            let points = Points::new(cents);
            prop_assert_eq!(Points::from_dollars(points.to_dollars()).unwrap(), points);
        }
    }
}
