//! Numeric helpers shared across the workspace.
//!
//! Prices on this venue live in [0, 100]. Malformed prices are clamped,
//! never rejected.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Lower bound of the tradable price range.
pub const MIN_PRICE: Decimal = Decimal::ZERO;

/// Upper bound of the tradable price range.
pub const MAX_PRICE: Decimal = dec!(100);

/// Clamp a price into the venue's [0, 100] range.
#[inline]
pub fn clamp_price(price: Decimal) -> Decimal {
    price.clamp(MIN_PRICE, MAX_PRICE)
}

/// Convert Decimal to f64 for model math.
#[inline]
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Convert f64 back to Decimal after model math.
#[inline]
pub fn f64_to_decimal(f: f64) -> Decimal {
    Decimal::from_f64(f).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_price_in_range() {
        assert_eq!(clamp_price(dec!(42.5)), dec!(42.5));
    }

    #[test]
    fn test_clamp_price_negative() {
        assert_eq!(clamp_price(dec!(-3)), Decimal::ZERO);
    }

    #[test]
    fn test_clamp_price_above_max() {
        assert_eq!(clamp_price(dec!(250)), dec!(100));
    }

    #[test]
    fn test_f64_round_trip() {
        let d = f64_to_decimal(0.25);
        assert_eq!(d, dec!(0.25));
        assert_eq!(decimal_to_f64(d), 0.25);
    }
}
