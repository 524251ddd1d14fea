//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API reports prices as plain JSON numbers in Brazilian reais, so
//! `Price` serializes as a number and formats itself the way the storefront
//! shows money (`R$ 1.234,56`).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates at the representable bounds.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self * quantity
    }

    /// Format for display, e.g. `R$ 1.234,56`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        format!("{sign}R$ {grouped},{cents}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

// Catalog prices are only bounded by what `Decimal` can hold, so totals
// saturate instead of panicking.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_brl() {
        assert_eq!(Price::from_cents(17990).display(), "R$ 179,90");
        assert_eq!(Price::from_cents(123_456).display(), "R$ 1.234,56");
        assert_eq!(Price::from_cents(100_000_000).display(), "R$ 1.000.000,00");
        assert_eq!(Price::ZERO.display(), "R$ 0,00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(1_005, 3)); // 1.005
        assert_eq!(price.display(), "R$ 1,01");
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::from_cents(17990);
        assert_eq!(serde_json::to_string(&price).unwrap(), "179.9");

        let parsed: Price = serde_json::from_str("139.9").unwrap();
        assert_eq!(parsed, Price::from_cents(13990));
    }

    #[test]
    fn test_arithmetic() {
        let unit = Price::from_cents(1050);
        assert_eq!(unit.times(3), Price::from_cents(3150));
        let total: Price = [unit, Price::from_cents(50)].into_iter().sum();
        assert_eq!(total, Price::from_cents(1100));
    }

    #[test]
    fn test_arithmetic_saturates_near_decimal_max() {
        let huge = Price::new(Decimal::MAX - Decimal::ONE);
        assert_eq!(huge.times(2), Price::new(Decimal::MAX));
        assert_eq!(huge + huge, Price::new(Decimal::MAX));

        let total: Price = [huge, Price::from_cents(100), huge].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));
        assert!(total.display().starts_with("R$ 79.228.162"));
    }
}
