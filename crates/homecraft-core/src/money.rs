//! # Money Module
//!
//! Provides the `Money` type for catalog prices and cart totals.
//!
//! ## Why Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The backend sends rupees as plain JSON numbers, sometimes fractional: │
//! │    { "price": 12000 }  →  ₹12,000                                       │
//! │    { "price": 49.5 }   →  ₹49.50                                        │
//! │                                                                         │
//! │  OUR SOLUTION: store paise (1/100 rupee) as i64                        │
//! │    Wire values are rounded to the nearest paisa once, at decode time   │
//! │    Subtotals are exact sums of quantity × unit price                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use homecraft_core::money::Money;
//!
//! let price = Money::new(12000);
//! let line = price * 3;
//!
//! assert_eq!(line.paise(), 3_600_000);
//! assert_eq!(line.to_string(), "₹36,000");
//! assert_eq!(Money::from_major_minor(49, 50).to_string(), "₹49.50");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Display symbol used when no other is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 paise**: fractional rupee prices stay exact after decode
/// - **i64 (signed)**: differences (discounts, refunds) stay representable
/// - **Rupees on the wire**: whole amounts serialize as integers
///   (`12000`), fractional ones as decimals (`49.5`)
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► CartItem.price ──► line total (price × qty)      │
/// │                  │                                                      │
/// │                  └──► Displayed as "₹12,000" in the catalog             │
/// │                                                                         │
/// │  Cart.subtotal ──► OrderRequest.itemsPrice / totalPrice                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn new(rupees: i64) -> Self {
        Money(rupees.saturating_mul(100))
    }

    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// For negative amounts only `rupees` carries the sign:
    /// `from_major_minor(-5, 50)` is -₹5.50.
    #[inline]
    pub const fn from_major_minor(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Whole rupees, truncated toward zero.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// The paise left over after whole rupees (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, saturating instead of overflowing.
    #[inline]
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Formats the amount with the given symbol and Indian digit grouping.
    ///
    /// ## Grouping
    /// The last three digits form one group, every earlier group has two:
    /// ```text
    ///   999       →  ₹999
    ///   12000     →  ₹12,000
    ///   123456    →  ₹1,23,456
    ///   12345678  →  ₹1,23,45,678
    /// ```
    ///
    /// Paise are shown only when non-zero: `₹49.50`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = (self.0.unsigned_abs() / 100).to_string();
        match self.0.unsigned_abs() % 100 {
            0 => format!("{}{}{}", sign, symbol, group_indian(&digits)),
            paise => format!("{}{}{}.{:02}", sign, symbol, group_indian(&digits), paise),
        }
    }
}

/// Inserts Indian-style thousands separators into a run of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_CURRENCY_SYMBOL))
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl From<i64> for Money {
    fn from(rupees: i64) -> Self {
        Money::new(rupees)
    }
}

// =============================================================================
// Serde (rupees as a JSON number)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RupeeVisitor)
    }
}

struct RupeeVisitor;

impl<'de> Visitor<'de> for RupeeVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in rupees")
    }

    fn visit_i64<E: de::Error>(self, rupees: i64) -> Result<Money, E> {
        rupees
            .checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, rupees: u64) -> Result<Money, E> {
        let rupees = i64::try_from(rupees).map_err(|_| E::custom("amount out of range"))?;
        self.visit_i64(rupees)
    }

    /// Rounds to the nearest paisa.
    fn visit_f64<E: de::Error>(self, rupees: f64) -> Result<Money, E> {
        let paise = (rupees * 100.0).round();
        if !paise.is_finite() || paise.abs() >= i64::MAX as f64 {
            return Err(E::custom("amount out of range"));
        }
        Ok(Money(paise as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(Money::new(0).to_string(), "₹0");
        assert_eq!(Money::new(999).to_string(), "₹999");
        assert_eq!(Money::new(1000).to_string(), "₹1,000");
        assert_eq!(Money::new(12000).to_string(), "₹12,000");
        assert_eq!(Money::new(123456).to_string(), "₹1,23,456");
        assert_eq!(Money::new(12345678).to_string(), "₹1,23,45,678");
    }

    #[test]
    fn test_negative_and_custom_symbol() {
        assert_eq!(Money::new(-1500).to_string(), "-₹1,500");
        assert_eq!(Money::new(2500).format_with("Rs. "), "Rs. 2,500");
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::new(450);
        assert_eq!(price * 3, Money::new(1350));
        assert_eq!(price + Money::new(50), Money::new(500));
        assert_eq!(price - Money::new(50), Money::new(400));

        let total: Money = [Money::new(1), Money::new(2), Money::new(3)].iter().sum();
        assert_eq!(total, Money::new(6));
    }

    #[test]
    fn test_multiplication_saturates() {
        assert_eq!(Money::new(i64::MAX) * 2, Money::new(i64::MAX));
    }

    #[test]
    fn test_fractional_display() {
        assert_eq!(Money::from_major_minor(49, 50).to_string(), "₹49.50");
        assert_eq!(Money::from_paise(123_456_705).to_string(), "₹12,34,567.05");
        assert_eq!(Money::from_major_minor(-5, 50).to_string(), "-₹5.50");
        assert_eq!(Money::from_major_minor(-5, 50).paise_part(), 50);
    }

    #[test]
    fn test_serde_whole_rupees() {
        let json = serde_json::to_string(&Money::new(12000)).unwrap();
        assert_eq!(json, "12000");

        let parsed: Money = serde_json::from_str("499").unwrap();
        assert_eq!(parsed, Money::new(499));
    }

    #[test]
    fn test_serde_fractional_rupees() {
        let parsed: Money = serde_json::from_str("49.5").unwrap();
        assert_eq!(parsed.paise(), 4950);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "49.5");

        // Sub-paisa noise is rounded once, at decode.
        let parsed: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(parsed.paise(), 10);
        let parsed: Money = serde_json::from_str("19.999").unwrap();
        assert_eq!(parsed, Money::new(20));
    }

    #[test]
    fn test_serde_rejects_non_numbers() {
        assert!(serde_json::from_str::<Money>("\"12000\"").is_err());
        assert!(serde_json::from_str::<Money>("null").is_err());
    }
}
