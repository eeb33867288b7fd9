//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart of scanned items sums prices on every refresh; float error     │
//! │  would compound with every add/remove.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centimes                                         │
//! │    100.00 DA = 10000 centimes, 30.00 DA = 3000 centimes                │
//! │    Totals are exact integer sums; only display formats decimals.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanline_core::money::Money;
//!
//! // Create from centimes (preferred)
//! let coffee = Money::from_centimes(10_000); // 100.00 DA
//! let water = Money::from_centimes(3_000);   //  30.00 DA
//!
//! let total = coffee + water;
//! assert_eq!(total.centimes(), 13_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centimes for DZD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediate values (refund math)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centimes (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use scanline_core::money::Money;
    ///
    /// let price = Money::from_centimes(10_000); // 100.00 DA
    /// assert_eq!(price.centimes(), 10_000);
    /// ```
    #[inline]
    pub const fn from_centimes(centimes: i64) -> Self {
        Money(centimes)
    }

    /// Creates a Money value from major and minor units (dinars and centimes).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -5.50 DA, not -4.50 DA.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centimes.
    #[inline]
    pub const fn centimes(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dinars) portion.
    #[inline]
    pub const fn dinars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
    #[inline]
    pub const fn centimes_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the debug/CLI format ("230.00 DA"). The kiosk configuration
/// layer owns locale-aware formatting for anything user-facing.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} DA",
            sign,
            self.dinars().abs(),
            self.centimes_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summation over iterators of Money (cart totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centimes() {
        let money = Money::from_centimes(10_099);
        assert_eq!(money.centimes(), 10_099);
        assert_eq!(money.dinars(), 100);
        assert_eq!(money.centimes_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(100, 0);
        assert_eq!(money.centimes(), 10_000);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.centimes(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_centimes(10_000)), "100.00 DA");
        assert_eq!(format!("{}", Money::from_centimes(3_000)), "30.00 DA");
        assert_eq!(format!("{}", Money::from_centimes(-550)), "-5.50 DA");
        assert_eq!(format!("{}", Money::from_centimes(0)), "0.00 DA");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centimes(10_000);
        let b = Money::from_centimes(3_000);

        assert_eq!((a + b).centimes(), 13_000);
        assert_eq!((a - b).centimes(), 7_000);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.centimes(), 13_000);
    }

    #[test]
    fn test_sum() {
        let prices = vec![
            Money::from_centimes(10_000),
            Money::from_centimes(3_000),
            Money::from_centimes(10_000),
        ];
        let total: Money = prices.iter().sum();
        // 100 + 30 + 100 = 230 DA
        assert_eq!(total.centimes(), 23_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_centimes(100);
        assert!(positive.is_positive());

        let negative = Money::from_centimes(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().centimes(), 100);
    }
}
