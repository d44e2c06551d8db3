//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing discounted doubles:                                            │
//! │    99.99 × 0.85 × 3 = 254.97449999999998                               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Keep price × (100 - discount) × quantity exact, in hundredths of a   │
//! │    cent, and round half-up once:                                        │
//! │    9999 × 85 × 3 = 2549745 → 25497 cents, every time                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use flash_core::money::Money;
//!
//! let price = Money::from_cents(10000); // $100.00
//! let sale = price.apply_percentage_discount(25);
//! assert_eq!(sale.cents(), 7500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► discounted_hundredths(d, qty) ──► CartLine (exact)
///                                                               │
///                          Cart.total ◄── from_hundredths ◄──────┘ (Σ, rounded once)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use flash_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Applies a whole-percent discount and returns the discounted amount,
    /// rounded half-up to the cent.
    ///
    /// Percentages are not range-checked: 0 leaves the price unchanged and
    /// values above 100 yield a negative price.
    ///
    /// ## Example
    /// ```rust
    /// use flash_core::money::Money;
    ///
    /// let price = Money::from_cents(20000); // $200.00
    /// assert_eq!(price.apply_percentage_discount(25).cents(), 15000);
    ///
    /// // $9.99 at 15% off: $8.4915 → $8.49
    /// assert_eq!(Money::from_cents(999).apply_percentage_discount(15).cents(), 849);
    /// ```
    pub fn apply_percentage_discount(&self, percent: u32) -> Money {
        Money::from_hundredths(self.discounted_hundredths(percent, 1))
    }

    /// Exact `self × (100 - percent) × quantity`, in hundredths of a cent.
    ///
    /// Nothing is rounded here, so these can be summed across cart lines
    /// and rounded once with [`Money::from_hundredths`].
    pub fn discounted_hundredths(&self, percent: u32, quantity: u32) -> i128 {
        i128::from(self.0)
            .saturating_mul(100 - i128::from(percent))
            .saturating_mul(i128::from(quantity))
    }

    /// Rounds an amount in hundredths of a cent half-up to whole cents,
    /// clamping to the representable range.
    pub fn from_hundredths(hundredths: i128) -> Money {
        let cents = hundredths.saturating_add(50).div_euclid(100);
        let clamped = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
        // Lossless after the clamp.
        Money(clamped as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$12.34`. The shell uses `AppConfig::format_currency`
/// when a different symbol is configured.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the `i64` bounds.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Multiplication by a cart quantity. Saturates at the `i64` bounds.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(qty)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
