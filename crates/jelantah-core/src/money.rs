//! # Money Module
//!
//! Provides the `Rupiah` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupiah                                           │
//! │    The rupiah has no circulating subunit, so every amount in the        │
//! │    system (rates, fees, bill totals) is a whole i64 rupiah value.       │
//! │    liters × rate is exact integer arithmetic, always.                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use jelantah_core::money::Rupiah;
//!
//! // Create from whole rupiah (the only constructor)
//! let rate = Rupiah::from_rupiah(6000);
//!
//! // Arithmetic operations
//! let total = rate * 30;                       // Rp180.000
//! assert_eq!(total.amount(), 180_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Rupiah Type
// =============================================================================

/// Represents a monetary value in whole Indonesian rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and net math
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Rupiah is Used                                 │
/// │                                                                         │
/// │  RateSchedule rates ──► Bill.total ──► Summary revenue / fee rollups   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rupiah(i64);

impl Rupiah {
    /// Creates a Rupiah value from a whole-rupiah amount.
    ///
    /// ## Example
    /// ```rust
    /// use jelantah_core::money::Rupiah;
    ///
    /// let fee = Rupiah::from_rupiah(750);
    /// assert_eq!(fee.amount(), 750);
    /// ```
    #[inline]
    pub const fn from_rupiah(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Returns the whole-rupiah amount.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Rupiah(0)
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

    /// Multiplies a per-liter rate by a liter count.
    ///
    /// ## Example
    /// ```rust
    /// use jelantah_core::money::Rupiah;
    ///
    /// let rate = Rupiah::from_rupiah(200);
    /// assert_eq!(rate.for_liters(30).amount(), 6000);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Pickup completed: 30L actual
    ///      │
    ///      ▼
    /// referral rate Rp200 ── for_liters(30) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Referral bill total: Rp6.000
    /// ```
    #[inline]
    pub const fn for_liters(&self, liters: i64) -> Self {
        Rupiah(self.0 * liters)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows rupiah with Indonesian dot grouping.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}Rp{}", sign, grouped)
    }
}

/// Default rupiah is zero.
impl Default for Rupiah {
    fn default() -> Self {
        Rupiah::zero()
    }
}

/// Addition of two Rupiah values.
impl Add for Rupiah {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Rupiah(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Rupiah {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Rupiah values.
impl Sub for Rupiah {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Rupiah(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Rupiah {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for liter counts).
impl Mul<i64> for Rupiah {
    type Output = Self;

    #[inline]
    fn mul(self, liters: i64) -> Self {
        Rupiah(self.0 * liters)
    }
}

/// Summation over bill totals (summary rollups).
impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Rupiah::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Rupiah::from_rupiah(6000);
        assert_eq!(money.amount(), 6000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Rupiah::from_rupiah(6000)), "Rp6.000");
        assert_eq!(format!("{}", Rupiah::from_rupiah(180_000)), "Rp180.000");
        assert_eq!(format!("{}", Rupiah::from_rupiah(750)), "Rp750");
        assert_eq!(format!("{}", Rupiah::from_rupiah(-1500)), "-Rp1.500");
        assert_eq!(format!("{}", Rupiah::from_rupiah(0)), "Rp0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Rupiah::from_rupiah(6000);
        let b = Rupiah::from_rupiah(750);

        assert_eq!((a + b).amount(), 6750);
        assert_eq!((a - b).amount(), 5250);
        let result: Rupiah = a * 30;
        assert_eq!(result.amount(), 180_000);
    }

    #[test]
    fn test_for_liters() {
        // The bill formula: rate × liters, exact integer arithmetic
        let rate = Rupiah::from_rupiah(750);
        assert_eq!(rate.for_liters(30).amount(), 22_500);
        assert_eq!(rate.for_liters(0).amount(), 0);
    }

    #[test]
    fn test_sum() {
        let bills = [
            Rupiah::from_rupiah(180_000),
            Rupiah::from_rupiah(22_500),
            Rupiah::from_rupiah(6000),
        ];
        let total: Rupiah = bills.into_iter().sum();
        assert_eq!(total.amount(), 208_500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Rupiah::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Rupiah::from_rupiah(100);
        assert!(positive.is_positive());

        let negative = Rupiah::from_rupiah(-100);
        assert!(negative.is_negative());
    }
}
