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
//! │  OUR SOLUTION: Integer Francs                                           │
//! │    The CFA franc carries no minor unit in daily trade, so every         │
//! │    amount in the system is a whole number of francs stored in an i64.   │
//! │    No cents, no decimals, no float drift.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aescompt_core::money::Money;
//!
//! let price = Money::from_francs(1500); // 1500 F
//! let total = price + Money::from_francs(500); // 2000 F
//! assert_eq!(total.francs(), 2000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole CFA francs.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for supplier balance
///   adjustments and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64,
///   serializes transparently as a bare JSON number
/// - **Derives**: Full serde support for the persisted collection documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole francs.
    ///
    /// ## Example
    /// ```rust
    /// use aescompt_core::money::Money;
    ///
    /// let price = Money::from_francs(2500);
    /// assert_eq!(price.francs(), 2500);
    /// ```
    #[inline]
    pub const fn from_francs(francs: i64) -> Self {
        Money(francs)
    }

    /// Returns the value in francs.
    #[inline]
    pub const fn francs(&self) -> i64 {
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

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// ## Where This Is Used
    /// Debt repayments: a customer may hand over more than they owe, and
    /// the remaining balance must never go below zero.
    ///
    /// ## Example
    /// ```rust
    /// use aescompt_core::money::Money;
    ///
    /// let remaining = Money::from_francs(300);
    /// let paid = Money::from_francs(500);
    /// assert_eq!(remaining.deduct_clamped(paid), Money::zero());
    /// ```
    #[inline]
    pub fn deduct_clamped(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in the local "1500 F" format.
///
/// ## Note
/// This is for audit details and debugging. UI display formatting
/// (thousands separators, localization) belongs to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} F", self.0)
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
