//! Value objects shared across the calculator.
//!
//! Monetary amounts are carried in cents to keep revenue arithmetic exact;
//! deltas against the revenue target are signed because a scenario can land
//! either short of or above the target.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    /// Use `checked_from_dollars` for non-panicking conversion.
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Creates a `Money` value from dollars with overflow checking
    #[must_use]
    pub const fn checked_from_dollars(dollars: u64) -> Option<Self> {
        match dollars.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two money amounts, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts two money amounts, saturating at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiplies money by a ticket quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a ticket quantity, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn saturating_multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Signed difference `self - other` as a [`RevenueDelta`]
    ///
    /// Saturates at `i64::MIN`/`i64::MAX` cents for amounts beyond the signed
    /// range.
    #[must_use]
    pub fn delta(self, other: Self) -> RevenueDelta {
        if self.0 >= other.0 {
            RevenueDelta(i64::try_from(self.0 - other.0).unwrap_or(i64::MAX))
        } else {
            RevenueDelta(i64::try_from(other.0 - self.0).map_or(i64::MIN, |d| -d))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

// ============================================================================
// Revenue Delta (signed shortfall/surplus vs a target)
// ============================================================================

/// Signed cents difference between projected or realized revenue and a target.
///
/// Negative values are a shortfall, positive values a surplus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevenueDelta(i64);

impl RevenueDelta {
    /// Creates a `RevenueDelta` from signed cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the signed amount in cents
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// True when the delta is a shortfall (below target)
    #[must_use]
    pub const fn is_shortfall(&self) -> bool {
        self.0 < 0
    }

    /// True when the delta is zero (exactly on target)
    #[must_use]
    pub const fn is_on_target(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RevenueDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${}.{:02}", magnitude / 100, magnitude % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_dollars() {
        assert_eq!(Money::from_dollars(500).cents(), 50_000);
        assert_eq!(Money::from_dollars(500).dollars(), 500);
    }

    #[test]
    fn test_money_saturating_sub_floors_at_zero() {
        let a = Money::from_cents(100);
        let b = Money::from_cents(250);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a), Money::from_cents(150));
    }

    #[test]
    fn test_money_multiply() {
        let price = Money::from_dollars(550);
        assert_eq!(price.checked_multiply(3).unwrap(), Money::from_dollars(1650));
    }

    #[test]
    fn test_delta_signs() {
        let projected = Money::from_dollars(90_000);
        let target = Money::from_dollars(100_000);
        let delta = projected.delta(target);
        assert!(delta.is_shortfall());
        assert_eq!(delta.cents(), -1_000_000);
        assert!(target.delta(target).is_on_target());
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Money::from_cents(123_456).to_string(), "$1234.56");
        assert_eq!(RevenueDelta::from_cents(-50).to_string(), "-$0.50");
        assert_eq!(RevenueDelta::from_cents(205).to_string(), "$2.05");
    }
}
