//! Event configuration for the allocation calculator.
//!
//! The configuration is immutable after construction: [`TicketAllocator::new`]
//! validates it once and the calculator never mutates it afterwards.
//!
//! Positional correspondence matters: `tiers`, `allocation_percentages` and
//! every batch-sales slice passed to the calculator line up by index.
//!
//! [`TicketAllocator::new`]: crate::TicketAllocator::new

use crate::error::ConfigError;
use crate::types::Money;
use serde::{Deserialize, Serialize};

/// Tolerated range for the percentage sum, absorbing rounding in caller input.
const PERCENTAGE_SUM_TOLERANCE: (f64, f64) = (99.0, 101.0);

/// Immutable event configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Target total revenue for the event
    pub desired_total_value: Money,
    /// Total expected participants across the whole event
    pub total_participants: u32,
    /// Baseline cost used in scenario revenue projections
    pub cost_per_participant: Money,
    /// Inclusive lower bound on expected non-paying participants
    pub non_paying_lower: u32,
    /// Inclusive upper bound on expected non-paying participants
    pub non_paying_upper: u32,
    /// Ordered ticket prices, cheapest tier conventionally first
    pub tiers: Vec<Money>,
    /// Planned percentage split across tiers, same order as `tiers`
    pub allocation_percentages: Vec<f64>,
    /// Tickets planned for the first batch
    pub first_batch_total: u32,
    /// Planned number of batches
    pub num_batches: u32,
}

/// Paying-participant counts at the edges and midpoint of the non-paying range.
///
/// Fewer non-payers means more paying participants, so the best case pairs
/// with `non_paying_lower`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayingBounds {
    /// Paying participants when non-payers hit the lower bound
    pub best: u32,
    /// Paying participants at the midpoint of the non-paying range
    pub midpoint: f64,
    /// Paying participants when non-payers hit the upper bound
    pub worst: u32,
}

impl AllocatorConfig {
    /// Checks every construction invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ConfigError`]: empty or
    /// mismatched tier/percentage lists, zero prices or counts, percentages
    /// outside `[0, 100]` or summing outside `[99, 101]`, inverted or
    /// oversized non-paying bounds, or a first batch larger than the
    /// participant pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::EmptyTiers);
        }
        if self.tiers.len() != self.allocation_percentages.len() {
            return Err(ConfigError::LengthMismatch {
                tiers: self.tiers.len(),
                percentages: self.allocation_percentages.len(),
            });
        }
        if let Some(index) = self.tiers.iter().position(Money::is_zero) {
            return Err(ConfigError::ZeroTierPrice { index });
        }
        if self.desired_total_value.is_zero() {
            return Err(ConfigError::ZeroDesiredValue);
        }
        if self.cost_per_participant.is_zero() {
            return Err(ConfigError::ZeroCostPerParticipant);
        }
        if self.total_participants == 0 {
            return Err(ConfigError::ZeroParticipants);
        }
        if self.num_batches == 0 {
            return Err(ConfigError::ZeroBatches);
        }
        for (index, &value) in self.allocation_percentages.iter().enumerate() {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::PercentageOutOfRange { index, value });
            }
        }
        let sum: f64 = self.allocation_percentages.iter().sum();
        if !(PERCENTAGE_SUM_TOLERANCE.0..=PERCENTAGE_SUM_TOLERANCE.1).contains(&sum) {
            return Err(ConfigError::PercentageSum { sum });
        }
        if self.non_paying_lower > self.non_paying_upper {
            return Err(ConfigError::NonPayingBoundsInverted {
                lower: self.non_paying_lower,
                upper: self.non_paying_upper,
            });
        }
        if self.non_paying_upper > self.total_participants {
            return Err(ConfigError::NonPayingExceedsParticipants {
                upper: self.non_paying_upper,
                total_participants: self.total_participants,
            });
        }
        if self.first_batch_total > self.total_participants {
            return Err(ConfigError::FirstBatchExceedsParticipants {
                first_batch_total: self.first_batch_total,
                total_participants: self.total_participants,
            });
        }
        Ok(())
    }

    /// Paying-participant counts at the best case, midpoint and worst case of
    /// the non-paying range.
    #[must_use]
    pub fn paying_bounds(&self) -> PayingBounds {
        let midpoint_non_paying =
            (f64::from(self.non_paying_lower) + f64::from(self.non_paying_upper)) / 2.0;
        PayingBounds {
            best: self.total_participants - self.non_paying_lower,
            midpoint: f64::from(self.total_participants) - midpoint_non_paying,
            worst: self.total_participants - self.non_paying_upper,
        }
    }

    /// Number of price tiers
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_config() -> AllocatorConfig {
        AllocatorConfig {
            desired_total_value: Money::from_dollars(60_000_000),
            total_participants: 80_000,
            cost_per_participant: Money::from_dollars(750),
            non_paying_lower: 10_000,
            non_paying_upper: 20_000,
            tiers: vec![
                Money::from_dollars(550),
                Money::from_dollars(750),
                Money::from_dollars(1_000),
                Money::from_dollars(1_250),
            ],
            allocation_percentages: vec![40.0, 30.0, 20.0, 10.0],
            first_batch_total: 20_000,
            num_batches: 4,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = base_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.tier_count(), 4);
    }

    #[test]
    fn test_percentage_sum_tolerance() {
        let mut config = base_config();
        config.allocation_percentages = vec![40.0, 30.0, 20.0, 9.5];
        // 99.5 is inside the tolerance window
        assert!(config.validate().is_ok());

        config.allocation_percentages = vec![40.0, 30.0, 20.0, 5.0];
        assert_eq!(
            config.validate(),
            Err(ConfigError::PercentageSum { sum: 95.0 })
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut config = base_config();
        config.allocation_percentages = vec![50.0, 50.0];
        assert_eq!(
            config.validate(),
            Err(ConfigError::LengthMismatch {
                tiers: 4,
                percentages: 2
            })
        );
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = base_config();
        config.non_paying_lower = 30_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPayingBoundsInverted {
                lower: 30_000,
                upper: 20_000
            })
        );
    }

    #[test]
    fn test_oversized_first_batch_rejected() {
        let mut config = base_config();
        config.first_batch_total = 100_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::FirstBatchExceedsParticipants {
                first_batch_total: 100_000,
                total_participants: 80_000
            })
        );
    }

    #[test]
    fn test_paying_bounds() {
        let bounds = base_config().paying_bounds();
        assert_eq!(bounds.best, 70_000);
        assert_eq!(bounds.worst, 60_000);
        assert!((bounds.midpoint - 65_000.0).abs() < f64::EPSILON);
    }
}
