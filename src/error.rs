//! Error types for the allocation calculator

use crate::types::Money;
use thiserror::Error;

/// Errors that can occur when validating an [`AllocatorConfig`](crate::AllocatorConfig)
///
/// All variants are fatal to construction: no partially-constructed
/// calculator is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Allocation percentages do not sum to ~100
    #[error("allocation percentages sum to {sum:.2}, expected 100 (tolerance [99, 101])")]
    PercentageSum {
        /// Actual sum of the supplied percentages
        sum: f64,
    },

    /// Tier and percentage lists have different lengths
    #[error("tier count {tiers} does not match percentage count {percentages}")]
    LengthMismatch {
        /// Number of tier prices supplied
        tiers: usize,
        /// Number of allocation percentages supplied
        percentages: usize,
    },

    /// No tiers were supplied
    #[error("at least one ticket tier is required")]
    EmptyTiers,

    /// A tier price is zero
    #[error("tier {index} has a zero price")]
    ZeroTierPrice {
        /// Position of the offending tier
        index: usize,
    },

    /// A percentage falls outside [0, 100]
    #[error("allocation percentage {value} at position {index} is outside [0, 100]")]
    PercentageOutOfRange {
        /// Position of the offending percentage
        index: usize,
        /// The out-of-range value
        value: f64,
    },

    /// Non-paying lower bound exceeds the upper bound
    #[error("non-paying lower bound {lower} exceeds upper bound {upper}")]
    NonPayingBoundsInverted {
        /// Supplied lower bound
        lower: u32,
        /// Supplied upper bound
        upper: u32,
    },

    /// Non-paying upper bound exceeds total participants
    #[error("non-paying upper bound {upper} exceeds total participants {total_participants}")]
    NonPayingExceedsParticipants {
        /// Supplied upper bound
        upper: u32,
        /// Total expected participants
        total_participants: u32,
    },

    /// First batch is larger than the whole participant pool
    #[error("first batch total {first_batch_total} exceeds total participants {total_participants}")]
    FirstBatchExceedsParticipants {
        /// Tickets planned for the first batch
        first_batch_total: u32,
        /// Total expected participants
        total_participants: u32,
    },

    /// Desired total value must be positive
    #[error("desired total value must be positive")]
    ZeroDesiredValue,

    /// Cost per participant must be positive
    #[error("cost per participant must be positive")]
    ZeroCostPerParticipant,

    /// Total participants must be positive
    #[error("total participants must be positive")]
    ZeroParticipants,

    /// Planned batch count must be positive
    #[error("planned batch count must be positive")]
    ZeroBatches,
}

/// Errors that can occur when restoring a serialized calculator
///
/// Deserialization re-checks every state invariant, so a calculator can only
/// ever exist in a state reachable through its own operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// The embedded configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A state vector's length differs from the tier count
    #[error("state vector has {actual} entries, expected one per tier ({expected})")]
    LengthMismatch {
        /// Number of tiers in the configuration
        expected: usize,
        /// Number of entries found
        actual: usize,
    },

    /// A tier's sold count exceeds its allocation
    #[error("tier at {tier_price} has {sold} sold but only {allocated} allocated")]
    SoldExceedsAllocation {
        /// Price of the offending tier
        tier_price: Money,
        /// Stored cumulative sold count
        sold: u32,
        /// Stored allocation for the tier
        allocated: u32,
    },

    /// Stored cumulative revenue disagrees with the sold counts and prices
    #[error("stored cumulative revenue {stored} does not match {computed} computed from sales")]
    RevenueMismatch {
        /// Revenue carried in the serialized state
        stored: Money,
        /// Revenue recomputed from sold counts and tier prices
        computed: Money,
    },

    /// The batch counter disagrees with the sales history
    #[error("batches_recorded is {counter} but the history holds {history} batches")]
    BatchCountMismatch {
        /// Stored batch counter
        counter: u32,
        /// Number of records in the sales history
        history: usize,
    },
}

/// Errors that can occur when recording a sales batch or applying a suggestion
///
/// Every variant is fatal to the call and leaves the calculator state
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Sales slice length differs from the tier count
    #[error("batch has {actual} tier entries, expected {expected}")]
    LengthMismatch {
        /// Number of tiers in the configuration
        expected: usize,
        /// Number of entries in the supplied slice
        actual: usize,
    },

    /// A tier's sold count exceeds its remaining allocation
    #[error(
        "tier at {tier_price} oversold: {sold} sold with only {remaining} remaining (excess {excess})"
    )]
    Overallocation {
        /// Price of the offending tier
        tier_price: Money,
        /// Tickets reported sold in this batch
        sold: u32,
        /// Tickets still allocatable for the tier
        remaining: u32,
        /// How far the batch overshoots the remaining allocation
        excess: u32,
    },
}
