//! # Tierplan
//!
//! Tiered-pricing ticket allocation and revenue tracking for event sales
//! planning.
//!
//! The crate is a single in-memory calculator: a fixed ticket inventory is
//! split across price tiers, sales arrive in discrete batches, and the
//! calculator recomputes suggested allocations for future batches from
//! observed sell-through and a revenue target.
//!
//! ## Example
//!
//! ```
//! use tierplan::{AllocatorConfig, Money, TicketAllocator};
//!
//! let config = AllocatorConfig {
//!     desired_total_value: Money::from_dollars(100_000),
//!     total_participants: 200,
//!     cost_per_participant: Money::from_dollars(500),
//!     non_paying_lower: 0,
//!     non_paying_upper: 200,
//!     tiers: vec![Money::from_dollars(500), Money::from_dollars(1_000)],
//!     allocation_percentages: vec![60.0, 40.0],
//!     first_batch_total: 100,
//!     num_batches: 2,
//! };
//!
//! let mut allocator = TicketAllocator::new(config)?;
//!
//! // Project revenue across the non-paying participant range.
//! for scenario in allocator.compute_scenarios(100) {
//!     println!("{} non-payers -> {}", scenario.non_paying, scenario.projected_revenue);
//! }
//!
//! // Record sales, then ask for a redistribution of what's left.
//! allocator.add_batch(&[45, 30])?;
//! let suggestion = allocator.suggest_next_allocation();
//! allocator.apply_suggestion(&suggestion)?;
//!
//! println!("{}", allocator.report());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Design
//!
//! - No concurrency, no I/O, no persistence: every operation is a synchronous
//!   computation over exclusively-owned state. Embedding systems that need
//!   shared access must serialize calls themselves.
//! - Fatal conditions are `Err` values; non-fatal conditions (plan overrun,
//!   sold out) travel inside normal results as flags.
//! - Suggestions are proposals: state only changes when the caller applies
//!   one explicitly.

pub mod allocator;
pub mod config;
pub mod error;
pub mod report;
pub mod scenario;
pub mod types;

pub use allocator::{
    AllocationSuggestion, BatchOutcome, BatchRecord, SuggestionStatus, TicketAllocator,
};
pub use config::{AllocatorConfig, PayingBounds};
pub use error::{BatchError, ConfigError, StateError};
pub use report::{SalesReport, TierReport};
pub use scenario::{Scenario, ScenarioSweep};
pub use types::{Money, RevenueDelta};
