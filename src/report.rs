//! Read-only sales report snapshots.
//!
//! A report is a plain value detached from the calculator: producing one
//! never mutates state, and callers own presentation policy. The `Display`
//! impl is a convenience rendering, not a stable format.

use crate::allocator::BatchRecord;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-tier slice of a [`SalesReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierReport {
    /// Ticket price of the tier
    pub price: Money,
    /// Tickets allocated to the tier to date
    pub allocated: u32,
    /// Tickets sold to date
    pub sold: u32,
    /// Tickets still allocatable (`allocated - sold`)
    pub remaining: u32,
}

/// Snapshot of cumulative sales against the revenue target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// The configured revenue target
    pub target: Money,
    /// Total tickets sold across all tiers and batches
    pub total_sold: u32,
    /// Total revenue from all recorded batches
    pub total_revenue: Money,
    /// Revenue still needed to reach the target (zero once met)
    pub remaining_revenue: Money,
    /// Percentage of the target reached so far
    pub percent_of_target: f64,
    /// Tickets still needed at the baseline cost per participant, rounded up
    pub baseline_tickets_needed: u64,
    /// Per-tier allocation and sales breakdown, in tier order
    pub tiers: Vec<TierReport>,
    /// Every recorded batch, in recording order
    pub batches: Vec<BatchRecord>,
    /// Batches recorded so far
    pub batches_recorded: u32,
    /// Batches originally planned
    pub num_batches: u32,
    /// True when more batches were recorded than planned
    pub plan_overrun: bool,
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sales report")?;
        writeln!(f, "  Revenue target:      {}", self.target)?;
        writeln!(f, "  Cumulative revenue:  {}", self.total_revenue)?;
        writeln!(f, "  Remaining revenue:   {}", self.remaining_revenue)?;
        writeln!(f, "  Target reached:      {:.1}%", self.percent_of_target)?;
        writeln!(
            f,
            "  Baseline tickets still needed: {}",
            self.baseline_tickets_needed
        )?;
        writeln!(f, "  Tiers:")?;
        for tier in &self.tiers {
            writeln!(
                f,
                "    {}: {} sold / {} allocated ({} remaining)",
                tier.price, tier.sold, tier.allocated, tier.remaining
            )?;
        }
        for (index, batch) in self.batches.iter().enumerate() {
            writeln!(
                f,
                "  Batch {}: sales {:?}, revenue {}",
                index + 1,
                batch.sales,
                batch.batch_revenue
            )?;
        }
        write!(
            f,
            "  Batches recorded: {} of {} planned{}",
            self.batches_recorded,
            self.num_batches,
            if self.plan_overrun { " (overrun)" } else { "" }
        )
    }
}
