//! The tiered ticket allocation calculator.
//!
//! [`TicketAllocator`] owns the validated configuration, the per-tier
//! allocation state and the cumulative sales history. Mutation happens only
//! through [`TicketAllocator::add_batch`] and
//! [`TicketAllocator::apply_suggestion`]; everything else is a pure read.
//!
//! The reallocation heuristic ranks tiers by sell-through, hands the
//! best-selling tiers the largest share of the remaining pool, and shifts
//! tickets toward higher-priced tiers when the revenue target would otherwise
//! be out of reach even at 100% sell-through.

use crate::config::AllocatorConfig;
use crate::error::{BatchError, ConfigError, StateError};
use crate::report::{SalesReport, TierReport};
use crate::scenario::ScenarioSweep;
use crate::types::Money;
use serde::{Deserialize, Serialize};

// ============================================================================
// Batch Records & Outcomes
// ============================================================================

/// One recorded round of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Tickets sold per tier, in tier order
    pub sales: Vec<u32>,
    /// Revenue from this batch alone
    pub batch_revenue: Money,
}

/// Result of a successful [`TicketAllocator::add_batch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Revenue from the batch just recorded
    pub batch_revenue: Money,
    /// True when more batches have now been recorded than were planned.
    /// A warning condition, never an error: organizers may run extra batches.
    pub plan_overrun: bool,
}

// ============================================================================
// Allocation Suggestions
// ============================================================================

/// Whether a suggestion still has inventory to distribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionStatus {
    /// Tickets remain; the suggestion distributes them
    Active,
    /// Nothing left to allocate; all suggested counts are zero
    SoldOut,
}

/// A proposed distribution of the remaining ticket pool.
///
/// Suggestions are never adopted silently: the calculator state is unchanged
/// until the caller passes the suggestion back through
/// [`TicketAllocator::apply_suggestion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSuggestion {
    /// Additional tickets to allocate per tier, in tier order
    pub additional: Vec<u32>,
    /// Revenue still needed to reach the target (zero once met)
    pub remaining_revenue_target: Money,
    /// True when 100% sell-through of the suggested tickets would cover the
    /// remaining target
    pub reachable: bool,
    /// Whether any inventory remained to distribute
    pub status: SuggestionStatus,
}

impl AllocationSuggestion {
    /// Total tickets the suggestion distributes
    #[must_use]
    pub fn total(&self) -> u32 {
        self.additional.iter().sum()
    }

    /// The suggestion expressed as weight percentages per tier.
    ///
    /// All zeros when the suggestion is empty.
    #[must_use]
    pub fn percentages(&self) -> Vec<f64> {
        let total = f64::from(self.total());
        self.additional
            .iter()
            .map(|&count| {
                if total > 0.0 {
                    f64::from(count) / total * 100.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

// ============================================================================
// TicketAllocator
// ============================================================================

/// Stateful tiered-pricing allocation and revenue-tracking calculator.
///
/// # Example
///
/// ```
/// use tierplan::{AllocatorConfig, Money, TicketAllocator};
///
/// let config = AllocatorConfig {
///     desired_total_value: Money::from_dollars(100_000),
///     total_participants: 200,
///     cost_per_participant: Money::from_dollars(500),
///     non_paying_lower: 0,
///     non_paying_upper: 200,
///     tiers: vec![Money::from_dollars(500), Money::from_dollars(1_000)],
///     allocation_percentages: vec![60.0, 40.0],
///     first_batch_total: 100,
///     num_batches: 2,
/// };
/// let mut allocator = TicketAllocator::new(config)?;
/// assert_eq!(allocator.tier_allocations(), &[60, 40]);
///
/// let outcome = allocator.add_batch(&[60, 40])?;
/// assert_eq!(outcome.batch_revenue, Money::from_dollars(70_000));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AllocatorSnapshot")]
pub struct TicketAllocator {
    config: AllocatorConfig,
    /// Tickets allocated to date per tier; grows via `apply_suggestion`
    tier_allocations: Vec<u32>,
    sales_history: Vec<BatchRecord>,
    cumulative_sold: Vec<u32>,
    cumulative_revenue: Money,
    batches_recorded: u32,
}

impl TicketAllocator {
    /// Validates the configuration and seeds the first-batch allocations.
    ///
    /// Apportionment floors each tier's percentage share of
    /// `first_batch_total`; the rounding remainder goes to the highest-priced
    /// tier so the allocations always sum to `first_batch_total` exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when any §3 invariant of the configuration
    /// is violated; no partially-constructed calculator is returned.
    pub fn new(config: AllocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tier_allocations = apportion(
            config.first_batch_total,
            &config.allocation_percentages,
            &config.tiers,
        );
        tracing::debug!(
            "allocator constructed: first_batch_total={}, tier_allocations={:?}",
            config.first_batch_total,
            tier_allocations
        );
        let tier_count = config.tier_count();
        Ok(Self {
            config,
            tier_allocations,
            sales_history: Vec::new(),
            cumulative_sold: vec![0; tier_count],
            cumulative_revenue: Money::ZERO,
            batches_recorded: 0,
        })
    }

    /// The immutable configuration
    #[must_use]
    pub const fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Tickets allocated to date per tier, in tier order
    #[must_use]
    pub fn tier_allocations(&self) -> &[u32] {
        &self.tier_allocations
    }

    /// Tickets sold to date per tier, in tier order
    #[must_use]
    pub fn cumulative_sold(&self) -> &[u32] {
        &self.cumulative_sold
    }

    /// Every recorded batch, in recording order
    #[must_use]
    pub fn sales_history(&self) -> &[BatchRecord] {
        &self.sales_history
    }

    /// Total revenue across all recorded batches
    #[must_use]
    pub const fn cumulative_revenue(&self) -> Money {
        self.cumulative_revenue
    }

    /// Batches recorded so far
    #[must_use]
    pub const fn batches_recorded(&self) -> u32 {
        self.batches_recorded
    }

    /// Revenue still needed to reach the target, floored at zero
    #[must_use]
    pub fn remaining_revenue(&self) -> Money {
        self.config
            .desired_total_value
            .saturating_sub(self.cumulative_revenue)
    }

    /// Tickets still allocatable from the whole participant pool
    #[must_use]
    pub fn remaining_tickets(&self) -> u32 {
        let sold: u32 = self.cumulative_sold.iter().sum();
        self.config.total_participants.saturating_sub(sold)
    }

    /// Sweeps the non-paying range at `step` and projects revenue per sample.
    ///
    /// Pure function of the configuration: the sweep is identical before and
    /// after any number of recorded batches. A `step` of 0 is treated as 1.
    #[must_use]
    pub fn compute_scenarios(&self, step: u32) -> ScenarioSweep {
        ScenarioSweep::new(&self.config, step)
    }

    /// Records one batch of sales, positionally matching the configured tiers.
    ///
    /// Atomic: validation runs to completion before any state is touched, so
    /// a failed call leaves the calculator exactly as it was.
    ///
    /// # Errors
    ///
    /// [`BatchError::LengthMismatch`] when `sales` does not have one entry
    /// per tier; [`BatchError::Overallocation`] when any tier's sold count
    /// exceeds its remaining allocation.
    pub fn add_batch(&mut self, sales: &[u32]) -> Result<BatchOutcome, BatchError> {
        if sales.len() != self.config.tier_count() {
            return Err(BatchError::LengthMismatch {
                expected: self.config.tier_count(),
                actual: sales.len(),
            });
        }
        for (i, &sold) in sales.iter().enumerate() {
            let remaining = self.tier_allocations[i] - self.cumulative_sold[i];
            if sold > remaining {
                return Err(BatchError::Overallocation {
                    tier_price: self.config.tiers[i],
                    sold,
                    remaining,
                    excess: sold - remaining,
                });
            }
        }

        let batch_revenue = sales
            .iter()
            .zip(&self.config.tiers)
            .fold(Money::ZERO, |acc, (&sold, price)| {
                acc.saturating_add(price.saturating_multiply(sold))
            });
        for (i, &sold) in sales.iter().enumerate() {
            self.cumulative_sold[i] += sold;
        }
        self.cumulative_revenue = self.cumulative_revenue.saturating_add(batch_revenue);
        self.sales_history.push(BatchRecord {
            sales: sales.to_vec(),
            batch_revenue,
        });
        self.batches_recorded += 1;

        let plan_overrun = self.batches_recorded > self.config.num_batches;
        if plan_overrun {
            tracing::warn!(
                "batch {} recorded beyond the {} planned batches",
                self.batches_recorded,
                self.config.num_batches
            );
        }
        tracing::debug!(
            "batch {} recorded: revenue={}, cumulative_revenue={}",
            self.batches_recorded,
            batch_revenue,
            self.cumulative_revenue
        );
        Ok(BatchOutcome {
            batch_revenue,
            plan_overrun,
        })
    }

    /// Proposes a distribution of the remaining ticket pool.
    ///
    /// Tiers are ranked by sell-through rate (cumulative sold over allocated
    /// to date), ties favoring the higher price. The remaining pool is split
    /// by rank weight, best-selling tier first, then tickets shift from the
    /// cheapest tiers into the highest-priced tier while 100% sell-through
    /// would still miss the remaining revenue target. Rounding remainder goes
    /// to the best-selling tier.
    ///
    /// Does not mutate: adopting the proposal requires an explicit
    /// [`apply_suggestion`](Self::apply_suggestion) call.
    #[must_use]
    pub fn suggest_next_allocation(&self) -> AllocationSuggestion {
        let remaining_revenue_target = self.remaining_revenue();
        let remaining_tickets = self.remaining_tickets();
        let tier_count = self.config.tier_count();

        if remaining_tickets == 0 {
            tracing::debug!("suggestion requested with no tickets remaining");
            return AllocationSuggestion {
                additional: vec![0; tier_count],
                remaining_revenue_target,
                reachable: remaining_revenue_target.is_zero(),
                status: SuggestionStatus::SoldOut,
            };
        }

        let rates = self.sell_through_rates();
        // Rank indices: best sell-through first, ties broken by higher price.
        let mut ranked: Vec<usize> = (0..tier_count).collect();
        ranked.sort_by(|&a, &b| {
            rates[b]
                .total_cmp(&rates[a])
                .then_with(|| self.config.tiers[b].cmp(&self.config.tiers[a]))
        });

        let mut additional = rank_weighted_split(remaining_tickets, &ranked);
        let reachable = shift_toward_higher_tiers(
            &mut additional,
            &self.config.tiers,
            remaining_revenue_target,
        );

        tracing::debug!(
            "suggestion: remaining_tickets={}, remaining_target={}, rates={:?}, additional={:?}, reachable={}",
            remaining_tickets,
            remaining_revenue_target,
            rates,
            additional,
            reachable
        );
        AllocationSuggestion {
            additional,
            remaining_revenue_target,
            reachable,
            status: SuggestionStatus::Active,
        }
    }

    /// Adopts a suggestion by growing each tier's allocation.
    ///
    /// This is the explicit acceptance step; the calculator never adopts its
    /// own suggestions silently.
    ///
    /// # Errors
    ///
    /// [`BatchError::LengthMismatch`] when the suggestion's tier count does
    /// not match the configuration.
    pub fn apply_suggestion(&mut self, suggestion: &AllocationSuggestion) -> Result<(), BatchError> {
        if suggestion.additional.len() != self.tier_allocations.len() {
            return Err(BatchError::LengthMismatch {
                expected: self.tier_allocations.len(),
                actual: suggestion.additional.len(),
            });
        }
        for (allocation, &extra) in self.tier_allocations.iter_mut().zip(&suggestion.additional) {
            *allocation = allocation.saturating_add(extra);
        }
        tracing::debug!(
            "suggestion applied: tier_allocations={:?}",
            self.tier_allocations
        );
        Ok(())
    }

    /// Snapshot of cumulative sales against the revenue target.
    #[must_use]
    pub fn report(&self) -> SalesReport {
        let remaining_revenue = self.remaining_revenue();
        let target_cents = self.config.desired_total_value.cents();
        #[allow(clippy::cast_precision_loss)]
        let percent_of_target = if target_cents == 0 {
            0.0
        } else {
            self.cumulative_revenue.cents() as f64 / target_cents as f64 * 100.0
        };
        let tiers = self
            .config
            .tiers
            .iter()
            .zip(&self.tier_allocations)
            .zip(&self.cumulative_sold)
            .map(|((&price, &allocated), &sold)| TierReport {
                price,
                allocated,
                sold,
                remaining: allocated - sold,
            })
            .collect();
        SalesReport {
            target: self.config.desired_total_value,
            total_sold: self.cumulative_sold.iter().sum(),
            total_revenue: self.cumulative_revenue,
            remaining_revenue,
            percent_of_target,
            baseline_tickets_needed: remaining_revenue
                .cents()
                .div_ceil(self.config.cost_per_participant.cents()),
            tiers,
            batches: self.sales_history.clone(),
            batches_recorded: self.batches_recorded,
            num_batches: self.config.num_batches,
            plan_overrun: self.batches_recorded > self.config.num_batches,
        }
    }

    /// Per-tier sell-through rates; 0 where nothing is allocated.
    fn sell_through_rates(&self) -> Vec<f64> {
        self.cumulative_sold
            .iter()
            .zip(&self.tier_allocations)
            .map(|(&sold, &allocated)| {
                if allocated == 0 {
                    0.0
                } else {
                    f64::from(sold) / f64::from(allocated)
                }
            })
            .collect()
    }
}

// ============================================================================
// Serialized state validation
// ============================================================================

/// Raw wire form of [`TicketAllocator`]; every invariant is re-checked before
/// it becomes one, so deserialization cannot smuggle in unreachable state.
#[derive(Debug, Deserialize)]
struct AllocatorSnapshot {
    config: AllocatorConfig,
    tier_allocations: Vec<u32>,
    sales_history: Vec<BatchRecord>,
    cumulative_sold: Vec<u32>,
    cumulative_revenue: Money,
    batches_recorded: u32,
}

impl TryFrom<AllocatorSnapshot> for TicketAllocator {
    type Error = StateError;

    fn try_from(snapshot: AllocatorSnapshot) -> Result<Self, StateError> {
        snapshot.config.validate()?;
        let tier_count = snapshot.config.tier_count();
        for vector_len in [
            snapshot.tier_allocations.len(),
            snapshot.cumulative_sold.len(),
        ]
        .into_iter()
        .chain(snapshot.sales_history.iter().map(|r| r.sales.len()))
        {
            if vector_len != tier_count {
                return Err(StateError::LengthMismatch {
                    expected: tier_count,
                    actual: vector_len,
                });
            }
        }
        for (i, (&sold, &allocated)) in snapshot
            .cumulative_sold
            .iter()
            .zip(&snapshot.tier_allocations)
            .enumerate()
        {
            if sold > allocated {
                return Err(StateError::SoldExceedsAllocation {
                    tier_price: snapshot.config.tiers[i],
                    sold,
                    allocated,
                });
            }
        }
        let computed = snapshot
            .cumulative_sold
            .iter()
            .zip(&snapshot.config.tiers)
            .fold(Money::ZERO, |acc, (&sold, price)| {
                acc.saturating_add(price.saturating_multiply(sold))
            });
        if computed != snapshot.cumulative_revenue {
            return Err(StateError::RevenueMismatch {
                stored: snapshot.cumulative_revenue,
                computed,
            });
        }
        if snapshot.batches_recorded as usize != snapshot.sales_history.len() {
            return Err(StateError::BatchCountMismatch {
                counter: snapshot.batches_recorded,
                history: snapshot.sales_history.len(),
            });
        }
        Ok(Self {
            config: snapshot.config,
            tier_allocations: snapshot.tier_allocations,
            sales_history: snapshot.sales_history,
            cumulative_sold: snapshot.cumulative_sold,
            cumulative_revenue: snapshot.cumulative_revenue,
            batches_recorded: snapshot.batches_recorded,
        })
    }
}

// ============================================================================
// Allocation arithmetic
// ============================================================================

/// Floors each tier's percentage share of `total`; the remainder goes to the
/// highest-priced tier (ties on price: the last such tier). When the
/// percentage sum sits above 100 inside the tolerance window, the excess is
/// trimmed from the highest-priced tiers instead, so the result always sums
/// to `total` exactly.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apportion(total: u32, percentages: &[f64], tiers: &[Money]) -> Vec<u32> {
    // Multiply before dividing so whole-percent splits stay exact in f64.
    let mut allocations: Vec<u32> = percentages
        .iter()
        .map(|pct| (pct * f64::from(total) / 100.0).floor() as u32)
        .collect();

    let top = highest_priced_index(tiers);
    let mut assigned: u32 = allocations.iter().sum();
    if assigned < total {
        allocations[top] += total - assigned;
    } else if assigned > total {
        // Percentage sums up to 101 are tolerated; trim the excess from the
        // priciest tiers downward.
        let mut order: Vec<usize> = (0..tiers.len()).collect();
        order.sort_by(|&a, &b| tiers[b].cmp(&tiers[a]));
        for index in order {
            if assigned == total {
                break;
            }
            let trim = (assigned - total).min(allocations[index]);
            allocations[index] -= trim;
            assigned -= trim;
        }
    }
    allocations
}

/// Index of the highest-priced tier; the last one on equal prices.
fn highest_priced_index(tiers: &[Money]) -> usize {
    let mut top = 0;
    for (index, price) in tiers.iter().enumerate() {
        if *price >= tiers[top] {
            top = index;
        }
    }
    top
}

/// Splits `total` across tiers by rank weight: with `n` tiers the
/// best-ranked gets weight `n`, the next `n - 1`, down to `1`. Floors each
/// share and hands the rounding remainder to the best-ranked tier.
#[allow(clippy::cast_possible_truncation)]
fn rank_weighted_split(total: u32, ranked: &[usize]) -> Vec<u32> {
    let n = ranked.len() as u64;
    let weight_sum = n * (n + 1) / 2;
    let mut allocations = vec![0_u32; ranked.len()];
    let mut assigned: u32 = 0;
    for (position, &tier) in ranked.iter().enumerate() {
        let weight = n - position as u64;
        let share = (u64::from(total) * weight / weight_sum) as u32;
        allocations[tier] = share;
        assigned += share;
    }
    // Integer division rounds every share down; the leftovers belong to the
    // best-selling tier.
    allocations[ranked[0]] += total - assigned;
    allocations
}

/// Moves tickets from the cheapest tiers into the highest-priced tier until
/// 100% sell-through of the allocation covers `target`, or everything that
/// can move has moved. Returns whether the target ended up reachable.
fn shift_toward_higher_tiers(allocations: &mut [u32], tiers: &[Money], target: Money) -> bool {
    let top = highest_priced_index(tiers);
    let mut best_case = max_revenue(allocations, tiers);
    if best_case >= target {
        return true;
    }

    let mut cheapest_first: Vec<usize> = (0..tiers.len()).filter(|&i| i != top).collect();
    cheapest_first.sort_by(|&a, &b| tiers[a].cmp(&tiers[b]));

    for source in cheapest_first {
        let gain = tiers[top].saturating_sub(tiers[source]);
        if gain.is_zero() {
            continue;
        }
        let deficit = target.saturating_sub(best_case);
        if deficit.is_zero() {
            break;
        }
        let needed = deficit.cents().div_ceil(gain.cents());
        let moved = u32::try_from(needed)
            .unwrap_or(u32::MAX)
            .min(allocations[source]);
        allocations[source] -= moved;
        allocations[top] += moved;
        best_case = best_case.saturating_add(gain.saturating_multiply(moved));
    }
    best_case >= target
}

/// Revenue if every allocated ticket sold at its tier price.
fn max_revenue(allocations: &[u32], tiers: &[Money]) -> Money {
    allocations
        .iter()
        .zip(tiers)
        .fold(Money::ZERO, |acc, (&count, price)| {
            acc.saturating_add(price.saturating_multiply(count))
        })
}
