//! Property-based invariants for the allocation calculator.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use tierplan::{AllocatorConfig, Money, SuggestionStatus, TicketAllocator};

/// A valid configuration with 1 to 6 tiers and percentages summing to 100.
fn arb_config() -> impl Strategy<Value = AllocatorConfig> {
    (
        1_usize..=6,
        100_u32..=10_000,
        1_u64..=2_000,
        1_u64..=5_000_000,
    )
        .prop_flat_map(|(tier_count, total_participants, cost, target)| {
            (
                proptest::collection::vec(1_u64..=2_000, tier_count),
                proptest::collection::vec(1_u32..=100, tier_count),
                0..=total_participants,
                (0..=total_participants, 1_u32..=10),
                Just(total_participants),
                Just(cost),
                Just(target),
            )
        })
        .prop_map(
            |(prices, weights, first_batch, (upper, batches), total, cost, target)| {
                // Normalize integer weights into percentages summing to 100.
                let weight_sum: u32 = weights.iter().sum();
                let allocation_percentages: Vec<f64> = weights
                    .iter()
                    .map(|&w| f64::from(w) / f64::from(weight_sum) * 100.0)
                    .collect();
                AllocatorConfig {
                    desired_total_value: Money::from_dollars(target),
                    total_participants: total,
                    cost_per_participant: Money::from_dollars(cost),
                    non_paying_lower: upper / 2,
                    non_paying_upper: upper,
                    tiers: prices.into_iter().map(Money::from_dollars).collect(),
                    allocation_percentages,
                    first_batch_total: first_batch,
                    num_batches: batches,
                }
            },
        )
}

/// Sells a fixed fraction of each tier's remaining allocation.
fn partial_batch(allocator: &TicketAllocator, divisor: u32) -> Vec<u32> {
    allocator
        .tier_allocations()
        .iter()
        .zip(allocator.cumulative_sold())
        .map(|(&allocated, &sold)| (allocated - sold) / divisor.max(1))
        .collect()
}

proptest! {
    #[test]
    fn construction_apportions_first_batch_exactly(config in arb_config()) {
        let allocator = TicketAllocator::new(config.clone()).unwrap();
        let total: u32 = allocator.tier_allocations().iter().sum();
        prop_assert_eq!(total, config.first_batch_total);
    }

    #[test]
    fn revenue_matches_sold_times_price(config in arb_config(), divisors in proptest::collection::vec(1_u32..=4, 1..=5)) {
        let mut allocator = TicketAllocator::new(config.clone()).unwrap();
        for divisor in divisors {
            let batch = partial_batch(&allocator, divisor);
            allocator.add_batch(&batch).unwrap();

            let expected = allocator
                .cumulative_sold()
                .iter()
                .zip(&config.tiers)
                .fold(Money::ZERO, |acc, (&sold, price)| {
                    acc.saturating_add(price.saturating_multiply(sold))
                });
            prop_assert_eq!(allocator.cumulative_revenue(), expected);
        }
    }

    #[test]
    fn failed_batch_is_atomic(config in arb_config()) {
        let mut allocator = TicketAllocator::new(config).unwrap();
        let before = allocator.clone();

        // Oversell the first tier by one past its remaining allocation.
        let mut batch: Vec<u32> = vec![0; allocator.tier_allocations().len()];
        batch[0] = allocator.tier_allocations()[0] + 1;
        prop_assert!(allocator.add_batch(&batch).is_err());
        prop_assert_eq!(allocator, before);
    }

    #[test]
    fn scenarios_ignore_recorded_sales(config in arb_config(), step in 1_u32..=500) {
        let mut allocator = TicketAllocator::new(config).unwrap();
        let before: Vec<_> = allocator.compute_scenarios(step).collect();

        let batch = partial_batch(&allocator, 2);
        allocator.add_batch(&batch).unwrap();

        let after: Vec<_> = allocator.compute_scenarios(step).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn scenarios_are_ordered_with_correct_deltas(config in arb_config(), step in 1_u32..=500) {
        let allocator = TicketAllocator::new(config.clone()).unwrap();
        let mut previous: Option<u32> = None;
        for scenario in allocator.compute_scenarios(step) {
            if let Some(prev) = previous {
                prop_assert!(scenario.non_paying > prev);
            }
            previous = Some(scenario.non_paying);
            prop_assert_eq!(
                scenario.paying,
                config.total_participants - scenario.non_paying
            );
            prop_assert_eq!(
                scenario.delta,
                scenario.projected_revenue.delta(config.desired_total_value)
            );
        }
    }

    #[test]
    fn suggestion_never_exceeds_remaining_pool(config in arb_config(), divisor in 1_u32..=4) {
        let mut allocator = TicketAllocator::new(config).unwrap();
        let batch = partial_batch(&allocator, divisor);
        allocator.add_batch(&batch).unwrap();

        let suggestion = allocator.suggest_next_allocation();
        prop_assert!(suggestion.total() <= allocator.remaining_tickets());
        match suggestion.status {
            SuggestionStatus::SoldOut => prop_assert_eq!(suggestion.total(), 0),
            SuggestionStatus::Active => {
                prop_assert_eq!(suggestion.total(), allocator.remaining_tickets());
            }
        }
    }

    #[test]
    fn reachable_flag_matches_best_case_revenue(config in arb_config()) {
        let allocator = TicketAllocator::new(config.clone()).unwrap();
        let suggestion = allocator.suggest_next_allocation();

        let best_case = suggestion
            .additional
            .iter()
            .zip(&config.tiers)
            .fold(Money::ZERO, |acc, (&count, price)| {
                acc.saturating_add(price.saturating_multiply(count))
            });
        prop_assert_eq!(
            suggestion.reachable,
            best_case >= suggestion.remaining_revenue_target
        );
    }

    #[test]
    fn applying_a_suggestion_preserves_cap_invariant(config in arb_config(), divisor in 1_u32..=4) {
        let mut allocator = TicketAllocator::new(config).unwrap();
        let batch = partial_batch(&allocator, divisor);
        allocator.add_batch(&batch).unwrap();

        let suggestion = allocator.suggest_next_allocation();
        allocator.apply_suggestion(&suggestion).unwrap();

        for (&sold, &allocated) in allocator
            .cumulative_sold()
            .iter()
            .zip(allocator.tier_allocations())
        {
            prop_assert!(sold <= allocated);
        }
    }
}
