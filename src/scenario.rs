//! Scenario analysis over the non-paying participant range.
//!
//! A sweep walks the configured non-paying bounds at a fixed step and
//! projects revenue for each sample. The sweep is a pure function of the
//! configuration: recorded sales never influence it.

use crate::config::AllocatorConfig;
use crate::types::{Money, RevenueDelta};
use serde::{Deserialize, Serialize};

/// One sampled scenario from a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Non-paying participant count for this sample
    pub non_paying: u32,
    /// Paying participants (`total_participants - non_paying`)
    pub paying: u32,
    /// Projected revenue (`paying * cost_per_participant`)
    pub projected_revenue: Money,
    /// Signed shortfall or surplus versus the desired total value
    pub delta: RevenueDelta,
}

/// Lazy iterator over scenarios, ordered by increasing non-paying count.
///
/// Produced by [`TicketAllocator::compute_scenarios`]; samples
/// `non_paying_lower, non_paying_lower + step, ...` up to and including
/// `non_paying_upper` when the step divides the range.
///
/// [`TicketAllocator::compute_scenarios`]: crate::TicketAllocator::compute_scenarios
#[derive(Debug, Clone)]
pub struct ScenarioSweep {
    total_participants: u32,
    cost_per_participant: Money,
    desired_total_value: Money,
    next_non_paying: u32,
    upper: u32,
    step: u32,
    exhausted: bool,
}

impl ScenarioSweep {
    pub(crate) fn new(config: &AllocatorConfig, step: u32) -> Self {
        Self {
            total_participants: config.total_participants,
            cost_per_participant: config.cost_per_participant,
            desired_total_value: config.desired_total_value,
            next_non_paying: config.non_paying_lower,
            upper: config.non_paying_upper,
            // A zero step would never advance; treat it as 1.
            step: step.max(1),
            exhausted: false,
        }
    }
}

impl Iterator for ScenarioSweep {
    type Item = Scenario;

    fn next(&mut self) -> Option<Scenario> {
        if self.exhausted || self.next_non_paying > self.upper {
            return None;
        }
        let non_paying = self.next_non_paying;
        let paying = self.total_participants - non_paying;
        let projected_revenue = self.cost_per_participant.saturating_multiply(paying);
        let scenario = Scenario {
            non_paying,
            paying,
            projected_revenue,
            delta: projected_revenue.delta(self.desired_total_value),
        };
        match non_paying.checked_add(self.step) {
            Some(next) => self.next_non_paying = next,
            None => self.exhausted = true,
        }
        Some(scenario)
    }
}
