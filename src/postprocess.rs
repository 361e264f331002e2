//! The two exhaustion post-processors that fill remaining budget from eliminated projects once
//! the main CSTV loop terminates (`SPEC_FULL.md` §4.7).

use tracing::info;

use crate::ballot::DonationVector;
use crate::numeric::Amount;
use crate::project::{Instance, ProjectId};
use crate::selection::{select, SelectMetric};
use crate::tie_break::TieBreaker;

/// EWT-family post-processor: walk `eliminated` from last-eliminated to first, accepting any
/// project that still fits the remaining budget.
pub fn reverse_elimination(
    selected: &mut Vec<ProjectId>,
    eliminated: &[ProjectId],
    instance: &Instance,
    mut budget: Amount,
) {
    for &p in eliminated.iter().rev() {
        let cost = instance.project(p).cost();
        if cost.to_f64() <= budget.to_f64() {
            selected.push(p);
            budget = budget - cost.clone();
        }
    }
    info!(accepted = selected.len(), "reverse elimination complete");
}

/// MT-family post-processor: repeatedly accept the most-supported remaining eliminated project
/// that fits the budget, and treat every donor who supported it as spent (their remaining
/// donations are zeroed, not just the accepted project's column).
pub fn accept_under_supported(
    selected: &mut Vec<ProjectId>,
    eliminated: &mut Vec<ProjectId>,
    donations: &mut [DonationVector],
    select_metric: SelectMetric,
    instance: &Instance,
    tie_breaker: &dyn TieBreaker,
    mut budget: Amount,
) {
    while !eliminated.is_empty() {
        let tied = select(select_metric, eliminated, donations, instance, true);
        let p = if tied.len() > 1 { tie_breaker.untie(eliminated, instance, donations, &tied) } else { tied[0] };

        let cost = instance.project(p).cost().clone();
        if cost.to_f64() <= budget.to_f64() {
            selected.push(p);
            budget = budget - cost;
            for donor in donations.iter_mut() {
                if donor.get(p).is_positive() {
                    donor.zero_all();
                }
            }
        }
        eliminated.retain(|&x| x != p);
    }
    info!(accepted = selected.len(), "acceptance of under-supported projects complete");
}
