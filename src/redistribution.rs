//! The three support-conserving mutations of donation vectors (`SPEC_FULL.md` §4.4-§4.6): excess
//! redistribution after funding, elimination-with-transfer, and the minimal-transfer lift.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ballot::DonationVector;
use crate::numeric::tolerances::{MT_MAX_ITERATIONS, MT_RESIDUE_GUARD};
use crate::numeric::Amount;
use crate::project::{Instance, ProjectId};
use crate::selection::{select, SelectMetric};
use crate::tie_break::TieBreaker;

/// After `funded` is paid for, move each donor's contribution to it beyond the fair share `γ`
/// onto that donor's other projects, proportionally, conserving each donor's total
/// (`SPEC_FULL.md` §4.4). `initial_gamma` is the caller's `cost(p) / (excess + cost(p))`; it is
/// only used when the recompute guard (adjusted cost/support both positive) fails — the same
/// "effectively dead parameter" quirk the reference implementation exhibits (§9).
pub fn excess_redistribution(
    donations: &mut [DonationVector],
    funded: ProjectId,
    cost: &Amount,
    initial_gamma: Amount,
) {
    let mode = cost.mode();
    let zero = Amount::zero(mode);

    let mut project_support = donations.iter().map(|d| d.get(funded)).fold(zero.clone(), |a, b| a + b);
    let mut adjusted_cost = cost.clone();

    for donor in donations.iter() {
        let contribution = donor.get(funded);
        if donor.total_excluding(funded).is_zero() {
            project_support = project_support - contribution.clone();
            adjusted_cost = adjusted_cost - contribution;
        }
    }

    let gamma = if adjusted_cost.to_f64() > 0.0 && project_support.to_f64() > 0.0 {
        adjusted_cost / project_support
    } else {
        initial_gamma
    };

    for donor in donations.iter_mut() {
        let contribution = donor.take(funded);
        let total = donor.total();
        if total.is_zero() {
            continue;
        }
        let one_minus_gamma = Amount::from_i64(mode, 1) - gamma.clone();
        let to_distribute = contribution * one_minus_gamma;
        for (_, remaining) in donor.iter_mut() {
            let share = remaining.clone() / total.clone();
            *remaining = remaining.clone() + to_distribute.clone() * share;
        }
    }

    debug!(project = funded.0, "excess redistributed");
}

/// The no-eligible-candidate escape for the EWT family (`SPEC_FULL.md` §4.5). Eliminates the
/// single worst-scoring candidate and transfers its support proportionally onto each donor's
/// remaining projects. Returns `false` to signal the driver should terminate instead of retrying.
pub fn elimination_with_transfer(
    candidates: &mut BTreeSet<ProjectId>,
    donations: &mut [DonationVector],
    eliminated: &mut Vec<ProjectId>,
    select_metric: SelectMetric,
    instance: &Instance,
    tie_breaker: &dyn TieBreaker,
) -> bool {
    if candidates.len() < 2 {
        if let Some(&only) = candidates.iter().next() {
            candidates.remove(&only);
            eliminated.push(only);
        }
        return false;
    }

    let ids: Vec<ProjectId> = candidates.iter().copied().collect();
    let tied = select(select_metric, &ids, donations, instance, false);
    let p = if tied.len() > 1 { tie_breaker.untie(&ids, instance, donations, &tied) } else { tied[0] };

    for donor in donations.iter_mut() {
        let contribution = donor.take(p);
        let total = donor.total();
        if total.is_zero() {
            continue;
        }
        for (_, remaining) in donor.iter_mut() {
            let share = remaining.clone() / total.clone();
            *remaining = remaining.clone() + contribution.clone() * share;
        }
    }

    candidates.remove(&p);
    eliminated.push(p);
    debug!(project = p.0, "eliminated with transfer");
    true
}

/// The no-eligible-candidate escape for the MT family (`SPEC_FULL.md` §4.6). Iteratively lifts one
/// chosen project's support to its cost by pulling proportionally from donors who can afford it,
/// capping out donors who can't, and finally topping up any residual shortfall. Returns `false` if
/// no candidate can ever be lifted with the donors currently available.
pub fn minimal_transfer(
    candidates: &mut BTreeSet<ProjectId>,
    donations: &mut [DonationVector],
    eliminated: &mut Vec<ProjectId>,
    select_metric: SelectMetric,
    instance: &Instance,
    tie_breaker: &dyn TieBreaker,
) -> bool {
    let mode = instance.mode();
    let zero = Amount::zero(mode);

    // 1. Prune: projects whose full potential donor endowment can't reach their cost are hopeless.
    let snapshot: Vec<ProjectId> = candidates.iter().copied().collect();
    for p in snapshot {
        let full_endowment = donations
            .iter()
            .filter(|d| d.get(p).is_positive())
            .map(|d| d.total())
            .fold(zero.clone(), |a, b| a + b);
        if full_endowment.to_f64() < instance.project(p).cost().to_f64() {
            candidates.remove(&p);
            eliminated.push(p);
        }
    }
    if candidates.is_empty() {
        return false;
    }

    // 2. Choose the project to lift.
    let ids: Vec<ProjectId> = candidates.iter().copied().collect();
    let tied = select(select_metric, &ids, donations, instance, true);
    let p = if tied.len() > 1 { tie_breaker.untie(&ids, instance, donations, &tied) } else { tied[0] };

    // 3. D_p and the initial ratio.
    let mut supporters: Vec<usize> =
        donations.iter().enumerate().filter(|(_, d)| d.get(p).is_positive()).map(|(i, _)| i).collect();
    let mut total_support = supporters.iter().map(|&i| donations[i].get(p)).fold(zero.clone(), |a, b| a + b);
    let original_cost = instance.project(p).cost().clone();
    let mut working_cost = original_cost.clone();
    let mut r = total_support.clone() / working_cost.clone();

    // 4. Cap-out pass.
    loop {
        let pass: Vec<usize> = supporters.clone();
        let mut capped_any = false;
        for i in pass {
            if !supporters.contains(&i) {
                continue;
            }
            let contribution = donations[i].get(p);
            let total = donations[i].total();
            if contribution.clone() > total.clone() * r.clone() {
                for (_, v) in donations[i].iter_mut() {
                    *v = zero.clone();
                }
                donations[i].set(p, total.clone());
                supporters.retain(|&x| x != i);
                total_support = total_support - contribution;
                working_cost = working_cost - total;
                r = if working_cost.is_zero() { total_support.clone() } else { total_support.clone() / working_cost.clone() };
                capped_any = true;
            }
        }
        if !capped_any {
            break;
        }
    }

    // 5. Lift loop.
    let mut iterations = 0u32;
    while r.to_f64() < 1.0 {
        let all_committed = supporters.iter().all(|&i| donations[i].total() == donations[i].get(p));
        if all_committed {
            let remaining: Vec<ProjectId> = candidates.iter().copied().collect();
            for c in remaining {
                candidates.remove(&c);
                eliminated.push(c);
            }
            return false;
        }

        for &i in &supporters {
            let contribution = donations[i].get(p);
            let total = donations[i].total();
            let other = total - contribution.clone();
            if !other.is_positive() {
                continue;
            }
            let uncapped_target = contribution.clone() / r.clone() - contribution.clone();
            let to_distribute =
                if uncapped_target.to_f64() < other.to_f64() { uncapped_target } else { other.clone() };

            let other_projects: Vec<ProjectId> =
                donations[i].iter().filter(|(k, v)| *k != p && v.is_positive()).map(|(k, _)| k).collect();

            for q in other_projects {
                let q_donation = donations[i].get(q);
                let mut change = to_distribute.clone() * q_donation / other.clone();
                if (to_distribute.to_f64() - change.to_f64()) < MT_RESIDUE_GUARD {
                    change = to_distribute.clone();
                }
                let remaining_q = donations[i].get(q) - change.clone();
                donations[i].set(q, remaining_q);
                let added = change.quantize_up(MT_RESIDUE_GUARD);
                let lifted = donations[i].get(p) + added;
                donations[i].set(p, lifted);
            }
        }

        total_support = supporters.iter().map(|&i| donations[i].get(p)).fold(zero.clone(), |a, b| a + b);
        r = total_support.clone() / working_cost.clone();

        iterations += 1;
        if iterations > MT_MAX_ITERATIONS {
            debug!(project = p.0, "minimal transfer hit the iteration cap; proceeding to top-up");
            break;
        }
    }

    // 6. Top-up against the project's real, unadjusted cost, summed over every donor.
    let total_p = donations.iter().map(|d| d.get(p)).fold(zero.clone(), |a, b| a + b);
    let shortfall = original_cost - total_p;
    if shortfall.to_f64() > 0.0 {
        let mut smallest_index = 0usize;
        let mut smallest_value: Option<Amount> = None;
        for (i, d) in donations.iter().enumerate() {
            let contribution = d.get(p);
            if contribution.is_positive()
                && smallest_value.as_ref().map(|v| contribution.to_f64() < v.to_f64()).unwrap_or(true)
            {
                smallest_value = Some(contribution);
                smallest_index = i;
            }
        }
        let topped_up = donations[smallest_index].get(p) + shortfall;
        donations[smallest_index].set(p, topped_up);
    }

    // `p` stays in `candidates`: minimal-transfer only raises its support to meet its cost, it
    // does not fund it. The driver re-checks eligibility next and funds `p` through the normal
    // selection path once its support clears the bar.
    debug!(project = p.0, "lifted by minimal transfer");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericMode;
    use crate::project::Instance;
    use crate::tie_break::LexicographicTieBreaker;

    fn two_project_instance() -> Instance {
        let mode = NumericMode::Exact;
        Instance::new(
            mode,
            [("A".to_string(), Amount::from_i64(mode, 20)), ("B".to_string(), Amount::from_i64(mode, 30))],
            Amount::from_i64(mode, 100),
        )
    }

    #[test]
    fn excess_redistribution_conserves_non_trapped_donor_totals() {
        let instance = two_project_instance();
        let ids: Vec<ProjectId> = instance.ids().collect();
        let mode = instance.mode();

        let mut donor = DonationVector::new(mode);
        donor.set(ids[0], Amount::from_i64(mode, 25));
        donor.set(ids[1], Amount::from_i64(mode, 5));
        let before = donor.total();
        let mut donations = vec![donor];

        let cost = instance.project(ids[0]).cost().clone();
        let gamma = Amount::ratio(mode, 1, 2);
        excess_redistribution(&mut donations, ids[0], &cost, gamma);

        assert_eq!(donations[0].total(), before);
        assert!(donations[0].get(ids[0]).is_zero());
    }

    #[test]
    fn elimination_with_transfer_moves_the_worst_candidate_to_eliminated() {
        let instance = two_project_instance();
        let ids: Vec<ProjectId> = instance.ids().collect();
        let mode = instance.mode();

        let mut donor = DonationVector::new(mode);
        donor.set(ids[0], Amount::from_i64(mode, 1));
        donor.set(ids[1], Amount::from_i64(mode, 9));
        let mut donations = vec![donor];

        let mut candidates: BTreeSet<ProjectId> = ids.iter().copied().collect();
        let mut eliminated = Vec::new();
        let tie_breaker = LexicographicTieBreaker;

        let continued = elimination_with_transfer(
            &mut candidates,
            &mut donations,
            &mut eliminated,
            SelectMetric::Support,
            &instance,
            &tie_breaker,
        );

        assert!(continued);
        assert_eq!(eliminated, vec![ids[0]]);
        assert!(candidates.contains(&ids[1]));
        assert_eq!(donations[0].total(), Amount::from_i64(mode, 10));
    }
}
