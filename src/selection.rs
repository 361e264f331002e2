//! The three scalar selection primitives (`SPEC_FULL.md` §4.1): greedy-by-support,
//! greedy-by-support-over-cost, greedy-by-excess, each usable for "most" or "least" selection.

use crate::ballot::DonationVector;
use crate::numeric::Amount;
use crate::project::{Instance, Project, ProjectId};

/// Which scalar a selection or elimination step scores candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMetric {
    /// `GS(p) = Σ_d d[p]`, total support.
    Support,
    /// `GSC(p) = Σ_d d[p] / cost(p)`, support over cost.
    SupportOverCost,
    /// `GE(p) = Σ_d d[p] − cost(p)`, excess support.
    Excess,
}

/// Total support for `project` across every donor: `Σ_d d[p]`.
#[must_use]
pub fn support(project: &Project, donations: &[DonationVector]) -> Amount {
    let mode = project.cost().mode();
    donations
        .iter()
        .map(|d| d.get(project.id()))
        .fold(Amount::zero(mode), |acc, x| acc + x)
}

/// Score `project` under `metric`.
#[must_use]
pub fn score(metric: SelectMetric, project: &Project, donations: &[DonationVector]) -> Amount {
    let total_support = support(project, donations);
    match metric {
        SelectMetric::Support => total_support,
        SelectMetric::Excess => total_support - project.cost().clone(),
        SelectMetric::SupportOverCost => total_support / project.cost().clone(),
    }
}

/// Score every `candidate` under `metric` and return the nonempty tied subset attaining the
/// maximum (`find_best = true`) or the minimum (`find_best = false`). Panics if `candidates` is
/// empty — callers never invoke selection on an empty candidate set.
#[must_use]
pub fn select(
    metric: SelectMetric,
    candidates: &[ProjectId],
    donations: &[DonationVector],
    instance: &Instance,
    find_best: bool,
) -> Vec<ProjectId> {
    assert!(!candidates.is_empty(), "select() requires a nonempty candidate set");
    let scored: Vec<(ProjectId, Amount)> =
        candidates.iter().map(|&id| (id, score(metric, instance.project(id), donations))).collect();

    let target = scored
        .iter()
        .map(|(_, s)| s)
        .reduce(|best, candidate| {
            let candidate_wins = if find_best { candidate > best } else { candidate < best };
            if candidate_wins {
                candidate
            } else {
                best
            }
        })
        .expect("nonempty candidate set")
        .clone();

    scored.into_iter().filter(|(_, s)| *s == target).map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericMode;

    fn donor(mode: NumericMode, amounts: &[(ProjectId, i64)]) -> DonationVector {
        let mut d = DonationVector::new(mode);
        for &(id, amount) in amounts {
            d.set(id, Amount::from_i64(mode, amount));
        }
        d
    }

    #[test]
    fn select_returns_every_project_tied_at_the_maximum() {
        let mode = NumericMode::Exact;
        let instance = Instance::new(
            mode,
            [("A".to_string(), Amount::from_i64(mode, 10)), ("B".to_string(), Amount::from_i64(mode, 10))],
            Amount::from_i64(mode, 100),
        );
        let ids: Vec<ProjectId> = instance.ids().collect();
        let donations = vec![donor(mode, &[(ids[0], 10), (ids[1], 10)])];

        let tied = select(SelectMetric::Support, &ids, &donations, &instance, true);
        assert_eq!(tied.len(), 2);
    }

    #[test]
    fn select_worst_picks_the_minimum() {
        let mode = NumericMode::Exact;
        let instance = Instance::new(
            mode,
            [("A".to_string(), Amount::from_i64(mode, 10)), ("B".to_string(), Amount::from_i64(mode, 10))],
            Amount::from_i64(mode, 100),
        );
        let ids: Vec<ProjectId> = instance.ids().collect();
        let donations = vec![donor(mode, &[(ids[0], 9), (ids[1], 3)])];

        let worst = select(SelectMetric::Support, &ids, &donations, &instance, false);
        assert_eq!(worst, vec![ids[1]]);
    }
}
