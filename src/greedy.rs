//! The three greedy baseline rules (`SPEC_FULL.md` §4.9): no redistribution, no elimination, just
//! repeated top-tied selection against a shrinking budget.

use std::collections::BTreeSet;

use crate::ballot::Profile;
use crate::error::CstvError;
use crate::project::{Instance, ProjectId};
use crate::selection::{select, SelectMetric};

/// Greedy-by-support: repeatedly fund the most-supported remaining project that fits the budget.
pub fn greedy_gs(instance: &Instance, profile: &Profile) -> Result<BTreeSet<ProjectId>, CstvError> {
    greedy(instance, profile, SelectMetric::Support)
}

/// Greedy-by-support-over-cost.
pub fn greedy_gsc(instance: &Instance, profile: &Profile) -> Result<BTreeSet<ProjectId>, CstvError> {
    greedy(instance, profile, SelectMetric::SupportOverCost)
}

/// Greedy-by-excess.
pub fn greedy_ge(instance: &Instance, profile: &Profile) -> Result<BTreeSet<ProjectId>, CstvError> {
    greedy(instance, profile, SelectMetric::Excess)
}

fn greedy(instance: &Instance, profile: &Profile, metric: SelectMetric) -> Result<BTreeSet<ProjectId>, CstvError> {
    let donations = profile.materialize(instance)?;
    let mut remaining: BTreeSet<ProjectId> = instance.ids().collect();
    let mut selected = BTreeSet::new();
    let mut budget = instance.budget_limit().clone();

    while !remaining.is_empty() {
        let ids: Vec<ProjectId> = remaining.iter().copied().collect();
        let tied = select(metric, &ids, &donations, instance, true);
        // The reference implementation does not tie-break baselines; `select` already returns
        // candidates in ascending `ProjectId` order, so taking the first tied entry is
        // deterministic without invoking the pluggable tie-breaker (SPEC_FULL.md §4.9).
        let project = tied[0];

        if instance.project(project).cost().to_f64() <= budget.to_f64() {
            selected.insert(project);
            budget = budget - instance.project(project).cost().clone();
        }
        remaining.remove(&project);
    }

    Ok(selected)
}
