//! Eligibility predicate (`SPEC_FULL.md` §4.2): always support-based, regardless of which
//! selection metric the active combination uses to pick among eligible candidates.

use crate::ballot::DonationVector;
use crate::numeric::tolerances::ELIGIBILITY_SLACK;
use crate::project::{Instance, ProjectId};
use crate::selection::support;

/// Return the candidates whose support meets their cost within [`ELIGIBILITY_SLACK`], preserving
/// iteration order over `candidates`. Always GS-based, independent of the active combination's
/// selection metric (see module docs).
#[must_use]
pub fn eligible(
    candidates: &[ProjectId],
    donations: &[DonationVector],
    instance: &Instance,
) -> Vec<ProjectId> {
    candidates
        .iter()
        .copied()
        .filter(|&id| {
            let project = instance.project(id);
            let total_support = support(project, donations).to_f64();
            total_support * (1.0 + ELIGIBILITY_SLACK) >= project.cost().to_f64()
        })
        .collect()
}
