//! The top-level CSTV state machine (`SPEC_FULL.md` §4.3) and its result type.

use std::collections::BTreeSet;

use tracing::{info, instrument};

use crate::ballot::{DonationVector, Profile};
use crate::combination::{Combination, EligibilityRule, EscapeProcedure, PostprocessKind};
use crate::error::CstvError;
use crate::numeric::tolerances::EQUAL_ENDOWMENT_EPSILON;
use crate::numeric::{sum_amounts, Amount};
use crate::postprocess;
use crate::project::{Instance, Project, ProjectId};
use crate::redistribution;
use crate::selection::{select, SelectMetric};
use crate::tie_break::{LexicographicTieBreaker, TieBreaker};

/// The ordered set of funded projects a [`cstv`] or greedy-baseline call produces.
#[derive(Debug, Clone, Default)]
pub struct BudgetAllocation {
    selected: Vec<ProjectId>,
}

impl BudgetAllocation {
    /// An empty allocation.
    pub fn new() -> Self {
        BudgetAllocation::default()
    }

    fn from_initial(initial: Vec<ProjectId>) -> Self {
        BudgetAllocation { selected: initial }
    }

    /// Iterate funded project ids, in funding order.
    pub fn iter(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.selected.iter().copied()
    }

    /// Number of funded projects.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True if nothing was funded.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// True if `id` was funded.
    pub fn contains(&self, id: ProjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Total cost of every funded project.
    #[must_use]
    pub fn total_cost(&self, instance: &Instance) -> Amount {
        sum_amounts(instance.mode(), self.selected.iter().map(|&id| instance.project(id).cost()))
    }

    /// Funded [`Project`] references, in funding order.
    pub fn projects<'a>(&'a self, instance: &'a Instance) -> impl Iterator<Item = &'a Project> + 'a {
        self.selected.iter().map(|&id| instance.project(id))
    }

    fn inner_mut(&mut self) -> &mut Vec<ProjectId> {
        &mut self.selected
    }

    fn push(&mut self, id: ProjectId) {
        self.selected.push(id);
    }
}

/// Configuration for one [`cstv`] call: either a named [`Combination`] or a complete custom rule
/// tuple, plus the optional knobs from `SPEC_FULL.md` §6.
pub struct CstvConfig {
    combination: Option<Combination>,
    custom: Option<(SelectMetric, EligibilityRule, EscapeProcedure, PostprocessKind)>,
    initial_allocation: Vec<ProjectId>,
    tie_breaker: Box<dyn TieBreaker>,
    resoluteness: bool,
}

impl CstvConfig {
    /// Configure a named combination (§4.3 table).
    pub fn from_combination(combination: Combination) -> Self {
        CstvConfig {
            combination: Some(combination),
            custom: None,
            initial_allocation: Vec::new(),
            tie_breaker: Box::new(LexicographicTieBreaker),
            resoluteness: true,
        }
    }

    /// Configure a custom rule tuple, for pairings the six named combinations don't cover.
    pub fn custom(
        select_metric: SelectMetric,
        eligibility: EligibilityRule,
        escape: EscapeProcedure,
        postprocess: PostprocessKind,
    ) -> Self {
        CstvConfig {
            combination: None,
            custom: Some((select_metric, eligibility, escape, postprocess)),
            initial_allocation: Vec::new(),
            tie_breaker: Box::new(LexicographicTieBreaker),
            resoluteness: true,
        }
    }

    /// Seed `S` with projects already considered funded before the loop starts. Their cost is not
    /// deducted from the budget (§6).
    #[must_use]
    pub fn with_initial_allocation(mut self, initial_allocation: Vec<ProjectId>) -> Self {
        self.initial_allocation = initial_allocation;
        self
    }

    /// Override the default lexicographic tie-breaker.
    #[must_use]
    pub fn with_tie_breaker(mut self, tie_breaker: Box<dyn TieBreaker>) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Request irresolute (multi-outcome) mode. Always unimplemented — [`cstv`] fails with
    /// [`CstvError::Unsupported`] if this is `false`.
    #[must_use]
    pub fn with_resoluteness(mut self, resoluteness: bool) -> Self {
        self.resoluteness = resoluteness;
        self
    }

    fn resolve(&self) -> Result<(SelectMetric, EligibilityRule, EscapeProcedure, PostprocessKind), CstvError> {
        match (self.combination, &self.custom) {
            (Some(combination), None) => {
                let rule_set = combination.rule_set();
                Ok((rule_set.select_metric, EligibilityRule::Greedy, rule_set.escape, rule_set.postprocess))
            }
            (None, Some(custom)) => Ok(*custom),
            _ => Err(CstvError::InvalidConfiguration),
        }
    }
}

/// Run the CSTV algorithm over `instance` and `profile` under `config`, returning the funded
/// projects (`SPEC_FULL.md` §4.3).
#[instrument(skip(instance, profile, config), fields(projects = instance.len()))]
pub fn cstv(instance: &Instance, profile: &Profile, config: &CstvConfig) -> Result<BudgetAllocation, CstvError> {
    if !config.resoluteness {
        return Err(CstvError::Unsupported);
    }
    let (select_metric, _eligibility, escape, postprocess) = config.resolve()?;
    let tie_breaker = config.tie_breaker.as_ref();
    let mode = instance.mode();

    let mut donations = profile.materialize(instance)?;

    let totals: Vec<f64> = donations.iter().map(|d| d.total().to_f64()).collect();
    let max_total = totals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_total = totals.iter().cloned().fold(f64::INFINITY, f64::min);

    let mut selected = BudgetAllocation::from_initial(config.initial_allocation.clone());

    if max_total <= 0.0 {
        return Ok(selected);
    }
    if (max_total - min_total) / max_total > EQUAL_ENDOWMENT_EPSILON {
        return Err(CstvError::UnequalEndowments { max: max_total, min: min_total });
    }

    let mut candidates: BTreeSet<ProjectId> = instance.ids().collect();
    for id in selected.iter() {
        candidates.remove(&id);
    }
    let mut eliminated: Vec<ProjectId> = Vec::new();

    let mut budget = if instance.budget_limit().to_f64() > 0.0 {
        instance.budget_limit().clone()
    } else {
        sum_amounts(mode, donations.iter().flat_map(|d| d.iter().map(|(_, v)| v)))
    };

    loop {
        if candidates.is_empty() {
            run_postprocess(postprocess, &mut selected, &mut donations, &mut eliminated, select_metric, instance, tie_breaker, budget);
            return Ok(selected);
        }

        let ids: Vec<ProjectId> = candidates.iter().copied().collect();
        let mut eligible_set = crate::eligibility::eligible(&ids, &donations, instance);

        while eligible_set.is_empty() {
            let should_continue = run_escape(escape, &mut candidates, &mut donations, &mut eliminated, select_metric, instance, tie_breaker);
            if !should_continue {
                run_postprocess(postprocess, &mut selected, &mut donations, &mut eliminated, select_metric, instance, tie_breaker, budget);
                return Ok(selected);
            }
            let ids: Vec<ProjectId> = candidates.iter().copied().collect();
            eligible_set = crate::eligibility::eligible(&ids, &donations, instance);
        }

        let tied = select(select_metric, &eligible_set, &donations, instance, true);
        let p = if tied.len() > 1 { tie_breaker.untie(&eligible_set, instance, &donations, &tied) } else { tied[0] };

        candidates.remove(&p);
        selected.push(p);
        let cost = instance.project(p).cost().clone();
        budget = budget - cost.clone();

        let total_support = crate::selection::support(instance.project(p), &donations);
        let excess = total_support - cost.clone();

        if excess.to_f64() > crate::numeric::tolerances::EXCESS_REDISTRIBUTION_THRESHOLD {
            let gamma = cost.clone() / (excess + cost.clone());
            redistribution::excess_redistribution(&mut donations, p, &cost, gamma);
        } else {
            for donor in donations.iter_mut() {
                donor.take(p);
            }
        }

        info!(project = p.0, remaining_candidates = candidates.len(), "project funded");
    }
}

fn run_escape(
    escape: EscapeProcedure,
    candidates: &mut BTreeSet<ProjectId>,
    donations: &mut Vec<DonationVector>,
    eliminated: &mut Vec<ProjectId>,
    select_metric: SelectMetric,
    instance: &Instance,
    tie_breaker: &dyn TieBreaker,
) -> bool {
    match escape {
        EscapeProcedure::EliminationWithTransfer => {
            redistribution::elimination_with_transfer(candidates, donations, eliminated, select_metric, instance, tie_breaker)
        }
        EscapeProcedure::MinimalTransfer => {
            redistribution::minimal_transfer(candidates, donations, eliminated, select_metric, instance, tie_breaker)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_postprocess(
    postprocess_kind: PostprocessKind,
    selected: &mut BudgetAllocation,
    donations: &mut Vec<DonationVector>,
    eliminated: &mut Vec<ProjectId>,
    select_metric: SelectMetric,
    instance: &Instance,
    tie_breaker: &dyn TieBreaker,
    budget: Amount,
) {
    match postprocess_kind {
        PostprocessKind::ReverseElimination => {
            postprocess::reverse_elimination(selected.inner_mut(), eliminated, instance, budget);
        }
        PostprocessKind::AcceptUnderSupported => {
            postprocess::accept_under_supported(selected.inner_mut(), eliminated, donations, select_metric, instance, tie_breaker, budget);
        }
    }
}
