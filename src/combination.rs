//! The six named CSTV combinations and the rule pieces they pick (`SPEC_FULL.md` §4.3, §6).

use std::str::FromStr;

use crate::error::CstvError;
use crate::selection::SelectMetric;

/// Which escape procedure runs when no candidate is currently eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeProcedure {
    /// Eliminate the single worst candidate and transfer its support (§4.5).
    EliminationWithTransfer,
    /// Iteratively lift one candidate's support to its cost (§4.6).
    MinimalTransfer,
}

/// Which post-processor fills remaining budget once the main loop terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostprocessKind {
    /// Walk eliminated projects from last to first (§4.7, EWT family).
    ReverseElimination,
    /// Repeatedly accept the most-supported eliminated project (§4.7, MT family).
    AcceptUnderSupported,
}

/// Which eligibility rule gates candidacy for funding. The reference implementation offers one
/// per selection metric but all three delegate to the same greedy-support check (§4.2); this
/// crate keeps the single variant that actually exists, named for what it checks rather than for
/// parity with a distinction that was never real.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityRule {
    /// Support-based eligibility: the only rule this crate implements (§4.2).
    Greedy,
}

/// One of the six enumerated CSTV combinations (§6): a closed set, unlike the reference
/// implementation's free-form combination string, so [`CstvError::InvalidCombination`] cannot
/// arise from calling [`crate::cstv`] with a `Combination` value — only from parsing an untrusted
/// name into one via [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    /// Excess selection, elimination-with-transfer escape, reverse-elimination post-processor.
    Ewt,
    /// Support-over-cost selection, elimination-with-transfer escape, reverse-elimination post-processor.
    Ewtc,
    /// Support selection, elimination-with-transfer escape, reverse-elimination post-processor.
    Ewts,
    /// Excess selection, minimal-transfer escape, accept-under-supported post-processor.
    Mt,
    /// Support-over-cost selection, minimal-transfer escape, accept-under-supported post-processor.
    Mtc,
    /// Support selection, minimal-transfer escape, accept-under-supported post-processor.
    Mts,
}

/// The (selection metric, escape procedure, post-processor) triple a [`Combination`] expands to.
/// Eligibility is always [`EligibilityRule::Greedy`] regardless of combination (§4.2).
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    /// Metric used to pick among eligible candidates.
    pub select_metric: SelectMetric,
    /// Escape procedure invoked when nothing is eligible.
    pub escape: EscapeProcedure,
    /// Post-processor invoked at termination.
    pub postprocess: PostprocessKind,
}

impl Combination {
    /// Expand this combination to its rule set, per the table in `SPEC_FULL.md` §4.3.
    #[must_use]
    pub fn rule_set(self) -> RuleSet {
        use Combination::*;
        use EscapeProcedure::*;
        use PostprocessKind::*;
        use SelectMetric::*;
        match self {
            Ewt => RuleSet { select_metric: Excess, escape: EliminationWithTransfer, postprocess: ReverseElimination },
            Ewtc => RuleSet { select_metric: SupportOverCost, escape: EliminationWithTransfer, postprocess: ReverseElimination },
            Ewts => RuleSet { select_metric: Support, escape: EliminationWithTransfer, postprocess: ReverseElimination },
            Mt => RuleSet { select_metric: Excess, escape: MinimalTransfer, postprocess: AcceptUnderSupported },
            Mtc => RuleSet { select_metric: SupportOverCost, escape: MinimalTransfer, postprocess: AcceptUnderSupported },
            Mts => RuleSet { select_metric: Support, escape: MinimalTransfer, postprocess: AcceptUnderSupported },
        }
    }
}

impl FromStr for Combination {
    type Err = CstvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EWT" => Ok(Combination::Ewt),
            "EWTC" => Ok(Combination::Ewtc),
            "EWTS" => Ok(Combination::Ewts),
            "MT" => Ok(Combination::Mt),
            "MTC" => Ok(Combination::Mtc),
            "MTS" => Ok(Combination::Mts),
            other => Err(CstvError::InvalidCombination(other.to_string())),
        }
    }
}
