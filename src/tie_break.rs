//! Pluggable total order over projects, consulted whenever a selection rule returns more than one
//! tied project (`SPEC_FULL.md` §4.8).

use crate::ballot::DonationVector;
use crate::project::{Instance, ProjectId};

/// Breaks ties among a nonempty tied subset of projects. Sees the full candidate set and the
/// current donations for context, but is free to use only `tied`.
pub trait TieBreaker {
    /// Pick one project from `tied`. `tied` is guaranteed nonempty; implementations may panic
    /// otherwise.
    fn untie(
        &self,
        candidates: &[ProjectId],
        instance: &Instance,
        donations: &[DonationVector],
        tied: &[ProjectId],
    ) -> ProjectId;
}

/// The default tie-breaker: lexicographic order by project name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicographicTieBreaker;

impl TieBreaker for LexicographicTieBreaker {
    fn untie(
        &self,
        _candidates: &[ProjectId],
        instance: &Instance,
        _donations: &[DonationVector],
        tied: &[ProjectId],
    ) -> ProjectId {
        *tied
            .iter()
            .min_by_key(|&&id| instance.project(id).name())
            .expect("tied set is nonempty")
    }
}
