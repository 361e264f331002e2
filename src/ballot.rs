//! Donor ballots, the cumulative donation vectors the core engine actually consumes, and the
//! profile (one per election) that bundles them.

use std::collections::BTreeMap;

use crate::error::CstvError;
use crate::numeric::{sum_amounts, Amount, NumericMode};
use crate::project::{Instance, ProjectId};

/// A mutable per-donor mapping from project to nonnegative contribution, keyed throughout by
/// [`ProjectId`] (`SPEC_FULL.md` §3, §9). Always carries every project in its owning [`Instance`],
/// defaulting missing entries to zero rather than treating absence as meaningful.
#[derive(Debug, Clone)]
pub struct DonationVector {
    amounts: BTreeMap<ProjectId, Amount>,
    mode: NumericMode,
}

impl DonationVector {
    /// An empty donation vector under `mode`; callers typically follow with [`Self::set`] for every
    /// project in the instance.
    pub fn new(mode: NumericMode) -> Self {
        DonationVector { amounts: BTreeMap::new(), mode }
    }

    /// This donor's contribution to `id`, or zero if unset.
    pub fn get(&self, id: ProjectId) -> Amount {
        self.amounts.get(&id).cloned().unwrap_or_else(|| Amount::zero(self.mode))
    }

    /// Overwrite this donor's contribution to `id`.
    pub fn set(&mut self, id: ProjectId, amount: Amount) {
        self.amounts.insert(id, amount);
    }

    /// Remove and return `id`'s entry, or zero if it was unset.
    pub fn take(&mut self, id: ProjectId) -> Amount {
        self.amounts.remove(&id).unwrap_or_else(|| Amount::zero(self.mode))
    }

    /// Sum of every entry: this donor's current total endowment.
    #[must_use]
    pub fn total(&self) -> Amount {
        sum_amounts(self.mode, self.amounts.values())
    }

    /// Sum of every entry except `id`.
    #[must_use]
    pub fn total_excluding(&self, id: ProjectId) -> Amount {
        sum_amounts(self.mode, self.amounts.iter().filter(|(k, _)| **k != id).map(|(_, v)| v))
    }

    /// Iterate `(project, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectId, &Amount)> {
        self.amounts.iter().map(|(k, v)| (*k, v))
    }

    /// Iterate `(project, &mut amount)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ProjectId, &mut Amount)> {
        self.amounts.iter_mut().map(|(k, v)| (*k, v))
    }

    /// Set every entry to zero, preserving keys (used when a donor's voice is considered fully
    /// spent, e.g. accept-under-supported).
    pub fn zero_all(&mut self) {
        let mode = self.mode;
        for v in self.amounts.values_mut() {
            *v = Amount::zero(mode);
        }
    }

    /// The numeric mode this vector's amounts are expressed in.
    pub fn mode(&self) -> NumericMode {
        self.mode
    }
}

/// Which of the three ballot kinds a donor submitted. Only [`Ballot::Cumulative`] converts
/// successfully inside this crate; normalizing the other two is the external balancer's job
/// (`SPEC_FULL.md` §1, §3a).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotKind {
    /// A set of approved projects, no weighting.
    Approval,
    /// A per-project score that does not necessarily sum to a shared endowment.
    Cardinal,
    /// A per-project donation that sums to the voter's endowment. The only kind CSTV consumes.
    Cumulative,
}

/// One donor's raw ballot, in whichever of the three kinds it was collected as.
#[derive(Debug, Clone)]
pub enum Ballot {
    /// Approved project ids, unweighted.
    Approval(Vec<ProjectId>),
    /// Per-project scores that are not a cumulative donation split.
    Cardinal(BTreeMap<ProjectId, Amount>),
    /// Per-project donations that already sum to a shared endowment.
    Cumulative(BTreeMap<ProjectId, Amount>),
}

impl Ballot {
    /// Which kind this ballot is.
    pub fn kind(&self) -> BallotKind {
        match self {
            Ballot::Approval(_) => BallotKind::Approval,
            Ballot::Cardinal(_) => BallotKind::Cardinal,
            Ballot::Cumulative(_) => BallotKind::Cumulative,
        }
    }

    /// Convert to a [`DonationVector`] covering every project in `instance`, filling in an
    /// explicit zero for anything the ballot didn't mention. Only [`Ballot::Cumulative`] succeeds;
    /// the other two kinds require external balancing (`SPEC_FULL.md` §3a) and fail with
    /// [`CstvError::TypeMismatch`].
    pub fn to_cumulative(&self, instance: &Instance) -> Result<DonationVector, CstvError> {
        let Ballot::Cumulative(donations) = self else {
            return Err(CstvError::TypeMismatch);
        };
        let mut vector = DonationVector::new(instance.mode());
        for id in instance.ids() {
            let amount = donations.get(&id).cloned().unwrap_or_else(|| Amount::zero(instance.mode()));
            vector.set(id, amount);
        }
        Ok(vector)
    }
}

/// The ordered multiset of donor ballots for one election: one [`Ballot`] per distinct donor
/// pattern, plus how many voters that pattern represents.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    ballots: Vec<Ballot>,
    multiplicities: Vec<u64>,
}

impl Profile {
    /// An empty profile.
    pub fn new() -> Self {
        Profile::default()
    }

    /// Add a ballot representing `multiplicity` voters (multiplicity folds into the donation
    /// amounts at [`Self::materialize`] time, not here).
    pub fn push(&mut self, ballot: Ballot, multiplicity: u64) {
        self.ballots.push(ballot);
        self.multiplicities.push(multiplicity);
    }

    /// Number of distinct ballot entries (not voters).
    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    /// True if this profile has no ballots.
    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    /// Convert every ballot to a cumulative [`DonationVector`] scaled by its multiplicity. This is
    /// the seam `SPEC_FULL.md` §6 calls "profile normalization": the caller's profile is never
    /// mutated, a fresh owned structure is produced here.
    pub fn materialize(&self, instance: &Instance) -> Result<Vec<DonationVector>, CstvError> {
        self.ballots
            .iter()
            .zip(&self.multiplicities)
            .map(|(ballot, &multiplicity)| {
                let mut vector = ballot.to_cumulative(instance)?;
                for id in instance.ids() {
                    let scaled = vector.get(id).scale(multiplicity);
                    vector.set(id, scaled);
                }
                Ok(vector)
            })
            .collect()
    }
}
