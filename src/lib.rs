#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![deny(unsafe_code)]

mod ballot;
mod combination;
mod driver;
mod eligibility;
mod error;
mod greedy;
mod numeric;
mod postprocess;
mod project;
mod redistribution;
mod selection;
mod tie_break;

pub use ballot::{Ballot, BallotKind, DonationVector, Profile};
pub use combination::{Combination, EligibilityRule, EscapeProcedure, PostprocessKind, RuleSet};
pub use driver::{cstv, BudgetAllocation, CstvConfig};
pub use error::CstvError;
pub use greedy::{greedy_ge, greedy_gs, greedy_gsc};
pub use numeric::{tolerances, Amount, NumericMode};
pub use project::{Instance, Project, ProjectId};
pub use selection::SelectMetric;
pub use tie_break::{LexicographicTieBreaker, TieBreaker};
