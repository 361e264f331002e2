//! The five error kinds `cstv` and its collaborators can raise (`SPEC_FULL.md` §7, §11).

use thiserror::Error;

/// Everything that can go wrong calling into this crate. Fail-fast: none of these leave a
/// caller-owned [`crate::project::Instance`] or [`crate::ballot::Profile`] partially mutated.
#[derive(Debug, Error, PartialEq)]
pub enum CstvError {
    /// Neither a named combination nor a complete custom rule tuple was supplied, or both were.
    #[error("exactly one of a named combination or a complete custom rule set must be supplied")]
    InvalidConfiguration,

    /// A combination name did not match one of the six closed-set variants.
    #[error("unrecognized CSTV combination name: {0:?}")]
    InvalidCombination(String),

    /// Donor totals differ beyond the relative equal-endowment tolerance.
    #[error("donor endowments are unequal: max={max}, min={min}")]
    UnequalEndowments {
        /// The largest observed donor total.
        max: f64,
        /// The smallest observed donor total.
        min: f64,
    },

    /// `resoluteness = false` was requested; irresolute mode is not implemented.
    #[error("irresolute (multi-outcome) mode is not supported")]
    Unsupported,

    /// A ballot of a kind this crate does not balance itself was passed where a cumulative
    /// donation vector was required.
    #[error("ballot kind cannot be converted to cumulative donations without external balancing")]
    TypeMismatch,
}
