//! Exact-rational or `f64` arithmetic, chosen once per [`crate::project::Instance`] and threaded
//! explicitly through every call that needs it — see `SPEC_FULL.md` §9/§10 on why this is not a
//! process-global knob.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero as _};

/// The arithmetic backend an election runs under. Fixed for the lifetime of one
/// [`crate::project::Instance`]; never global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericMode {
    /// Arbitrary-precision rational arithmetic. Deterministic and audit-grade; the minimal-transfer
    /// iteration cap in [`crate::redistribution`] should never fire under this mode.
    Exact,
    /// IEEE-754 double precision. Faster, and close enough for most elections, but subject to the
    /// slack constants in [`tolerances`].
    Float,
}

/// A nonnegative (in practice) scalar amount: either an exact rational or an `f64`, tagged by the
/// variant that produced it. Arithmetic between mismatched variants panics — an election never
/// mixes modes, so this is a programming-error guard, not a recoverable condition.
#[derive(Debug, Clone)]
pub enum Amount {
    /// Exact rational value.
    Exact(BigRational),
    /// Floating-point value.
    Float(f64),
}

impl Amount {
    /// The additive identity under `mode`.
    pub fn zero(mode: NumericMode) -> Self {
        match mode {
            NumericMode::Exact => Amount::Exact(BigRational::new(BigInt::from(0), BigInt::from(1))),
            NumericMode::Float => Amount::Float(0.0),
        }
    }

    /// Build an amount from a plain integer.
    pub fn from_i64(mode: NumericMode, n: i64) -> Self {
        match mode {
            NumericMode::Exact => Amount::Exact(BigRational::from_integer(BigInt::from(n))),
            NumericMode::Float => Amount::Float(n as f64),
        }
    }

    /// Build an amount from an exact integer ratio `numerator / denominator`.
    pub fn ratio(mode: NumericMode, numerator: i64, denominator: i64) -> Self {
        match mode {
            NumericMode::Exact => {
                Amount::Exact(BigRational::new(BigInt::from(numerator), BigInt::from(denominator)))
            }
            NumericMode::Float => Amount::Float(numerator as f64 / denominator as f64),
        }
    }

    /// The [`NumericMode`] this value was produced under.
    pub fn mode(&self) -> NumericMode {
        match self {
            Amount::Exact(_) => NumericMode::Exact,
            Amount::Float(_) => NumericMode::Float,
        }
    }

    /// True if this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Amount::Exact(r) => r.is_zero(),
            Amount::Float(f) => *f == 0.0,
        }
    }

    /// True if this amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Amount::Exact(r) => r.is_positive(),
            Amount::Float(f) => *f > 0.0,
        }
    }

    /// Convert to `f64`. Used for comparisons against the fixed tolerance constants in
    /// [`tolerances`], which apply identically regardless of numeric mode.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Amount::Exact(r) => r.to_f64().expect("finite rational amount"),
            Amount::Float(f) => *f,
        }
    }

    /// Multiply by an integer scale factor (used to fold ballot multiplicity into a donation).
    #[must_use]
    pub fn scale(&self, factor: u64) -> Self {
        self.clone() * Amount::from_i64(self.mode(), factor as i64)
    }

    /// Round `self` up to the nearest multiple of `step` (an `f64` grid), reconstructed in the
    /// same numeric mode. Used by the minimal-transfer quantization guard (`SPEC_FULL.md` §4.6).
    #[must_use]
    pub fn quantize_up(&self, step: f64) -> Self {
        let steps = (self.to_f64() / step).ceil();
        match self.mode() {
            NumericMode::Float => Amount::Float(steps * step),
            NumericMode::Exact => {
                let denominator = (1.0 / step).round() as i128;
                let numerator = (steps * (1.0 / step).round()) as i128;
                Amount::Exact(BigRational::new(BigInt::from(numerator), BigInt::from(denominator)))
            }
        }
    }

    fn assert_same_mode(&self, other: &Amount) {
        assert_eq!(
            self.mode(),
            other.mode(),
            "mixed numeric modes within one election: this is an engine bug, not recoverable user input"
        );
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Exact(r) => write!(f, "{r}"),
            Amount::Float(x) => write!(f, "{x}"),
        }
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.assert_same_mode(other);
        match (self, other) {
            (Amount::Exact(a), Amount::Exact(b)) => a == b,
            (Amount::Float(a), Amount::Float(b)) => a == b,
            _ => unreachable!(),
        }
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.assert_same_mode(other);
        match (self, other) {
            (Amount::Exact(a), Amount::Exact(b)) => a.partial_cmp(b),
            (Amount::Float(a), Amount::Float(b)) => a.partial_cmp(b),
            _ => unreachable!(),
        }
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Amount {
            type Output = Amount;
            fn $method(self, rhs: Amount) -> Amount {
                self.assert_same_mode(&rhs);
                match (self, rhs) {
                    (Amount::Exact(a), Amount::Exact(b)) => Amount::Exact(a $op b),
                    (Amount::Float(a), Amount::Float(b)) => Amount::Float(a $op b),
                    _ => unreachable!(),
                }
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);
impl_binop!(Mul, mul, *);
impl_binop!(Div, div, /);

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        match self {
            Amount::Exact(a) => Amount::Exact(-a),
            Amount::Float(a) => Amount::Float(-a),
        }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(mut iter: I) -> Amount {
        let first = iter.next().expect("sum() over Amount requires a seed mode; use sum_amounts");
        iter.fold(first, |a, b| a + b)
    }
}

/// Sum an iterator of amount references, seeded at zero under `mode`. Prefer this over
/// `Iterator::sum` when the iterator may be empty.
pub fn sum_amounts<'a>(mode: NumericMode, amounts: impl Iterator<Item = &'a Amount>) -> Amount {
    amounts.cloned().fold(Amount::zero(mode), |a, b| a + b)
}

/// The fixed tolerance constants from `SPEC_FULL.md` §6/§9. These are `f64` literals compared
/// against `Amount::to_f64()` and never vary with [`NumericMode`].
pub mod tolerances {
    /// Relative tolerance for the equal-endowment precondition (§3 invariant 5).
    pub const EQUAL_ENDOWMENT_EPSILON: f64 = 1e-10;
    /// Multiplicative slack applied to support in the eligibility predicate (§4.2).
    pub const ELIGIBILITY_SLACK: f64 = 1e-5;
    /// Literal (not relative) threshold on excess that gates redistribution vs. zero-out (§4.3 step 6).
    pub const EXCESS_REDISTRIBUTION_THRESHOLD: f64 = 0.01;
    /// Residue guard and quantization step used by minimal-transfer's lift loop (§4.6 step 5).
    pub const MT_RESIDUE_GUARD: f64 = 1e-14;
    /// Hard iteration cap for minimal-transfer's lift loop (§4.6 step 5, §5).
    pub const MT_MAX_ITERATIONS: u32 = 10_000;
}
