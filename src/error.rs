use thiserror::Error;

use crate::computation::Aborted;
use crate::rings::multivariate::Exponent;

///
/// Errors that can occur when working with polynomials of a [`crate::rings::multivariate::ordered::PolyRing`],
/// or when running one of the algorithms in [`crate::algorithms`].
///
/// None of these are recovered from internally; e.g. [`crate::algorithms::buchberger::buchberger()`]
/// aborts the whole computation instead of returning a partial basis.
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyError {
    #[error("expected exponent vectors with {expected} entries, got one with {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("the zero polynomial has no leading term")]
    EmptyPolynomial,
    #[error("monomial {dividend:?} is not divisible by {divisor:?}")]
    Domain { dividend: Vec<Exponent>, divisor: Vec<Exponent> },
    #[error("the ideal is not zero-dimensional: no leading monomial is a pure power of X{indeterminate}")]
    UnboundedBasis { indeterminate: usize },
    #[error("exponent of X{indeterminate} exceeds {max}", max = Exponent::MAX)]
    ExponentOverflow { indeterminate: usize },
    #[error("invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("computation aborted: {0}")]
    Aborted(#[from] Aborted)
}

pub type Result<T> = std::result::Result<T, PolyError>;

#[test]
fn test_error_messages() {
    assert_eq!("expected exponent vectors with 3 entries, got one with 2", format!("{}", PolyError::ArityMismatch { expected: 3, actual: 2 }));
    assert_eq!("monomial [1, 0] is not divisible by [0, 1]", format!("{}", PolyError::Domain { dividend: vec![1, 0], divisor: vec![0, 1] }));
    assert_eq!("exponent of X1 exceeds 4294967295", format!("{}", PolyError::ExponentOverflow { indeterminate: 1 }));
    assert_eq!("invalid zero_threshold: -1", format!("{}", PolyError::InvalidThreshold { name: "zero_threshold", value: -1. }));
    assert_eq!("computation aborted: cancelled", format!("{}", PolyError::from(Aborted::Cancelled)));
}
