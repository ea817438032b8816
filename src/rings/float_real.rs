use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use crate::error::{PolyError, Result};

///
/// The field of real numbers, approximated by `f64`.
///
/// Since the arithmetic is only approximate, deciding whether a coefficient is zero
/// requires thresholds:
///  - every value `c` with `|c| <= zero_threshold` is considered zero and removed from
///    polynomials
///  - the sum of two values is set to exactly zero if `|a + b| <= cancellation_threshold * max(|a|, |b|)`,
///    by default if seven or more digits have been cancelled
///
/// The same tests are used by all polynomial operations and algorithms. The relative
/// test catches the rounding residues left over by S-polynomial reductions, whose absolute
/// size grows with the size of the coefficients and with the number of reduction steps.
///
/// In addition, whenever the sum of two coefficients cancels partially, i.e.
/// `|a + b| <= instability_threshold * max(|a|, |b|)`, but the result is not set to zero,
/// a warning is logged and counted (see [`Real64::numeric_instabilities()`]). Only few digits
/// of such a result are reliable.
///
#[derive(Debug)]
pub struct Real64 {
    zero_threshold: f64,
    cancellation_threshold: f64,
    instability_threshold: f64,
    instabilities: AtomicUsize
}

impl Real64 {

    pub const DEFAULT_ZERO_THRESHOLD: f64 = 1e-14;
    pub const DEFAULT_CANCELLATION_THRESHOLD: f64 = 1e-7;
    pub const DEFAULT_INSTABILITY_THRESHOLD: f64 = 1e-5;

    ///
    /// Creates the field with the given thresholds.
    ///
    /// # Panics
    ///
    /// If one of the thresholds is invalid, see [`Real64::try_new()`].
    ///
    pub fn new(zero_threshold: f64, cancellation_threshold: f64, instability_threshold: f64) -> Self {
        match Self::try_new(zero_threshold, cancellation_threshold, instability_threshold) {
            Ok(result) => result,
            Err(e) => panic!("{}", e)
        }
    }

    ///
    /// Creates the field with the given thresholds, or returns [`PolyError::InvalidThreshold`]
    /// if one of them is negative or not finite, or if `cancellation_threshold >= 1`
    /// (which would set every sum `a + 0` to zero).
    ///
    pub fn try_new(zero_threshold: f64, cancellation_threshold: f64, instability_threshold: f64) -> Result<Self> {
        check_threshold("zero_threshold", zero_threshold)?;
        check_threshold("cancellation_threshold", cancellation_threshold)?;
        check_threshold("instability_threshold", instability_threshold)?;
        if cancellation_threshold >= 1. {
            return Err(PolyError::InvalidThreshold { name: "cancellation_threshold", value: cancellation_threshold });
        }
        return Ok(Self {
            zero_threshold: zero_threshold,
            cancellation_threshold: cancellation_threshold,
            instability_threshold: instability_threshold,
            instabilities: AtomicUsize::new(0)
        });
    }

    pub fn zero_threshold(&self) -> f64 {
        self.zero_threshold
    }

    pub fn cancellation_threshold(&self) -> f64 {
        self.cancellation_threshold
    }

    pub fn instability_threshold(&self) -> f64 {
        self.instability_threshold
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.zero_threshold
    }

    ///
    /// Computes `lhs + rhs`, where a result that consists only of rounding error is
    /// returned as exactly zero. Reports a numeric instability if the result is kept,
    /// but most of its digits have been cancelled.
    ///
    pub fn add(&self, lhs: f64, rhs: f64) -> f64 {
        let result = lhs + rhs;
        let scale = f64::max(lhs.abs(), rhs.abs());
        if result.abs() <= self.cancellation_threshold * scale {
            return 0.;
        }
        if !self.is_zero(result) && result.abs() <= self.instability_threshold * scale {
            self.report_instability(lhs, rhs, result);
        }
        return result;
    }

    ///
    /// Returns the number of numeric instabilities reported since the creation of this
    /// object or since the last call to [`Real64::reset_numeric_instabilities()`].
    ///
    pub fn numeric_instabilities(&self) -> usize {
        self.instabilities.load(Ordering::Relaxed)
    }

    pub fn reset_numeric_instabilities(&self) {
        self.instabilities.store(0, Ordering::Relaxed);
    }

    fn report_instability(&self, lhs: f64, rhs: f64, result: f64) {
        _ = self.instabilities.fetch_add(1, Ordering::Relaxed);
        warn!(lhs, rhs, result, zero_threshold = self.zero_threshold, "catastrophic cancellation");
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0. {
        return Ok(());
    } else {
        return Err(PolyError::InvalidThreshold { name: name, value: value });
    }
}

impl Default for Real64 {

    fn default() -> Self {
        Self::new(Self::DEFAULT_ZERO_THRESHOLD, Self::DEFAULT_CANCELLATION_THRESHOLD, Self::DEFAULT_INSTABILITY_THRESHOLD)
    }
}

impl Clone for Real64 {

    ///
    /// Clones the thresholds, the counter of the clone starts at zero.
    ///
    fn clone(&self) -> Self {
        Self {
            zero_threshold: self.zero_threshold,
            cancellation_threshold: self.cancellation_threshold,
            instability_threshold: self.instability_threshold,
            instabilities: AtomicUsize::new(0)
        }
    }
}

impl PartialEq for Real64 {

    fn eq(&self, other: &Self) -> bool {
        self.zero_threshold == other.zero_threshold &&
            self.cancellation_threshold == other.cancellation_threshold &&
            self.instability_threshold == other.instability_threshold
    }
}

#[test]
fn test_is_zero() {
    let RR = Real64::default();
    assert!(RR.is_zero(0.));
    assert!(RR.is_zero(-1e-15));
    assert!(RR.is_zero(1e-14));
    assert!(!RR.is_zero(1e-13));
    assert!(RR.is_zero(RR.add(0.1 + 0.2, -0.3)));
}

#[test]
fn test_instability_is_counted() {
    let RR = Real64::default();
    assert_eq!(3., RR.add(1., 2.));
    assert_eq!(0, RR.numeric_instabilities());
    let result = RR.add(1e6, -1e6 + 1.);
    assert!(!RR.is_zero(result));
    assert_eq!(1, RR.numeric_instabilities());
    RR.reset_numeric_instabilities();
    assert_eq!(0, RR.numeric_instabilities());
    assert_eq!(0, RR.clone().numeric_instabilities());
}

#[test]
fn test_cancellation_is_relative() {
    let RR = Real64::default();
    // rounding residues are far above the absolute zero threshold if the summands are large
    let residue = (0.1 + 0.7) * 300. - 240.;
    assert!(residue != 0.);
    assert!(!RR.is_zero(residue));
    assert_eq!(0., RR.add((0.1 + 0.7) * 300., -240.));
    assert_eq!(0., RR.add(1e3, -1e3 * (1. + 1e-14)));
    assert_eq!(0, RR.numeric_instabilities());

    // small values are not affected, as long as they do not cancel
    assert_eq!(2e-20, RR.add(1e-20, 1e-20));
    assert_eq!(1e-20, RR.add(1e-20, 0.));
    assert_eq!(1e-20, RR.add(0., 1e-20));
    assert_eq!(0., RR.add(1e-20, -1e-20));

    assert_eq!(0., RR.add(1., -1. + 1e-9));
    assert_eq!(0, RR.numeric_instabilities());
    assert!(RR.add(1., -1. + 1e-6) != 0.);
    assert_eq!(1, RR.numeric_instabilities());

    let exact = Real64::new(0., 0., 0.);
    assert!(exact.add(1e3, -1e3 * (1. + 1e-14)) != 0.);
}

#[test]
fn test_invalid_thresholds() {
    assert!(Real64::try_new(0., 0., 0.).is_ok());
    assert_eq!(Some(PolyError::InvalidThreshold { name: "zero_threshold", value: -1e-14 }), Real64::try_new(-1e-14, 1e-10, 1e-8).err());
    assert_eq!(Some(PolyError::InvalidThreshold { name: "cancellation_threshold", value: 1. }), Real64::try_new(1e-14, 1., 1e-8).err());
    assert_eq!(Some(PolyError::InvalidThreshold { name: "instability_threshold", value: f64::INFINITY }), Real64::try_new(1e-14, 1e-10, f64::INFINITY).err());
    assert!(matches!(Real64::try_new(f64::NAN, 1e-10, 1e-8), Err(PolyError::InvalidThreshold { name: "zero_threshold", .. })));
}

#[test]
#[should_panic]
fn test_new_panics_on_invalid_threshold() {
    let _ = Real64::new(-1., 1e-10, 1e-8);
}
