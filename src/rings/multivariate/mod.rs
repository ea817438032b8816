use std::cmp::{max, min, Ordering};
use std::fmt::Debug;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{PolyError, Result};

///
/// Contains [`ordered::PolyRing`], an implementation of multivariate polynomials
/// using a sparse representation, where terms are kept sorted w.r.t. a monomial order.
///
pub mod ordered;

pub type Exponent = u32;

///
/// A monomial, i.e. a power-product of indeterminates.
///
/// From a low-level point of view, this is just a wrapper around a short sequence
/// of nonnegative numbers. Monomials for the same multivariate polynomial ring always
/// contain all indeterminates, i.e. contain (possibly trailing) zeros for indeterminates
/// that do not occur in the monomial.
///
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Monomial {
    exponents: Vec<Exponent>
}

impl Monomial {

    pub fn new(exponents: Vec<Exponent>) -> Self {
        Self { exponents }
    }

    ///
    /// Returns the monomial `1` with `len` indeterminates.
    ///
    pub fn one(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    ///
    /// Returns the monomial `Xi` with `len` indeterminates.
    ///
    pub fn indeterminate(len: usize, i: usize) -> Self {
        assert!(i < len);
        let mut result = Self::one(len);
        result.exponents[i] = 1;
        return result;
    }

    pub fn deg(&self) -> Exponent {
        self.exponents.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    pub fn exponents(&self) -> &[Exponent] {
        &self.exponents
    }

    pub fn unwrap(self) -> Vec<Exponent> {
        self.exponents
    }

    pub fn is_one(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    ///
    /// Checks whether `self` divides `rhs`, i.e. whether every exponent of `self`
    /// is at most the corresponding exponent of `rhs`.
    ///
    pub fn divides(&self, rhs: &Self) -> bool {
        assert_eq!(self.len(), rhs.len());
        (0..self.len()).all(|i| self.exponents[i] <= rhs.exponents[i])
    }

    pub fn is_coprime(&self, rhs: &Self) -> bool {
        assert_eq!(self.len(), rhs.len());
        (0..self.len()).all(|i| self.exponents[i] == 0 || rhs.exponents[i] == 0)
    }

    ///
    /// If this monomial is a power `Xi^e` of a single indeterminate with `e > 0`,
    /// returns `(i, e)`.
    ///
    pub fn pure_power(&self) -> Option<(usize, Exponent)> {
        let mut result = None;
        for (i, e) in self.exponents.iter().enumerate() {
            if *e > 0 {
                if result.is_some() {
                    return None;
                }
                result = Some((i, *e));
            }
        }
        return result;
    }

    ///
    /// Computes the lcm of two monomials.
    ///
    pub fn lcm(mut self, rhs: &Self) -> Self {
        assert_eq!(self.len(), rhs.len());
        for i in 0..self.len() {
            self.exponents[i] = max(self.exponents[i], rhs.exponents[i]);
        }
        self
    }

    ///
    /// Computes the product of two monomials.
    ///
    /// # Panics
    ///
    /// If an exponent of the product does not fit into an [`Exponent`]. Use
    /// [`Monomial::checked_mul()`] to get an error instead.
    ///
    pub fn mul(mut self, rhs: &Self) -> Self {
        self.mul_assign(rhs);
        self
    }

    pub fn mul_assign(&mut self, rhs: &Self) {
        if let Err(e) = self.try_mul_assign(rhs) {
            panic!("{}", e);
        }
    }

    ///
    /// Computes the product of two monomials, or returns [`PolyError::ExponentOverflow`]
    /// if an exponent of the product does not fit into an [`Exponent`].
    ///
    pub fn checked_mul(mut self, rhs: &Self) -> Result<Self> {
        self.try_mul_assign(rhs)?;
        return Ok(self);
    }

    fn try_mul_assign(&mut self, rhs: &Self) -> Result<()> {
        assert_eq!(self.len(), rhs.len());
        for i in 0..self.len() {
            self.exponents[i] = self.exponents[i].checked_add(rhs.exponents[i]).ok_or(PolyError::ExponentOverflow { indeterminate: i })?;
        }
        return Ok(());
    }

    ///
    /// Computes the quotient of two monomials. If the quotient is not a monomial, i.e.
    /// would contain indeterminates raised to negative powers, this returns [`PolyError::Domain`].
    ///
    pub fn checked_div(self, rhs: &Self) -> Result<Self> {
        assert_eq!(self.len(), rhs.len());
        if !rhs.divides(&self) {
            return Err(PolyError::Domain { dividend: self.exponents, divisor: rhs.exponents.clone() });
        }
        let mut result = self;
        for i in 0..result.len() {
            result.exponents[i] -= rhs.exponents[i];
        }
        return Ok(result);
    }

    ///
    /// Returns all monomials that divide this one, i.e. all sequences
    /// of same length such that `result[i] <= self[i]`. These monomials
    /// are given in an order that respects divisibility, i.e a monomial
    /// `m` is given before `t` if `m | t` and `m != t`.
    ///
    pub fn dividing_monomials(self) -> DividingMonomialIter {
        let start = Self::one(self.len());
        DividingMonomialIter { monomial: self, current: Some(start) }
    }
}

///
/// Iterator over all monomials that divide a fixed monomial.
/// Returned by [`Monomial::dividing_monomials()`].
///
pub struct DividingMonomialIter {
    monomial: Monomial,
    current: Option<Monomial>
}

impl Iterator for DividingMonomialIter {

    type Item = Monomial;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.monomial.len();
        let bound = &self.monomial.exponents;
        if let Some(current) = &mut self.current {
            let result = current.clone();
            if n == 0 {
                self.current = None;
                return Some(result);
            }
            let current = &mut current.exponents;
            let mut refill = 0;
            for i in 0..n {
                if refill > 0 && current[i] < bound[i] {
                    refill -= 1;
                    current[i] += 1;
                    let mut j = 0;
                    while refill > 0 {
                        current[j] = min(refill, bound[j]);
                        refill -= current[j];
                        j += 1;
                    }
                    return Some(result);
                } else {
                    refill += current[i];
                    current[i] = 0;
                }
            }

            // all combinations of the current degree are done, so continue with the next degree
            refill += 1;
            let mut j = 0;
            while refill > 0 && j < n {
                current[j] = min(refill, bound[j]);
                refill -= current[j];
                j += 1;
            }
            if j == n && refill != 0 {
                self.current = None;
            }
            return Some(result);
        } else {
            return None;
        }
    }
}

impl Debug for Monomial {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.exponents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

impl Index<usize> for Monomial {

    type Output = Exponent;

    fn index(&self, index: usize) -> &Self::Output {
        &self.exponents[index]
    }
}

///
/// Trait for term orders, that is an ordering on all monomials with
/// a fixed number of variables subject to the constraints
///  - `mp < np` whenever `m < n`
///  - `m <= mp`
/// for all monomials `m, n, p`.
///
/// The latter implies that the order is a well-order, which is what makes
/// multivariate division and Buchberger's algorithm terminate. Since the leading
/// term of a polynomial, and thus every Groebner basis, depends on the order,
/// it is always an explicit parameter of a [`ordered::PolyRing`].
///
pub trait MonomialOrder: Clone + Debug {

    ///
    /// Compares two monomials according to this monomial order. Both monomials
    /// must have the same number of indeterminates.
    ///
    fn compare(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering;
}

///
/// Standard lexicographic order of monomials.
///
/// To compare two monomials lexicographically, just compare the exponents
/// of one indeterminate after the other, and return the first comparison result
/// that is not "equal".
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lex;

impl MonomialOrder for Lex {

    fn compare(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering {
        assert_eq!(lhs.len(), rhs.len());
        for i in 0..lhs.len() {
            if lhs[i] < rhs[i] {
                return Ordering::Less;
            } else if lhs[i] > rhs[i] {
                return Ordering::Greater;
            }
        }
        return Ordering::Equal;
    }
}

///
/// Graded lexicographic order.
///
/// Monomials are first compared by their degree, and in case of equality
/// lexicographically.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegLex;

impl MonomialOrder for DegLex {

    fn compare(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering {
        lhs.deg().cmp(&rhs.deg()).then_with(|| Lex.compare(lhs, rhs))
    }
}

///
/// Graded reverse lexicographic order.
///
/// It is defined by first comparing the degree of monomials, and
/// in case of equality, reverse the result of a lexicographic comparison,
/// using reversed variable order.
///
/// # Example
///
/// The smallest example where this differs from the graded lexicographic order
/// is as follows.
/// ```
/// # use sparse_groebner::rings::multivariate::*;
/// let a = Monomial::new(vec![1, 0, 1]);
/// let b = Monomial::new(vec![0, 2, 0]);
/// assert_eq!(std::cmp::Ordering::Less, DegRevLex.compare(&a, &b));
/// assert_eq!(std::cmp::Ordering::Greater, DegLex.compare(&a, &b));
/// ```
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegRevLex;

impl MonomialOrder for DegRevLex {

    fn compare(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering {
        let lhs_deg = lhs.deg();
        let rhs_deg = rhs.deg();
        if lhs_deg < rhs_deg {
            return Ordering::Less;
        } else if lhs_deg > rhs_deg {
            return Ordering::Greater;
        } else {
            assert_eq!(lhs.len(), rhs.len());
            for i in (0..lhs.len()).rev() {
                if lhs[i] > rhs[i] {
                    return Ordering::Less
                } else if lhs[i] < rhs[i] {
                    return Ordering::Greater;
                }
            }
            return Ordering::Equal;
        }
    }
}

///
/// One of [`Lex`], [`DegLex`] and [`DegRevLex`], chosen at runtime, e.g. from
/// a configuration file.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnyOrder {
    Lex,
    DegLex,
    #[default]
    DegRevLex
}

impl MonomialOrder for AnyOrder {

    fn compare(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering {
        match self {
            AnyOrder::Lex => Lex.compare(lhs, rhs),
            AnyOrder::DegLex => DegLex.compare(lhs, rhs),
            AnyOrder::DegRevLex => DegRevLex.compare(lhs, rhs)
        }
    }
}

///
/// Asserts that two polynomials of the given [`ordered::PolyRing`] are equal, up to
/// a coefficient error of `precision` (default 100) times the machine epsilon,
/// relative to the largest coefficient. See [`ordered::PolyRing::is_approx_eq()`].
///
#[macro_export]
macro_rules! assert_poly_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        $crate::assert_poly_eq!($ring, $lhs, $rhs, 100)
    };
    ($ring:expr, $lhs:expr, $rhs:expr, $precision:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring, lhs, rhs) => {
                assert!(ring.is_approx_eq(lhs, rhs, $precision), "Assertion failed: {} != {}", ring.format(lhs), ring.format(rhs));
            }
        }
    };
}

#[cfg(test)]
fn monomials_of_degree_at_most_two() -> Vec<Monomial> {
    vec![
        Monomial::new(vec![0, 0, 0]),
        Monomial::new(vec![0, 0, 1]),
        Monomial::new(vec![0, 0, 2]),
        Monomial::new(vec![0, 1, 0]),
        Monomial::new(vec![0, 1, 1]),
        Monomial::new(vec![0, 2, 0]),
        Monomial::new(vec![1, 0, 0]),
        Monomial::new(vec![1, 0, 1]),
        Monomial::new(vec![1, 1, 0]),
        Monomial::new(vec![2, 0, 0])
    ]
}

#[cfg(test)]
fn sorted_desc<O: MonomialOrder>(order: O) -> Vec<Vec<Exponent>> {
    let mut monomials = monomials_of_degree_at_most_two();
    monomials.sort_by(|l, r| order.compare(l, r).reverse());
    monomials.into_iter().map(|m| m.unwrap()).collect()
}

#[test]
fn test_lex() {
    assert_eq!(vec![
        vec![2, 0, 0],
        vec![1, 1, 0],
        vec![1, 0, 1],
        vec![1, 0, 0],
        vec![0, 2, 0],
        vec![0, 1, 1],
        vec![0, 1, 0],
        vec![0, 0, 2],
        vec![0, 0, 1],
        vec![0, 0, 0]
    ], sorted_desc(Lex));

    let m1 = Monomial::new(vec![1, 2, 0]);
    let m2 = Monomial::new(vec![0, 3, 4]);
    assert_eq!(Ordering::Greater, Lex.compare(&m1, &m2));
    assert_eq!(Ordering::Less, Lex.compare(&Monomial::new(vec![3, 2, 1]), &Monomial::new(vec![3, 2, 4])));
}

#[test]
fn test_deglex() {
    assert_eq!(vec![
        vec![2, 0, 0],
        vec![1, 1, 0],
        vec![1, 0, 1],
        vec![0, 2, 0],
        vec![0, 1, 1],
        vec![0, 0, 2],
        vec![1, 0, 0],
        vec![0, 1, 0],
        vec![0, 0, 1],
        vec![0, 0, 0]
    ], sorted_desc(DegLex));

    assert_eq!(Ordering::Less, DegLex.compare(&Monomial::new(vec![3, 2, 0]), &Monomial::new(vec![1, 2, 3])));
    assert_eq!(Ordering::Less, DegLex.compare(&Monomial::new(vec![1, 1, 5]), &Monomial::new(vec![1, 2, 4])));
}

#[test]
fn test_degrevlex() {
    assert_eq!(vec![
        vec![2, 0, 0],
        vec![1, 1, 0],
        vec![0, 2, 0],
        vec![1, 0, 1],
        vec![0, 1, 1],
        vec![0, 0, 2],
        vec![1, 0, 0],
        vec![0, 1, 0],
        vec![0, 0, 1],
        vec![0, 0, 0]
    ], sorted_desc(DegRevLex));
    assert_eq!(sorted_desc(DegRevLex), sorted_desc(AnyOrder::DegRevLex));
    assert_eq!(sorted_desc(Lex), sorted_desc(AnyOrder::Lex));
}

#[test]
fn test_any_order_from_config() {
    assert_eq!(AnyOrder::DegLex, serde_json::from_str::<AnyOrder>("\"deglex\"").unwrap());
    assert_eq!(AnyOrder::DegRevLex, AnyOrder::default());
}

#[test]
fn test_divides() {
    let x1 = Monomial::new(vec![1, 0, 0]);
    let x2 = Monomial::new(vec![0, 1, 0]);
    let m1 = Monomial::new(vec![1, 1, 1]);
    let m2 = Monomial::new(vec![4, 2, 1]);
    let m3 = Monomial::new(vec![2, 2, 0]);
    assert!(!x1.divides(&x2));
    assert!(x1.divides(&m1));
    assert!(!m1.divides(&x1));
    assert!(m1.divides(&m1));
    assert!(m1.divides(&m2));
    assert!(!m2.divides(&m1));
    assert!(m3.divides(&m2));
    assert!(!m2.divides(&m3));
}

#[test]
fn test_monomial_arithmetic() {
    let a = Monomial::new(vec![2, 0, 1]);
    let b = Monomial::new(vec![1, 3, 0]);
    assert_eq!(Monomial::new(vec![3, 3, 1]), a.clone().mul(&b));
    assert_eq!(Monomial::new(vec![2, 3, 1]), a.clone().lcm(&b));
    assert_eq!(Monomial::new(vec![1, 0, 1]), a.clone().checked_div(&Monomial::new(vec![1, 0, 0])).unwrap());
    assert_eq!(
        Err(PolyError::Domain { dividend: vec![2, 0, 1], divisor: vec![1, 3, 0] }),
        a.clone().checked_div(&b)
    );
    assert_eq!(3, a.deg());
    assert!(!a.is_coprime(&b));
    assert!(Monomial::new(vec![2, 0, 0]).is_coprime(&Monomial::new(vec![0, 1, 4])));
}

#[test]
fn test_exponent_overflow() {
    let a = Monomial::new(vec![Exponent::MAX - 1, 0]);
    assert_eq!(Ok(Monomial::new(vec![Exponent::MAX, 2])), a.clone().checked_mul(&Monomial::new(vec![1, 2])));
    assert_eq!(Err(PolyError::ExponentOverflow { indeterminate: 0 }), a.clone().checked_mul(&Monomial::new(vec![2, 0])));
    assert_eq!(Err(PolyError::ExponentOverflow { indeterminate: 1 }), Monomial::new(vec![0, 1]).checked_mul(&Monomial::new(vec![0, Exponent::MAX])));
}

#[test]
#[should_panic(expected = "exponent of X0 exceeds")]
fn test_mul_panics_on_overflow() {
    let _ = Monomial::new(vec![Exponent::MAX, 0]).mul(&Monomial::new(vec![1, 0]));
}

#[test]
#[should_panic]
fn test_compare_different_lengths() {
    let _ = DegRevLex.compare(&Monomial::new(vec![1, 0]), &Monomial::new(vec![1, 0, 0]));
}

#[test]
#[should_panic]
fn test_index_out_of_range() {
    let _ = Monomial::new(vec![1, 0])[2];
}

#[test]
fn test_pure_power() {
    assert_eq!(Some((1, 3)), Monomial::new(vec![0, 3, 0]).pure_power());
    assert_eq!(None, Monomial::new(vec![1, 3, 0]).pure_power());
    assert_eq!(None, Monomial::one(3).pure_power());
}

#[test]
fn test_dividing_monomials() {
    let m = Monomial::new(vec![2, 1, 3]);
    assert_eq!(vec![
        vec![0, 0, 0], vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1],
        vec![2, 0, 0], vec![1, 1, 0], vec![1, 0, 1], vec![0, 1, 1], vec![0, 0, 2],
        vec![2, 1, 0], vec![2, 0, 1], vec![1, 1, 1], vec![1, 0, 2], vec![0, 1, 2], vec![0, 0, 3],
        vec![2, 1, 1], vec![2, 0, 2], vec![1, 1, 2], vec![1, 0, 3], vec![0, 1, 3],
        vec![2, 1, 2], vec![2, 0, 3], vec![1, 1, 3],
        vec![2, 1, 3]
    ], m.dividing_monomials().map(|m| m.unwrap()).collect::<Vec<_>>());

    let m = Monomial::new(vec![1, 0, 2]);
    assert_eq!(vec![
        vec![0, 0, 0], vec![1, 0, 0], vec![0, 0, 1],
        vec![1, 0, 1], vec![0, 0, 2], vec![1, 0, 2],
    ], m.dividing_monomials().map(|m| m.unwrap()).collect::<Vec<_>>());

    assert_eq!(vec![vec![0, 0]], Monomial::one(2).dividing_monomials().map(|m| m.unwrap()).collect::<Vec<_>>());
}
