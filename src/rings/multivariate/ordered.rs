use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::{PolyError, Result};
use crate::rings::float_real::Real64;

use super::*;

///
/// A polynomial of a [`PolyRing`], stored as the list of its nonzero terms.
///
/// The terms are sorted descending w.r.t. the monomial order of the ring that
/// created the polynomial, thus the leading term is always the first entry. Apart from
/// cloning, polynomials are manipulated only through their ring.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    data: Vec<(f64, Monomial)>,
    arity: usize
}

impl Polynomial {

    ///
    /// The number of indeterminates of the ring this polynomial belongs to.
    ///
    pub fn arity(&self) -> usize {
        self.arity
    }

    ///
    /// The number of nonzero terms.
    ///
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn data(&self) -> &[(f64, Monomial)] {
        &self.data
    }
}

///
/// Represents the multivariate polynomial ring `R[X0, ..., X(n-1)]` in `n = arity` unknowns
/// over the (approximate) real numbers [`Real64`].
///
/// Polynomials are stored sparsely, as lists of their terms ordered by the given monomial
/// ordering. Choosing the ordering on construction means that the leading term of any
/// element is available in constant time, which is what Groebner basis algorithms
/// (see [`crate::algorithms::buchberger::buchberger()`]) access most frequently.
///
/// All arithmetic operations assume that the given polynomials belong to this ring, i.e.
/// have the same arity, and panic otherwise. Use [`PolyRing::check_arity()`] or
/// [`PolyRing::from_terms()`] to validate data coming from outside.
///
/// # Example
/// ```
/// # use sparse_groebner::rings::multivariate::*;
/// # use sparse_groebner::rings::multivariate::ordered::*;
/// let ring = PolyRing::new(2, DegRevLex);
/// let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
/// let f = ring.mul_ref(&ring.add_ref(&x, &y), &ring.sub_ref(&x, &y));
/// assert_eq!("X0^2 - X1^2", format!("{}", ring.format(&f)));
/// ```
///
#[derive(Debug, Clone, PartialEq)]
pub struct PolyRing<O: MonomialOrder = DegRevLex> {
    arity: usize,
    order: O,
    base_ring: Real64
}

impl<O: MonomialOrder> PolyRing<O> {

    ///
    /// Creates a new [`PolyRing`] with `arity` indeterminates, using the default zero and
    /// instability thresholds of [`Real64`].
    ///
    pub fn new(arity: usize, order: O) -> Self {
        Self::new_with(arity, order, Real64::default())
    }

    ///
    /// Creates a new [`PolyRing`], using the given [`Real64`] for all coefficient arithmetic.
    ///
    pub fn new_with(arity: usize, order: O, base_ring: Real64) -> Self {
        Self { arity, order, base_ring }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    pub fn base_ring(&self) -> &Real64 {
        &self.base_ring
    }

    ///
    /// Returns the number of numeric instabilities that occurred in coefficient arithmetic,
    /// see [`Real64`].
    ///
    pub fn numeric_instabilities(&self) -> usize {
        self.base_ring.numeric_instabilities()
    }

    pub fn zero(&self) -> Polynomial {
        Polynomial { data: Vec::new(), arity: self.arity }
    }

    pub fn one(&self) -> Polynomial {
        self.constant(1.)
    }

    pub fn constant(&self, c: f64) -> Polynomial {
        self.create_term(c, Monomial::one(self.arity))
    }

    ///
    /// Returns the `i`-th indeterminate `Xi`, where indexing starts at `0`.
    ///
    pub fn indeterminate(&self, i: usize) -> Polynomial {
        self.create_term(1., Monomial::indeterminate(self.arity, i))
    }

    pub fn create_monomial<I>(&self, exponents: I) -> Monomial
        where I: IntoIterator<Item = Exponent>
    {
        let result = Monomial::new(exponents.into_iter().collect());
        assert_eq!(self.arity, result.len());
        return result;
    }

    pub fn create_term(&self, c: f64, m: Monomial) -> Polynomial {
        assert_eq!(self.arity, m.len());
        if self.base_ring.is_zero(c) {
            return self.zero();
        }
        return Polynomial { data: vec![(c, m)], arity: self.arity };
    }

    ///
    /// Creates the polynomial given by the sum of the given terms. The terms may be given in
    /// any order, terms with the same monomial are summed up and terms whose coefficient is
    /// zero (w.r.t. [`Real64::is_zero()`]) are dropped.
    ///
    /// Fails with [`PolyError::ArityMismatch`] if any monomial does not have exactly
    /// [`PolyRing::arity()`] entries.
    ///
    pub fn from_terms<I>(&self, terms: I) -> Result<Polynomial>
        where I: IntoIterator<Item = (f64, Monomial)>
    {
        let mut data = Vec::new();
        for (c, m) in terms {
            if m.len() != self.arity {
                return Err(PolyError::ArityMismatch { expected: self.arity, actual: m.len() });
            }
            data.push((c, m));
        }
        data.sort_by(|(_, lhs), (_, rhs)| self.order.compare(rhs, lhs));
        let mut result: Vec<(f64, Monomial)> = Vec::with_capacity(data.len());
        for (c, m) in data {
            match result.last_mut() {
                Some(last) if last.1 == m => {
                    last.0 = self.base_ring.add(last.0, c);
                },
                _ => result.push((c, m))
            }
        }
        self.remove_zeros(&mut result);
        return Ok(Polynomial { data: result, arity: self.arity });
    }

    ///
    /// Creates the polynomial with the given terms, which must be sorted strictly descending.
    /// In contrast to [`PolyRing::from_terms()`], only coefficients that are exactly zero are
    /// dropped, so tiny coefficients survive.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn from_descending_terms(&self, mut terms: Vec<(f64, Monomial)>) -> Polynomial {
        debug_assert!(terms.iter().all(|(_, m)| m.len() == self.arity));
        debug_assert!(terms.windows(2).all(|w| self.order.compare(&w[0].1, &w[1].1) == Ordering::Greater));
        terms.retain(|(c, _)| *c != 0.);
        return Polynomial { data: terms, arity: self.arity };
    }

    ///
    /// Checks that `f` belongs to a ring with the same number of indeterminates as this one.
    ///
    pub fn check_arity(&self, f: &Polynomial) -> Result<()> {
        if f.arity != self.arity {
            return Err(PolyError::ArityMismatch { expected: self.arity, actual: f.arity });
        }
        return Ok(());
    }

    ///
    /// Returns the terms of `f`, starting with the leading term.
    ///
    pub fn terms<'a>(&'a self, f: &'a Polynomial) -> impl 'a + ExactSizeIterator<Item = (f64, &'a Monomial)> + DoubleEndedIterator {
        f.data.iter().map(|(c, m)| (*c, m))
    }

    pub fn is_zero(&self, f: &Polynomial) -> bool {
        f.data.len() == 0
    }

    pub fn is_one(&self, f: &Polynomial) -> bool {
        f.data.len() == 1 && f.data[0].1.is_one() && f.data[0].0 == 1.
    }

    ///
    /// Returns the leading term of `f`, i.e. its largest term w.r.t. the monomial order of
    /// this ring, or [`PolyError::EmptyPolynomial`] if `f` is zero.
    ///
    #[allow(non_snake_case)]
    pub fn LT<'a>(&self, f: &'a Polynomial) -> Result<(f64, &'a Monomial)> {
        f.data.first().map(|(c, m)| (*c, m)).ok_or(PolyError::EmptyPolynomial)
    }

    pub fn lm<'a>(&self, f: &'a Polynomial) -> Result<&'a Monomial> {
        Ok(self.LT(f)?.1)
    }

    pub fn lc(&self, f: &Polynomial) -> Result<f64> {
        Ok(self.LT(f)?.0)
    }

    ///
    /// Removes the leading term from `f` and returns it.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn pop_leading_term(&self, f: &mut Polynomial) -> Result<(f64, Monomial)> {
        if f.data.len() == 0 {
            return Err(PolyError::EmptyPolynomial);
        }
        return Ok(f.data.remove(0));
    }

    ///
    /// Returns the coefficient of `m` in `f`, which is zero if `m` does not occur in `f`.
    ///
    pub fn coefficient_at(&self, f: &Polynomial, m: &Monomial) -> f64 {
        f.data.binary_search_by(|(_, fm)| self.order.compare(m, fm))
            .map(|i| f.data[i].0)
            .unwrap_or(0.)
    }

    ///
    /// Returns the total degree of `f`, i.e. the maximal degree of any monomial of `f`.
    /// The zero polynomial has no degree.
    ///
    pub fn deg(&self, f: &Polynomial) -> Option<Exponent> {
        f.data.iter().map(|(_, m)| m.deg()).max()
    }

    ///
    /// Returns the indices of all indeterminates that occur in `f`, in ascending order.
    ///
    pub fn appearing_indeterminates(&self, f: &Polynomial) -> Vec<usize> {
        (0..self.arity).filter(|i| f.data.iter().any(|(_, m)| m[*i] > 0)).collect()
    }

    pub fn evaluate(&self, f: &Polynomial, values: &[f64]) -> Result<f64> {
        if values.len() != self.arity {
            return Err(PolyError::ArityMismatch { expected: self.arity, actual: values.len() });
        }
        self.check_arity(f)?;
        return Ok(f.data.iter().map(|(c, m)| {
            c * (0..self.arity).map(|i| values[i].powi(m[i] as i32)).product::<f64>()
        }).sum());
    }

    pub fn add_ref(&self, lhs: &Polynomial, rhs: &Polynomial) -> Polynomial {
        self.add_scaled(lhs, rhs, 1., &Monomial::one(self.arity))
    }

    pub fn sub_ref(&self, lhs: &Polynomial, rhs: &Polynomial) -> Polynomial {
        self.add_scaled(lhs, rhs, -1., &Monomial::one(self.arity))
    }

    pub fn negate(&self, mut f: Polynomial) -> Polynomial {
        for (c, _) in &mut f.data {
            *c = -*c;
        }
        return f;
    }

    ///
    /// Multiplies every coefficient of `f` by `factor`.
    ///
    pub fn scale(&self, mut f: Polynomial, factor: f64) -> Polynomial {
        self.assert_in_ring(&f);
        for (c, _) in &mut f.data {
            *c *= factor;
        }
        self.remove_zeros(&mut f.data);
        return f;
    }

    ///
    /// Multiplies `f` by the monomial `m`. Since monomial orders are compatible with
    /// multiplication, the order of the terms does not change.
    ///
    pub fn mul_monomial(&self, mut f: Polynomial, m: &Monomial) -> Polynomial {
        self.assert_in_ring(&f);
        for (_, fm) in &mut f.data {
            fm.mul_assign(m);
        }
        return f;
    }

    pub fn mul_ref(&self, lhs: &Polynomial, rhs: &Polynomial) -> Polynomial {
        if lhs.data.len() > rhs.data.len() {
            rhs.data.iter().fold(self.zero(), |current, (c, m)| self.add_scaled(&current, lhs, *c, m))
        } else {
            lhs.data.iter().fold(self.zero(), |current, (c, m)| self.add_scaled(&current, rhs, *c, m))
        }
    }

    ///
    /// Computes `lhs * rhs`, or returns [`PolyError::ExponentOverflow`] if an exponent of
    /// the product would not fit into an [`Exponent`].
    ///
    pub fn checked_mul_ref(&self, lhs: &Polynomial, rhs: &Polynomial) -> Result<Polynomial> {
        self.assert_in_ring(lhs);
        self.assert_in_ring(rhs);
        let max_exponent = |f: &Polynomial, i: usize| f.data.iter().map(|(_, m)| m[i]).max().unwrap_or(0);
        for i in 0..self.arity {
            if max_exponent(lhs, i).checked_add(max_exponent(rhs, i)).is_none() {
                return Err(PolyError::ExponentOverflow { indeterminate: i });
            }
        }
        return Ok(self.mul_ref(lhs, rhs));
    }

    ///
    /// Returns the sum of all given polynomials, which is zero if there are none.
    ///
    pub fn sum<I>(&self, els: I) -> Polynomial
        where I: IntoIterator<Item = Polynomial>
    {
        els.into_iter().fold(self.zero(), |current, f| self.add_ref(&current, &f))
    }

    ///
    /// Returns the product of all given polynomials, which is one if there are none.
    ///
    pub fn prod<I>(&self, els: I) -> Polynomial
        where I: IntoIterator<Item = Polynomial>
    {
        els.into_iter().fold(self.one(), |current, f| self.mul_ref(&current, &f))
    }

    ///
    /// Scales `f` such that its leading coefficient is `1`.
    ///
    pub fn normalize(&self, f: Polynomial) -> Result<Polynomial> {
        let lc = self.lc(&f)?;
        let mut result = self.scale(f, 1. / lc);
        result.data[0].0 = 1.;
        return Ok(result);
    }

    ///
    /// Computes `lhs + factor * m * rhs`.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn add_scaled(&self, lhs: &Polynomial, rhs: &Polynomial, factor: f64, m: &Monomial) -> Polynomial {
        self.assert_in_ring(lhs);
        self.assert_in_ring(rhs);
        Polynomial {
            data: self.add_scaled_terms(&lhs.data, &rhs.data, factor, m),
            arity: self.arity
        }
    }

    ///
    /// Computes `f - factor * m * g`, assuming that the leading terms of `f` and
    /// `factor * m * g` are equal. These are not computed, but dropped directly, thus
    /// the leading term of the result is guaranteed to be smaller than the one of `f`,
    /// independent of any rounding errors.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn cancel_leading_term(&self, f: &Polynomial, factor: f64, m: &Monomial, g: &Polynomial) -> Polynomial {
        self.assert_in_ring(f);
        self.assert_in_ring(g);
        debug_assert!(self.order.compare(&f.data[0].1, &g.data[0].1.clone().mul(m)) == Ordering::Equal);
        Polynomial {
            data: self.add_scaled_terms(&f.data[1..], &g.data[1..], -factor, m),
            arity: self.arity
        }
    }

    ///
    /// Checks whether `lhs` and `rhs` have the same terms, where coefficients may differ by
    /// up to `precision` times the machine epsilon, relative to the largest coefficient
    /// that occurs in any of both polynomials.
    ///
    pub fn is_approx_eq(&self, lhs: &Polynomial, rhs: &Polynomial, precision: u64) -> bool {
        if lhs.arity != rhs.arity {
            return false;
        }
        let scale = lhs.data.iter().chain(rhs.data.iter()).map(|(c, _)| c.abs()).fold(0., f64::max);
        let threshold = precision as f64 * f64::EPSILON * scale;
        let difference = self.add_scaled_terms_unchecked(&lhs.data, &rhs.data, -1.);
        return difference.iter().all(|(c, _)| c.abs() <= threshold);
    }

    pub fn format<'a>(&'a self, f: &'a Polynomial) -> PolyDisplay<'a, O> {
        PolyDisplay { ring: self, poly: f }
    }

    fn assert_in_ring(&self, f: &Polynomial) {
        assert_eq!(self.arity, f.arity, "polynomial does not belong to this ring");
    }

    fn remove_zeros(&self, data: &mut Vec<(f64, Monomial)>) {
        data.retain(|(c, _)| !self.base_ring.is_zero(*c));
    }

    ///
    /// Merges `lhs` and `factor * rhs` without dropping zero terms or reporting
    /// instabilities, which is what we want for comparisons.
    ///
    fn add_scaled_terms_unchecked(&self, lhs: &[(f64, Monomial)], rhs: &[(f64, Monomial)], factor: f64) -> Vec<(f64, Monomial)> {
        let mut result = Vec::with_capacity(lhs.len() + rhs.len());
        let mut i_l = 0;
        let mut i_r = 0;
        while i_l < lhs.len() && i_r < rhs.len() {
            match self.order.compare(&lhs[i_l].1, &rhs[i_r].1) {
                Ordering::Equal => {
                    result.push((lhs[i_l].0 + factor * rhs[i_r].0, lhs[i_l].1.clone()));
                    i_l += 1;
                    i_r += 1;
                },
                Ordering::Greater => {
                    result.push(lhs[i_l].clone());
                    i_l += 1;
                },
                Ordering::Less => {
                    result.push((factor * rhs[i_r].0, rhs[i_r].1.clone()));
                    i_r += 1;
                }
            }
        }
        result.extend(lhs[i_l..].iter().cloned());
        result.extend(rhs[i_r..].iter().map(|(c, m)| (factor * c, m.clone())));
        return result;
    }

    fn add_scaled_terms(&self, lhs: &[(f64, Monomial)], rhs: &[(f64, Monomial)], factor: f64, m: &Monomial) -> Vec<(f64, Monomial)> {
        let mut result = Vec::with_capacity(lhs.len() + rhs.len());

        let mut i_l = 0;
        let mut i_r = 0;
        while i_l < lhs.len() && i_r < rhs.len() {
            let rhs_monomial = rhs[i_r].1.clone().mul(m);
            match self.order.compare(&lhs[i_l].1, &rhs_monomial) {
                Ordering::Equal => {
                    let c = self.base_ring.add(lhs[i_l].0, factor * rhs[i_r].0);
                    if !self.base_ring.is_zero(c) {
                        result.push((c, rhs_monomial));
                    }
                    i_l += 1;
                    i_r += 1;
                },
                Ordering::Greater => {
                    result.push(lhs[i_l].clone());
                    i_l += 1;
                },
                Ordering::Less => {
                    let c = factor * rhs[i_r].0;
                    if !self.base_ring.is_zero(c) {
                        result.push((c, rhs_monomial));
                    }
                    i_r += 1;
                }
            }
        }
        result.extend(lhs[i_l..].iter().cloned());
        for (c, rhs_m) in &rhs[i_r..] {
            let c = factor * c;
            if !self.base_ring.is_zero(c) {
                result.push((c, rhs_m.clone().mul(m)));
            }
        }
        return result;
    }
}

///
/// Return value of [`PolyRing::format()`], displays a polynomial
/// in the form `2 * X0^2 * X1 - X2 + 1`.
///
pub struct PolyDisplay<'a, O: MonomialOrder> {
    ring: &'a PolyRing<O>,
    poly: &'a Polynomial
}

impl<'a, O: MonomialOrder> Display for PolyDisplay<'a, O> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.ring.is_zero(self.poly) {
            return write!(f, "0");
        }
        for (i, (c, m)) in self.ring.terms(self.poly).enumerate() {
            if i == 0 && c < 0. {
                write!(f, "-")?;
            } else if i > 0 && c < 0. {
                write!(f, " - ")?;
            } else if i > 0 {
                write!(f, " + ")?;
            }
            let c = c.abs();
            if m.is_one() {
                write!(f, "{}", c)?;
                continue;
            }
            if c != 1. {
                write!(f, "{} * ", c)?;
            }
            let mut first = true;
            for (j, e) in m.exponents().iter().enumerate() {
                if *e == 0 {
                    continue;
                }
                if !first {
                    write!(f, " * ")?;
                }
                first = false;
                if *e == 1 {
                    write!(f, "X{}", j)?;
                } else {
                    write!(f, "X{}^{}", j, e)?;
                }
            }
        }
        return Ok(());
    }
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    ///
    /// Checks the ring axioms for the given elements, up to rounding errors.
    ///
    pub fn test_poly_ring_axioms<O, I>(ring: &PolyRing<O>, edge_case_elements: I)
        where O: MonomialOrder,
            I: Iterator<Item = Polynomial>
    {
        let elements = edge_case_elements.collect::<Vec<_>>();
        let zero = ring.zero();
        let one = ring.one();

        // check self-subtraction
        for a in &elements {
            assert!(ring.is_zero(&ring.sub_ref(a, a)));
        }

        // check identity elements
        for a in &elements {
            crate::assert_poly_eq!(ring, a, ring.add_ref(a, &zero));
            crate::assert_poly_eq!(ring, a, ring.mul_ref(a, &one));
        }

        // check commutativity
        for a in &elements {
            for b in &elements {
                crate::assert_poly_eq!(ring, ring.add_ref(a, b), ring.add_ref(b, a));
                crate::assert_poly_eq!(ring, ring.mul_ref(a, b), ring.mul_ref(b, a));
            }
        }

        // check associativity and distributivity
        for a in &elements {
            for b in &elements {
                for c in &elements {
                    crate::assert_poly_eq!(ring, ring.add_ref(a, &ring.add_ref(b, c)), ring.add_ref(&ring.add_ref(a, b), c), 1000);
                    crate::assert_poly_eq!(ring, ring.mul_ref(a, &ring.mul_ref(b, c)), ring.mul_ref(&ring.mul_ref(a, b), c), 1000);
                    crate::assert_poly_eq!(ring, ring.mul_ref(a, &ring.add_ref(b, c)), ring.add_ref(&ring.mul_ref(a, b), &ring.mul_ref(a, c)), 1000);
                }
            }
        }
    }
}

#[cfg(test)]
fn edge_case_elements<'a, O: MonomialOrder>(ring: &'a PolyRing<O>) -> impl 'a + Iterator<Item = Polynomial> {
    let monomials = [
        ring.create_monomial([1, 0, 0]),
        ring.create_monomial([1, 0, 1]),
        ring.create_monomial([2, 0, 1]),
        ring.create_monomial([4, 2, 0])
    ];
    let mut result = vec![ring.zero(), ring.one()];
    for m1 in &monomials {
        result.push(ring.create_term(1., m1.clone()));
    }
    for m1 in &monomials {
        for m2 in &monomials {
            result.push(ring.from_terms([(1., m1.clone()), (-2., m2.clone()), (0.5, Monomial::one(3))]).unwrap());
        }
    }
    return result.into_iter();
}

#[test]
fn test_ring_axioms() {
    let ring = PolyRing::new(3, DegRevLex);
    generic_tests::test_poly_ring_axioms(&ring, edge_case_elements(&ring));
    let ring = PolyRing::new(3, Lex);
    generic_tests::test_poly_ring_axioms(&ring, edge_case_elements(&ring));
}

#[test]
fn test_add() {
    let ring = PolyRing::new(3, Lex);
    let lhs = ring.from_terms([
        (1., Monomial::new(vec![1, 0, 0]))
    ]).unwrap();

    let rhs = ring.from_terms([
        (1., Monomial::new(vec![1, 0, 0])),
        (1., Monomial::new(vec![1, 0, 1])),
    ]).unwrap();

    let expected = ring.from_terms([
        (2., Monomial::new(vec![1, 0, 0])),
        (1., Monomial::new(vec![1, 0, 1]))
    ]).unwrap();

    let actual = ring.add_ref(&lhs, &rhs);
    assert_eq!(expected, actual);

    let lhs = ring.from_terms([
        (1., Monomial::new(vec![1, 0, 0])),
        (2., Monomial::new(vec![1, 0, 1])),
        (4., Monomial::new(vec![0, 2, 1])),
        (8., Monomial::new(vec![0, 0, 0]))
    ]).unwrap();

    let rhs = ring.from_terms([
        (-1., Monomial::new(vec![1, 0, 0])),
        (3., Monomial::new(vec![1, 0, 1])),
        (9., Monomial::new(vec![0, 0, 1]))
    ]).unwrap();

    let expected = ring.from_terms([
        (5., Monomial::new(vec![1, 0, 1])),
        (4., Monomial::new(vec![0, 2, 1])),
        (8., Monomial::new(vec![0, 0, 0])),
        (9., Monomial::new(vec![0, 0, 1]))
    ]).unwrap();

    let actual = ring.add_ref(&lhs, &rhs);
    assert_eq!(expected, actual);

    // x + y - x = y
    let ring = PolyRing::new(2, DegRevLex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    assert_eq!(y, ring.sum([x.clone(), y.clone(), ring.negate(x.clone())]));
    assert!(ring.is_zero(&ring.sum(std::iter::empty())));
}

#[test]
fn test_from_terms() {
    let ring = PolyRing::new(3, Lex);

    let actual = ring.from_terms([
        (0., Monomial::new(vec![0, 2, 0])),
        (1., Monomial::new(vec![1, 0, 0])),
        (1., Monomial::new(vec![0, 0, 0])),
        (1., Monomial::new(vec![0, 0, 0])),
        (1., Monomial::new(vec![1, 1, 1])),
        (1e-16, Monomial::new(vec![0, 0, 1])),
        (-1., Monomial::new(vec![1, 1, 1]))
    ]).unwrap();

    let expected = [
        (1., Monomial::new(vec![1, 0, 0])),
        (2., Monomial::new(vec![0, 0, 0]))
    ];
    assert_eq!(expected.len(), ring.terms(&actual).len());
    for (e, a) in expected.iter().zip(ring.terms(&actual)) {
        assert_eq!(e.0, a.0);
        assert_eq!(&e.1, a.1);
    }

    assert_eq!(ring.zero(), ring.from_terms(std::iter::empty()).unwrap());
    assert_eq!(
        Err(PolyError::ArityMismatch { expected: 3, actual: 2 }),
        ring.from_terms([(1., Monomial::new(vec![1, 0]))])
    );
}

#[test]
fn test_leading_term() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = ring.from_terms([
        (1., ring.create_monomial([1, 0])),
        (-2., ring.create_monomial([1, 1])),
        (3., ring.create_monomial([0, 3]))
    ]).unwrap();
    assert_eq!((3., &ring.create_monomial([0, 3])), ring.LT(&f).unwrap());
    assert_eq!(&ring.create_monomial([0, 3]), ring.lm(&f).unwrap());
    assert_eq!(3., ring.lc(&f).unwrap());
    assert_eq!(Err(PolyError::EmptyPolynomial), ring.LT(&ring.zero()));

    let ring = PolyRing::new(2, Lex);
    let f = ring.from_terms([
        (1., ring.create_monomial([1, 0])),
        (-2., ring.create_monomial([1, 1])),
        (3., ring.create_monomial([0, 3]))
    ]).unwrap();
    assert_eq!((-2., &ring.create_monomial([1, 1])), ring.LT(&f).unwrap());
    assert_eq!(-2., ring.coefficient_at(&f, &ring.create_monomial([1, 1])));
    assert_eq!(3., ring.coefficient_at(&f, &ring.create_monomial([0, 3])));
    assert_eq!(0., ring.coefficient_at(&f, &ring.create_monomial([0, 0])));
}

#[test]
fn test_mul() {
    let ring = PolyRing::new(2, DegRevLex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    let lhs = ring.add_ref(&x, &ring.one());
    let rhs = ring.sub_ref(&x, &y);
    let expected = ring.from_terms([
        (1., ring.create_monomial([2, 0])),
        (-1., ring.create_monomial([1, 1])),
        (1., ring.create_monomial([1, 0])),
        (-1., ring.create_monomial([0, 1]))
    ]).unwrap();
    assert_eq!(expected, ring.mul_ref(&lhs, &rhs));
    assert!(ring.is_one(&ring.prod(std::iter::empty())));
    assert_eq!(ring.mul_ref(&lhs, &rhs), ring.prod([lhs.clone(), rhs.clone()]));
    assert!(ring.is_zero(&ring.mul_ref(&lhs, &ring.zero())));

    let f = ring.mul_monomial(rhs.clone(), &ring.create_monomial([0, 2]));
    assert_eq!(ring.mul_ref(&rhs, &ring.mul_ref(&y, &y)), f);
}

#[test]
fn test_checked_mul() {
    let ring = PolyRing::new(2, DegRevLex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    let lhs = ring.add_ref(&x, &ring.one());
    assert_eq!(Ok(ring.mul_ref(&lhs, &y)), ring.checked_mul_ref(&lhs, &y));
    assert_eq!(Ok(ring.zero()), ring.checked_mul_ref(&lhs, &ring.zero()));

    let big = ring.create_term(1., ring.create_monomial([0, Exponent::MAX - 1]));
    assert_eq!(Ok(ring.mul_ref(&big, &lhs)), ring.checked_mul_ref(&big, &lhs));
    assert_eq!(Err(PolyError::ExponentOverflow { indeterminate: 1 }), ring.checked_mul_ref(&big, &ring.add_ref(&x, &ring.mul_ref(&y, &y))));
}

#[test]
fn test_from_descending_terms() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = ring.from_descending_terms(vec![(2., ring.create_monomial([1, 0])), (1e-20, ring.create_monomial([0, 1])), (0., ring.create_monomial([0, 0]))]);
    assert_eq!(2, f.len());
    assert_eq!(1e-20, ring.coefficient_at(&f, &ring.create_monomial([0, 1])));
    assert_eq!(1, ring.from_terms(ring.terms(&f).map(|(c, m)| (c, m.clone()))).unwrap().len());
}

#[test]
fn test_normalize() {
    let ring = PolyRing::new(2, Lex);
    let f = ring.from_terms([
        (4., ring.create_monomial([1, 0])),
        (2., ring.create_monomial([0, 1]))
    ]).unwrap();
    let f = ring.normalize(f).unwrap();
    assert_eq!(1., ring.lc(&f).unwrap());
    assert_eq!(0.5, ring.coefficient_at(&f, &ring.create_monomial([0, 1])));
    assert_eq!(Err(PolyError::EmptyPolynomial), ring.normalize(ring.zero()));
}

#[test]
fn test_cancel_leading_term() {
    let ring = PolyRing::new(2, Lex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    // f = x^2 y + y, g = 3 x y + 1
    let f = ring.add_ref(&ring.mul_monomial(y.clone(), &ring.create_monomial([2, 0])), &y);
    let g = ring.add_ref(&ring.scale(ring.mul_ref(&x, &y), 3.), &ring.one());
    let actual = ring.cancel_leading_term(&f, 1. / 3., &ring.create_monomial([1, 0]), &g);
    let expected = ring.sub_ref(&y, &ring.scale(x.clone(), 1. / 3.));
    crate::assert_poly_eq!(ring, expected, actual);
}

#[test]
fn test_evaluate() {
    let ring = PolyRing::new(3, Lex);
    let poly = ring.from_terms([
        (1., Monomial::new(vec![0, 2, 0])),
        (2., Monomial::new(vec![1, 0, 0])),
        (3., Monomial::new(vec![1, 1, 1]))
    ]).unwrap();
    assert_eq!(3., ring.evaluate(&poly, &[1., 1., 0.]).unwrap());
    assert_eq!(0., ring.evaluate(&poly, &[-2., 2., 0.]).unwrap());
    assert_eq!(Err(PolyError::ArityMismatch { expected: 3, actual: 2 }), ring.evaluate(&poly, &[1., 1.]));
    assert_eq!(vec![0, 1, 2], ring.appearing_indeterminates(&poly));
    assert_eq!(Some(3), ring.deg(&poly));
    assert_eq!(None, ring.deg(&ring.zero()));
}

#[test]
fn test_check_arity() {
    let ring = PolyRing::new(3, Lex);
    let other = PolyRing::new(2, Lex);
    assert_eq!(Ok(()), ring.check_arity(&ring.one()));
    assert_eq!(Err(PolyError::ArityMismatch { expected: 3, actual: 2 }), ring.check_arity(&other.one()));
}

#[test]
fn test_approx_eq() {
    let ring = PolyRing::new(2, DegRevLex);
    let x = ring.indeterminate(0);
    let f = ring.add_ref(&x, &ring.constant(0.1 + 0.2));
    let g = ring.add_ref(&x, &ring.constant(0.3));
    assert!(f != g);
    assert!(ring.is_approx_eq(&f, &g, 10));
    assert!(!ring.is_approx_eq(&f, &x, 10));
    assert!(ring.is_approx_eq(&ring.zero(), &ring.zero(), 0));
}

#[test]
fn test_format() {
    let ring = PolyRing::new(3, DegRevLex);
    let f = ring.from_terms([
        (2., ring.create_monomial([2, 1, 0])),
        (-1., ring.create_monomial([0, 0, 1])),
        (0.5, ring.create_monomial([0, 0, 0]))
    ]).unwrap();
    assert_eq!("2 * X0^2 * X1 - X2 + 0.5", format!("{}", ring.format(&f)));
    assert_eq!("-X1", format!("{}", ring.format(&ring.negate(ring.indeterminate(1)))));
    assert_eq!("0", format!("{}", ring.format(&ring.zero())));
    assert_eq!("1", format!("{}", ring.format(&ring.one())));
}
