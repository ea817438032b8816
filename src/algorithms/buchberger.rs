use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::{info, info_span, instrument};

use crate::algorithms::poly_div::multivariate_remainder;
use crate::computation::*;
use crate::error::Result;
use crate::rings::multivariate::*;
use crate::rings::multivariate::ordered::*;

///
/// The S-polynomial of the `i`-th and `j`-th element of a basis, where `i < j`.
///
#[stability::unstable(feature = "enable")]
#[derive(PartialEq, Clone, Copy, Eq, Hash)]
pub struct SPoly(pub usize, pub usize);

impl Debug for SPoly {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S({}, {})", self.0, self.1)
    }
}

impl SPoly {

    ///
    /// Returns the lcm of the leading monomials of both basis elements.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn lcm_monomial<O>(&self, ring: &PolyRing<O>, basis: &[Polynomial]) -> Result<Monomial>
        where O: MonomialOrder
    {
        Ok(ring.lm(&basis[self.0])?.clone().lcm(ring.lm(&basis[self.1])?))
    }

    ///
    /// Checks Buchberger's product criterion, i.e. whether the leading monomials of both
    /// basis elements are coprime. In this case, the S-polynomial reduces to zero modulo
    /// these two elements, thus it can be skipped.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn has_coprime_leading_monomials<O>(&self, ring: &PolyRing<O>, basis: &[Polynomial]) -> Result<bool>
        where O: MonomialOrder
    {
        Ok(ring.lm(&basis[self.0])?.is_coprime(ring.lm(&basis[self.1])?))
    }

    ///
    /// Computes the S-polynomial
    /// ```text
    ///   S(f, g) = L / LT(f) * f - L / LT(g) * g
    /// ```
    /// where `L = lcm(LM(f), LM(g))`. The leading terms of both summands cancel exactly,
    /// i.e. the result never contains the monomial `L`.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn poly<O>(&self, ring: &PolyRing<O>, basis: &[Polynomial]) -> Result<Polynomial>
        where O: MonomialOrder
    {
        let f = &basis[self.0];
        let g = &basis[self.1];
        let (f_lc, f_lm) = ring.LT(f)?;
        let (g_lc, g_lm) = ring.LT(g)?;
        let lcm = f_lm.clone().lcm(g_lm);
        let f_factor = lcm.clone().checked_div(f_lm)?;
        let g_factor = lcm.checked_div(g_lm)?;
        let f_scaled = ring.mul_monomial(ring.scale(f.clone(), 1. / f_lc), &f_factor);
        return Ok(ring.cancel_leading_term(&f_scaled, 1. / g_lc, &g_factor, g));
    }
}

///
/// Computes a Groebner basis of the ideal generated by `generators` w.r.t. the monomial
/// order of `ring`, using Buchberger's algorithm.
///
/// The returned basis starts with the nonzero generators, in the given order, followed by all
/// nonzero remainders of S-polynomials that were found during the computation. It is neither
/// reduced nor minimal, for that see [`reduce_basis()`], [`minimize_basis()`] or [`buchberger_simple()`].
///
/// S-polynomials are processed in the order they were created. Before reducing an S-polynomial,
/// the given [`ComputationController`] is asked whether to continue; if it aborts, no partial
/// result is returned.
///
/// # Explanation of logging output
///
/// The computation runs in an info-level span `buchberger`, in which the following symbols
/// are logged as info-level events:
///  - `-` means an S-polynomial was reduced to zero
///  - `s` means an S-polynomial reduced to a nonzero value, which was added to the basis
///  - `c` means an S-polynomial was skipped, since the leading monomials are coprime
///  - `(b=n)` means that the basis now has length `n`
///  - `(S=n)` means that there are `n` S-polynomials left to reduce
///
/// Use [`crate::tracing::LogAlgorithmSubscriber`] to print these in a compact way.
///
pub fn buchberger<O, Controller>(ring: &PolyRing<O>, generators: Vec<Polynomial>, controller: Controller) -> Result<Vec<Polynomial>>
    where O: MonomialOrder,
        Controller: ComputationController
{
    for f in &generators {
        ring.check_arity(f)?;
    }
    let span = info_span!("buchberger", len = generators.len(), vars = ring.arity());
    let _span = span.enter();

    // only append to this, such that the indices of open S-polynomials remain valid
    let mut basis = generators.into_iter().filter(|f| !ring.is_zero(f)).collect::<Vec<_>>();
    let mut open = VecDeque::new();
    for j in 0..basis.len() {
        for i in 0..j {
            open.push_back(SPoly(i, j));
        }
    }

    let mut processed_pairs = 0;
    while let Some(spoly) = open.pop_front() {
        processed_pairs += 1;
        controller.checkpoint(&Progress {
            processed_pairs: processed_pairs,
            pending_pairs: open.len(),
            basis_len: basis.len()
        })?;

        if spoly.has_coprime_leading_monomials(ring, &basis)? {
            info!("c");
            continue;
        }

        let f = multivariate_remainder(ring, &spoly.poly(ring, &basis)?, &basis)?;
        if ring.is_zero(&f) {
            info!("-");
        } else {
            basis.push(f);
            let k = basis.len() - 1;
            open.extend((0..k).map(|i| SPoly(i, k)));
            info!("s");
            info!("(b={})(S={})", basis.len(), open.len());
        }
    }
    return Ok(basis);
}

///
/// Replaces each element of the basis by its remainder modulo all other elements and
/// removes zeros, until nothing changes anymore. In particular, afterwards no term of
/// any element is divisible by the leading monomial of another element.
///
/// If the input is a Groebner basis, so is the output, and they generate the same ideal.
///
#[instrument(skip_all, level = "trace")]
pub fn reduce_basis<O>(ring: &PolyRing<O>, mut polys: Vec<Polynomial>) -> Result<Vec<Polynomial>>
    where O: MonomialOrder
{
    for f in &polys {
        ring.check_arity(f)?;
    }
    polys.retain(|f| !ring.is_zero(f));
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i < polys.len() {
            let last_i = polys.len() - 1;
            polys.swap(i, last_i);
            let (reducers, to_reduce) = polys.split_at_mut(last_i);
            let to_reduce = &mut to_reduce[0];

            let reduced = multivariate_remainder(ring, to_reduce, reducers)?;
            if reduced != *to_reduce {
                changed = true;
                *to_reduce = reduced;
            }

            // undo swap so that the outer loop still iterates over every poly
            if !ring.is_zero(to_reduce) {
                polys.swap(i, last_i);
                i += 1;
            } else {
                _ = polys.pop();
            }
        }
    }
    return Ok(polys);
}

///
/// Removes every element whose leading monomial is divisible by the leading monomial of
/// another remaining element, scales the remaining elements to be monic and sorts them
/// by their leading monomials, largest first. Of elements with equal leading monomials,
/// the first one is kept.
///
/// If the input is a Groebner basis, the output is a minimal Groebner basis of the same
/// ideal. If the input is moreover reduced (see [`reduce_basis()`]), so is the output.
///
#[instrument(skip_all, level = "trace")]
pub fn minimize_basis<O>(ring: &PolyRing<O>, polys: Vec<Polynomial>) -> Result<Vec<Polynomial>>
    where O: MonomialOrder
{
    for f in &polys {
        ring.check_arity(f)?;
    }
    let polys = polys.into_iter().filter(|f| !ring.is_zero(f)).collect::<Vec<_>>();
    let mut keep = vec![true; polys.len()];
    for i in 0..polys.len() {
        let lm_i = ring.lm(&polys[i])?;
        for j in 0..polys.len() {
            if i == j || !keep[j] {
                continue;
            }
            let lm_j = ring.lm(&polys[j])?;
            if lm_j.divides(lm_i) && (lm_j != lm_i || j < i) {
                keep[i] = false;
                break;
            }
        }
    }
    let mut result = polys.into_iter().zip(keep.into_iter())
        .filter(|(_, keep)| *keep)
        .map(|(f, _)| {
            let f = ring.normalize(f)?;
            Ok((ring.lm(&f)?.clone(), f))
        })
        .collect::<Result<Vec<_>>>()?;
    result.sort_by(|(lhs, _), (rhs, _)| ring.order().compare(rhs, lhs));
    return Ok(result.into_iter().map(|(_, f)| f).collect());
}

///
/// Computes a Groebner basis of the ideal generated by `generators` w.r.t. the monomial
/// order of `ring`, and optionally reduces and/or minimizes it.
///
/// With `reduce` and `minimize` both set, the result is the unique reduced Groebner basis
/// of the ideal, i.e. all elements are monic, sorted descending by their leading monomials,
/// and no term of any element is divisible by the leading monomial of another element.
///
/// For a variant of this function that allows to abort the computation, see [`buchberger_with()`].
///
/// # Example
/// ```
/// # use sparse_groebner::assert_poly_eq;
/// # use sparse_groebner::rings::multivariate::*;
/// # use sparse_groebner::rings::multivariate::ordered::*;
/// # use sparse_groebner::algorithms::buchberger::*;
/// let ring = PolyRing::new(2, Lex);
/// let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
/// let f = ring.sub_ref(&ring.mul_ref(&x, &x), &y);
/// let g = ring.sub_ref(&x, &ring.mul_ref(&y, &y));
/// let gb = buchberger_simple(&ring, vec![f, g], true, true).unwrap();
/// assert_eq!(2, gb.len());
/// // y^4 - y
/// let y4 = ring.prod([y.clone(), y.clone(), y.clone(), y.clone()]);
/// assert_poly_eq!(ring, ring.sub_ref(&y4, &y), gb[1]);
/// ```
///
pub fn buchberger_simple<O>(ring: &PolyRing<O>, generators: Vec<Polynomial>, reduce: bool, minimize: bool) -> Result<Vec<Polynomial>>
    where O: MonomialOrder
{
    buchberger_with(ring, generators, reduce, minimize, DontObserve)
}

///
/// Like [`buchberger_simple()`], but asks the given [`ComputationController`] before reducing
/// each S-polynomial, as described in [`buchberger()`]. Reducing and minimizing are not
/// interrupted.
///
pub fn buchberger_with<O, Controller>(ring: &PolyRing<O>, generators: Vec<Polynomial>, reduce: bool, minimize: bool, controller: Controller) -> Result<Vec<Polynomial>>
    where O: MonomialOrder,
        Controller: ComputationController
{
    let mut result = buchberger(ring, generators, controller)?;
    if reduce {
        result = reduce_basis(ring, result)?;
    }
    if minimize {
        result = minimize_basis(ring, result)?;
    }
    return Ok(result);
}

#[cfg(test)]
use crate::assert_poly_eq;
#[cfg(test)]
use crate::error::PolyError;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn assert_reduces_to_zero<O: MonomialOrder>(ring: &PolyRing<O>, f: &Polynomial, basis: &[Polynomial]) {
    let remainder = multivariate_remainder(ring, f, basis).unwrap();
    assert!(ring.is_zero(&remainder), "{} reduces to {}", ring.format(f), ring.format(&remainder));
}

#[cfg(test)]
fn assert_is_groebner_basis<O: MonomialOrder>(ring: &PolyRing<O>, basis: &[Polynomial]) {
    for j in 0..basis.len() {
        for i in 0..j {
            assert_reduces_to_zero(ring, &SPoly(i, j).poly(ring, basis).unwrap(), basis);
        }
    }
}

#[cfg(test)]
fn assert_basis_eq<O: MonomialOrder>(ring: &PolyRing<O>, expected: &[Polynomial], actual: &[Polynomial]) {
    assert_basis_approx_eq(ring, expected, actual, 100);
}

#[cfg(test)]
fn assert_basis_approx_eq<O: MonomialOrder>(ring: &PolyRing<O>, expected: &[Polynomial], actual: &[Polynomial], precision: u64) {
    assert_eq!(expected.len(), actual.len(), "expected {} elements, got {:?}", expected.len(), actual.iter().map(|f| format!("{}", ring.format(f))).collect::<Vec<_>>());
    for (e, a) in expected.iter().zip(actual.iter()) {
        assert_poly_eq!(ring, e, a, precision);
    }
}

#[cfg(test)]
fn max_coefficient<O: MonomialOrder>(ring: &PolyRing<O>, f: &Polynomial) -> f64 {
    ring.terms(f).map(|(c, _)| c.abs()).fold(0., f64::max)
}

///
/// Asserts that the remainder of `f` modulo `basis` has only coefficients of absolute
/// value at most `relative_error * scale`.
///
#[cfg(test)]
fn assert_reduces_to_approx_zero<O: MonomialOrder>(ring: &PolyRing<O>, f: &Polynomial, basis: &[Polynomial], relative_error: f64, scale: f64) {
    let remainder = multivariate_remainder(ring, f, basis).unwrap();
    assert!(max_coefficient(ring, &remainder) <= relative_error * scale, "{} reduces to {}", ring.format(f), ring.format(&remainder));
}

#[cfg(test)]
fn assert_is_approx_groebner_basis<O: MonomialOrder>(ring: &PolyRing<O>, basis: &[Polynomial], relative_error: f64) {
    for j in 0..basis.len() {
        for i in 0..j {
            let scale = f64::max(max_coefficient(ring, &basis[i]), max_coefficient(ring, &basis[j]));
            assert_reduces_to_approx_zero(ring, &SPoly(i, j).poly(ring, basis).unwrap(), basis, relative_error, scale);
        }
    }
}

///
/// `3x^2 + 0.7y - 1.1, 0.3xy - 2y^2 + 0.9z, z^2/3 - 0.1x + 0.2yz`, which has 8 common zeros
///
#[cfg(test)]
fn decimal_system<O: MonomialOrder>(ring: &PolyRing<O>) -> Vec<Polynomial> {
    vec![
        poly(ring, &[(3., [2, 0, 0]), (0.7, [0, 1, 0]), (-1.1, [0, 0, 0])]),
        poly(ring, &[(0.3, [1, 1, 0]), (-2., [0, 2, 0]), (0.9, [0, 0, 1])]),
        poly(ring, &[(1. / 3., [0, 0, 2]), (-0.1, [1, 0, 0]), (0.2, [0, 1, 1])])
    ]
}

#[cfg(test)]
fn poly<O: MonomialOrder, const N: usize>(ring: &PolyRing<O>, terms: &[(f64, [Exponent; N])]) -> Polynomial {
    ring.from_terms(terms.iter().map(|(c, e)| (*c, ring.create_monomial(e.iter().copied())))).unwrap()
}

#[test]
fn test_spoly() {
    let ring = PolyRing::new(2, DegLex);
    let f = poly(&ring, &[(1., [3, 2]), (-1., [2, 3]), (1., [1, 0])]);
    let g = poly(&ring, &[(3., [4, 1]), (1., [0, 2])]);
    let expected = poly(&ring, &[(-1., [3, 3]), (-1. / 3., [0, 3]), (1., [2, 0])]);
    assert_eq!(ring.create_monomial([4, 2]), SPoly(0, 1).lcm_monomial(&ring, &[f.clone(), g.clone()]).unwrap());
    assert_poly_eq!(ring, expected, SPoly(0, 1).poly(&ring, &[f, g]).unwrap());
}

#[test]
fn test_buchberger_deglex() {
    LogAlgorithmSubscriber::init_test();
    let ring = PolyRing::new(2, DegLex);
    let f1 = poly(&ring, &[(1., [3, 0]), (-2., [1, 1])]);
    let f2 = poly(&ring, &[(1., [2, 1]), (-2., [0, 2]), (1., [1, 0])]);

    let actual = buchberger(&ring, vec![f1.clone(), f2.clone()], DontObserve).unwrap();
    let expected = [
        f1.clone(),
        f2.clone(),
        poly(&ring, &[(-1., [2, 0])]),
        poly(&ring, &[(-2., [1, 1])]),
        poly(&ring, &[(-2., [0, 2]), (1., [1, 0])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
    assert_is_groebner_basis(&ring, &actual);

    let actual = buchberger_simple(&ring, vec![f1, f2], true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [2, 0])]),
        poly(&ring, &[(1., [1, 1])]),
        poly(&ring, &[(1., [0, 2]), (-0.5, [1, 0])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
}

#[test]
fn test_buchberger_linear_lex() {
    LogAlgorithmSubscriber::init_test();
    let ring = PolyRing::new(4, Lex);
    let f1 = poly(&ring, &[(3., [1, 0, 0, 0]), (-6., [0, 1, 0, 0]), (-2., [0, 0, 1, 0])]);
    let f2 = poly(&ring, &[(2., [1, 0, 0, 0]), (-4., [0, 1, 0, 0]), (4., [0, 0, 0, 1])]);
    let f3 = poly(&ring, &[(1., [1, 0, 0, 0]), (-2., [0, 1, 0, 0]), (-1., [0, 0, 1, 0]), (-1., [0, 0, 0, 1])]);

    let actual = buchberger_simple(&ring, vec![f1.clone(), f2.clone(), f3.clone()], true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [1, 0, 0, 0]), (-2., [0, 1, 0, 0]), (2., [0, 0, 0, 1])]),
        poly(&ring, &[(1., [0, 0, 1, 0]), (3., [0, 0, 0, 1])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
    for f in [f1, f2, f3] {
        assert_reduces_to_zero(&ring, &f, &actual);
    }
}

#[test]
fn test_buchberger_lex() {
    LogAlgorithmSubscriber::init_test();
    let ring = PolyRing::new(2, Lex);
    let f1 = poly(&ring, &[(1., [2, 0]), (-1., [0, 2])]);
    let f2 = poly(&ring, &[(1., [2, 0]), (1., [0, 1])]);
    let actual = buchberger_simple(&ring, vec![f1, f2], true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [2, 0]), (1., [0, 1])]),
        poly(&ring, &[(1., [0, 2]), (1., [0, 1])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
}

#[test]
fn test_buchberger_order_dependence() {
    LogAlgorithmSubscriber::init_test();

    // f = x^2 - y, g = x - y^2
    let ring = PolyRing::new(2, Lex);
    let f = poly(&ring, &[(1., [2, 0]), (-1., [0, 1])]);
    let g = poly(&ring, &[(1., [1, 0]), (-1., [0, 2])]);
    let actual = buchberger_simple(&ring, vec![f.clone(), g.clone()], true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [1, 0]), (-1., [0, 2])]),
        poly(&ring, &[(1., [0, 4]), (-1., [0, 1])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
    assert_reduces_to_zero(&ring, &f, &actual);
    assert_reduces_to_zero(&ring, &g, &actual);
    // only under lex, the basis contains a polynomial in the last indeterminate
    assert_eq!(vec![1], ring.appearing_indeterminates(&actual[1]));

    let ring = PolyRing::new(2, DegRevLex);
    let f = poly(&ring, &[(1., [2, 0]), (-1., [0, 1])]);
    let g = poly(&ring, &[(1., [1, 0]), (-1., [0, 2])]);
    let actual = buchberger_simple(&ring, vec![f.clone(), g.clone()], true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [2, 0]), (-1., [0, 1])]),
        poly(&ring, &[(1., [0, 2]), (-1., [1, 0])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
    assert_reduces_to_zero(&ring, &f, &actual);
    assert_reduces_to_zero(&ring, &g, &actual);
    assert!(actual.iter().all(|f| ring.appearing_indeterminates(f).len() == 2));
}

#[test]
fn test_buchberger_edge_cases() {
    let ring = PolyRing::new(2, DegRevLex);
    assert_eq!(Vec::<Polynomial>::new(), buchberger_simple(&ring, Vec::new(), true, true).unwrap());
    assert_eq!(Vec::<Polynomial>::new(), buchberger_simple(&ring, vec![ring.zero(), ring.zero()], true, true).unwrap());

    let x = ring.indeterminate(0);
    assert_eq!(vec![x.clone()], buchberger_simple(&ring, vec![ring.zero(), ring.scale(x.clone(), 3.)], true, true).unwrap());

    // the unit ideal
    let f = poly(&ring, &[(1., [1, 0]), (1., [0, 0])]);
    let actual = buchberger_simple(&ring, vec![x.clone(), f], true, true).unwrap();
    assert_eq!(vec![ring.one()], actual);

    let other = PolyRing::new(3, DegRevLex);
    assert_eq!(
        Err(PolyError::ArityMismatch { expected: 2, actual: 3 }),
        buchberger_simple(&ring, vec![x, other.indeterminate(0)], true, true)
    );
}

#[test]
fn test_buchberger_abort() {
    let ring = PolyRing::new(2, DegLex);
    let f1 = poly(&ring, &[(1., [3, 0]), (-2., [1, 1])]);
    let f2 = poly(&ring, &[(1., [2, 1]), (-2., [0, 2]), (1., [1, 0])]);

    assert_eq!(
        Err(PolyError::Aborted(Aborted::PairLimit(0))),
        buchberger(&ring, vec![f1.clone(), f2.clone()], Limits::unbounded().with_max_pairs(0))
    );
    assert_eq!(
        Err(PolyError::Aborted(Aborted::BasisLimit(4))),
        buchberger(&ring, vec![f1.clone(), f2.clone()], Limits::unbounded().with_max_basis_len(4))
    );
    assert_eq!(5, buchberger(&ring, vec![f1.clone(), f2.clone()], Limits::unbounded().with_max_basis_len(5)).unwrap().len());

    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(
        Err(PolyError::Aborted(Aborted::Cancelled)),
        buchberger(&ring, vec![f1.clone(), f2.clone()], token.clone())
    );
    // no S-pairs, so the controller is never asked
    assert_eq!(vec![f1.clone()], buchberger(&ring, vec![f1], token).unwrap());
}

#[test]
fn test_reduce_basis() {
    let ring = PolyRing::new(2, DegRevLex);
    let x = ring.indeterminate(0);
    let f = poly(&ring, &[(1., [2, 0]), (1., [1, 0])]);
    let g = poly(&ring, &[(1., [0, 2]), (2., [1, 0]), (1., [0, 0])]);
    let actual = reduce_basis(&ring, vec![f, x.clone(), g]).unwrap();
    assert_basis_eq(&ring, &[poly(&ring, &[(1., [0, 2]), (1., [0, 0])]), x], &actual);
}

#[test]
fn test_minimize_basis() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = poly(&ring, &[(2., [1, 0]), (1., [0, 0])]);
    let g = poly(&ring, &[(4., [1, 0])]);
    let h = poly(&ring, &[(1., [2, 1]), (1., [0, 1])]);
    let k = poly(&ring, &[(-1., [0, 3])]);
    let actual = minimize_basis(&ring, vec![k, f, h, g]).unwrap();
    let expected = [
        poly(&ring, &[(1., [0, 3])]),
        poly(&ring, &[(1., [1, 0]), (0.5, [0, 0])])
    ];
    assert_basis_eq(&ring, &expected, &actual);
}

#[test]
fn test_minimize_without_reduce() {
    let ring = PolyRing::new(2, DegLex);
    let f1 = poly(&ring, &[(1., [3, 0]), (-2., [1, 1])]);
    let f2 = poly(&ring, &[(1., [2, 1]), (-2., [0, 2]), (1., [1, 0])]);
    let actual = buchberger_simple(&ring, vec![f1, f2], false, true).unwrap();
    // the minimal basis is [x^2, xy, y^2 - x/2], but is not necessarily reduced
    assert_eq!(3, actual.len());
    assert_eq!(
        vec![ring.create_monomial([2, 0]), ring.create_monomial([1, 1]), ring.create_monomial([0, 2])],
        actual.iter().map(|f| ring.lm(f).unwrap().clone()).collect::<Vec<_>>()
    );
    assert!(actual.iter().all(|f| ring.lc(f).unwrap() == 1.));
    assert_is_groebner_basis(&ring, &actual);
}

#[test]
fn test_random_binomial_ideals() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = oorandom::Rand64::new(1);
    let ring = PolyRing::new(3, DegRevLex);
    let random_monomial = |rng: &mut oorandom::Rand64| ring.create_monomial((0..3).map(|_| rng.rand_range(0..3) as Exponent));
    for _ in 0..20 {
        // binomial ideals have a Groebner basis of binomials with coefficients +-1, so no rounding happens
        let generators = (0..rng.rand_range(2..4)).map(|_| {
            ring.from_terms([(1., random_monomial(&mut rng)), (-1., random_monomial(&mut rng))]).unwrap()
        }).collect::<Vec<_>>();
        let gb = buchberger(&ring, generators.clone(), Limits::unbounded().with_max_pairs(10000)).unwrap();
        assert_is_groebner_basis(&ring, &gb);
        let reduced = buchberger_simple(&ring, generators.clone(), true, true).unwrap();
        assert_is_groebner_basis(&ring, &reduced);
        for f in &generators {
            assert_reduces_to_zero(&ring, f, &reduced);
        }
        for f in &reduced {
            assert_reduces_to_zero(&ring, f, &gb);
            assert_eq!(1., ring.lc(f).unwrap());
        }
        for i in 0..reduced.len() {
            for j in 0..reduced.len() {
                if i != j {
                    assert!(!ring.lm(&reduced[i]).unwrap().divides(ring.lm(&reduced[j]).unwrap()));
                }
            }
        }
    }
}

#[test]
fn test_log_progress() {
    let buffer = crate::tracing::SharedBuffer::default();
    let subscriber = LogAlgorithmSubscriber::new(tracing::Level::WARN..=tracing::Level::INFO, 2, Box::new(buffer.clone()));
    let ring = PolyRing::new(2, DegLex);
    let f1 = poly(&ring, &[(1., [3, 0]), (-2., [1, 1])]);
    let f2 = poly(&ring, &[(1., [2, 1]), (-2., [0, 2]), (1., [1, 0])]);
    tracing::subscriber::with_default(subscriber, || {
        buchberger(&ring, vec![f1, f2], DontObserve).unwrap();
    });
    let output = buffer.contents();
    assert!(output.starts_with("buchberger(len=2, vars=2)s(b=3)(S=2)s(b=4)(S=4)s(b=5)(S=7)---c-c-done("), "unexpected output {:?}", output);
}

#[test]
fn test_buchberger_decimal_coefficients_degrevlex() {
    LogAlgorithmSubscriber::init_test();
    let ring = PolyRing::new(3, DegRevLex);
    let generators = decimal_system(&ring);
    let actual = buchberger_simple(&ring, generators.clone(), true, true).unwrap();
    let expected = [
        poly(&ring, &[(1., [0, 0, 4]), (380371. / 60000., [0, 0, 3]), (9757. / 1250., [0, 2, 0]), (-390091. / 200000., [1, 0, 1]), (-528363. / 500000., [0, 0, 2]), (891. / 1000000., [1, 0, 0]), (70197. / 5000000., [0, 1, 0]), (-3510819. / 1000000., [0, 0, 1]), (-156981. / 5000000., [0, 0, 0])]),
        poly(&ring, &[(1., [0, 3, 0]), (21. / 4000., [0, 2, 0]), (-27. / 400., [1, 0, 1]), (3. / 4., [0, 0, 2]), (-9. / 40., [1, 0, 0]), (-33. / 4000., [0, 1, 0])]),
        poly(&ring, &[(1., [1, 0, 2]), (100. / 9., [0, 0, 3]), (40. / 3., [0, 2, 0]), (-10. / 3., [1, 0, 1]), (-9. / 5., [0, 0, 2]), (7. / 100., [0, 1, 0]), (-6., [0, 0, 1]), (-11. / 100., [0, 0, 0])]),
        poly(&ring, &[(1., [2, 0, 0]), (7. / 30., [0, 1, 0]), (-11. / 30., [0, 0, 0])]),
        poly(&ring, &[(1., [1, 1, 0]), (-20. / 3., [0, 2, 0]), (3., [0, 0, 1])]),
        poly(&ring, &[(1., [0, 1, 1]), (5. / 3., [0, 0, 2]), (-1. / 2., [1, 0, 0])])
    ];
    assert_basis_approx_eq(&ring, &expected, &actual, 1 << 10);
    assert_eq!(0, ring.numeric_instabilities());
    for f in &generators {
        assert_reduces_to_zero(&ring, f, &actual);
    }
    assert_is_groebner_basis(&ring, &actual);
}

#[test]
fn test_buchberger_decimal_coefficients() {
    LogAlgorithmSubscriber::init_test();
    let lms = |ring: &PolyRing<AnyOrder>, basis: &[Polynomial]| basis.iter().map(|f| ring.lm(f).unwrap().clone().unwrap()).collect::<Vec<_>>();

    let ring = PolyRing::new(3, AnyOrder::DegLex);
    let generators = decimal_system(&ring);
    let actual = buchberger_simple(&ring, generators.clone(), true, true).unwrap();
    assert_eq!(vec![vec![0, 0, 4], vec![1, 0, 2], vec![0, 3, 0], vec![2, 0, 0], vec![1, 1, 0], vec![0, 1, 1]], lms(&ring, &actual));
    for f in &generators {
        assert_reduces_to_zero(&ring, f, &actual);
    }
    assert_is_groebner_basis(&ring, &actual);

    // lex produces much larger intermediate coefficients
    let ring = PolyRing::new(3, AnyOrder::Lex);
    let generators = decimal_system(&ring);
    let actual = buchberger_simple(&ring, generators.clone(), true, true).unwrap();
    assert_eq!(vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 8]], lms(&ring, &actual));
    let expected = poly(&ring, &[
        (1., [0, 0, 8]), (-6543. / 20000., [0, 0, 7]), (16887. / 500000., [0, 0, 6]), (24903. / 1000000., [0, 0, 5]), (-213681. / 2500000., [0, 0, 4]),
        (-211761. / 20000000., [0, 0, 3]), (-37791. / 200000000., [0, 0, 2]), (-17037. / 20000000., [0, 0, 1]), (1089. / 1000000., [0, 0, 0])
    ]);
    assert_poly_eq!(ring, expected, actual[2], 1 << 20);
    for f in &generators {
        assert_reduces_to_approx_zero(&ring, f, &actual, 1e-9, 1.);
    }
    assert_is_approx_groebner_basis(&ring, &actual, 1e-9);
}

#[test]
fn test_random_ideals_decimal_coefficients() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = oorandom::Rand64::new(1);
    let coeffs = [-1.7, -0.3, 0.1, 0.7, 1.1, 2.9];
    let points = [-1.3, -0.4, 0.5, 0.7, 1.2];
    for order in [AnyOrder::Lex, AnyOrder::DegLex, AnyOrder::DegRevLex] {
        let ring = PolyRing::new(3, order);
        for _ in 0..10 {
            // three multilinear polynomials with a common zero
            let point = [(); 3].map(|_| points[rng.rand_range(0..5) as usize]);
            let generators = (0..3).map(|_| {
                let term_count = rng.rand_range(1..5);
                let f = ring.from_terms((0..term_count).map(|_| {
                    let c = coeffs[rng.rand_range(0..6) as usize];
                    (c, ring.create_monomial((0..3).map(|_| rng.rand_range(0..2) as Exponent)))
                })).unwrap();
                ring.sub_ref(&f, &ring.constant(ring.evaluate(&f, &point).unwrap()))
            }).collect::<Vec<_>>();

            let gb = buchberger(&ring, generators.clone(), Limits::unbounded().with_max_pairs(10000)).unwrap();
            assert_is_approx_groebner_basis(&ring, &gb, 1e-6);
            let reduced = buchberger_simple(&ring, generators.clone(), true, true).unwrap();
            assert_is_approx_groebner_basis(&ring, &reduced, 1e-6);

            let scale = generators.iter().chain(reduced.iter()).map(|f| max_coefficient(&ring, f)).fold(0., f64::max);
            for f in &generators {
                assert_reduces_to_approx_zero(&ring, f, &reduced, 1e-6, scale);
            }
            // the ideal is not the unit ideal, as all of its elements vanish at the common zero
            for f in &reduced {
                let value = ring.evaluate(f, &point).unwrap();
                let magnitude = ring.terms(f).map(|(c, m)| (c * m.exponents().iter().zip(point.iter()).map(|(e, x)| x.powi(*e as i32)).product::<f64>()).abs()).sum::<f64>();
                assert!(value.abs() <= 1e-6 * magnitude, "{} does not vanish at {:?}", ring.format(f), point);
            }
        }
    }
}

#[test]
fn test_buchberger_with_controller() {
    let ring = PolyRing::new(2, DegLex);
    let f1 = poly(&ring, &[(1., [3, 0]), (-2., [1, 1])]);
    let f2 = poly(&ring, &[(1., [2, 1]), (-2., [0, 2]), (1., [1, 0])]);
    assert_eq!(
        Err(PolyError::Aborted(Aborted::BasisLimit(4))),
        buchberger_with(&ring, vec![f1.clone(), f2.clone()], true, true, Limits::unbounded().with_max_basis_len(4))
    );
    assert_eq!(
        buchberger_simple(&ring, vec![f1.clone(), f2.clone()], true, false).unwrap(),
        buchberger_with(&ring, vec![f1, f2], true, false, Limits::unbounded().with_max_basis_len(5)).unwrap()
    );
}
