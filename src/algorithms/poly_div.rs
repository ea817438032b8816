use tracing::instrument;

use crate::error::Result;
use crate::rings::multivariate::*;
use crate::rings::multivariate::ordered::*;

///
/// Returns the first nonzero divisor whose leading monomial divides `lm`, together with
/// its index, its leading coefficient and the quotient of both monomials.
///
fn find_reducer<'a, O>(ring: &PolyRing<O>, lm: &Monomial, divisors: &'a [Polynomial]) -> Option<(usize, &'a Polynomial, f64, Monomial)>
    where O: MonomialOrder
{
    divisors.iter().enumerate().filter_map(|(i, d)| {
        let (d_lc, d_lm) = ring.LT(d).ok()?;
        if d_lm.divides(lm) {
            let quo_m = lm.clone().checked_div(d_lm).ok()?;
            return Some((i, d, d_lc, quo_m));
        }
        return None;
    }).next()
}

///
/// Runs the division algorithm, calling `record_quotient(i, c, m)` whenever the term
/// `c * m` is added to the `i`-th quotient, and returns the remainder.
///
fn reduce_poly<O, F>(ring: &PolyRing<O>, mut working: Polynomial, divisors: &[Polynomial], mut record_quotient: F) -> Result<Polynomial>
    where O: MonomialOrder,
        F: FnMut(usize, f64, &Monomial)
{
    let mut remainder = Vec::new();
    while let Ok((lc, lm)) = ring.LT(&working) {
        if let Some((i, d, d_lc, quo_m)) = find_reducer(ring, lm, divisors) {
            let factor = lc / d_lc;
            record_quotient(i, factor, &quo_m);
            working = ring.cancel_leading_term(&working, factor, &quo_m, d);
        } else {
            // the leading term of `working` is smaller than all previous remainder terms
            remainder.push(ring.pop_leading_term(&mut working)?);
        }
    }
    return ring.from_terms(remainder);
}

fn check_arities<O>(ring: &PolyRing<O>, f: &Polynomial, divisors: &[Polynomial]) -> Result<()>
    where O: MonomialOrder
{
    ring.check_arity(f)?;
    for d in divisors {
        ring.check_arity(d)?;
    }
    return Ok(());
}

///
/// Computes the generalized division of `f` by the ordered list `divisors`, i.e. quotients
/// `q[i]` and a remainder `r` with
/// ```text
///   f = q[0] * divisors[0] + ... + q[k - 1] * divisors[k - 1] + r
/// ```
/// such that no term of `r` is divisible by the leading monomial of any divisor.
///
/// In each step, the leading term of the current dividend is cancelled by the first
/// divisor in list order whose leading monomial divides it; if there is none, the term
/// is moved to the remainder. In particular, the result depends on the order of the
/// divisors, unless they form a Groebner basis. Zero divisors are skipped, their quotient
/// is zero.
///
/// Quotient terms are never dropped by the zero test of [`crate::rings::float_real::Real64`],
/// even if their coefficient is tiny, so the identity above holds up to rounding errors.
///
/// # Example
/// ```
/// # use sparse_groebner::rings::multivariate::*;
/// # use sparse_groebner::rings::multivariate::ordered::*;
/// # use sparse_groebner::algorithms::poly_div::*;
/// let ring = PolyRing::new(2, DegRevLex);
/// let f = ring.from_terms([(1., ring.create_monomial([2, 1]))]).unwrap();
/// let xy = ring.from_terms([(1., ring.create_monomial([1, 1]))]).unwrap();
/// let (quotients, remainder) = multivariate_division(&ring, &f, &[xy]).unwrap();
/// assert_eq!(ring.indeterminate(0), quotients[0]);
/// assert!(ring.is_zero(&remainder));
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn multivariate_division<O>(ring: &PolyRing<O>, f: &Polynomial, divisors: &[Polynomial]) -> Result<(Vec<Polynomial>, Polynomial)>
    where O: MonomialOrder
{
    check_arities(ring, f, divisors)?;
    let mut quotient_terms = (0..divisors.len()).map(|_| Vec::new()).collect::<Vec<_>>();
    let remainder = reduce_poly(ring, f.clone(), divisors, |i, c, m| quotient_terms[i].push((c, m.clone())))?;
    // the quotient monomials of each divisor are strictly decreasing; tiny quotient terms are kept,
    // since the corresponding term has already been cancelled from the dividend
    let quotients = quotient_terms.into_iter().map(|terms| ring.from_descending_terms(terms)).collect::<Vec<_>>();
    return Ok((quotients, remainder));
}

///
/// Computes the remainder of the generalized division of `f` by `divisors`, as
/// specified by [`multivariate_division()`].
///
#[instrument(skip_all, level = "trace")]
pub fn multivariate_remainder<O>(ring: &PolyRing<O>, f: &Polynomial, divisors: &[Polynomial]) -> Result<Polynomial>
    where O: MonomialOrder
{
    check_arities(ring, f, divisors)?;
    return reduce_poly(ring, f.clone(), divisors, |_, _, _| {});
}

#[cfg(test)]
use crate::error::PolyError;
#[cfg(test)]
use crate::assert_poly_eq;

#[cfg(test)]
fn random_poly_with<O: MonomialOrder>(ring: &PolyRing<O>, rng: &mut oorandom::Rand64, coeffs: &[f64], max_deg: u64, max_terms: u64) -> Polynomial {
    let term_count = rng.rand_range(1..(max_terms + 1));
    ring.from_terms((0..term_count).map(|_| {
        let c = coeffs[rng.rand_range(0..(coeffs.len() as u64)) as usize];
        (c, ring.create_monomial((0..ring.arity()).map(|_| rng.rand_range(0..(max_deg + 1)) as Exponent)))
    })).unwrap()
}

#[cfg(test)]
fn random_poly<O: MonomialOrder>(ring: &PolyRing<O>, rng: &mut oorandom::Rand64, max_deg: u64, max_terms: u64) -> Polynomial {
    random_poly_with(ring, rng, &[-2., -1., 1., 2.], max_deg, max_terms)
}

#[cfg(test)]
fn assert_is_division<O: MonomialOrder>(ring: &PolyRing<O>, f: &Polynomial, divisors: &[Polynomial], quotients: &[Polynomial], remainder: &Polynomial) {
    assert_is_approx_division(ring, f, divisors, quotients, remainder, 100);
}

#[cfg(test)]
fn assert_is_approx_division<O: MonomialOrder>(ring: &PolyRing<O>, f: &Polynomial, divisors: &[Polynomial], quotients: &[Polynomial], remainder: &Polynomial, precision: u64) {
    assert_eq!(divisors.len(), quotients.len());
    let reconstructed = ring.add_ref(&ring.sum(quotients.iter().zip(divisors.iter()).map(|(q, d)| ring.mul_ref(q, d))), remainder);
    assert_poly_eq!(ring, f, reconstructed, precision);
    for (_, m) in ring.terms(remainder) {
        for d in divisors.iter().filter(|d| !ring.is_zero(d)) {
            assert!(!ring.lm(d).unwrap().divides(m));
        }
    }
}

#[test]
fn test_multivariate_division() {
    let ring = PolyRing::new(2, Lex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    let one = ring.one();

    let f = ring.sum([
        ring.prod([x.clone(), x.clone(), y.clone()]),
        ring.prod([x.clone(), y.clone(), y.clone()]),
        ring.prod([y.clone(), y.clone()])
    ]);
    let f1 = ring.sub_ref(&ring.mul_ref(&y, &y), &one);
    let f2 = ring.sub_ref(&ring.mul_ref(&x, &y), &one);

    let (quotients, remainder) = multivariate_division(&ring, &f, &[f1.clone(), f2.clone()]).unwrap();
    assert_poly_eq!(ring, ring.add_ref(&ring.scale(x.clone(), 2.), &one), remainder);
    assert_poly_eq!(ring, ring.add_ref(&x, &one), quotients[0]);
    assert_poly_eq!(ring, x, quotients[1]);

    let (quotients, remainder) = multivariate_division(&ring, &f, &[f2.clone(), f1.clone()]).unwrap();
    assert_poly_eq!(ring, ring.sum([x.clone(), y.clone(), one.clone()]), remainder);
    assert_poly_eq!(ring, ring.add_ref(&x, &y), quotients[0]);
    assert_poly_eq!(ring, one, quotients[1]);

    assert_poly_eq!(ring, remainder, multivariate_remainder(&ring, &f, &[f2, f1]).unwrap());
}

#[test]
fn test_divide_by_monomial() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = ring.from_terms([(1., ring.create_monomial([2, 1]))]).unwrap();
    let xy = ring.from_terms([(1., ring.create_monomial([1, 1]))]).unwrap();
    let (quotients, remainder) = multivariate_division(&ring, &f, &[xy]).unwrap();
    assert_eq!(vec![ring.indeterminate(0)], quotients);
    assert!(ring.is_zero(&remainder));
}

#[test]
fn test_division_edge_cases() {
    let ring = PolyRing::new(2, DegRevLex);
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    let f = ring.add_ref(&ring.mul_ref(&x, &y), &ring.constant(3.));

    // no divisors
    let (quotients, remainder) = multivariate_division(&ring, &f, &[]).unwrap();
    assert!(quotients.is_empty());
    assert_eq!(f, remainder);

    // zero divisors are skipped
    let (quotients, remainder) = multivariate_division(&ring, &f, &[ring.zero(), y.clone()]).unwrap();
    assert!(ring.is_zero(&quotients[0]));
    assert_eq!(x, quotients[1]);
    assert_eq!(ring.constant(3.), remainder);

    // zero dividend
    let (quotients, remainder) = multivariate_division(&ring, &ring.zero(), &[x.clone()]).unwrap();
    assert!(ring.is_zero(&quotients[0]));
    assert!(ring.is_zero(&remainder));

    // division by a constant
    let (quotients, remainder) = multivariate_division(&ring, &f, &[ring.constant(2.)]).unwrap();
    assert_poly_eq!(ring, ring.scale(f.clone(), 0.5), quotients[0]);
    assert!(ring.is_zero(&remainder));
}

#[test]
fn test_division_arity_mismatch() {
    let ring = PolyRing::new(3, DegRevLex);
    let other = PolyRing::new(2, DegRevLex);
    assert_eq!(
        Err(PolyError::ArityMismatch { expected: 3, actual: 2 }),
        multivariate_division(&ring, &ring.one(), &[other.indeterminate(0)])
    );
    assert_eq!(
        Err(PolyError::ArityMismatch { expected: 3, actual: 2 }),
        multivariate_remainder(&ring, &other.one(), &[ring.indeterminate(0)])
    );
}

#[test]
fn test_random_division() {
    let mut rng = oorandom::Rand64::new(1);
    for order in [AnyOrder::Lex, AnyOrder::DegLex, AnyOrder::DegRevLex] {
        let ring = PolyRing::new(3, order);
        for _ in 0..30 {
            let f = random_poly(&ring, &mut rng, 4, 8);
            let divisor_count = rng.rand_range(1..4);
            // with leading coefficients +-1, all coefficients remain dyadic and no rounding happens
            let divisors = (0..divisor_count).map(|_| loop {
                let d = random_poly(&ring, &mut rng, 2, 3);
                if !ring.is_zero(&d) {
                    break ring.normalize(d).unwrap();
                }
            }).collect::<Vec<_>>();
            let (quotients, remainder) = multivariate_division(&ring, &f, &divisors).unwrap();
            assert_is_division(&ring, &f, &divisors, &quotients, &remainder);
        }
    }
}

#[test]
fn test_tiny_quotient_terms() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = ring.create_term(1e-10, ring.create_monomial([1, 0]));
    let d = ring.create_term(1e5, ring.create_monomial([1, 0]));
    let (quotients, remainder) = multivariate_division(&ring, &f, &[d.clone()]).unwrap();
    assert!(ring.is_zero(&remainder));
    assert_eq!(1, quotients[0].len());
    assert_eq!(1e-10 / 1e5, ring.coefficient_at(&quotients[0], &ring.create_monomial([0, 0])));
    assert_is_division(&ring, &f, &[d], &quotients, &remainder);

    // tiny terms next to regular ones
    let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
    let f = ring.add_ref(&ring.mul_ref(&x, &y), &ring.create_term(3e-12, ring.create_monomial([0, 1])));
    let divisors = [ring.scale(y.clone(), 1e4)];
    let (quotients, remainder) = multivariate_division(&ring, &f, &divisors).unwrap();
    assert_eq!(2, quotients[0].len());
    assert!(ring.is_zero(&remainder));
    assert_is_division(&ring, &f, &divisors, &quotients, &remainder);
}

#[test]
fn test_random_division_decimal_coefficients() {
    let mut rng = oorandom::Rand64::new(1);
    let coeffs = [-1.7, -0.3, 0.1, 0.7, 1.1, 2.9];
    for order in [AnyOrder::Lex, AnyOrder::DegLex, AnyOrder::DegRevLex] {
        let ring = PolyRing::new(3, order);
        for _ in 0..30 {
            let f = random_poly_with(&ring, &mut rng, &coeffs, 4, 8);
            let divisor_count = rng.rand_range(1..4);
            let divisors = (0..divisor_count).map(|_| loop {
                let d = random_poly_with(&ring, &mut rng, &coeffs, 2, 3);
                if !ring.is_zero(&d) {
                    break d;
                }
            }).collect::<Vec<_>>();
            let (quotients, remainder) = multivariate_division(&ring, &f, &divisors).unwrap();
            assert_is_approx_division(&ring, &f, &divisors, &quotients, &remainder, 1 << 30);
            assert_poly_eq!(ring, remainder, multivariate_remainder(&ring, &f, &divisors).unwrap());
        }
    }
}
