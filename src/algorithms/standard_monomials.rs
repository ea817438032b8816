use tracing::instrument;

use crate::error::{PolyError, Result};
use crate::rings::multivariate::*;
use crate::rings::multivariate::ordered::*;

///
/// Computes the monomials that are not divisible by the leading monomial of any element of
/// `basis`, sorted ascending w.r.t. the monomial order of `ring`.
///
/// If `basis` is a Groebner basis of an ideal `I`, these "standard monomials" form a basis of
/// the vector space `R[X0, ..., X(n-1)] / I`. This space has finite dimension if and only if `I`
/// is zero-dimensional, i.e. if for every indeterminate `Xi`, some leading monomial is a power
/// of `Xi`. If this is not the case, [`PolyError::UnboundedBasis`] is returned.
///
/// # Example
/// ```
/// # use sparse_groebner::rings::multivariate::*;
/// # use sparse_groebner::rings::multivariate::ordered::*;
/// # use sparse_groebner::algorithms::standard_monomials::*;
/// let ring = PolyRing::new(2, DegRevLex);
/// let x2 = ring.from_terms([(1., ring.create_monomial([2, 0]))]).unwrap();
/// let y2 = ring.from_terms([(1., ring.create_monomial([0, 2]))]).unwrap();
/// assert_eq!(
///     vec![ring.create_monomial([0, 0]), ring.create_monomial([0, 1]), ring.create_monomial([1, 0]), ring.create_monomial([1, 1])],
///     standard_monomial_basis(&ring, &[x2, y2]).unwrap()
/// );
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn standard_monomial_basis<O>(ring: &PolyRing<O>, basis: &[Polynomial]) -> Result<Vec<Monomial>>
    where O: MonomialOrder
{
    for f in basis {
        ring.check_arity(f)?;
    }
    let leading_monomials = basis.iter().filter(|f| !ring.is_zero(f)).map(|f| ring.lm(f)).collect::<Result<Vec<_>>>()?;

    // every standard monomial has exponents strictly below these bounds
    let mut bounds = Vec::with_capacity(ring.arity());
    for i in 0..ring.arity() {
        let bound = leading_monomials.iter().filter_map(|m| match m.pure_power() {
            Some((j, e)) if j == i => Some(e),
            None if m.is_one() => Some(0),
            _ => None
        }).min();
        match bound {
            Some(bound) => bounds.push(bound),
            None => return Err(PolyError::UnboundedBasis { indeterminate: i })
        }
    }
    if bounds.iter().any(|d| *d == 0) {
        return Ok(Vec::new());
    }

    let corner = Monomial::new(bounds.into_iter().map(|d| d - 1).collect());
    let mut result = corner.dividing_monomials()
        .filter(|m| leading_monomials.iter().all(|lm| !lm.divides(m)))
        .collect::<Vec<_>>();
    result.sort_by(|lhs, rhs| ring.order().compare(lhs, rhs));
    return Ok(result);
}

#[cfg(test)]
use crate::algorithms::buchberger::buchberger_simple;

#[cfg(test)]
fn monomials<O: MonomialOrder, const N: usize>(ring: &PolyRing<O>, exponents: &[[Exponent; N]]) -> Vec<Monomial> {
    exponents.iter().map(|e| ring.create_monomial(e.iter().copied())).collect()
}

#[test]
fn test_standard_monomials_of_monomial_ideal() {
    let ring = PolyRing::new(2, DegRevLex);
    let x2 = ring.from_terms([(1., ring.create_monomial([2, 0]))]).unwrap();
    let y2 = ring.from_terms([(1., ring.create_monomial([0, 2]))]).unwrap();
    assert_eq!(
        monomials(&ring, &[[0, 0], [0, 1], [1, 0], [1, 1]]),
        standard_monomial_basis(&ring, &[x2.clone(), y2.clone()]).unwrap()
    );

    // the smallest pure power determines the bound
    let x3 = ring.from_terms([(1., ring.create_monomial([3, 0]))]).unwrap();
    let xy = ring.from_terms([(1., ring.create_monomial([1, 1]))]).unwrap();
    assert_eq!(
        monomials(&ring, &[[0, 0], [0, 1], [1, 0]]),
        standard_monomial_basis(&ring, &[x3, xy, y2, x2]).unwrap()
    );
}

#[test]
fn test_standard_monomials_lex() {
    let ring = PolyRing::new(2, Lex);
    let f = ring.from_terms([(1., ring.create_monomial([2, 0])), (-1., ring.create_monomial([0, 1]))]).unwrap();
    let g = ring.from_terms([(1., ring.create_monomial([1, 0])), (-1., ring.create_monomial([0, 2]))]).unwrap();
    let gb = buchberger_simple(&ring, vec![f, g], true, true).unwrap();
    assert_eq!(
        monomials(&ring, &[[0, 0], [0, 1], [0, 2], [0, 3]]),
        standard_monomial_basis(&ring, &gb).unwrap()
    );
}

#[test]
fn test_standard_monomials_deglex() {
    let ring = PolyRing::new(2, DegLex);
    let f1 = ring.from_terms([(1., ring.create_monomial([3, 0])), (-2., ring.create_monomial([1, 1]))]).unwrap();
    let f2 = ring.from_terms([(1., ring.create_monomial([2, 1])), (-2., ring.create_monomial([0, 2])), (1., ring.create_monomial([1, 0]))]).unwrap();
    let gb = buchberger_simple(&ring, vec![f1, f2], true, true).unwrap();
    assert_eq!(
        monomials(&ring, &[[0, 0], [0, 1], [1, 0]]),
        standard_monomial_basis(&ring, &gb).unwrap()
    );
}

#[test]
fn test_standard_monomials_unbounded() {
    let ring = PolyRing::new(3, Lex);
    let f = ring.from_terms([(1., ring.create_monomial([2, 0, 0])), (-1., ring.create_monomial([0, 1, 0]))]).unwrap();
    let g = ring.from_terms([(1., ring.create_monomial([1, 0, 0])), (-1., ring.create_monomial([0, 2, 0]))]).unwrap();
    let gb = buchberger_simple(&ring, vec![f, g], true, true).unwrap();
    assert_eq!(Err(PolyError::UnboundedBasis { indeterminate: 2 }), standard_monomial_basis(&ring, &gb));
    assert_eq!(Err(PolyError::UnboundedBasis { indeterminate: 0 }), standard_monomial_basis(&ring, &[]));

    let other = PolyRing::new(2, Lex);
    assert_eq!(Err(PolyError::ArityMismatch { expected: 3, actual: 2 }), standard_monomial_basis(&ring, &[other.one()]));
}

#[test]
fn test_standard_monomials_unit_ideal() {
    let ring = PolyRing::new(3, DegRevLex);
    assert_eq!(Vec::<Monomial>::new(), standard_monomial_basis(&ring, &[ring.one()]).unwrap());
    assert_eq!(Vec::<Monomial>::new(), standard_monomial_basis(&ring, &[ring.indeterminate(1), ring.constant(2.)]).unwrap());
}
