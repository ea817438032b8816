use serde::Deserialize;
use tracing::instrument;

use crate::algorithms::buchberger::buchberger_with;
use crate::algorithms::poly_div::multivariate_division;
use crate::algorithms::standard_monomials;
use crate::computation::Limits;
use crate::error::Result;
use crate::rings::float_real::Real64;
use crate::rings::multivariate::*;
use crate::rings::multivariate::ordered::*;

///
/// A polynomial in exchange format, i.e. a list of terms `(coefficient, exponents)`.
///
/// When passed to an [`Engine`], the terms may be in any order and may contain
/// repeated exponent vectors. All polynomials returned by an [`Engine`] have their
/// terms sorted descending w.r.t. the configured monomial order, without
/// duplicates and zero coefficients.
///
pub type TermList = Vec<(f64, Vec<Exponent>)>;

///
/// Configuration of an [`Engine`]. All fields are optional when deserializing, e.g.
/// ```
/// # use sparse_groebner::engine::*;
/// # use sparse_groebner::rings::multivariate::*;
/// let config: EngineConfig = serde_json::from_str(r#"{ "arity": 2, "order": "lex" }"#).unwrap();
/// assert_eq!(AnyOrder::Lex, config.order);
/// assert_eq!(EngineConfig::default().zero_threshold, config.zero_threshold);
/// ```
///
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// number of indeterminates, i.e. the length of every exponent vector
    pub arity: usize,
    pub order: AnyOrder,
    /// coefficients of absolute value at most this are considered to be zero
    pub zero_threshold: f64,
    /// sums that cancel up to this fraction of the larger summand are set to zero, see [`Real64::add()`]
    pub cancellation_threshold: f64,
    /// see [`Real64::add()`]
    pub instability_threshold: f64,
    /// bounds for [`Engine::buchberger()`]
    pub limits: Limits
}

impl Default for EngineConfig {

    fn default() -> Self {
        Self {
            arity: 3,
            order: AnyOrder::default(),
            zero_threshold: Real64::DEFAULT_ZERO_THRESHOLD,
            cancellation_threshold: Real64::DEFAULT_CANCELLATION_THRESHOLD,
            instability_threshold: Real64::DEFAULT_INSTABILITY_THRESHOLD,
            limits: Limits::unbounded()
        }
    }
}

///
/// Performs polynomial arithmetic and Groebner basis computations on polynomials
/// given in the exchange format [`TermList`].
///
/// Every call is independent; the only state kept between calls is the
/// configuration and the counter of numeric instabilities.
///
/// # Example
/// ```
/// # use sparse_groebner::engine::*;
/// let engine = Engine::new(EngineConfig { arity: 2, ..EngineConfig::default() }).unwrap();
/// let x_plus_y = vec![(1., vec![1, 0]), (1., vec![0, 1])];
/// let minus_x = vec![(-1., vec![1, 0])];
/// assert_eq!(vec![(1., vec![0, 1])], engine.add(&[x_plus_y, minus_x]).unwrap());
/// ```
///
#[derive(Debug, Clone)]
pub struct Engine {
    ring: PolyRing<AnyOrder>,
    limits: Limits
}

impl Default for Engine {

    fn default() -> Self {
        Self {
            ring: PolyRing::new(EngineConfig::default().arity, AnyOrder::default()),
            limits: Limits::unbounded()
        }
    }
}

impl Engine {

    ///
    /// Creates an engine with the given configuration, or returns [`crate::error::PolyError::InvalidThreshold`]
    /// if one of the thresholds is invalid, see [`Real64::try_new()`].
    ///
    pub fn new(config: EngineConfig) -> Result<Self> {
        let base_ring = Real64::try_new(config.zero_threshold, config.cancellation_threshold, config.instability_threshold)?;
        Ok(Self {
            ring: PolyRing::new_with(config.arity, config.order, base_ring),
            limits: config.limits
        })
    }

    pub fn ring(&self) -> &PolyRing<AnyOrder> {
        &self.ring
    }

    ///
    /// Returns how many numeric instabilities occurred during previous calls.
    ///
    /// See also [`Real64::numeric_instabilities()`].
    ///
    pub fn numeric_instabilities(&self) -> usize {
        self.ring.numeric_instabilities()
    }

    pub fn import(&self, f: &TermList) -> Result<Polynomial> {
        self.ring.from_terms(f.iter().map(|(c, e)| (*c, Monomial::new(e.clone()))))
    }

    pub fn export(&self, f: &Polynomial) -> TermList {
        self.ring.terms(f).map(|(c, m)| (c, m.exponents().to_vec())).collect()
    }

    fn import_all(&self, fs: &[TermList]) -> Result<Vec<Polynomial>> {
        fs.iter().map(|f| self.import(f)).collect()
    }

    ///
    /// Returns the sum of all given polynomials, which is zero (i.e. the empty list)
    /// if there are none.
    ///
    pub fn add(&self, summands: &[TermList]) -> Result<TermList> {
        let summands = self.import_all(summands)?;
        Ok(self.export(&self.ring.sum(summands)))
    }

    pub fn subtract(&self, lhs: &TermList, rhs: &TermList) -> Result<TermList> {
        Ok(self.export(&self.ring.sub_ref(&self.import(lhs)?, &self.import(rhs)?)))
    }

    ///
    /// Returns the product of all given polynomials, which is one if there are none.
    /// Fails with [`crate::error::PolyError::ExponentOverflow`] if an exponent of the product
    /// does not fit into an [`Exponent`].
    ///
    pub fn multiply(&self, factors: &[TermList]) -> Result<TermList> {
        let factors = self.import_all(factors)?;
        let product = factors.iter().try_fold(self.ring.one(), |current, f| self.ring.checked_mul_ref(&current, f))?;
        Ok(self.export(&product))
    }

    ///
    /// Divides `dividend` by `divisors` and returns the quotients (one per divisor)
    /// and the remainder. See [`multivariate_division()`].
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn divide(&self, dividend: &TermList, divisors: &[TermList]) -> Result<(Vec<TermList>, TermList)> {
        let dividend = self.import(dividend)?;
        let divisors = self.import_all(divisors)?;
        let (quotients, remainder) = multivariate_division(&self.ring, &dividend, &divisors)?;
        Ok((quotients.iter().map(|q| self.export(q)).collect(), self.export(&remainder)))
    }

    ///
    /// Computes a Groebner basis of the ideal generated by `generators`, optionally
    /// reduced and/or minimized. The computation is aborted with [`crate::error::PolyError::Aborted`]
    /// if it exceeds the configured [`Limits`].
    ///
    pub fn buchberger(&self, generators: &[TermList], reduce: bool, minimize: bool) -> Result<Vec<TermList>> {
        let generators = self.import_all(generators)?;
        let result = buchberger_with(&self.ring, generators, reduce, minimize, self.limits)?;
        Ok(result.iter().map(|f| self.export(f)).collect())
    }

    ///
    /// Returns the exponent vectors of the standard monomials w.r.t. the given Groebner basis,
    /// sorted ascending. See [`standard_monomials::standard_monomial_basis()`].
    ///
    pub fn standard_monomial_basis(&self, basis: &[TermList]) -> Result<Vec<Vec<Exponent>>> {
        let basis = self.import_all(basis)?;
        Ok(standard_monomials::standard_monomial_basis(&self.ring, &basis)?.into_iter().map(Monomial::unwrap).collect())
    }
}

#[cfg(test)]
use crate::assert_poly_eq;
#[cfg(test)]
use crate::computation::Aborted;
#[cfg(test)]
use crate::error::PolyError;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn engine(arity: usize, order: AnyOrder) -> Engine {
    Engine::new(EngineConfig { arity, order, ..EngineConfig::default() }).unwrap()
}

#[test]
fn test_config_from_json() {
    let config: EngineConfig = serde_json::from_str(r#"{
        "arity": 4,
        "order": "deglex",
        "zero_threshold": 1e-10,
        "cancellation_threshold": 1e-9,
        "limits": { "max_pairs": 100 }
    }"#).unwrap();
    assert_eq!(EngineConfig {
        arity: 4,
        order: AnyOrder::DegLex,
        zero_threshold: 1e-10,
        cancellation_threshold: 1e-9,
        instability_threshold: Real64::DEFAULT_INSTABILITY_THRESHOLD,
        limits: Limits::unbounded().with_max_pairs(100)
    }, config);

    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(EngineConfig::default(), config);
    assert_eq!(3, config.arity);
    assert_eq!(AnyOrder::DegRevLex, config.order);

    assert!(serde_json::from_str::<EngineConfig>(r#"{ "order": "grevlex" }"#).is_err());
}

#[test]
fn test_invalid_config() {
    let config: EngineConfig = serde_json::from_str(r#"{ "zero_threshold": -1e-14 }"#).unwrap();
    assert_eq!(Some(PolyError::InvalidThreshold { name: "zero_threshold", value: -1e-14 }), Engine::new(config).err());

    let config: EngineConfig = serde_json::from_str(r#"{ "cancellation_threshold": 2.0 }"#).unwrap();
    assert_eq!(Some(PolyError::InvalidThreshold { name: "cancellation_threshold", value: 2. }), Engine::new(config).err());

    let config = EngineConfig { instability_threshold: f64::NAN, ..EngineConfig::default() };
    assert!(matches!(Engine::new(config), Err(PolyError::InvalidThreshold { name: "instability_threshold", .. })));

    let config = EngineConfig { zero_threshold: 0., cancellation_threshold: 0., instability_threshold: 0., ..EngineConfig::default() };
    assert!(Engine::new(config).is_ok());
    assert_eq!(Real64::default(), *Engine::default().ring().base_ring());
    assert_eq!(3, Engine::default().ring().arity());
}

#[test]
fn test_add_subtract_multiply() {
    let engine = engine(2, AnyOrder::DegRevLex);
    let x_plus_y = vec![(1., vec![0, 1]), (1., vec![1, 0])];
    let minus_x = vec![(-1., vec![1, 0])];
    assert_eq!(vec![(1., vec![0, 1])], engine.add(&[x_plus_y.clone(), minus_x.clone()]).unwrap());
    assert_eq!(TermList::new(), engine.add(&[]).unwrap());
    assert_eq!(TermList::new(), engine.subtract(&x_plus_y, &x_plus_y).unwrap());
    assert_eq!(vec![(2., vec![1, 0]), (1., vec![0, 1])], engine.subtract(&x_plus_y, &minus_x).unwrap());

    // (x + y)(x - y) = x^2 - y^2
    let x_minus_y = vec![(1., vec![1, 0]), (-1., vec![0, 1])];
    assert_eq!(vec![(1., vec![2, 0]), (-1., vec![0, 2])], engine.multiply(&[x_plus_y.clone(), x_minus_y]).unwrap());
    assert_eq!(vec![(1., vec![0, 0])], engine.multiply(&[]).unwrap());
    assert_eq!(TermList::new(), engine.multiply(&[x_plus_y, TermList::new()]).unwrap());
}

#[test]
fn test_multiply_exponent_overflow() {
    let engine = engine(2, AnyOrder::Lex);
    let big = vec![(1., vec![Exponent::MAX - 1, 0]), (1., vec![0, 1])];
    let x = vec![(1., vec![1, 0])];
    assert_eq!(vec![(1., vec![Exponent::MAX, 0]), (1., vec![1, 1])], engine.multiply(&[big.clone(), x.clone()]).unwrap());
    assert_eq!(Err(PolyError::ExponentOverflow { indeterminate: 0 }), engine.multiply(&[big, x.clone(), x]));
}

#[test]
fn test_unsorted_input() {
    let engine = engine(3, AnyOrder::Lex);
    let f = vec![(1., vec![0, 0, 1]), (2., vec![1, 0, 0]), (3., vec![0, 1, 0]), (-1., vec![0, 0, 1])];
    assert_eq!(vec![(2., vec![1, 0, 0]), (3., vec![0, 1, 0])], engine.add(&[f]).unwrap());
}

#[test]
fn test_divide() {
    let engine = engine(2, AnyOrder::DegRevLex);
    let x2y = vec![(1., vec![2, 1])];
    let xy = vec![(1., vec![1, 1])];
    assert_eq!((vec![vec![(1., vec![1, 0])]], TermList::new()), engine.divide(&x2y, &[xy]).unwrap());

    let x = vec![(1., vec![1, 0])];
    assert_eq!((Vec::new(), x.clone()), engine.divide(&x, &[]).unwrap());
}

#[test]
fn test_arity_mismatch() {
    let engine = engine(2, AnyOrder::DegRevLex);
    let f = vec![(1., vec![1, 0])];
    let g = vec![(1., vec![1, 0, 0])];
    let expected = PolyError::ArityMismatch { expected: 2, actual: 3 };
    assert_eq!(Err(expected.clone()), engine.add(&[f.clone(), g.clone()]));
    assert_eq!(Err(expected.clone()), engine.multiply(&[f.clone(), g.clone()]));
    assert_eq!(Err(expected.clone()), engine.divide(&f, &[g.clone()]).map(|_| ()));
    assert_eq!(Err(expected.clone()), engine.buchberger(&[f.clone(), g.clone()], true, true));
    assert_eq!(Err(expected), engine.standard_monomial_basis(&[g]));
}

#[test]
fn test_buchberger() {
    LogAlgorithmSubscriber::init_test();
    let f = vec![(1., vec![2, 0]), (-1., vec![0, 1])];
    let g = vec![(1., vec![1, 0]), (-1., vec![0, 2])];

    let engine = engine(2, AnyOrder::Lex);
    let ring = engine.ring();
    let actual = engine.buchberger(&[f.clone(), g.clone()], true, true).unwrap();
    assert_eq!(2, actual.len());
    assert_poly_eq!(ring, engine.import(&vec![(1., vec![1, 0]), (-1., vec![0, 2])]).unwrap(), engine.import(&actual[0]).unwrap());
    assert_poly_eq!(ring, engine.import(&vec![(1., vec![0, 4]), (-1., vec![0, 1])]).unwrap(), engine.import(&actual[1]).unwrap());

    let engine = self::engine(2, AnyOrder::DegRevLex);
    let ring = engine.ring();
    let actual = engine.buchberger(&[f.clone(), g.clone()], true, true).unwrap();
    assert_eq!(2, actual.len());
    assert_poly_eq!(ring, engine.import(&f).unwrap(), engine.import(&actual[0]).unwrap());
    assert_poly_eq!(ring, engine.import(&vec![(1., vec![0, 2]), (-1., vec![1, 0])]).unwrap(), engine.import(&actual[1]).unwrap());

    let raw = engine.buchberger(&[f.clone(), g.clone()], false, false).unwrap();
    assert!(raw.len() >= 2);
    for h in [&f, &g] {
        assert_eq!(TermList::new(), engine.divide(h, &raw).unwrap().1);
    }
}

#[test]
fn test_buchberger_limits() {
    LogAlgorithmSubscriber::init_test();
    let engine = Engine::new(EngineConfig {
        arity: 2,
        order: AnyOrder::Lex,
        limits: Limits::unbounded().with_max_pairs(0),
        ..EngineConfig::default()
    }).unwrap();
    let f = vec![(1., vec![2, 0]), (-1., vec![0, 1])];
    let g = vec![(1., vec![1, 0]), (-1., vec![0, 2])];
    assert_eq!(Err(PolyError::Aborted(Aborted::PairLimit(0))), engine.buchberger(&[f.clone(), g], true, true));
    // no pairs, so no abort
    assert_eq!(vec![f.clone()], engine.buchberger(&[f], false, false).unwrap());
}

#[test]
fn test_standard_monomial_basis() {
    let engine = engine(2, AnyOrder::DegRevLex);
    let x2 = vec![(1., vec![2, 0])];
    let y2 = vec![(1., vec![0, 2])];
    assert_eq!(vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]], engine.standard_monomial_basis(&[x2.clone(), y2]).unwrap());
    assert_eq!(Err(PolyError::UnboundedBasis { indeterminate: 1 }), engine.standard_monomial_basis(&[x2]));
}

#[test]
fn test_numeric_instabilities() {
    let engine = engine(1, AnyOrder::DegRevLex);
    assert_eq!(0, engine.numeric_instabilities());
    let f = vec![(1., vec![1]), (1., vec![0])];
    let g = vec![(-1. + 1e-6, vec![1])];
    let sum = engine.add(&[f.clone(), g]).unwrap();
    assert_eq!(2, sum.len());
    assert_eq!(1, engine.numeric_instabilities());

    // a rounding residue is set to zero
    let g = vec![(-1. + 1e-12, vec![1])];
    assert_eq!(vec![(1., vec![0])], engine.add(&[f, g]).unwrap());
    assert_eq!(1, engine.numeric_instabilities());

    // complete cancellation is fine
    _ = engine.subtract(&vec![(0.1, vec![0])], &vec![(0.1, vec![0])]).unwrap();
    assert_eq!(1, engine.numeric_instabilities());
}
