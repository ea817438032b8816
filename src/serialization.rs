use std::marker::PhantomData;

use serde::de::{DeserializeSeed, Error, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserializer, Serialize, Serializer};

use crate::rings::multivariate::*;
use crate::rings::multivariate::ordered::*;

#[stability::unstable(feature = "enable")]
pub fn deserialize_seq_helper<'de, S, D, C>(deserializer: D, collector: C, base_seed: S) -> Result<(), D::Error>
    where D: Deserializer<'de>,
        C: FnMut(S::Value),
        S: Clone + DeserializeSeed<'de>
{
    struct SeqVisitor<'de, S: Clone + DeserializeSeed<'de>, C: FnMut(S::Value)> {
        base_seed: S,
        collector: C,
        deserializer: PhantomData<&'de ()>
    }

    impl<'de, S: Clone + DeserializeSeed<'de>, C: FnMut(S::Value)> Visitor<'de> for SeqVisitor<'de, S, C> {
        type Value = ();

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(formatter, "a sequence of terms")
        }

        fn visit_seq<A>(mut self, mut seq: A) -> Result<Self::Value, A::Error>
            where A: serde::de::SeqAccess<'de>
        {
            while let Some(el) = seq.next_element_seed(self.base_seed.clone())? {
                (self.collector)(el);
            }
            return Ok(());
        }
    }

    deserializer.deserialize_seq(SeqVisitor {
        deserializer: PhantomData,
        base_seed: base_seed,
        collector: collector
    })
}

#[stability::unstable(feature = "enable")]
pub fn serialize_seq_helper<S, I>(serializer: S, sequence: I) -> Result<S::Ok, S::Error>
    where S: Serializer,
        I: Iterator,
        I::Item: Serialize
{
    let size_hint = sequence.size_hint();
    let mut seq = serializer.serialize_seq(if size_hint.1.is_some() && size_hint.1.unwrap() == size_hint.0 { Some(size_hint.0) } else { None })?;
    for x in sequence {
        seq.serialize_element(&x)?;
    }
    return seq.end();
}

///
/// Polynomials are serialized as the sequence of their terms `(coefficient, exponents)`,
/// starting with the leading term, e.g. `[[2.0, [2, 1]], [-0.5, [0, 0]]]` in JSON. Since
/// deserializing requires the monomial order and the number of indeterminates,
/// use [`DeserializeWithRing`] to read them back.
///
impl Serialize for Polynomial {

    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serialize_seq_helper(serializer, self.data().iter())
    }
}

///
/// A [`DeserializeSeed`] that reads a sequence of terms `(coefficient, exponents)`, in any order,
/// and builds the corresponding polynomial of the given ring via [`PolyRing::from_terms()`].
///
/// # Example
/// ```
/// # use serde::de::DeserializeSeed;
/// # use sparse_groebner::rings::multivariate::*;
/// # use sparse_groebner::rings::multivariate::ordered::*;
/// # use sparse_groebner::serialization::*;
/// let ring = PolyRing::new(2, DegRevLex);
/// let mut deserializer = serde_json::Deserializer::from_str("[[1.0, [0, 1]], [1.0, [1, 0]]]");
/// let f = DeserializeWithRing::new(&ring).deserialize(&mut deserializer).unwrap();
/// assert_eq!(ring.add_ref(&ring.indeterminate(0), &ring.indeterminate(1)), f);
/// ```
///
#[derive(Clone)]
pub struct DeserializeWithRing<'a, O: MonomialOrder> {
    ring: &'a PolyRing<O>
}

impl<'a, O: MonomialOrder> DeserializeWithRing<'a, O> {

    pub fn new(ring: &'a PolyRing<O>) -> Self {
        Self { ring }
    }
}

impl<'a, 'de, O: MonomialOrder> DeserializeSeed<'de> for DeserializeWithRing<'a, O> {

    type Value = Polynomial;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where D: Deserializer<'de>
    {
        let mut terms = Vec::new();
        deserialize_seq_helper(deserializer, |term| terms.push(term), PhantomData::<(f64, Monomial)>)?;
        self.ring.from_terms(terms).map_err(D::Error::custom)
    }
}

#[stability::unstable(feature = "enable")]
#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    #[stability::unstable(feature = "enable")]
    pub fn test_serialization<O, I>(ring: &PolyRing<O>, edge_case_elements: I)
        where O: MonomialOrder,
            I: Iterator<Item = Polynomial>
    {
        let edge_case_elements = edge_case_elements.collect::<Vec<_>>();

        let serializer = serde_assert::Serializer::builder().is_human_readable(true).build();
        for x in &edge_case_elements {
            let tokens = x.serialize(&serializer).unwrap();
            let mut deserializer = serde_assert::Deserializer::builder(tokens).is_human_readable(true).build();
            let result = DeserializeWithRing::new(ring).deserialize(&mut deserializer).unwrap();
            assert_eq!(x, &result);
        }

        let serializer = serde_assert::Serializer::builder().is_human_readable(false).build();
        for x in &edge_case_elements {
            let tokens = x.serialize(&serializer).unwrap();
            let mut deserializer = serde_assert::Deserializer::builder(tokens).is_human_readable(false).build();
            let result = DeserializeWithRing::new(ring).deserialize(&mut deserializer).unwrap();
            assert_eq!(x, &result);
        }
    }
}

#[test]
fn test_serialize() {
    let ring = PolyRing::new(2, DegRevLex);
    let f = ring.from_terms([
        (-0.5, ring.create_monomial([0, 0])),
        (2., ring.create_monomial([2, 1]))
    ]).unwrap();
    assert_eq!("[[2.0,[2,1]],[-0.5,[0,0]]]", serde_json::to_string(&f).unwrap());
    assert_eq!("[]", serde_json::to_string(&ring.zero()).unwrap());
}

#[test]
fn test_deserialize() {
    let ring = PolyRing::new(2, Lex);
    let mut deserializer = serde_json::Deserializer::from_str("[[1.0, [0, 1]], [2.0, [0, 0]], [1.0, [2, 0]], [-1.0, [0, 1]]]");
    let actual = DeserializeWithRing::new(&ring).deserialize(&mut deserializer).unwrap();
    let expected = ring.from_terms([
        (1., ring.create_monomial([2, 0])),
        (2., ring.create_monomial([0, 0]))
    ]).unwrap();
    assert_eq!(expected, actual);

    let mut deserializer = serde_json::Deserializer::from_str("[[1.0, [0, 1, 2]]]");
    let error = DeserializeWithRing::new(&ring).deserialize(&mut deserializer).unwrap_err();
    assert!(format!("{}", error).contains("expected exponent vectors with 2 entries, got one with 3"));

    let mut deserializer = serde_json::Deserializer::from_str("[[1.0, [0, -1]]]");
    assert!(DeserializeWithRing::new(&ring).deserialize(&mut deserializer).is_err());
}

#[test]
fn test_serialization() {
    let ring = PolyRing::new(3, DegRevLex);
    let [x, y, z] = [ring.indeterminate(0), ring.indeterminate(1), ring.indeterminate(2)];
    let elements = [
        ring.zero(),
        ring.one(),
        ring.constant(-0.25),
        ring.add_ref(&x, &ring.mul_ref(&y, &z)),
        ring.prod([ring.sub_ref(&x, &y), ring.add_ref(&y, &z), ring.sub_ref(&z, &ring.constant(3.))])
    ];
    generic_tests::test_serialization(&ring, elements.into_iter());
}
