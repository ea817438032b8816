#![allow(non_snake_case)]

//!
//! Sparse multivariate polynomials over approximate real numbers (`f64`), together with
//! multivariate division, Groebner bases via Buchberger's algorithm and standard monomial
//! bases of zero-dimensional ideals.
//!
//! The main entry point for working with polynomials is [`rings::multivariate::ordered::PolyRing`],
//! which is parameterized by a [`rings::multivariate::MonomialOrder`]. The algorithms are
//! in [`algorithms`]. If the polynomials are given as plain lists of terms, e.g. when coming
//! from another program, [`engine::Engine`] provides the same functionality on these.
//!
//! # Example
//! ```
//! # use sparse_groebner::assert_poly_eq;
//! # use sparse_groebner::rings::multivariate::*;
//! # use sparse_groebner::rings::multivariate::ordered::*;
//! # use sparse_groebner::algorithms::buchberger::*;
//! let ring = PolyRing::new(2, DegRevLex);
//! let [x, y] = [ring.indeterminate(0), ring.indeterminate(1)];
//! let f = ring.sub_ref(&ring.mul_ref(&x, &x), &y);
//! let g = ring.sub_ref(&x, &ring.mul_ref(&y, &y));
//! let gb = buchberger_simple(&ring, vec![f.clone(), g.clone()], true, true).unwrap();
//! assert_eq!(2, gb.len());
//! assert_poly_eq!(ring, f, gb[0]);
//! assert_poly_eq!(ring, ring.negate(g), gb[1]);
//! ```
//!

pub mod error;
pub mod computation;
#[macro_use]
pub mod rings;
pub mod algorithms;
pub mod serialization;
pub mod tracing;
pub mod engine;
