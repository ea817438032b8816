
///
/// An approximate implementation of the field of real numbers `R`, using 64-bit floating point
/// numbers, with an explicit threshold below which values are considered to be zero.
/// 
pub mod float_real;

///
/// This module contains [`multivariate::Monomial`] and the monomial orders, and in
/// [`multivariate::ordered`] the sparse multivariate polynomial ring [`multivariate::ordered::PolyRing`]
/// over [`float_real::Real64`].
/// 
pub mod multivariate;
