
///
/// Contains [`poly_div::multivariate_division()`], which divides a multivariate polynomial
/// by a list of polynomials w.r.t. a monomial order.
/// 
pub mod poly_div;
///
/// Contains [`buchberger::buchberger()`], an implementation of Buchberger's algorithm to
/// compute Groebner bases, together with functions to reduce and minimize them.
/// 
pub mod buchberger;
///
/// Contains [`standard_monomials::standard_monomial_basis()`], which computes a vector space
/// basis of the quotient by a zero-dimensional ideal.
/// 
pub mod standard_monomials;
