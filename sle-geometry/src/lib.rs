//! Linear-algebra toolkit for small systems of linear equations.
//!
//! Vectors and hyperplanes are built on an exact [`numeric::Decimal`] scalar. A
//! [`system::LinearSystem`] is reduced by Gaussian elimination and [`sle`] classifies the
//! result as a unique point, no solution, or a parametrized family of solutions.

pub mod errors;
pub mod hyperplane;
pub mod numeric;
pub mod sle;
pub mod system;
pub mod vector;
