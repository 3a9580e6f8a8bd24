use crate::numeric::Decimal;

use serde::{Deserialize, Serialize};

pub const DEFAULT_NEAR_ZERO: f64 = 1e-10;
pub const DEFAULT_CLOSE_ABS: f64 = 1e-9;

/// True iff `|x| < eps`. Treats rounding noise as an exact zero.
pub fn near_zero(x: &Decimal, eps: f64) -> bool {
    x.is_near_zero(eps)
}

/// Relative/absolute tolerance comparison on plain reals.
///
/// # Example
///
/// ```
/// # use sle_geometry::numeric::is_close;
/// assert!(is_close(1.0, 1.0 + 1e-12, 0.0, 1e-9));
/// assert!(!is_close(1.0, 1.001, 0.0, 1e-9));
/// assert!(is_close(1000.0, 1001.0, 1e-2, 0.0));
/// ```
pub fn is_close(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

/// Every epsilon used by the geometry and the solver, in one place.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Coefficients and constants below this magnitude count as zero.
    pub near_zero: f64,
    /// Vectors whose magnitude is at most this are zero vectors.
    pub zero_vector: f64,
    /// Largest `|u · v|` for which `u` and `v` count as orthogonal.
    pub orthogonal: f64,
    pub close_abs: f64,
    pub close_rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            near_zero: DEFAULT_NEAR_ZERO,
            zero_vector: DEFAULT_NEAR_ZERO,
            orthogonal: DEFAULT_NEAR_ZERO,
            close_abs: DEFAULT_CLOSE_ABS,
            close_rel: 0.0,
        }
    }
}

impl Tolerance {
    /// Replaces the near-zero epsilon, keeping the rest.
    pub fn with_near_zero(self, near_zero: f64) -> Self {
        Self { near_zero, ..self }
    }

    pub fn is_near_zero(&self, x: &Decimal) -> bool {
        near_zero(x, self.near_zero)
    }

    pub fn is_close(&self, a: f64, b: f64) -> bool {
        is_close(a, b, self.close_rel, self.close_abs)
    }
}
