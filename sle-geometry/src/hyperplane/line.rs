//! The two-dimensional case: lines in the plane and where they meet.

use crate::errors::SleGeometryError;
use crate::hyperplane::Hyperplane;
use crate::numeric::Decimal;
use crate::vector::Vector;

use num_traits::Zero;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::ops::Deref;

pub const LINE_DIMENSION: usize = 2;

/// A [`Hyperplane`] known to be two-dimensional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Hyperplane", into = "Hyperplane")]
pub struct Line(Hyperplane);

/// Where two lines meet.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    /// Exactly one shared point.
    Point(Vector),
    /// The lines coincide; every point of this line is shared.
    Coincident(Line),
    /// Parallel, distinct lines.
    Empty,
}

impl Line {
    /// Creates the line `a·x + b·y = k`.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` if `normal_vector` is not 2-dimensional.
    pub fn try_with(normal_vector: Vector, constant_term: Decimal) -> Result<Self, SleGeometryError> {
        Self::from_hyperplane(Hyperplane::new(normal_vector, constant_term))
    }

    pub fn from_hyperplane(hyperplane: Hyperplane) -> Result<Self, SleGeometryError> {
        if hyperplane.dimension() != LINE_DIMENSION {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "A line needs a normal vector of dimension {}, got {}",
                LINE_DIMENSION,
                hyperplane.dimension()
            )));
        }
        Ok(Line(hyperplane))
    }

    /// The degenerate line `0 = 0`.
    pub fn zero() -> Result<Self, SleGeometryError> {
        Self::from_hyperplane(Hyperplane::zero(LINE_DIMENSION)?)
    }

    pub fn as_hyperplane(&self) -> &Hyperplane {
        &self.0
    }

    pub fn into_hyperplane(self) -> Hyperplane {
        self.0
    }

    /// Intersects two lines, solving the 2×2 system by Cramer's rule.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::hyperplane::{Intersection, Line};
    /// # use sle_geometry::vector::Vector;
    /// let a = Line::try_with(Vector::parse(&["1", "1"]).unwrap(), "2".parse().unwrap()).unwrap();
    /// let b = Line::try_with(Vector::parse(&["1", "-1"]).unwrap(), "0".parse().unwrap()).unwrap();
    /// assert_eq!(
    ///     a.intersection_with(&b).unwrap(),
    ///     Intersection::Point(Vector::parse(&["1", "1"]).unwrap())
    /// );
    /// ```
    pub fn intersection_with(&self, other: &Line) -> Result<Intersection, SleGeometryError> {
        let same = self.is_same_as(other)?;
        if same {
            return Ok(Intersection::Coincident(self.clone()));
        }
        if self.is_parallel_to(other)? {
            return Ok(Intersection::Empty);
        }

        let (a, b) = (&self.normal_vector()[0], &self.normal_vector()[1]);
        let (c, d) = (&other.normal_vector()[0], &other.normal_vector()[1]);
        let (k1, k2) = (self.constant_term(), other.constant_term());

        let determinant = a * d - b * c;
        if determinant.is_zero() {
            return Ok(Intersection::Empty);
        }

        let x = (d * k1 - b * k2).checked_div(&determinant)?;
        let y = (-c * k1 + a * k2).checked_div(&determinant)?;
        Ok(Intersection::Point(Vector::try_with(vec![x, y])?))
    }
}

impl Deref for Line {
    type Target = Hyperplane;

    fn deref(&self) -> &Hyperplane {
        &self.0
    }
}

impl TryFrom<Hyperplane> for Line {
    type Error = SleGeometryError;

    fn try_from(hyperplane: Hyperplane) -> Result<Self, Self::Error> {
        Self::from_hyperplane(hyperplane)
    }
}

impl From<Line> for Hyperplane {
    fn from(line: Line) -> Self {
        line.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
