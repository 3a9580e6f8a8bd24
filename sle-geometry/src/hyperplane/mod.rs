//! # Hyperplane Module
//!
//! A [`Hyperplane`] is the equation `normal_vector · X = constant_term`. Planes are the
//! three-dimensional case and [`Line`] wraps the two-dimensional one.

pub mod line;

use crate::errors::SleGeometryError;
use crate::numeric::{Decimal, Tolerance};
use crate::vector::Vector;

use itertools::Itertools;
use num_traits::{One, Zero};

use serde::{Deserialize, Serialize};

use std::fmt;

pub use line::{Intersection, Line};

/// Dimension of a plane equation.
pub const PLANE_DIMENSION: usize = 3;

const DECIMAL_PLACES: u32 = 3;

/// Index of the first coefficient that is not near zero, if any.
pub fn first_nonzero_index_of(coefficients: &Vector, eps: f64) -> Option<usize> {
    coefficients.iter().position(|c| !c.is_near_zero(eps))
}

/// `normal_vector · X = constant_term`, with a point on it (`basepoint`) kept in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HyperplaneRepr", into = "HyperplaneRepr")]
pub struct Hyperplane {
    normal_vector: Vector,
    constant_term: Decimal,
    basepoint: Option<Vector>,
    tolerance: Tolerance,
}

#[derive(Serialize, Deserialize)]
struct HyperplaneRepr {
    normal_vector: Vector,
    #[serde(default)]
    constant_term: Decimal,
}

impl From<HyperplaneRepr> for Hyperplane {
    fn from(repr: HyperplaneRepr) -> Self {
        Hyperplane::new(repr.normal_vector, repr.constant_term)
    }
}

impl From<Hyperplane> for HyperplaneRepr {
    fn from(hyperplane: Hyperplane) -> Self {
        HyperplaneRepr {
            normal_vector: hyperplane.normal_vector,
            constant_term: hyperplane.constant_term,
        }
    }
}

/// Right-hand side accepted by [`Hyperplane::plus`].
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    Hyperplane(&'a Hyperplane),
    /// Added to every coefficient and to the constant term.
    Scalar(Decimal),
}

impl Operand<'static> {
    /// Reads a scalar operand from text.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::InvalidOperand` if `text` is not a decimal literal.
    pub fn parse(text: &str) -> Result<Self, SleGeometryError> {
        text.parse::<Decimal>()
            .map(Operand::Scalar)
            .map_err(|_| {
                SleGeometryError::InvalidOperand(format!(
                    "You can only add numbers and hyperplanes, got {:?}",
                    text
                ))
            })
    }
}

impl<'a> From<&'a Hyperplane> for Operand<'a> {
    fn from(hyperplane: &'a Hyperplane) -> Self {
        Operand::Hyperplane(hyperplane)
    }
}

impl From<Decimal> for Operand<'_> {
    fn from(value: Decimal) -> Self {
        Operand::Scalar(value)
    }
}

impl Hyperplane {
    /// Creates the equation `normal_vector · X = constant_term` in `normal_vector`'s dimension.
    pub fn new(normal_vector: Vector, constant_term: Decimal) -> Self {
        let mut hyperplane = Self {
            normal_vector,
            constant_term,
            basepoint: None,
            tolerance: Tolerance::default(),
        };
        hyperplane.basepoint = hyperplane.compute_basepoint();
        hyperplane
    }

    /// Creates a plane in three dimensions.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` if `normal_vector` is not 3-dimensional.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::hyperplane::Hyperplane;
    /// # use sle_geometry::vector::Vector;
    /// let normal = Vector::parse(&["5.862", "1.178", "-10.366"]).unwrap();
    /// let plane = Hyperplane::plane(normal, "-8.15".parse().unwrap()).unwrap();
    /// assert_eq!(plane.to_string(), "5.862x_1 + 1.178x_2 - 10.366x_3 = -8.150");
    /// ```
    pub fn plane(normal_vector: Vector, constant_term: Decimal) -> Result<Self, SleGeometryError> {
        if normal_vector.dimension() != PLANE_DIMENSION {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "A plane needs a normal vector of dimension {}, got {}",
                PLANE_DIMENSION,
                normal_vector.dimension()
            )));
        }

        Ok(Self::new(normal_vector, constant_term))
    }

    /// The degenerate equation `0 = 0`.
    pub fn zero(dimension: usize) -> Result<Self, SleGeometryError> {
        Ok(Self::new(Vector::zero(dimension)?, Decimal::zero()))
    }

    /// Replaces the tolerance used for near-zero decisions and recomputes the basepoint.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self.basepoint = self.compute_basepoint();
        self
    }

    /// Re-rounds the equation so later arithmetic on it runs at `precision` significant digits.
    pub fn with_precision(self, precision: u32) -> Self {
        Self::new(
            self.normal_vector.with_precision(precision),
            self.constant_term.with_precision(precision),
        )
        .with_tolerance(self.tolerance)
    }

    pub fn dimension(&self) -> usize {
        self.normal_vector.dimension()
    }

    pub fn normal_vector(&self) -> &Vector {
        &self.normal_vector
    }

    pub fn constant_term(&self) -> &Decimal {
        &self.constant_term
    }

    /// A point on the hyperplane, or `None` for an equation without variables.
    pub fn basepoint(&self) -> Option<&Vector> {
        self.basepoint.as_ref()
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    fn compute_basepoint(&self) -> Option<Vector> {
        let index = self.first_nonzero_index()?;
        let value = self
            .constant_term
            .checked_div(&self.normal_vector[index])
            .ok()?;

        let mut coordinates = vec![Decimal::zero(); self.dimension()];
        coordinates[index] = value;
        Vector::try_with(coordinates).ok()
    }

    /// Index of the leading variable, or `None` when every coefficient is near zero.
    pub fn first_nonzero_index(&self) -> Option<usize> {
        first_nonzero_index_of(&self.normal_vector, self.tolerance.near_zero)
    }

    /// Same as [`Hyperplane::first_nonzero_index`], reporting the degenerate case as an error.
    pub fn first_nonzero_index_or_err(&self) -> Result<usize, SleGeometryError> {
        self.first_nonzero_index()
            .ok_or(SleGeometryError::NoNonzeroElements)
    }

    /// Number of coefficients that are not near zero.
    pub fn variable_count(&self) -> usize {
        self.normal_vector
            .iter()
            .filter(|c| !self.tolerance.is_near_zero(c))
            .count()
    }

    fn check_dimension(&self, other: &Self) -> Result<(), SleGeometryError> {
        if self.dimension() != other.dimension() {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "Hyperplanes live in different dimensions ({} vs {})",
                self.dimension(),
                other.dimension()
            )));
        }
        Ok(())
    }

    pub fn is_parallel_to(&self, other: &Self) -> Result<bool, SleGeometryError> {
        self.normal_vector
            .is_parallel_to_within(&other.normal_vector, &self.tolerance)
    }

    /// True if both equations describe the same set of points.
    pub fn is_same_as(&self, other: &Self) -> Result<bool, SleGeometryError> {
        self.check_dimension(other)?;
        let tolerance = &self.tolerance;

        let self_is_zero = self.normal_vector.is_zero_within(tolerance.zero_vector);
        let other_is_zero = other.normal_vector.is_zero_within(tolerance.zero_vector);
        if self_is_zero && other_is_zero {
            let difference = &self.constant_term - &other.constant_term;
            return Ok(tolerance.is_near_zero(&difference));
        }
        if self_is_zero || other_is_zero {
            return Ok(false);
        }

        if !self.is_parallel_to(other)? {
            return Ok(false);
        }

        let (Some(own_point), Some(other_point)) = (self.basepoint(), other.basepoint()) else {
            return Ok(false);
        };
        let between = own_point.minus(other_point)?;
        Ok(
            between.is_orthogonal_to_within(&self.normal_vector, tolerance.orthogonal)?
                && between.is_orthogonal_to_within(&other.normal_vector, tolerance.orthogonal)?,
        )
    }

    /// Multiplies both sides of the equation by `factor`.
    pub fn scale(&self, factor: &Decimal) -> Self {
        Self::new(self.normal_vector.scale(factor), &self.constant_term * factor)
            .with_tolerance(self.tolerance)
    }

    /// Adds another equation, or a scalar, to this one.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` when adding a hyperplane of another dimension.
    pub fn plus<'a>(&self, operand: impl Into<Operand<'a>>) -> Result<Self, SleGeometryError> {
        let (normal_vector, constant_term) = match operand.into() {
            Operand::Hyperplane(other) => {
                self.check_dimension(other)?;
                (
                    self.normal_vector.plus(&other.normal_vector)?,
                    &self.constant_term + &other.constant_term,
                )
            }
            Operand::Scalar(value) => (
                self.normal_vector.add_scalar(&value),
                &self.constant_term + &value,
            ),
        };

        Ok(Self::new(normal_vector, constant_term).with_tolerance(self.tolerance))
    }

    /// Copy with the coefficient at `index` replaced by `value`.
    pub(crate) fn with_coefficient(&self, index: usize, value: Decimal) -> Self {
        let mut coordinates = self.normal_vector.coordinates().to_vec();
        coordinates[index] = value;
        match Vector::try_with(coordinates) {
            Ok(normal_vector) => {
                Self::new(normal_vector, self.constant_term.clone()).with_tolerance(self.tolerance)
            }
            Err(_) => self.clone(),
        }
    }

    /// `normal_vector · point - constant_term`; zero for points on the hyperplane.
    pub fn residual(&self, point: &Vector) -> Result<Decimal, SleGeometryError> {
        Ok(self.normal_vector.dot(point)? - &self.constant_term)
    }

    /// True if `point` satisfies the equation within the near-zero tolerance.
    pub fn contains(&self, point: &Vector) -> Result<bool, SleGeometryError> {
        Ok(self.tolerance.is_near_zero(&self.residual(point)?))
    }
}

pub(crate) fn write_number(value: &Decimal) -> String {
    let rounded = value.round_dp(DECIMAL_PLACES);
    if rounded.is_integer() {
        rounded.round_dp(0).to_string()
    } else {
        rounded.to_fixed(DECIMAL_PLACES)
    }
}

fn write_coefficient(coefficient: &Decimal, is_initial_term: bool) -> String {
    let rounded = coefficient.round_dp(DECIMAL_PLACES);
    let mut output = String::new();

    if rounded.is_negative() {
        output.push('-');
    }
    if rounded.is_positive() && !is_initial_term {
        output.push('+');
    }
    if !is_initial_term {
        output.push(' ');
    }

    let magnitude = rounded.abs();
    if magnitude != Decimal::one() {
        output.push_str(&write_number(&magnitude));
    }

    output
}

impl fmt::Display for Hyperplane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the leading term is the first one still visible after rounding
        let terms = self
            .normal_vector
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.round_dp(DECIMAL_PLACES).is_zero())
            .enumerate()
            .map(|(shown, (i, c))| format!("{}x_{}", write_coefficient(c, shown == 0), i + 1))
            .join(" ");

        let terms = if terms.is_empty() { "0".to_string() } else { terms };
        write!(f, "{} = {}", terms, write_number(&self.constant_term))
    }
}
