//! # Vector Module
//!
//! Provides [`Vector`], a fixed-length tuple of [`Decimal`] coordinates with the
//! algebraic and geometric operations the hyperplane and system code build on.

use crate::errors::SleGeometryError;
use crate::numeric::{Decimal, Tolerance};

use itertools::Itertools;
use num_traits::Zero;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::ops::{Index, Neg};

/// An ordered, non-empty sequence of coordinates.
///
/// Equality is exact per coordinate; tolerance only enters through the predicates
/// that say so (`is_zero`, `is_parallel_to`, `is_orthogonal_to`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct Vector {
    coordinates: Vec<Decimal>,
}

impl Vector {
    /// Creates a vector from its coordinates.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::InvalidArgument` if `coordinates` is empty.
    pub fn try_with(coordinates: Vec<Decimal>) -> Result<Self, SleGeometryError> {
        if coordinates.is_empty() {
            return Err(SleGeometryError::InvalidArgument(
                "The coordinates must be nonempty".to_string(),
            ));
        }

        Ok(Self { coordinates })
    }

    /// Parses every coordinate from its decimal literal.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::vector::Vector;
    /// let v = Vector::parse(&["1.6", "2", "-3"]).unwrap();
    /// assert_eq!(v.dimension(), 3);
    /// assert!(Vector::parse::<&str>(&[]).is_err());
    /// ```
    pub fn parse<S: AsRef<str>>(coordinates: &[S]) -> Result<Self, SleGeometryError> {
        let coordinates = coordinates
            .iter()
            .map(|text| text.as_ref().parse::<Decimal>())
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_with(coordinates)
    }

    /// The all-zero vector of the given dimension.
    pub fn zero(dimension: usize) -> Result<Self, SleGeometryError> {
        Self::try_with(vec![Decimal::zero(); dimension])
    }

    /// Re-rounds every coordinate to `precision` significant digits.
    pub fn with_precision(self, precision: u32) -> Self {
        Self {
            coordinates: self
                .coordinates
                .into_iter()
                .map(|c| c.with_precision(precision))
                .collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinates(&self) -> &[Decimal] {
        &self.coordinates
    }

    pub fn get(&self, index: usize) -> Option<&Decimal> {
        self.coordinates.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decimal> {
        self.coordinates.iter()
    }

    fn check_dimension(&self, other: &Self, operation: &str) -> Result<(), SleGeometryError> {
        if self.dimension() != other.dimension() {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "Vectors should have same length for {} ({} vs {})",
                operation,
                self.dimension(),
                other.dimension()
            )));
        }
        Ok(())
    }

    fn map(&self, f: impl Fn(&Decimal) -> Decimal) -> Self {
        Self {
            coordinates: self.coordinates.iter().map(f).collect(),
        }
    }

    /// Component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` if the vectors have different lengths.
    pub fn plus(&self, other: &Self) -> Result<Self, SleGeometryError> {
        self.check_dimension(other, "addition")?;
        Ok(Self {
            coordinates: self
                .coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// `self + (-other)`.
    pub fn minus(&self, other: &Self) -> Result<Self, SleGeometryError> {
        self.plus(&-other)
    }

    pub fn scale(&self, factor: &Decimal) -> Self {
        self.map(|c| c * factor)
    }

    /// Adds `value` to every coordinate.
    pub fn add_scalar(&self, value: &Decimal) -> Self {
        self.map(|c| c + value)
    }

    pub fn dot(&self, other: &Self) -> Result<Decimal, SleGeometryError> {
        self.check_dimension(other, "dot product")?;
        Ok(self
            .coordinates
            .iter()
            .zip(&other.coordinates)
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Euclidean norm. There is no exact decimal square root, so this is a plain real.
    pub fn magnitude(&self) -> f64 {
        let squares: Decimal = self.coordinates.iter().map(|c| c * c).sum();
        squares.to_f64().sqrt()
    }

    /// The vector scaled to length 1.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DivisionByZero` for a (near-)zero vector.
    pub fn unit(&self) -> Result<Self, SleGeometryError> {
        if self.is_zero() {
            return Err(SleGeometryError::DivisionByZero(
                "Cannot normalize the zero vector".to_string(),
            ));
        }

        let inverse = Decimal::try_from(1.0 / self.magnitude())?;
        Ok(self.scale(&inverse))
    }

    pub fn is_zero(&self) -> bool {
        self.is_zero_within(Tolerance::default().zero_vector)
    }

    pub fn is_zero_within(&self, tolerance: f64) -> bool {
        self.magnitude() <= tolerance
    }

    /// True if either vector is zero or `|u · v| ≈ |u| |v|`.
    pub fn is_parallel_to(&self, other: &Self) -> Result<bool, SleGeometryError> {
        self.is_parallel_to_within(other, &Tolerance::default())
    }

    pub fn is_parallel_to_within(
        &self,
        other: &Self,
        tolerance: &Tolerance,
    ) -> Result<bool, SleGeometryError> {
        let dot = self.dot(other)?.abs().to_f64();
        if self.is_zero_within(tolerance.zero_vector) || other.is_zero_within(tolerance.zero_vector)
        {
            return Ok(true);
        }

        Ok(tolerance.is_close(dot, self.magnitude() * other.magnitude()))
    }

    /// True if `|u · v|` is within the default orthogonality tolerance.
    pub fn is_orthogonal_to(&self, other: &Self) -> Result<bool, SleGeometryError> {
        self.is_orthogonal_to_within(other, Tolerance::default().orthogonal)
    }

    pub fn is_orthogonal_to_within(
        &self,
        other: &Self,
        tolerance: f64,
    ) -> Result<bool, SleGeometryError> {
        Ok(self.dot(other)?.abs().to_f64() <= tolerance)
    }

    /// Component of `self` parallel to `other`.
    pub fn project_onto(&self, other: &Self) -> Result<Self, SleGeometryError> {
        let unit = other.unit()?;
        let length = self.dot(&unit)?;
        Ok(unit.scale(&length))
    }

    /// Component of `self` orthogonal to `other`; `project_onto + reject_from == self`.
    pub fn reject_from(&self, other: &Self) -> Result<Self, SleGeometryError> {
        self.minus(&self.project_onto(other)?)
    }

    /// Angle in radians.
    pub fn angle_with(&self, other: &Self) -> Result<f64, SleGeometryError> {
        let cosine = self.unit()?.dot(&other.unit()?)?.to_f64();
        Ok(cosine.clamp(-1.0, 1.0).acos())
    }

    pub fn angle_with_degrees(&self, other: &Self) -> Result<f64, SleGeometryError> {
        Ok(self.angle_with(other)?.to_degrees())
    }

    /// 3D cross product. Two-dimensional operands are lifted into the `z = 0` plane.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::UnsupportedDimension` for any other dimension.
    pub fn cross(&self, other: &Self) -> Result<Self, SleGeometryError> {
        let lhs = self.lifted_to_3d()?;
        let rhs = other.lifted_to_3d()?;

        let (x1, y1, z1) = (&lhs[0], &lhs[1], &lhs[2]);
        let (x2, y2, z2) = (&rhs[0], &rhs[1], &rhs[2]);

        Self::try_with(vec![
            y1 * z2 - y2 * z1,
            -(x1 * z2 - x2 * z1),
            x1 * y2 - x2 * y1,
        ])
    }

    fn lifted_to_3d(&self) -> Result<Self, SleGeometryError> {
        match self.dimension() {
            2 => {
                let mut coordinates = self.coordinates.clone();
                coordinates.push(Decimal::zero());
                Self::try_with(coordinates)
            }
            3 => Ok(self.clone()),
            other => Err(SleGeometryError::UnsupportedDimension(other)),
        }
    }

    pub fn parallelogram_area(&self, other: &Self) -> Result<f64, SleGeometryError> {
        let angle = self.angle_with(other)?;
        Ok(self.magnitude() * other.magnitude() * angle.sin())
    }

    pub fn triangle_area(&self, other: &Self) -> Result<f64, SleGeometryError> {
        Ok(self.parallelogram_area(other)? / 2.0)
    }
}

impl TryFrom<Vec<Decimal>> for Vector {
    type Error = SleGeometryError;

    fn try_from(coordinates: Vec<Decimal>) -> Result<Self, Self::Error> {
        Self::try_with(coordinates)
    }
}

impl From<Vector> for Vec<Decimal> {
    fn from(vector: Vector) -> Self {
        vector.coordinates
    }
}

impl Index<usize> for Vector {
    type Output = Decimal;

    fn index(&self, index: usize) -> &Decimal {
        &self.coordinates[index]
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Decimal;
    type IntoIter = std::slice::Iter<'a, Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.coordinates.iter()
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.map(|c| -c)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        -&self
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector: ({})", self.coordinates.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(coordinates: &[&str]) -> Vector {
        Vector::parse(coordinates).unwrap()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_construction() {
        assert!(Vector::try_with(vec![]).is_err());
        assert!(Vector::zero(0).is_err());
        assert_eq!(Vector::zero(3).unwrap(), v(&["0", "0", "0"]));
        assert!(Vector::parse(&["1", "x"]).is_err());
    }

    #[test]
    fn test_plus_minus_scale() -> Result<(), SleGeometryError> {
        assert_eq!(
            v(&["8.218", "-9.341"]).plus(&v(&["-1.129", "2.111"]))?,
            v(&["7.089", "-7.23"])
        );
        assert_eq!(
            v(&["7.119", "8.215"]).minus(&v(&["-8.223", "0.878"]))?,
            v(&["15.342", "7.337"])
        );
        assert_eq!(
            v(&["1.671", "-1.012", "-0.318"]).scale(&"7.41".parse::<Decimal>()?),
            v(&["12.38211", "-7.49892", "-2.35638"])
        );
        assert_eq!(
            v(&["1", "2"]).add_scalar(&Decimal::from(3)),
            v(&["4", "5"])
        );
        Ok(())
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = v(&["1", "2"]);
        let b = v(&["1", "2", "3"]);
        assert!(matches!(
            a.plus(&b),
            Err(SleGeometryError::DimensionMismatch(_))
        ));
        assert!(a.dot(&b).is_err());
        assert!(a.is_parallel_to(&b).is_err());
    }

    #[test]
    fn test_magnitude_dot_unit() -> Result<(), SleGeometryError> {
        assert_approx(v(&["-0.221", "7.437"]).magnitude(), 7.440282924728065);
        assert_eq!(
            v(&["7.887", "4.138"]).dot(&v(&["-8.802", "6.776"]))?,
            "-41.382286".parse::<Decimal>()?
        );
        assert_approx(v(&["5.581", "-2.136"]).unit()?.magnitude(), 1.0);
        assert!(matches!(
            v(&["0", "0"]).unit(),
            Err(SleGeometryError::DivisionByZero(_))
        ));
        Ok(())
    }

    #[test]
    fn test_dot_runs_at_vector_precision() -> Result<(), SleGeometryError> {
        let a = v(&["0.33333", "1"]).with_precision(5);
        let b = v(&["1", "0.000001"]).with_precision(5);
        let dot = a.dot(&b)?;
        assert_eq!(dot.precision(), 5);
        assert_eq!(dot.to_string(), "0.33333");
        assert_eq!(v(&["0.33333", "1"]).dot(&v(&["1", "0.000001"]))?.to_string(), "0.333331");
        Ok(())
    }

    #[test]
    fn test_angles() -> Result<(), SleGeometryError> {
        assert_approx(
            v(&["3.183", "-7.627"]).angle_with(&v(&["-2.668", "5.319"]))?,
            3.0720263098372476,
        );
        assert_approx(
            v(&["7.35", "0.221", "5.188"]).angle_with_degrees(&v(&["2.751", "8.259", "3.985"]))?,
            60.27581120523091,
        );
        Ok(())
    }

    #[test]
    fn test_parallel_and_orthogonal() -> Result<(), SleGeometryError> {
        let a = v(&["-7.579", "-7.88"]);
        let b = v(&["22.737", "23.64"]);
        assert!(a.is_parallel_to(&b)?);
        assert!(!a.is_orthogonal_to(&b)?);

        let c = v(&["-2.328", "-7.284", "-1.214"]);
        let d = v(&["-1.821", "1.072", "-2.94"]);
        assert!(!c.is_parallel_to(&d)?);
        assert!(c.is_orthogonal_to(&d)?);

        let zero = v(&["0", "0"]);
        let e = v(&["2.118", "4.827"]);
        assert!(e.is_parallel_to(&zero)?);
        assert!(e.is_orthogonal_to(&zero)?);
        Ok(())
    }

    #[test]
    fn test_negative_dot_is_not_orthogonal() -> Result<(), SleGeometryError> {
        // dot product is about -77.687
        let a = v(&["-2.029", "9.97", "4.172"]);
        let b = v(&["-9.231", "-6.639", "-7.245"]);
        assert!(!a.is_orthogonal_to(&b)?);
        assert!(!a.is_parallel_to(&b)?);
        Ok(())
    }

    #[test]
    fn test_projection_and_rejection() -> Result<(), SleGeometryError> {
        let projected = v(&["3.039", "1.879"]).project_onto(&v(&["0.825", "2.036"]))?;
        assert_approx(projected[0].to_f64(), 1.0826069624844668);
        assert_approx(projected[1].to_f64(), 2.671742758325302);

        let a = v(&["3.009", "-6.172", "3.692", "-2.51"]);
        let b = v(&["6.404", "-9.144", "2.759", "8.718"]);
        let parallel = a.project_onto(&b)?;
        let orthogonal = a.reject_from(&b)?;
        assert_approx(orthogonal[3].to_f64(), -5.189813233256158);
        assert!(orthogonal.is_orthogonal_to_within(&b, 1e-9)?);
        let recombined = parallel.plus(&orthogonal)?;
        for (lhs, rhs) in recombined.iter().zip(a.iter()) {
            assert_approx(lhs.to_f64(), rhs.to_f64());
        }
        Ok(())
    }

    #[test]
    fn test_cross_product() -> Result<(), SleGeometryError> {
        assert_eq!(
            v(&["8.462", "7.893", "-8.187"]).cross(&v(&["6.984", "-5.975", "4.778"]))?,
            v(&["-11.204571", "-97.609444", "-105.685162"])
        );
        assert_eq!(v(&["1", "2"]).cross(&v(&["3", "4"]))?, v(&["0", "0", "-2"]));
        assert!(matches!(
            v(&["1", "2", "3", "4"]).cross(&v(&["1", "2", "3", "4"])),
            Err(SleGeometryError::UnsupportedDimension(4))
        ));
        assert!(v(&["1"]).cross(&v(&["2"])).is_err());
        Ok(())
    }

    #[test]
    fn test_areas() -> Result<(), SleGeometryError> {
        let area = v(&["-8.987", "-9.838", "5.031"])
            .parallelogram_area(&v(&["-4.268", "-1.861", "-8.866"]))?;
        assert!((area - 142.12222140184633).abs() < 1e-6);
        let area =
            v(&["1.5", "9.547", "3.691"]).triangle_area(&v(&["-6.007", "0.124", "5.772"]))?;
        assert!((area - 42.56493739941894).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(v(&["1.6", "2", "-3"]).to_string(), "Vector: (1.6, 2, -3)");
    }

    #[test]
    fn test_serde() {
        let vector = v(&["1.5", "-2"]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"["1.5","-2"]"#);
        assert_eq!(serde_json::from_str::<Vector>(&json).unwrap(), vector);
        assert!(serde_json::from_str::<Vector>("[]").is_err());
    }
}
