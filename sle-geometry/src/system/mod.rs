//! # Linear System Module
//!
//! A [`LinearSystem`] is an ordered list of hyperplanes of one shared dimension. Row
//! operations mutate the system in place; the reductions in [`reduce`] return new systems.

pub mod reduce;

use crate::errors::SleGeometryError;
use crate::hyperplane::Hyperplane;
use crate::numeric::{Decimal, Tolerance};

use itertools::Itertools;
use log::{debug, trace};

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinearSystemRepr", into = "LinearSystemRepr")]
pub struct LinearSystem {
    planes: Vec<Hyperplane>,
    dimension: usize,
    tolerance: Tolerance,
}

#[derive(Serialize, Deserialize)]
struct LinearSystemRepr {
    planes: Vec<Hyperplane>,
}

impl TryFrom<LinearSystemRepr> for LinearSystem {
    type Error = SleGeometryError;

    fn try_from(repr: LinearSystemRepr) -> Result<Self, Self::Error> {
        LinearSystem::try_with(repr.planes)
    }
}

impl From<LinearSystem> for LinearSystemRepr {
    fn from(system: LinearSystem) -> Self {
        LinearSystemRepr {
            planes: system.planes,
        }
    }
}

impl LinearSystem {
    /// Builds a system from equations that all live in the same dimension.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::InvalidArgument` if `planes` is empty and
    /// `SleGeometryError::DimensionMismatch` if the dimensions differ.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::hyperplane::Hyperplane;
    /// # use sle_geometry::system::LinearSystem;
    /// # use sle_geometry::vector::Vector;
    /// let p1 = Hyperplane::new(Vector::parse(&["1", "1", "1"]).unwrap(), "1".parse().unwrap());
    /// let p2 = Hyperplane::new(Vector::parse(&["0", "1", "0"]).unwrap(), "2".parse().unwrap());
    /// let system = LinearSystem::try_with(vec![p1, p2]).unwrap();
    /// assert_eq!(system.dimension(), 3);
    ///
    /// let line = Hyperplane::new(Vector::parse(&["1", "1"]).unwrap(), "1".parse().unwrap());
    /// assert!(LinearSystem::try_with(vec![system[0].clone(), line]).is_err());
    /// ```
    pub fn try_with(planes: Vec<Hyperplane>) -> Result<Self, SleGeometryError> {
        let Some(first) = planes.first() else {
            return Err(SleGeometryError::InvalidArgument(
                "A linear system needs at least one equation".to_string(),
            ));
        };

        let dimension = first.dimension();
        let tolerance = *first.tolerance();
        if let Some(position) = planes.iter().position(|p| p.dimension() != dimension) {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "All planes in the system should live in the same dimension: \
                 equation {} has dimension {}, expected {}",
                position + 1,
                planes[position].dimension(),
                dimension
            )));
        }

        Ok(Self {
            planes,
            dimension,
            tolerance: Tolerance::default(),
        }
        .with_tolerance(tolerance))
    }

    /// Applies `tolerance` to the system and every equation in it.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self.planes = self
            .planes
            .into_iter()
            .map(|p| p.with_tolerance(tolerance))
            .collect();
        self
    }

    /// Runs every later reduction at `precision` significant digits.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.planes = self
            .planes
            .into_iter()
            .map(|p| p.with_precision(precision))
            .collect();
        self
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn planes(&self) -> &[Hyperplane] {
        &self.planes
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Replaces equation `index`.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` if `plane` has another dimension and
    /// `SleGeometryError::InvalidArgument` if `index` is out of range.
    pub fn set(&mut self, index: usize, plane: Hyperplane) -> Result<(), SleGeometryError> {
        if plane.dimension() != self.dimension {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "All planes in the system should live in the same dimension: got {}, expected {}",
                plane.dimension(),
                self.dimension
            )));
        }
        let len = self.len();
        let slot = self.planes.get_mut(index).ok_or_else(|| {
            SleGeometryError::InvalidArgument(format!(
                "Equation index {} out of range for a system of {} equations",
                index, len
            ))
        })?;
        *slot = plane.with_tolerance(self.tolerance);
        Ok(())
    }

    pub fn swap_rows(&mut self, row1: usize, row2: usize) {
        trace!("swap rows {} and {}", row1, row2);
        self.planes.swap(row1, row2);
    }

    /// Multiplies equation `row` by `coefficient`.
    pub fn scale_row(&mut self, row: usize, coefficient: &Decimal) {
        trace!("scale row {} by {}", row, coefficient);
        self.planes[row] = self.planes[row].scale(coefficient);
    }

    /// `planes[dst] += coefficient * planes[src]`; only `dst` changes.
    pub fn add_scaled_row(&mut self, coefficient: &Decimal, src: usize, dst: usize) {
        trace!("add {} times row {} to row {}", coefficient, src, dst);
        let addend = self.planes[src].scale(coefficient);
        match self.planes[dst].plus(&addend) {
            Ok(sum) => self.planes[dst] = sum,
            // unreachable: every row shares the system dimension
            Err(e) => debug!("row {} left unchanged: {}", dst, e),
        }
    }

    /// Leading variable of each equation, `None` for equations without one.
    pub fn pivot_indices(&self) -> Vec<Option<usize>> {
        self.planes
            .iter()
            .map(Hyperplane::first_nonzero_index)
            .collect()
    }

    /// Which coefficients of equation `row` count as zero.
    fn zero_mask(&self, row: usize) -> Vec<bool> {
        self.planes[row]
            .normal_vector()
            .iter()
            .map(|c| self.tolerance.is_near_zero(c))
            .collect()
    }

    /// First column where exactly one of two equations has a near-zero coefficient.
    fn first_differing_column(&self, row1: usize, row2: usize) -> Option<usize> {
        self.zero_mask(row1)
            .into_iter()
            .zip(self.zero_mask(row2))
            .position(|(a, b)| a != b)
    }

    /// Reorders the equations by leading variable.
    ///
    /// Between two equations the decisive column is the first one where exactly one of them
    /// has a near-zero coefficient; the equation with the nonzero coefficient there goes first.
    /// Equations without variables therefore sink to the bottom. The sort is stable, so
    /// equations with the same zero pattern keep their relative order.
    pub fn organize(&mut self) {
        let order = (0..self.len())
            .sorted_by(|&a, &b| match self.first_differing_column(a, b) {
                Some(col) if !self.tolerance.is_near_zero(&self.planes[a].normal_vector()[col]) => {
                    Ordering::Less
                }
                Some(_) => Ordering::Greater,
                None => Ordering::Equal,
            })
            .collect_vec();

        if order.iter().enumerate().all(|(position, &row)| position == row) {
            return;
        }

        debug!("organize: new row order {:?}", order);
        let mut planes = std::mem::take(&mut self.planes)
            .into_iter()
            .map(Some)
            .collect_vec();
        self.planes = order
            .into_iter()
            .filter_map(|row| planes[row].take())
            .collect();
    }

    /// First row at or below `start` whose coefficient at `col` is not near zero.
    fn find_row_with_nonzero(&self, col: usize, start: usize) -> Option<usize> {
        (start..self.len()).find(|&row| {
            !self
                .tolerance
                .is_near_zero(&self.planes[row].normal_vector()[col])
        })
    }
}

impl Index<usize> for LinearSystem {
    type Output = Hyperplane;

    fn index(&self, index: usize) -> &Self::Output {
        &self.planes[index]
    }
}

impl fmt::Display for LinearSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let equations = self
            .planes
            .iter()
            .enumerate()
            .map(|(i, p)| format!("Equation {}: {}", i + 1, p))
            .join("\n");
        write!(f, "Linear System:\n{}", equations)
    }
}
