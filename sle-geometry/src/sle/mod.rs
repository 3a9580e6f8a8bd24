//! # Solving Module
//!
//! Classifies a [`LinearSystem`] from its reduced row-echelon form: exactly one solution,
//! none, or infinitely many described by a [`Parametrization`].

use crate::errors::SleGeometryError;
use crate::hyperplane::{Hyperplane, write_number};
use crate::numeric::{DEFAULT_PRECISION, Decimal};
use crate::system::LinearSystem;
use crate::vector::Vector;

use itertools::Itertools;
use log::debug;
use num_traits::{One, Zero};

use serde::Serialize;

use std::fmt;

pub const NO_SOLUTIONS_MSG: &str = "No solutions";
pub const INF_SOLUTIONS_MSG: &str = "Infinitely many solutions";

/// Outcome of [`LinearSystem::solve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Solution {
    /// The single point shared by every equation.
    Unique(Vector),
    /// The equations contradict each other.
    NoSolution,
    Infinite(Parametrization),
}

impl Solution {
    pub fn is_unique(&self) -> bool {
        matches!(self, Solution::Unique(_))
    }

    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Solution::NoSolution)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Solution::Infinite(_))
    }

    pub fn point(&self) -> Option<&Vector> {
        match self {
            Solution::Unique(point) => Some(point),
            _ => None,
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Unique(point) => write!(f, "{}", point),
            Solution::NoSolution => write!(f, "{}", NO_SOLUTIONS_MSG),
            Solution::Infinite(parametrization) => {
                write!(f, "{}\n{}", INF_SOLUTIONS_MSG, parametrization)
            }
        }
    }
}

/// The solution set `basepoint + t_1·d_1 + ... + t_k·d_k`, one direction per free variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parametrization {
    basepoint: Vector,
    direction_vectors: Vec<Vector>,
}

impl Parametrization {
    /// # Errors
    ///
    /// Returns `SleGeometryError::DimensionMismatch` if a direction does not match the basepoint.
    pub fn try_with(basepoint: Vector, direction_vectors: Vec<Vector>) -> Result<Self, SleGeometryError> {
        if let Some(d) = direction_vectors
            .iter()
            .find(|d| d.dimension() != basepoint.dimension())
        {
            return Err(SleGeometryError::DimensionMismatch(format!(
                "The basepoint and the direction vectors should all live in the same dimension ({} vs {})",
                basepoint.dimension(),
                d.dimension()
            )));
        }

        Ok(Self {
            basepoint,
            direction_vectors,
        })
    }

    pub fn basepoint(&self) -> &Vector {
        &self.basepoint
    }

    pub fn direction_vectors(&self) -> &[Vector] {
        &self.direction_vectors
    }

    pub fn dimension(&self) -> usize {
        self.basepoint.dimension()
    }

    pub fn free_variable_count(&self) -> usize {
        self.direction_vectors.len()
    }

    /// Evaluates the parametrization with one value per free variable.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::InvalidArgument` if `params` does not have exactly one
    /// value per direction vector.
    pub fn point_at(&self, params: &[Decimal]) -> Result<Vector, SleGeometryError> {
        if params.len() != self.direction_vectors.len() {
            return Err(SleGeometryError::InvalidArgument(format!(
                "Expected {} parameters, got {}",
                self.direction_vectors.len(),
                params.len()
            )));
        }

        self.direction_vectors
            .iter()
            .zip(params)
            .try_fold(self.basepoint.clone(), |point, (direction, t)| {
                point.plus(&direction.scale(t))
            })
    }
}

impl fmt::Display for Parametrization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = (0..self.dimension()).map(|coord| {
            let terms = self
                .direction_vectors
                .iter()
                .enumerate()
                .map(|(k, direction)| {
                    let c = direction[coord].round_dp(3);
                    let sign = if c.is_negative() { '-' } else { '+' };
                    format!(" {} {} t_{}", sign, write_number(&c.abs()), k + 1)
                })
                .join("");
            format!("x_{} = {}{}", coord + 1, write_number(&self.basepoint[coord]), terms)
        });
        write!(f, "{}", lines.format("\n"))
    }
}

impl LinearSystem {
    /// Solves the system through its reduced row-echelon form.
    ///
    /// A row `0 = k` with `k` not near zero makes the system inconsistent, and so does a
    /// reduced form that pins some variable on its own row while another row still ties
    /// several variables together. Otherwise the solution is unique when every variable is
    /// a pivot of some row, and infinite when at least one variable is free.
    ///
    /// # Errors
    ///
    /// Degenerate and inconsistent systems are regular outcomes, not errors. An `Err` is
    /// only returned if a result vector cannot be built.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::hyperplane::Hyperplane;
    /// # use sle_geometry::system::LinearSystem;
    /// # use sle_geometry::vector::Vector;
    /// let plane = |n: [&str; 3], k: &str| Hyperplane::plane(Vector::parse(&n).unwrap(), k.parse().unwrap()).unwrap();
    /// let system = LinearSystem::try_with(vec![
    ///     plane(["1", "1", "1"], "1"),
    ///     plane(["1", "1", "1"], "5"),
    /// ])
    /// .unwrap();
    /// assert!(system.solve().unwrap().is_inconsistent());
    ///
    /// let system = LinearSystem::try_with(vec![
    ///     plane(["1", "0", "0"], "1"),
    ///     plane(["0", "2", "0"], "4"),
    ///     plane(["0", "0", "1"], "-3"),
    /// ])
    /// .unwrap();
    /// assert_eq!(
    ///     system.solve().unwrap().point(),
    ///     Some(&Vector::parse(&["1", "2", "-3"]).unwrap())
    /// );
    /// ```
    pub fn solve(&self) -> Result<Solution, SleGeometryError> {
        let solution = match self.parametrize()? {
            None => Solution::NoSolution,
            Some(parametrization) if parametrization.free_variable_count() == 0 => {
                Solution::Unique(parametrization.basepoint)
            }
            Some(parametrization) => Solution::Infinite(parametrization),
        };

        debug!(
            "solution: {}",
            match &solution {
                Solution::Unique(_) => "unique",
                Solution::NoSolution => "none",
                Solution::Infinite(_) => "infinite",
            }
        );
        Ok(solution)
    }

    /// Describes the solution set, or `None` if [`LinearSystem::solve`] reports no solution.
    ///
    /// Pivot variables take the constant of their row in the reduced row-echelon form and
    /// every free variable contributes one direction vector.
    pub fn parametrize(&self) -> Result<Option<Parametrization>, SleGeometryError> {
        let rref = self.rref();
        let pivots = rref.pivot_indices();
        let tolerance = rref.tolerance();

        if let Some(row) = rref
            .planes()
            .iter()
            .zip(&pivots)
            .position(|(plane, pivot)| {
                pivot.is_none() && !tolerance.is_near_zero(plane.constant_term())
            })
        {
            debug!("row {} reads 0 = {}", row + 1, rref[row].constant_term());
            return Ok(None);
        }

        let counts = rref.planes().iter().map(Hyperplane::variable_count).collect_vec();
        let fixed = counts.iter().any(|&n| n == 1);
        let coupled = counts.iter().any(|&n| n > 1);
        if fixed && coupled {
            debug!("single-variable rows mixed with coupled rows: {:?}", counts);
            return Ok(None);
        }

        let dimension = rref.dimension();
        let pivot_rows = rref
            .planes()
            .iter()
            .zip(&pivots)
            .filter_map(|(plane, pivot)| pivot.map(|col| (plane, col)))
            .collect_vec();

        let precision = rref
            .planes()
            .iter()
            .map(|plane| plane.constant_term().precision())
            .max()
            .unwrap_or(DEFAULT_PRECISION);
        let zero = Decimal::zero().with_precision(precision);

        let mut basepoint = vec![zero.clone(); dimension];
        for &(plane, col) in &pivot_rows {
            basepoint[col] = plane.constant_term().checked_div(&plane.normal_vector()[col])?;
        }

        let free_variables = (0..dimension)
            .filter(|c| !pivot_rows.iter().any(|&(_, col)| col == *c))
            .collect_vec();
        debug!("free variables: {:?}", free_variables);

        let direction_vectors = free_variables
            .into_iter()
            .map(|free| {
                let mut direction = vec![zero.clone(); dimension];
                direction[free] = Decimal::one().with_precision(precision);
                for &(plane, col) in &pivot_rows {
                    let coefficients = plane.normal_vector();
                    direction[col] = -coefficients[free].checked_div(&coefficients[col])?;
                }
                Vector::try_with(direction)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Parametrization::try_with(Vector::try_with(basepoint)?, direction_vectors).map(Some)
    }
}
