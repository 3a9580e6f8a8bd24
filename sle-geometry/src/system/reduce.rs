//! Gaussian elimination: triangular form and reduced row-echelon form.

use crate::numeric::Decimal;
use crate::system::LinearSystem;

use log::{debug, trace};
use num_traits::{One, Zero};

impl LinearSystem {
    /// Factor `k` such that `target_row + k * pivot_row` has a zero at `col`.
    ///
    /// Returns zero when the pivot coefficient is near zero, since no such factor exists.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::hyperplane::Hyperplane;
    /// # use sle_geometry::system::LinearSystem;
    /// # use sle_geometry::vector::Vector;
    /// let system = LinearSystem::try_with(vec![
    ///     Hyperplane::new(Vector::parse(&["2", "1"]).unwrap(), "1".parse().unwrap()),
    ///     Hyperplane::new(Vector::parse(&["3", "1"]).unwrap(), "1".parse().unwrap()),
    /// ])
    /// .unwrap();
    /// assert_eq!(system.coefficient_to_eliminate(0, 1, 0).to_string(), "-1.5");
    /// assert_eq!(system.coefficient_to_eliminate(0, 1, 1).to_string(), "-1");
    /// ```
    pub fn coefficient_to_eliminate(&self, pivot_row: usize, target_row: usize, col: usize) -> Decimal {
        let pivot = &self.planes[pivot_row].normal_vector()[col];
        let target = &self.planes[target_row].normal_vector()[col];
        if self.tolerance.is_near_zero(pivot) {
            return Decimal::zero();
        }

        match target.checked_div(pivot) {
            Ok(ratio) => -ratio,
            Err(_) => Decimal::zero(),
        }
    }

    /// Adds a multiple of `pivot_row` to `target_row` so that `col` vanishes there.
    fn eliminate(&mut self, pivot_row: usize, target_row: usize, col: usize) {
        let coefficient = self.coefficient_to_eliminate(pivot_row, target_row, col);
        if coefficient.is_zero() {
            return;
        }
        self.add_scaled_row(&coefficient, pivot_row, target_row);
        // the eliminated entry is zero by construction; drop the rounding residue
        let zero = Decimal::zero().with_precision(coefficient.precision());
        self.planes[target_row] = self.planes[target_row].with_coefficient(col, zero);
    }

    /// Clears `col` from every row below `row`.
    fn eliminate_below(&mut self, row: usize, col: usize) {
        for target in (row + 1)..self.len() {
            self.eliminate(row, target, col);
        }
    }

    /// Clears `col` from every row above `row`.
    pub fn eliminate_above(&mut self, row: usize, col: usize) {
        for target in (0..row).rev() {
            self.eliminate(row, target, col);
        }
    }

    /// Scales `row` so its coefficient at `col` becomes exactly one.
    pub fn coefficient_to_one(&mut self, row: usize, col: usize) {
        let pivot = &self.planes[row].normal_vector()[col];
        if pivot.is_one() {
            return;
        }
        let Ok(factor) = pivot.recip() else {
            trace!("row {} has no coefficient at column {} to normalize", row, col);
            return;
        };
        let one = Decimal::one().with_precision(factor.precision());
        self.scale_row(row, &factor);
        self.planes[row] = self.planes[row].with_coefficient(col, one);
    }

    /// Returns an equivalent system in which every row's leading variable sits strictly to
    /// the right of the one above it. Pivots are not normalized.
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
    ///     plane(["0", "1", "0"], "2"),
    ///     plane(["1", "1", "-1"], "3"),
    ///     plane(["1", "0", "-2"], "2"),
    /// ])
    /// .unwrap();
    /// let t = system.triangular_form();
    /// assert_eq!(t[0], plane(["1", "1", "1"], "1"));
    /// assert_eq!(t[1], plane(["0", "1", "0"], "2"));
    /// assert_eq!(t[2], plane(["0", "0", "-2"], "2"));
    /// assert_eq!(t[3], plane(["0", "0", "0"], "0"));
    /// ```
    pub fn triangular_form(&self) -> Self {
        let mut system = self.clone();

        let dimension = system.dimension();
        let mut col = 0;
        for row in 0..system.len() {
            while col < dimension {
                if system.tolerance.is_near_zero(&system.planes[row].normal_vector()[col]) {
                    match system.find_row_with_nonzero(col, row + 1) {
                        Some(other) => system.swap_rows(row, other),
                        None => {
                            col += 1;
                            continue;
                        }
                    }
                }

                system.eliminate_below(row, col);
                col += 1;
                break;
            }
        }

        system.organize();
        debug!("triangular form:\n{}", system);
        system
    }

    /// Returns the reduced row-echelon form: every pivot is one and is the only nonzero
    /// entry in its column.
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
    ///     plane(["1", "1", "1"], "2"),
    /// ])
    /// .unwrap();
    /// let r = system.rref();
    /// assert_eq!(r[0], plane(["1", "1", "1"], "1"));
    /// assert_eq!(r[1], plane(["0", "0", "0"], "1"));
    /// ```
    pub fn rref(&self) -> Self {
        let mut system = self.triangular_form();
        let pivots = system.pivot_indices();

        for (row, pivot) in pivots.into_iter().enumerate().rev() {
            let Some(col) = pivot else {
                continue;
            };
            system.coefficient_to_one(row, col);
            system.eliminate_above(row, col);
        }

        debug!("reduced row-echelon form:\n{}", system);
        system
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SleGeometryError;
    use crate::hyperplane::Hyperplane;
    use crate::numeric::Decimal;
    use crate::system::LinearSystem;
    use crate::vector::Vector;

    fn plane(normal: [&str; 3], constant: &str) -> Hyperplane {
        Hyperplane::plane(Vector::parse(&normal).unwrap(), constant.parse().unwrap()).unwrap()
    }

    fn system(planes: Vec<Hyperplane>) -> LinearSystem {
        LinearSystem::try_with(planes).unwrap()
    }

    #[test]
    fn test_coefficient_to_eliminate_without_pivot() {
        let s = system(vec![plane(["0", "1", "0"], "1"), plane(["4", "1", "0"], "1")]);
        assert_eq!(s.coefficient_to_eliminate(0, 1, 0), Decimal::from(0));
        assert_eq!(s.coefficient_to_eliminate(1, 0, 0), Decimal::from(0));
        assert_eq!(s.coefficient_to_eliminate(0, 1, 1), Decimal::from(-1));
    }

    #[test]
    fn test_triangular_form_simple() {
        let p1 = plane(["1", "1", "1"], "1");
        let p2 = plane(["0", "1", "1"], "2");
        let t = system(vec![p1.clone(), p2.clone()]).triangular_form();
        assert_eq!(t[0], p1);
        assert_eq!(t[1], p2);
    }

    #[test]
    fn test_triangular_form_dependent_rows() {
        let t = system(vec![plane(["1", "1", "1"], "1"), plane(["1", "1", "1"], "2")])
            .triangular_form();
        assert_eq!(t[0], plane(["1", "1", "1"], "1"));
        assert_eq!(t[1], plane(["0", "0", "0"], "1"));
    }

    #[test]
    fn test_triangular_form_with_swaps() {
        let t = system(vec![
            plane(["0", "1", "0"], "2"),
            plane(["1", "1", "-1"], "3"),
            plane(["1", "0", "-2"], "2"),
        ])
        .triangular_form();
        assert_eq!(t[0], plane(["1", "1", "-1"], "3"));
        assert_eq!(t[1], plane(["0", "1", "0"], "2"));
        assert_eq!(t[2], plane(["0", "0", "-1"], "1"));
    }

    #[test]
    fn test_triangular_form_leaves_input_untouched() {
        let original = system(vec![
            plane(["0", "1", "1"], "1"),
            plane(["1", "-1", "1"], "2"),
            plane(["1", "2", "-5"], "3"),
        ]);
        let copy = original.clone();
        let t = original.triangular_form();
        assert_eq!(original, copy);
        assert_eq!(t[0], plane(["1", "-1", "1"], "2"));
        assert_eq!(t[1], plane(["0", "1", "1"], "1"));
        assert_eq!(t[2], plane(["0", "0", "-9"], "-2"));
    }

    #[test]
    fn test_rref_simple() {
        let r = system(vec![plane(["1", "1", "1"], "1"), plane(["0", "1", "1"], "2")]).rref();
        assert_eq!(r[0], plane(["1", "0", "0"], "-1"));
        assert_eq!(r[1], plane(["0", "1", "1"], "2"));
    }

    #[test]
    fn test_rref_with_swaps() {
        let r = system(vec![
            plane(["0", "1", "0"], "2"),
            plane(["1", "1", "-1"], "3"),
            plane(["1", "0", "-2"], "2"),
        ])
        .rref();
        assert_eq!(r[0], plane(["1", "0", "0"], "0"));
        assert_eq!(r[1], plane(["0", "1", "0"], "2"));
        assert_eq!(r[2], plane(["0", "0", "1"], "-1"));
    }

    #[test]
    fn test_rref_fractions() -> Result<(), SleGeometryError> {
        let r = system(vec![
            plane(["0", "1", "1"], "1"),
            plane(["1", "-1", "1"], "2"),
            plane(["1", "2", "-5"], "3"),
        ])
        .rref();
        let ninths = |row: usize, numerator: i64| -> Result<bool, SleGeometryError> {
            let expected = Decimal::from(numerator).checked_div(&Decimal::from(9))?;
            Ok((r[row].constant_term() - &expected).is_near_zero(1e-25))
        };
        assert_eq!(r[0].normal_vector(), &Vector::parse(&["1", "0", "0"])?);
        assert_eq!(r[1].normal_vector(), &Vector::parse(&["0", "1", "0"])?);
        assert_eq!(r[2].normal_vector(), &Vector::parse(&["0", "0", "1"])?);
        assert!(ninths(0, 23)?);
        assert!(ninths(1, 7)?);
        assert!(ninths(2, 2)?);
        Ok(())
    }

    #[test]
    fn test_rref_at_lower_precision() {
        let r = system(vec![
            plane(["3", "0", "0"], "1"),
            plane(["0", "1", "0"], "1"),
            plane(["0", "0", "7"], "2"),
        ])
        .with_precision(5)
        .rref();
        assert_eq!(r[0].constant_term().to_string(), "0.33333");
        assert_eq!(r[2].constant_term().to_string(), "0.28572");
        assert_eq!(r[0].normal_vector()[0], Decimal::from(1));
    }

    #[test]
    fn test_rref_is_idempotent() {
        let r = system(vec![
            plane(["5.862", "1.178", "-10.366"], "-8.15"),
            plane(["-2.931", "-0.589", "5.183"], "-4.075"),
            plane(["3", "0", "1"], "7"),
        ])
        .rref();
        assert_eq!(r.rref(), r);
    }
}
