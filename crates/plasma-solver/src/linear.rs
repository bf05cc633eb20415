//! Dense linear system solver.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Solve a linear system Ax = b using LU decomposition with partial pivoting.
///
/// A zero or non-finite pivot, or a non-finite result, is reported as
/// [`Error::SingularMatrix`] with its position. Small but nonzero pivots are
/// accepted: circuits legitimately mix conductances many decades apart.
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }
    if a.nrows() == 0 {
        return Ok(DVector::zeros(0));
    }

    let lu = a.clone().lu();
    if let Some(row) = zero_pivot(&lu.u()) {
        return Err(Error::SingularMatrix { row });
    }

    let x = lu.solve(b).ok_or(Error::SingularMatrix { row: 0 })?;
    match x.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(Error::SingularMatrix { row }),
        None => Ok(x),
    }
}

/// First diagonal entry of `u` that is zero or non-finite.
fn zero_pivot(u: &DMatrix<f64>) -> Option<usize> {
    u.diagonal()
        .iter()
        .position(|p| *p == 0.0 || !p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_solve_simple() {
        // 2x + y = 5
        // x + 3y = 6
        // Solution: x = 1.8, y = 1.4
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let b = dvector![5.0, 6.0];

        let x = solve_dense(&a, &b).unwrap();

        assert!((x[0] - 1.8).abs() < 1e-10);
        assert!((x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_singular_matrix() {
        let a = dmatrix![1.0, 2.0; 2.0, 4.0]; // row 2 = 2 * row 1
        let b = dvector![1.0, 2.0];

        let result = solve_dense(&a, &b);
        assert!(matches!(result, Err(Error::SingularMatrix { row: 1 })));
    }

    #[test]
    fn test_zero_column_names_its_unknown() {
        // Unknown 1 appears in no equation.
        let a = dmatrix![
            2.0, 0.0, 1.0;
            0.0, 0.0, 0.0;
            1.0, 0.0, 3.0
        ];
        let b = dvector![1.0, 0.0, 1.0];

        let result = solve_dense(&a, &b);
        assert!(matches!(result, Err(Error::SingularMatrix { row: 1 })));
    }

    #[test]
    fn test_wide_conductance_range_is_solvable() {
        // 1 uOhm in series with 1 GOhm, 1 mA injected at the first node.
        let g1 = 1e6;
        let g2 = 1e-9;
        let a = dmatrix![g1, -g1; -g1, g1 + g2];
        let b = dvector![1e-3, 0.0];

        let x = solve_dense(&a, &b).unwrap();

        // Rounding in g1 + g2 limits the accuracy to several percent.
        assert!((x[1] - 1e6).abs() < 0.1 * 1e6, "v2 = {}", x[1]);
        assert!((x[0] - x[1] - 1e-9).abs() < 1e-3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = dmatrix![1.0, 2.0; 3.0, 4.0];
        let b = dvector![1.0, 2.0, 3.0];

        let result = solve_dense(&a, &b);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_empty_system() {
        let a = DMatrix::<f64>::zeros(0, 0);
        let b = DVector::<f64>::zeros(0);
        assert_eq!(solve_dense(&a, &b).unwrap().len(), 0);
    }
}
