//! Consistent initial conditions for `A·dx/dt = B·x + c`.
//!
//! The DC operating point is the starting state of a transient run. It
//! satisfies every algebraic row by construction, so this module only
//! verifies that and derives the initial derivative of the differential
//! components.

use nalgebra::{DMatrix, DVector};
use plasma_core::dae::DaeSystem;

use crate::error::{Error, Result};

/// Relative tolerance for the algebraic-row check.
pub const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// Singular values below this fraction of the largest are dropped when the
/// differential block is rank deficient.
const SVD_EPS: f64 = 1e-12;

/// A state `x0` and derivative `xdot0` consistent with the DAE.
#[derive(Debug, Clone)]
pub struct InitialState {
    pub x0: DVector<f64>,
    pub xdot0: DVector<f64>,
}

/// Verify `x0` against the algebraic rows and compute `xdot0`.
///
/// Each algebraic row `i` must satisfy `|(B·x0 + c)_i| <= tol·(1 + scale_i)`
/// with `scale_i = Σ_j |B_ij·x0_j| + |c_i|`. The differential components of
/// `xdot0` solve `A_dd·xdot_d = (B·x0 + c)_d`; the algebraic components are
/// zero, which is logged per row unless `suppress_algebraic` is set.
pub fn consistent_initial_state(
    dae: &DaeSystem,
    x0: DVector<f64>,
    tol: f64,
    suppress_algebraic: bool,
) -> Result<InitialState> {
    let f = dae.rhs(&x0)?;
    let size = dae.size();

    for row in dae.algebraic_rows() {
        let scale: f64 = dae
            .b
            .row(row)
            .iter()
            .zip(x0.iter())
            .map(|(b, x)| (b * x).abs())
            .sum::<f64>()
            + dae.c[row].abs();
        if f[row].abs() > tol * (1.0 + scale) {
            return Err(Error::InconsistentInitialCondition {
                row,
                residual: f[row],
            });
        }
        if !suppress_algebraic {
            log::warn!("row {row} is algebraic; initial derivative set to zero");
        }
    }

    let diff = dae.differential_rows();
    let mut xdot0 = DVector::zeros(size);
    if !diff.is_empty() {
        let a_dd = DMatrix::from_fn(diff.len(), diff.len(), |i, j| dae.a[(diff[i], diff[j])]);
        let f_d = DVector::from_fn(diff.len(), |i, _| f[diff[i]]);
        let xdot_d = solve_differential_block(a_dd, &f_d)?;
        for (k, &row) in diff.iter().enumerate() {
            xdot0[row] = xdot_d[k];
        }
    }

    log::debug!("initial derivative: {:?}", xdot0.as_slice());
    Ok(InitialState { x0, xdot0 })
}

/// Solve the differential block, falling back to a least-squares solution
/// when capacitors only couple nodes to each other.
fn solve_differential_block(a_dd: DMatrix<f64>, f_d: &DVector<f64>) -> Result<DVector<f64>> {
    if f_d.iter().all(|&v| v == 0.0) {
        return Ok(DVector::zeros(f_d.len()));
    }
    if let Some(x) = a_dd.clone().lu().solve(f_d) {
        if x.iter().all(|v| v.is_finite()) {
            return Ok(x);
        }
    }
    let eps = SVD_EPS * a_dd.amax();
    a_dd.svd(true, true)
        .solve(f_d, eps)
        .map_err(|reason| Error::InvalidConfig(format!("initial derivative: {reason}")))
}
