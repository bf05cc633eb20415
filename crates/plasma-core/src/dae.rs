//! Semi-explicit DAE system `A·dx/dt = B·x + c` for transient analysis.
//!
//! Rows follow the unknown layout. KCL rows carry the node equations moved
//! to the right-hand side (`C·dv/dt = -G·v - incidence·j + i_src`), voltage
//! source rows read `0 = -(v_a - v_b) + E` and inductor rows read
//! `L·di/dt = v_a - v_b`. A row is differential only if a capacitor or an
//! inductor wrote a nonzero entry into it; every other row is an algebraic
//! constraint.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DaeSystem {
    /// Coefficients of the time derivative.
    pub a: DMatrix<f64>,
    /// Coefficients of the state.
    pub b: DMatrix<f64>,
    /// Constant term.
    pub c: DVector<f64>,
    /// `true` for rows without a derivative term.
    pub algebraic_mask: Vec<bool>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Number of branch-current variables.
    pub num_branches: usize,
}

impl DaeSystem {
    /// Create a zeroed system with every row algebraic.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            a: DMatrix::zeros(size, size),
            b: DMatrix::zeros(size, size),
            c: DVector::zeros(size),
            algebraic_mask: vec![true; size],
            num_nodes,
            num_branches,
        }
    }

    /// Total size of the system.
    pub fn size(&self) -> usize {
        self.num_nodes + self.num_branches
    }

    /// Check if the system has no unknowns.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Stamp a conductance: the negated four-stamp into `B`.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if node_i == node_j {
            return;
        }
        if let Some(i) = node_i {
            self.b[(i, i)] -= g;
        }
        if let Some(j) = node_j {
            self.b[(j, j)] -= g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.b[(i, j)] += g;
            self.b[(j, i)] += g;
        }
    }

    /// Stamp a capacitance into `A` and mark the touched rows differential.
    ///
    /// A capacitor across a single node stores no charge and writes nothing.
    pub fn stamp_capacitance(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        capacitance: f64,
    ) {
        if node_i == node_j || capacitance == 0.0 {
            return;
        }
        if let Some(i) = node_i {
            self.a[(i, i)] += capacitance;
            self.algebraic_mask[i] = false;
        }
        if let Some(j) = node_j {
            self.a[(j, j)] += capacitance;
            self.algebraic_mask[j] = false;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.a[(i, j)] -= capacitance;
            self.a[(j, i)] -= capacitance;
        }
    }

    /// Stamp a current source driving `current` from node i to node j.
    pub fn stamp_current_source(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        current: f64,
    ) {
        if node_i == node_j {
            return;
        }
        if let Some(i) = node_i {
            self.c[i] -= current;
        }
        if let Some(j) = node_j {
            self.c[j] += current;
        }
    }

    /// Stamp a voltage source with its branch current in slot `branch`.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        branch: usize,
        voltage: f64,
    ) {
        let row = self.num_nodes + branch;

        if let Some(i) = node_pos {
            self.b[(i, row)] -= 1.0;
            self.b[(row, i)] -= 1.0;
        }
        if let Some(j) = node_neg {
            self.b[(j, row)] += 1.0;
            self.b[(row, j)] += 1.0;
        }

        self.c[row] += voltage;
    }

    /// Stamp an inductor with its branch current in slot `branch`.
    ///
    /// The branch row becomes differential; the KCL rows at the terminals
    /// only gain the incidence of the branch current.
    pub fn stamp_inductor(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        branch: usize,
        inductance: f64,
    ) {
        let row = self.num_nodes + branch;

        if inductance != 0.0 {
            self.a[(row, row)] += inductance;
            self.algebraic_mask[row] = false;
        }
        if let Some(i) = node_pos {
            self.b[(i, row)] -= 1.0;
            self.b[(row, i)] += 1.0;
        }
        if let Some(j) = node_neg {
            self.b[(j, row)] += 1.0;
            self.b[(row, j)] -= 1.0;
        }
    }

    /// Check if a row carries a derivative term.
    pub fn is_differential(&self, row: usize) -> bool {
        !self.algebraic_mask[row]
    }

    /// Rows with a derivative term.
    pub fn differential_rows(&self) -> Vec<usize> {
        (0..self.size()).filter(|&r| !self.algebraic_mask[r]).collect()
    }

    /// Rows without a derivative term.
    pub fn algebraic_rows(&self) -> Vec<usize> {
        (0..self.size()).filter(|&r| self.algebraic_mask[r]).collect()
    }

    /// Evaluate `B·x + c`.
    pub fn rhs(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        self.check_len(x)?;
        Ok(&self.b * x + &self.c)
    }

    /// Evaluate the implicit residual `A·xdot - B·x - c`.
    pub fn residual(&self, x: &DVector<f64>, xdot: &DVector<f64>) -> Result<DVector<f64>> {
        self.check_len(xdot)?;
        Ok(&self.a * xdot - self.rhs(x)?)
    }

    /// Residual of the algebraic rows at `x` (differential rows read zero).
    pub fn algebraic_residual(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        let mut r = self.rhs(x)?;
        for (row, &algebraic) in self.algebraic_mask.iter().enumerate() {
            if !algebraic {
                r[row] = 0.0;
            }
        }
        Ok(r)
    }

    fn check_len(&self, v: &DVector<f64>) -> Result<()> {
        if v.len() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                actual: v.len(),
            });
        }
        Ok(())
    }

    /// Dump the system at debug level.
    pub fn log_system(&self) {
        if !log::log_enabled!(log::Level::Debug) || self.is_empty() {
            return;
        }
        log::debug!(
            "DAE system {}x{} ({} nodes, {} branches)",
            self.size(),
            self.size(),
            self.num_nodes,
            self.num_branches
        );
        log::debug!("A ={}", self.a);
        log::debug!("B ={}", self.b);
        log::debug!("c ={}", self.c);
        log::debug!("algebraic rows: {:?}", self.algebraic_rows());
    }
}
