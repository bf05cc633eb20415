//! Modified Nodal Analysis (MNA) matrix structures.

use nalgebra::{DMatrix, DMatrixView, DVector};

/// DC system in four-block form:
///
/// ```text
/// [G B] [v]   [i]
/// [C D] [j] = [e]
/// ```
///
/// G (n×n) holds conductances, B (n×b) and C (b×n) the branch incidence of
/// voltage sources and inductors, D (b×b) stays zero for independent
/// elements. The dense matrix is the flattened form of the four blocks.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    /// The coefficient matrix.
    pub matrix: DMatrix<f64>,
    /// The right-hand side vector `[i; e]`.
    pub rhs: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Number of branch-current variables (voltage sources + inductors).
    pub num_branches: usize,
}

impl MnaSystem {
    /// Create a zeroed system.
    ///
    /// # Arguments
    /// * `num_nodes` - Number of nodes excluding ground
    /// * `num_branches` - Number of branch-current unknowns
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
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

    /// Stamp a conductance between two nodes.
    ///
    /// - G[i,i] += g, G[j,j] += g
    /// - G[i,j] -= g, G[j,i] -= g
    ///
    /// `None` stands for ground and contributes nothing. A conductance from a
    /// node to itself has no net effect and writes nothing.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if node_i == node_j {
            return;
        }
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp a current source driving `current` from node i to node j
    /// through the source.
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
            self.rhs[i] -= current;
        }
        if let Some(j) = node_j {
            self.rhs[j] += current;
        }
    }

    /// Stamp a voltage source `v_pos - v_neg = voltage` with its branch
    /// current in branch slot `branch` (0-based within the branch block).
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        branch: usize,
        voltage: f64,
    ) {
        let row = self.num_nodes + branch;

        if let Some(i) = node_pos {
            self.matrix[(i, row)] += 1.0;
            self.matrix[(row, i)] += 1.0;
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] -= 1.0;
            self.matrix[(row, j)] -= 1.0;
        }

        self.rhs[row] += voltage;
    }

    /// The G block (node conductances).
    pub fn g(&self) -> DMatrixView<'_, f64> {
        let n = self.num_nodes;
        self.matrix.view((0, 0), (n, n))
    }

    /// The B block (node rows, branch columns).
    pub fn b(&self) -> DMatrixView<'_, f64> {
        let (n, b) = (self.num_nodes, self.num_branches);
        self.matrix.view((0, n), (n, b))
    }

    /// The C block (branch rows, node columns).
    pub fn c(&self) -> DMatrixView<'_, f64> {
        let (n, b) = (self.num_nodes, self.num_branches);
        self.matrix.view((n, 0), (b, n))
    }

    /// The D block (branch rows, branch columns).
    pub fn d(&self) -> DMatrixView<'_, f64> {
        let (n, b) = (self.num_nodes, self.num_branches);
        self.matrix.view((n, n), (b, b))
    }

    /// First row whose coefficients are all exactly zero.
    pub fn zero_row(&self) -> Option<usize> {
        (0..self.size()).find(|&r| self.matrix.row(r).iter().all(|&v| v == 0.0))
    }

    /// Get a reference to the coefficient matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Get a reference to the RHS vector.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Dump the four blocks at debug level.
    pub fn log_blocks(&self) {
        if !log::log_enabled!(log::Level::Debug) || self.is_empty() {
            return;
        }
        log::debug!(
            "MNA system {}x{} ({} nodes, {} branches)",
            self.size(),
            self.size(),
            self.num_nodes,
            self.num_branches
        );
        log::debug!("G ={}", self.g());
        if self.num_branches > 0 {
            log::debug!("B ={}", self.b());
            log::debug!("C ={}", self.c());
            log::debug!("D ={}", self.d());
        }
        log::debug!("rhs ={}", self.rhs);
    }
}
