//! DC operating point analysis.

use nalgebra::DVector;
use plasma_core::mna::MnaSystem;

use crate::error::Result;
use crate::linear::solve_dense;

/// Result of a DC operating point analysis.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Node voltages, indexed by node index - 1 (ground is implicit 0 V).
    pub node_voltages: DVector<f64>,
    /// Branch currents through voltage sources, then inductors.
    pub branch_currents: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
}

impl DcSolution {
    /// Voltage of the node in unknown position `index`.
    pub fn voltage(&self, index: usize) -> f64 {
        self.node_voltages.get(index).copied().unwrap_or(0.0)
    }

    /// Branch current in branch slot `index`.
    pub fn current(&self, index: usize) -> f64 {
        self.branch_currents.get(index).copied().unwrap_or(0.0)
    }

    /// The full unknown vector `[v; i]`.
    pub fn to_vector(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.node_voltages.len() + self.branch_currents.len(),
            self.node_voltages
                .iter()
                .chain(self.branch_currents.iter())
                .copied(),
        )
    }
}

/// Solve for the DC operating point.
///
/// An empty system (nothing but ground) has the empty solution.
pub fn solve_dc(mna: &MnaSystem) -> Result<DcSolution> {
    let solution = solve_dense(mna.matrix(), mna.rhs())?;

    let num_nodes = mna.num_nodes;
    let num_branches = mna.num_branches;

    let node_voltages =
        DVector::from_iterator(num_nodes, solution.iter().take(num_nodes).copied());
    let branch_currents =
        DVector::from_iterator(num_branches, solution.iter().skip(num_nodes).copied());

    log::debug!("DC solution: {:?}", solution.as_slice());

    Ok(DcSolution {
        node_voltages,
        branch_currents,
        num_nodes,
    })
}
