//! Unknown-vector layout.
//!
//! The solution vector is ordered `[v_1..v_n, i_V1..i_Vm, i_L1..i_Lk]`:
//! node voltages first, then voltage-source branch currents, then inductor
//! branch currents. Both assemblers and every consumer of a solution vector
//! go through this table.

use crate::node::NodeLabel;

/// Which kind of element owns a branch-current unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    VoltageSource,
    Inductor,
}

/// One entry of the unknown vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unknown<'a> {
    /// Voltage of a non-ground node.
    NodeVoltage(&'a NodeLabel),
    /// Current through a voltage source or inductor, from its first
    /// terminal to its second.
    BranchCurrent { name: &'a str, kind: BranchKind },
}

/// Fixed mapping between unknown-vector positions and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownLayout {
    nodes: Vec<NodeLabel>,
    voltage_sources: Vec<String>,
    inductors: Vec<String>,
}

impl UnknownLayout {
    /// Create a layout from node labels (in index order) and branch owners
    /// (each in insertion order).
    pub fn new(nodes: Vec<NodeLabel>, voltage_sources: Vec<String>, inductors: Vec<String>) -> Self {
        Self {
            nodes,
            voltage_sources,
            inductors,
        }
    }

    /// Number of non-ground nodes (n).
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of voltage-source branch currents (m).
    pub fn num_voltage_sources(&self) -> usize {
        self.voltage_sources.len()
    }

    /// Number of inductor branch currents (k).
    pub fn num_inductors(&self) -> usize {
        self.inductors.len()
    }

    /// Number of branch-current unknowns (m + k).
    pub fn num_branches(&self) -> usize {
        self.voltage_sources.len() + self.inductors.len()
    }

    /// Total number of unknowns (n + m + k).
    pub fn size(&self) -> usize {
        self.num_nodes() + self.num_branches()
    }

    /// Node labels in unknown order.
    pub fn nodes(&self) -> &[NodeLabel] {
        &self.nodes
    }

    /// Position of a node voltage in the unknown vector.
    pub fn node_position(&self, label: &NodeLabel) -> Option<usize> {
        self.nodes.iter().position(|l| l == label)
    }

    /// Position of a branch current in the unknown vector.
    pub fn branch_position(&self, name: &str) -> Option<usize> {
        let n = self.num_nodes();
        let m = self.num_voltage_sources();
        self.voltage_sources
            .iter()
            .position(|s| s == name)
            .map(|j| n + j)
            .or_else(|| {
                self.inductors
                    .iter()
                    .position(|s| s == name)
                    .map(|k| n + m + k)
            })
    }

    /// Describe the unknown at a position.
    pub fn unknown(&self, position: usize) -> Option<Unknown<'_>> {
        let n = self.num_nodes();
        let m = self.num_voltage_sources();
        if position < n {
            Some(Unknown::NodeVoltage(&self.nodes[position]))
        } else if position < n + m {
            Some(Unknown::BranchCurrent {
                name: &self.voltage_sources[position - n],
                kind: BranchKind::VoltageSource,
            })
        } else {
            self.inductors
                .get(position - n - m)
                .map(|name| Unknown::BranchCurrent {
                    name,
                    kind: BranchKind::Inductor,
                })
        }
    }

    /// Iterate over all unknowns in vector order.
    pub fn iter(&self) -> impl Iterator<Item = Unknown<'_>> {
        (0..self.size()).filter_map(move |i| self.unknown(i))
    }

    /// Column name for an unknown: `V(label)` or `I(name)`.
    pub fn column_name(&self, position: usize) -> Option<String> {
        self.unknown(position).map(|u| match u {
            Unknown::NodeVoltage(label) => format!("V({label})"),
            Unknown::BranchCurrent { name, .. } => format!("I({name})"),
        })
    }

    /// Column names for every unknown, in vector order.
    pub fn column_names(&self) -> Vec<String> {
        (0..self.size()).filter_map(|i| self.column_name(i)).collect()
    }
}
