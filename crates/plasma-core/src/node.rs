//! Node labels and the label-to-index table.
//!
//! Every non-ground label gets a dense 1-based index the first time it is
//! resolved. Index `k` owns row/column `k - 1` of every system matrix; the
//! ground node owns nothing.

use std::fmt;

use indexmap::IndexSet;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A user-supplied node label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    /// Numeric label, as in SPICE netlists. `0` is ground.
    Number(i64),
    /// Symbolic label such as `"out"` or `"vdd"`. `"gnd"` is ground.
    Name(String),
}

impl NodeLabel {
    /// The conventional ground label.
    pub const GROUND: NodeLabel = NodeLabel::Number(0);

    /// Check if this label names the ground node.
    pub fn is_ground(&self) -> bool {
        match self {
            NodeLabel::Number(n) => *n == 0,
            NodeLabel::Name(name) => {
                name.eq_ignore_ascii_case("gnd") || name.trim().parse::<i64>() == Ok(0)
            }
        }
    }

    /// Canonical form: a name that spells an integer becomes a number, so
    /// `Name("7")` and `Number(7)` denote the same node.
    pub fn normalized(&self) -> NodeLabel {
        match self {
            NodeLabel::Name(name) => NodeLabel::from(name.as_str()),
            number => number.clone(),
        }
    }

    /// Reject labels that cannot appear in a netlist (empty or containing
    /// whitespace).
    pub fn validate(&self) -> Result<()> {
        if let NodeLabel::Name(name) = self {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(Error::InvalidLabel(name.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLabel::Number(n) => write!(f, "{n}"),
            NodeLabel::Name(name) => f.write_str(name),
        }
    }
}

impl Serialize for NodeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for NodeLabel {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) => NodeLabel::Number(n),
            Err(_) => NodeLabel::Name(s.to_string()),
        }
    }
}

impl From<String> for NodeLabel {
    fn from(s: String) -> Self {
        NodeLabel::from(s.as_str())
    }
}

impl From<&String> for NodeLabel {
    fn from(s: &String) -> Self {
        NodeLabel::from(s.as_str())
    }
}

impl From<i64> for NodeLabel {
    fn from(n: i64) -> Self {
        NodeLabel::Number(n)
    }
}

impl From<i32> for NodeLabel {
    fn from(n: i32) -> Self {
        NodeLabel::Number(n.into())
    }
}

impl From<u32> for NodeLabel {
    fn from(n: u32) -> Self {
        NodeLabel::Number(n.into())
    }
}

/// Where a label lands in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeSlot {
    /// The reference node; never solved for.
    Ground,
    /// Dense 1-based node index.
    Index(usize),
}

impl NodeSlot {
    /// Row/column of this node in the system matrices (None for ground).
    pub fn unknown(self) -> Option<usize> {
        match self {
            NodeSlot::Ground => None,
            NodeSlot::Index(k) => Some(k - 1),
        }
    }

    /// Check if this is the ground slot.
    pub fn is_ground(self) -> bool {
        matches!(self, NodeSlot::Ground)
    }
}

/// Label-to-index table.
///
/// Indices are allocated in first-occurrence order and never change; the
/// table only grows.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    labels: IndexSet<NodeLabel>,
}

impl NodeIndex {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a label, allocating the next index on first occurrence.
    pub fn resolve(&mut self, label: &NodeLabel) -> Result<NodeSlot> {
        label.validate()?;
        if label.is_ground() {
            return Ok(NodeSlot::Ground);
        }
        let (pos, _) = self.labels.insert_full(label.normalized());
        Ok(NodeSlot::Index(pos + 1))
    }

    /// Look up a label without inserting it.
    pub fn lookup(&self, label: &NodeLabel) -> Option<NodeSlot> {
        if label.is_ground() {
            return Some(NodeSlot::Ground);
        }
        self.labels
            .get_index_of(&label.normalized())
            .map(|pos| NodeSlot::Index(pos + 1))
    }

    /// Look up a label, failing if it was never resolved.
    pub fn require(&self, label: &NodeLabel) -> Result<NodeSlot> {
        self.lookup(label)
            .ok_or_else(|| Error::UnknownNode(label.to_string()))
    }

    /// Get the label owning a 1-based index.
    pub fn label_of(&self, index: usize) -> Option<&NodeLabel> {
        index.checked_sub(1).and_then(|pos| self.labels.get_index(pos))
    }

    /// Number of non-ground nodes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if no non-ground node has been resolved.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over non-ground labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &NodeLabel> {
        self.labels.iter()
    }
}
