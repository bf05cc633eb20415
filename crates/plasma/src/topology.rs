//! Connectivity checks over the element graph.

use std::collections::VecDeque;
use std::fmt;

use plasma_core::{NodeIndex, NodeLabel, NodeSlot};
use plasma_devices::Element;

/// A suspicious but legal connection pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyWarning {
    /// Node touched by a single element.
    Dangling { node: NodeLabel },
    /// Node with no DC-conducting path to ground.
    Floating { node: NodeLabel },
}

impl fmt::Display for TopologyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyWarning::Dangling { node } => {
                write!(f, "node {node} is connected to a single element")
            }
            TopologyWarning::Floating { node } => {
                write!(f, "node {node} has no DC path to ground")
            }
        }
    }
}

/// Graph position of a slot: ground is 0, node index `k` is `k`.
fn vertex(slot: NodeSlot) -> usize {
    match slot {
        NodeSlot::Ground => 0,
        NodeSlot::Index(k) => k,
    }
}

/// Endpoints of every element as graph vertices.
fn edges<'e>(
    elements: &'e [Element],
    nodes: &'e NodeIndex,
) -> impl Iterator<Item = (&'e Element, usize, usize)> + 'e {
    elements.iter().filter_map(move |e| {
        let a = nodes.lookup(e.terminal_a())?;
        let b = nodes.lookup(e.terminal_b())?;
        Some((e, vertex(a), vertex(b)))
    })
}

/// Nodes that no chain of resistors, inductors and voltage sources ties
/// to ground, in node-index order.
pub(crate) fn floating_nodes(elements: &[Element], nodes: &NodeIndex) -> Vec<NodeLabel> {
    let mut adjacent = vec![Vec::new(); nodes.len() + 1];
    for (_, a, b) in edges(elements, nodes).filter(|(e, _, _)| e.kind().conducts_dc()) {
        adjacent[a].push(b);
        adjacent[b].push(a);
    }

    let mut reached = vec![false; nodes.len() + 1];
    let mut queue = VecDeque::from([0]);
    reached[0] = true;
    while let Some(v) = queue.pop_front() {
        for &w in &adjacent[v] {
            if !reached[w] {
                reached[w] = true;
                queue.push_back(w);
            }
        }
    }

    nodes
        .labels()
        .zip(reached.iter().skip(1))
        .filter(|&(_, &r)| !r)
        .map(|(label, _)| label.clone())
        .collect()
}

/// Nodes touched by exactly one element, in node-index order.
pub(crate) fn dangling_nodes(elements: &[Element], nodes: &NodeIndex) -> Vec<NodeLabel> {
    let mut degree = vec![0usize; nodes.len() + 1];
    for (_, a, b) in edges(elements, nodes) {
        degree[a] += 1;
        if b != a {
            degree[b] += 1;
        }
    }

    nodes
        .labels()
        .zip(degree.iter().skip(1))
        .filter(|&(_, &d)| d == 1)
        .map(|(label, _)| label.clone())
        .collect()
}
