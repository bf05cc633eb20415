//! Circuit container and analysis entry points.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

use plasma_core::{BranchKind, DaeSystem, MnaSystem, NodeIndex, NodeLabel, UnknownLayout};
use plasma_devices::{Element, ElementKind, Terminals};
use plasma_solver::{
    BdfIntegrator, CONSISTENCY_TOLERANCE, DaeIntegrator, DaeProblem, IntegratorConfig, TimeSpan,
    consistent_initial_state,
};

use crate::error::{Error, Result, TopologyError};
use crate::solution::{OperatingPoint, TransientSolution};
use crate::topology::{self, TopologyWarning};

/// An assembled DC system and the layout of its unknowns.
#[derive(Debug, Clone)]
pub struct MnaAssembly {
    pub system: MnaSystem,
    pub layout: Arc<UnknownLayout>,
}

/// An assembled DAE system and the layout of its unknowns.
#[derive(Debug, Clone)]
pub struct DaeAssembly {
    pub system: DaeSystem,
    pub layout: Arc<UnknownLayout>,
}

/// A linear circuit: an ordered list of two-terminal elements.
///
/// Elements are only ever appended. Node indices follow the order in which
/// labels first appear. The unknown layout is built on first use and
/// dropped whenever an element is added.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    title: Option<String>,
    elements: Vec<Element>,
    names: HashSet<String>,
    nodes: NodeIndex,
    layout: OnceCell<Arc<UnknownLayout>>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new circuit with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Get the circuit title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the circuit title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Add an element.
    ///
    /// Fails without modifying the circuit if a terminal label is invalid,
    /// both terminals are ground, or the name is already taken.
    pub fn add_element(&mut self, element: Element) -> Result<()> {
        for label in element.terminals() {
            label.validate().map_err(TopologyError::from)?;
        }
        if element.terminal_a().is_ground() && element.terminal_b().is_ground() {
            return Err(TopologyError::NoTerminals {
                name: element.name().to_string(),
            }
            .into());
        }
        if self.names.contains(element.name()) {
            return Err(TopologyError::DuplicateName(element.name().to_string()).into());
        }

        for label in element.terminals() {
            self.nodes.resolve(label).map_err(TopologyError::from)?;
        }
        log::debug!("added {element}");
        self.names.insert(element.name().to_string());
        self.elements.push(element);
        self.layout.take();
        Ok(())
    }

    /// Build and add an element of the given kind.
    pub fn add(
        &mut self,
        kind: ElementKind,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        value: f64,
    ) -> Result<()> {
        let element = Element::new(kind, name, a, b, value).map_err(TopologyError::from)?;
        self.add_element(element)
    }

    /// Add a resistor (ohms).
    pub fn add_resistor(
        &mut self,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        resistance: f64,
    ) -> Result<()> {
        self.add(ElementKind::Resistor, name, a, b, resistance)
    }

    /// Add a capacitor (farads).
    pub fn add_capacitor(
        &mut self,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        capacitance: f64,
    ) -> Result<()> {
        self.add(ElementKind::Capacitor, name, a, b, capacitance)
    }

    /// Add an inductor (henries).
    pub fn add_inductor(
        &mut self,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        inductance: f64,
    ) -> Result<()> {
        self.add(ElementKind::Inductor, name, a, b, inductance)
    }

    /// Add a voltage source holding `v_a - v_b = voltage`.
    pub fn add_voltage_source(
        &mut self,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        voltage: f64,
    ) -> Result<()> {
        self.add(ElementKind::VoltageSource, name, a, b, voltage)
    }

    /// Add a current source driving `current` from `a` to `b` through the
    /// source.
    pub fn add_current_source(
        &mut self,
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        current: f64,
    ) -> Result<()> {
        self.add(ElementKind::CurrentSource, name, a, b, current)
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Find an element by name.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// The label-to-index table.
    pub fn nodes(&self) -> &NodeIndex {
        &self.nodes
    }

    /// Number of non-ground nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The unknown layout, built on first use.
    pub fn layout(&self) -> Arc<UnknownLayout> {
        self.layout
            .get_or_init(|| Arc::new(self.build_layout()))
            .clone()
    }

    fn build_layout(&self) -> UnknownLayout {
        let mut voltage_sources = Vec::new();
        let mut inductors = Vec::new();
        for element in &self.elements {
            match element.kind().branch_kind() {
                Some(BranchKind::VoltageSource) => voltage_sources.push(element.name().to_string()),
                Some(BranchKind::Inductor) => inductors.push(element.name().to_string()),
                None => {}
            }
        }
        let layout = UnknownLayout::new(
            self.nodes.labels().cloned().collect(),
            voltage_sources,
            inductors,
        );

        if log::log_enabled!(log::Level::Debug) {
            for (k, label) in layout.nodes().iter().enumerate() {
                log::debug!("node {label} -> index {} (row {k})", k + 1);
            }
            for pos in layout.num_nodes()..layout.size() {
                if let Some(name) = layout.column_name(pos) {
                    log::debug!("branch {name} -> row {pos}");
                }
            }
        }
        layout
    }

    /// Rows of an element's terminals and its branch slot.
    fn terminals(&self, element: &Element, layout: &UnknownLayout) -> Result<Terminals> {
        let a = self.nodes.require(element.terminal_a())?.unknown();
        let b = self.nodes.require(element.terminal_b())?.unknown();
        if !element.kind().needs_branch() {
            return Ok(Terminals::new(a, b));
        }
        let branch = layout
            .branch_position(element.name())
            .map(|pos| pos - layout.num_nodes())
            .ok_or_else(|| plasma_core::Error::UnknownNode(format!("I({})", element.name())))?;
        Ok(Terminals::with_branch(a, b, branch))
    }

    /// Assemble the steady-state MNA system.
    pub fn assemble_dc(&self) -> Result<MnaAssembly> {
        let layout = self.layout();
        let mut system = MnaSystem::new(layout.num_nodes(), layout.num_branches());
        for element in &self.elements {
            let terminals = self.terminals(element, &layout)?;
            element.stamp_dc(&terminals, &mut system)?;
        }
        system.log_blocks();
        Ok(MnaAssembly { system, layout })
    }

    /// Assemble the transient DAE system `A·dx/dt = B·x + c`.
    pub fn assemble_dae(&self) -> Result<DaeAssembly> {
        let layout = self.layout();
        let mut system = DaeSystem::new(layout.num_nodes(), layout.num_branches());
        for element in &self.elements {
            let terminals = self.terminals(element, &layout)?;
            element.stamp_dae(&terminals, &mut system)?;
        }
        system.log_system();
        Ok(DaeAssembly { system, layout })
    }

    /// Solve for the DC operating point.
    ///
    /// Capacitors are open and inductors are shorts. A node with no
    /// DC-conducting path to ground makes the system singular and is
    /// reported before factoring. Other singular systems (e.g. voltage
    /// source loops) name the node at the zero pivot when there is one.
    pub fn solve_dc(&self) -> Result<OperatingPoint> {
        let MnaAssembly { system, layout } = self.assemble_dc()?;
        if let Some(label) = self.floating_nodes().into_iter().next() {
            let row = layout.node_position(&label).unwrap_or_default();
            log::debug!("node {label} has no DC path to ground");
            return Err(Error::SingularSystem {
                node: Some(label.to_string()),
                source: plasma_solver::Error::SingularMatrix { row },
            });
        }
        match plasma_solver::solve_dc(&system) {
            Ok(solution) => Ok(OperatingPoint::from_state(&layout, &solution.to_vector())),
            Err(source @ plasma_solver::Error::SingularMatrix { row }) => {
                let node = Self::singular_node(&system, &layout, row);
                log::debug!("singular DC system at pivot {row}, node {node:?}");
                Err(Error::SingularSystem { node, source })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Best guess at the node behind a singular DC system.
    fn singular_node(
        system: &MnaSystem,
        layout: &UnknownLayout,
        pivot: usize,
    ) -> Option<String> {
        [Some(pivot), system.zero_row()]
            .into_iter()
            .flatten()
            .find_map(|row| layout.nodes().get(row))
            .map(|label| label.to_string())
    }

    /// Run a transient analysis with the built-in BDF integrator.
    pub fn solve_dae(&self, span: TimeSpan, config: &IntegratorConfig) -> Result<TransientSolution> {
        self.solve_dae_with(&BdfIntegrator, span, config)
    }

    /// Run a transient analysis with the given integrator.
    ///
    /// The DC operating point is the initial state. If it cannot be
    /// computed, or it violates an algebraic row, the analysis stops with
    /// [`Error::InconsistentInitialCondition`].
    pub fn solve_dae_with(
        &self,
        integrator: &dyn DaeIntegrator,
        span: TimeSpan,
        config: &IntegratorConfig,
    ) -> Result<TransientSolution> {
        config.validate()?;

        let dc = self.solve_dc().map_err(|e| Error::InconsistentInitialCondition {
            source: Box::new(e),
        })?;
        let DaeAssembly { system, layout } = self.assemble_dae()?;
        let initial = consistent_initial_state(
            &system,
            dc.to_vector(),
            CONSISTENCY_TOLERANCE,
            config.suppress_algebraic,
        )
        .map_err(|e| Error::InconsistentInitialCondition {
            source: Box::new(e),
        })?;

        let problem = DaeProblem::new(&system, initial)?;
        let trajectory = integrator
            .integrate(&problem, span, config)
            .map_err(|e| match e {
                plasma_solver::Error::IntegrationFailed {
                    time,
                    steps,
                    reason,
                    last_state,
                } => Error::IntegrationFailure {
                    time,
                    steps,
                    reason,
                    last_state: last_state.map(|p| OperatingPoint::from_state(&layout, &p.state)),
                },
                other => other.into(),
            })?;

        Ok(TransientSolution::from_trajectory(&layout, trajectory))
    }

    /// Nodes with no DC-conducting path to ground.
    pub fn floating_nodes(&self) -> Vec<NodeLabel> {
        topology::floating_nodes(&self.elements, &self.nodes)
    }

    /// Check connectivity, logging each finding.
    pub fn validate(&self) -> Vec<TopologyWarning> {
        let warnings: Vec<_> = topology::dangling_nodes(&self.elements, &self.nodes)
            .into_iter()
            .map(|node| TopologyWarning::Dangling { node })
            .chain(
                self.floating_nodes()
                    .into_iter()
                    .map(|node| TopologyWarning::Floating { node }),
            )
            .collect();
        for warning in &warnings {
            log::warn!("{warning}");
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_indices_follow_first_occurrence() {
        let mut circuit = Circuit::new();
        circuit.add_resistor("R1", "out", "in", 1e3).unwrap();
        circuit.add_voltage_source("V1", "in", 0, 1.0).unwrap();

        let layout = circuit.layout();
        assert_eq!(
            layout.nodes(),
            &[NodeLabel::from("out"), NodeLabel::from("in")]
        );
        assert_eq!(circuit.num_nodes(), 2);
    }

    #[test]
    fn test_branch_slots_by_kind_then_insertion() {
        let mut circuit = Circuit::new();
        circuit.add_inductor("L1", 1, 2, 1e-3).unwrap();
        circuit.add_voltage_source("V1", 1, 0, 1.0).unwrap();
        circuit.add_resistor("R1", 2, 0, 1.0).unwrap();
        circuit.add_voltage_source("V2", 2, 3, 1.0).unwrap();

        let layout = circuit.layout();
        assert_eq!(layout.branch_position("V1"), Some(3));
        assert_eq!(layout.branch_position("V2"), Some(4));
        assert_eq!(layout.branch_position("L1"), Some(5));
        assert_eq!(layout.size(), 6);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut circuit = Circuit::new();
        circuit.add_resistor("R1", 1, 0, 1e3).unwrap();
        let err = circuit.add_resistor("R1", 2, 0, 1e3).unwrap_err();

        assert!(matches!(
            err,
            Error::Topology(TopologyError::DuplicateName(name)) if name == "R1"
        ));
        // The rejected element did not register its node.
        assert_eq!(circuit.num_nodes(), 1);
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut circuit = Circuit::new();
        circuit.add_resistor("R1", 1, 0, 1e3).unwrap();
        assert!(circuit.add_resistor("r1", 1, 0, 1e3).is_ok());
    }

    #[test]
    fn test_ground_to_ground_rejected() {
        let mut circuit = Circuit::new();
        let err = circuit.add_resistor("R1", 0, "gnd", 1e3).unwrap_err();
        assert!(matches!(
            err,
            Error::Topology(TopologyError::NoTerminals { .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_invalid_label_and_value() {
        let mut circuit = Circuit::new();
        assert!(matches!(
            circuit.add_resistor("R1", "", 0, 1e3),
            Err(Error::Topology(TopologyError::Label(_)))
        ));
        assert!(matches!(
            circuit.add_resistor("R1", 1, 0, -5.0),
            Err(Error::Topology(TopologyError::Element(_)))
        ));
        assert!(circuit.is_empty());
        assert_eq!(circuit.num_nodes(), 0);
    }

    #[test]
    fn test_layout_cache_reset_on_add() {
        let mut circuit = Circuit::new();
        circuit.add_resistor("R1", 1, 0, 1e3).unwrap();
        let before = circuit.layout();
        assert!(Arc::ptr_eq(&before, &circuit.layout()));

        circuit.add_resistor("R2", 1, 2, 1e3).unwrap();
        let after = circuit.layout();
        assert_eq!(before.size(), 1);
        assert_eq!(after.size(), 2);
    }

    #[test]
    fn test_element_lookup() {
        let mut circuit = Circuit::with_title("divider");
        circuit.add_resistor("R1", 1, 0, 1e3).unwrap();
        assert_eq!(circuit.title(), Some("divider"));
        assert_eq!(circuit.element("R1").map(|e| e.value()), Some(1e3));
        assert!(circuit.element("R2").is_none());
    }

    #[test]
    fn test_empty_circuit_solves() {
        let circuit = Circuit::new();
        assert!(circuit.solve_dc().unwrap().is_empty());
    }
}
