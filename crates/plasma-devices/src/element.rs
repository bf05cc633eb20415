//! The circuit element variant.

use std::fmt;

use plasma_core::{BranchKind, DaeSystem, MnaSystem, NodeLabel};

use crate::error::{Error, Result};
use crate::passive;
use crate::sources;
use crate::stamp::{DaeStampFn, DcStampFn, Terminals};

/// Kind of a two-terminal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    CurrentSource,
}

impl ElementKind {
    /// All kinds, in SPICE letter order R, C, L, V, I.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Resistor,
        ElementKind::Capacitor,
        ElementKind::Inductor,
        ElementKind::VoltageSource,
        ElementKind::CurrentSource,
    ];

    /// Parse a SPICE element letter (case-insensitive).
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Ok(ElementKind::Resistor),
            'C' => Ok(ElementKind::Capacitor),
            'L' => Ok(ElementKind::Inductor),
            'V' => Ok(ElementKind::VoltageSource),
            'I' => Ok(ElementKind::CurrentSource),
            other => Err(Error::UnknownKind(other)),
        }
    }

    /// The SPICE element letter.
    pub fn letter(self) -> char {
        match self {
            ElementKind::Resistor => 'R',
            ElementKind::Capacitor => 'C',
            ElementKind::Inductor => 'L',
            ElementKind::VoltageSource => 'V',
            ElementKind::CurrentSource => 'I',
        }
    }

    /// Unit of the element value.
    pub fn unit(self) -> &'static str {
        match self {
            ElementKind::Resistor => "ohm",
            ElementKind::Capacitor => "F",
            ElementKind::Inductor => "H",
            ElementKind::VoltageSource => "V",
            ElementKind::CurrentSource => "A",
        }
    }

    /// Which branch block this kind owns a current in, if any.
    pub fn branch_kind(self) -> Option<BranchKind> {
        match self {
            ElementKind::VoltageSource => Some(BranchKind::VoltageSource),
            ElementKind::Inductor => Some(BranchKind::Inductor),
            _ => None,
        }
    }

    /// Check if this kind carries a branch-current unknown.
    pub fn needs_branch(self) -> bool {
        self.branch_kind().is_some()
    }

    /// Check if this kind provides a conducting path at DC.
    ///
    /// Capacitors are open and current sources impose current without
    /// fixing any node voltage.
    pub fn conducts_dc(self) -> bool {
        matches!(
            self,
            ElementKind::Resistor | ElementKind::Inductor | ElementKind::VoltageSource
        )
    }

    /// Check if the value must be strictly positive.
    pub fn is_passive(self) -> bool {
        matches!(
            self,
            ElementKind::Resistor | ElementKind::Capacitor | ElementKind::Inductor
        )
    }

    /// DC stamp for this kind.
    pub fn dc_stamp(self) -> DcStampFn {
        match self {
            ElementKind::Resistor => passive::stamp_resistor_dc,
            ElementKind::Capacitor => passive::stamp_capacitor_dc,
            ElementKind::Inductor => passive::stamp_inductor_dc,
            ElementKind::VoltageSource => sources::stamp_voltage_source_dc,
            ElementKind::CurrentSource => sources::stamp_current_source_dc,
        }
    }

    /// DAE stamp for this kind.
    pub fn dae_stamp(self) -> DaeStampFn {
        match self {
            ElementKind::Resistor => passive::stamp_resistor_dae,
            ElementKind::Capacitor => passive::stamp_capacitor_dae,
            ElementKind::Inductor => passive::stamp_inductor_dae,
            ElementKind::VoltageSource => sources::stamp_voltage_source_dae,
            ElementKind::CurrentSource => sources::stamp_current_source_dae,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Resistor => "resistor",
            ElementKind::Capacitor => "capacitor",
            ElementKind::Inductor => "inductor",
            ElementKind::VoltageSource => "voltage source",
            ElementKind::CurrentSource => "current source",
        };
        f.write_str(name)
    }
}

/// A two-terminal circuit element.
///
/// The direction from `terminal_a` to `terminal_b` defines the sign
/// convention: branch currents and source currents are positive when they
/// flow from `a` to `b` through the element, and a voltage source holds
/// `v_a - v_b = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    name: String,
    terminal_a: NodeLabel,
    terminal_b: NodeLabel,
    value: f64,
}

impl Element {
    /// Create an element, validating its name and value.
    ///
    /// Surrounding whitespace is stripped from the name.
    pub fn new(
        kind: ElementKind,
        name: impl Into<String>,
        terminal_a: impl Into<NodeLabel>,
        terminal_b: impl Into<NodeLabel>,
        value: f64,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if !value.is_finite() {
            return Err(Error::InvalidValue {
                name,
                value,
                reason: "value must be finite",
            });
        }
        if kind.is_passive() && value <= 0.0 {
            return Err(Error::InvalidValue {
                name,
                value,
                reason: "R, L and C values must be strictly positive",
            });
        }

        Ok(Self {
            kind,
            name,
            terminal_a: terminal_a.into(),
            terminal_b: terminal_b.into(),
            value,
        })
    }

    /// Create a resistor (ohms).
    pub fn resistor(
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        resistance: f64,
    ) -> Result<Self> {
        Self::new(ElementKind::Resistor, name, a, b, resistance)
    }

    /// Create a capacitor (farads).
    pub fn capacitor(
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        capacitance: f64,
    ) -> Result<Self> {
        Self::new(ElementKind::Capacitor, name, a, b, capacitance)
    }

    /// Create an inductor (henries).
    pub fn inductor(
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        inductance: f64,
    ) -> Result<Self> {
        Self::new(ElementKind::Inductor, name, a, b, inductance)
    }

    /// Create an independent voltage source holding `v_a - v_b = voltage`.
    pub fn voltage_source(
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        voltage: f64,
    ) -> Result<Self> {
        Self::new(ElementKind::VoltageSource, name, a, b, voltage)
    }

    /// Create an independent current source driving `current` from `a` to
    /// `b` through the source.
    pub fn current_source(
        name: impl Into<String>,
        a: impl Into<NodeLabel>,
        b: impl Into<NodeLabel>,
        current: f64,
    ) -> Result<Self> {
        Self::new(ElementKind::CurrentSource, name, a, b, current)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terminal_a(&self) -> &NodeLabel {
        &self.terminal_a
    }

    pub fn terminal_b(&self) -> &NodeLabel {
        &self.terminal_b
    }

    /// Value in the kind's unit (ohms, farads, henries, volts, amps).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Both terminal labels.
    pub fn terminals(&self) -> [&NodeLabel; 2] {
        [&self.terminal_a, &self.terminal_b]
    }

    /// Stamp the steady-state contribution.
    pub fn stamp_dc(&self, terminals: &Terminals, mna: &mut MnaSystem) -> Result<()> {
        (self.kind.dc_stamp())(self, terminals, mna)
    }

    /// Stamp the transient contribution.
    pub fn stamp_dae(&self, terminals: &Terminals, dae: &mut DaeSystem) -> Result<()> {
        (self.kind.dae_stamp())(self, terminals, dae)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.terminal_a,
            self.terminal_b,
            plasma_core::units::format_value(self.value),
            self.kind.unit()
        )
    }
}
