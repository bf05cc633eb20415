//! Plasma: linear circuit simulation.
//!
//! A [`Circuit`] holds resistors, capacitors, inductors and independent
//! voltage and current sources. It assembles two systems over one shared
//! unknown vector `[v_1..v_n, i_V1..i_Vm, i_L1..i_Lk]`:
//!
//! - the Modified Nodal Analysis system for the DC operating point
//!   ([`Circuit::solve_dc`]), and
//! - the semi-explicit DAE `A·dx/dt = B·x + c` for transient analysis
//!   ([`Circuit::solve_dae`]), started from the DC operating point.
//!
//! ```
//! use plasma::Circuit;
//!
//! let mut circuit = Circuit::new();
//! circuit.add_voltage_source("V1", "in", 0, 5.0)?;
//! circuit.add_resistor("R1", "in", "out", 1e3)?;
//! circuit.add_resistor("R2", "out", 0, 1e3)?;
//!
//! let op = circuit.solve_dc()?;
//! assert!((op.voltage("out").unwrap() - 2.5).abs() < 1e-10);
//! # Ok::<(), plasma::Error>(())
//! ```

pub mod circuit;
pub mod error;
pub mod solution;
pub mod topology;

pub use circuit::{Circuit, DaeAssembly, MnaAssembly};
pub use error::{Error, Result, TopologyError};
pub use solution::{OperatingPoint, TransientSample, TransientSolution};
pub use topology::TopologyWarning;

pub use plasma_core::{DaeSystem, MnaSystem, NodeLabel, UnknownLayout};
pub use plasma_devices::{Element, ElementKind};
pub use plasma_solver::{
    BdfIntegrator, DaeIntegrator, DaeProblem, IntegrationStats, IntegratorConfig, RawTrajectory,
    TimePoint, TimeSpan,
};
