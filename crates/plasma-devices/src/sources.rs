//! Independent source stamps: voltage and current sources.

use plasma_core::{DaeSystem, MnaSystem};

use crate::element::Element;
use crate::error::Result;
use crate::stamp::Terminals;

/// Voltage source at DC: branch incidence in B/C, `E` in the branch row.
pub fn stamp_voltage_source_dc(
    element: &Element,
    t: &Terminals,
    mna: &mut MnaSystem,
) -> Result<()> {
    let branch = t.branch_for(element)?;
    mna.stamp_voltage_source(t.a, t.b, branch, element.value());
    Ok(())
}

/// Current source at DC: `-I` into row a, `+I` into row b of the RHS.
pub fn stamp_current_source_dc(
    element: &Element,
    t: &Terminals,
    mna: &mut MnaSystem,
) -> Result<()> {
    mna.stamp_current_source(t.a, t.b, element.value());
    Ok(())
}

/// Voltage source in the DAE: algebraic branch row, `E` in `c`.
pub fn stamp_voltage_source_dae(
    element: &Element,
    t: &Terminals,
    dae: &mut DaeSystem,
) -> Result<()> {
    let branch = t.branch_for(element)?;
    dae.stamp_voltage_source(t.a, t.b, branch, element.value());
    Ok(())
}

/// Current source in the DAE: constant injection in `c`.
pub fn stamp_current_source_dae(
    element: &Element,
    t: &Terminals,
    dae: &mut DaeSystem,
) -> Result<()> {
    dae.stamp_current_source(t.a, t.b, element.value());
    Ok(())
}
