//! Passive element stamps: Resistor, Capacitor, Inductor.

use plasma_core::{DaeSystem, MnaSystem};

use crate::element::Element;
use crate::error::Result;
use crate::stamp::Terminals;

/// Resistor at DC: conductance `g = 1/R` between its terminals.
pub fn stamp_resistor_dc(element: &Element, t: &Terminals, mna: &mut MnaSystem) -> Result<()> {
    mna.stamp_conductance(t.a, t.b, 1.0 / element.value());
    Ok(())
}

/// Capacitor at DC: open circuit, contributes nothing.
pub fn stamp_capacitor_dc(_element: &Element, _t: &Terminals, _mna: &mut MnaSystem) -> Result<()> {
    Ok(())
}

/// Inductor at DC: short circuit, i.e. a 0 V source carrying the branch
/// current.
pub fn stamp_inductor_dc(element: &Element, t: &Terminals, mna: &mut MnaSystem) -> Result<()> {
    let branch = t.branch_for(element)?;
    mna.stamp_voltage_source(t.a, t.b, branch, 0.0);
    Ok(())
}

/// Resistor in the DAE: algebraic Ohm's-law coupling in `B`.
pub fn stamp_resistor_dae(element: &Element, t: &Terminals, dae: &mut DaeSystem) -> Result<()> {
    dae.stamp_conductance(t.a, t.b, 1.0 / element.value());
    Ok(())
}

/// Capacitor in the DAE: `C` in `A`, making its terminal rows differential.
pub fn stamp_capacitor_dae(element: &Element, t: &Terminals, dae: &mut DaeSystem) -> Result<()> {
    dae.stamp_capacitance(t.a, t.b, element.value());
    Ok(())
}

/// Inductor in the DAE: `L·di/dt = v_a - v_b` on its branch row.
pub fn stamp_inductor_dae(element: &Element, t: &Terminals, dae: &mut DaeSystem) -> Result<()> {
    let branch = t.branch_for(element)?;
    dae.stamp_inductor(t.a, t.b, branch, element.value());
    Ok(())
}
