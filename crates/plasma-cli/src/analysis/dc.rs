//! DC operating point analysis.

use anyhow::{Context, Result};
use plasma::Circuit;

use crate::output::{OutputFormat, render_operating_point};

/// Run DC operating point analysis and print the result.
pub fn run_dc_op(circuit: &Circuit, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Table {
        println!("DC Operating Point Analysis");
        println!("===========================");
        println!();
    }

    let op = circuit.solve_dc().context("DC operating point failed")?;
    print!("{}", render_operating_point(&op, format)?);
    if format == OutputFormat::Table {
        println!();
    }
    Ok(())
}
