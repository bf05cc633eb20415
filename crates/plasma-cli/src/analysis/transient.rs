//! Transient time-domain analysis.

use anyhow::{Context, Result};
use plasma::{Circuit, IntegratorConfig, TimeSpan};

use crate::output::{OutputFormat, render_transient};

/// Command-line overrides for the integrator.
#[derive(Debug, Clone, Default)]
pub struct TransientOptions {
    pub abs_tol: Option<f64>,
    pub rel_tol: Option<f64>,
    pub max_steps: Option<usize>,
    pub initial_step: Option<f64>,
    pub points: Option<usize>,
}

impl TransientOptions {
    /// Integrator configuration for `.tran tstep tstop`.
    ///
    /// The print step caps the internal step and sets the output grid unless
    /// an explicit point count is given.
    pub fn config(&self, tstep: f64, tstop: f64) -> IntegratorConfig {
        let defaults = IntegratorConfig::default();
        let points = self
            .points
            .unwrap_or_else(|| ((tstop / tstep).round() as usize).max(1));
        IntegratorConfig {
            abs_tol: self.abs_tol.unwrap_or(defaults.abs_tol),
            rel_tol: self.rel_tol.unwrap_or(defaults.rel_tol),
            max_steps: self.max_steps.unwrap_or(defaults.max_steps),
            initial_step: self.initial_step.unwrap_or(defaults.initial_step),
            max_step: Some(tstep),
            output_points: Some(points),
            ..defaults
        }
    }
}

/// Run transient analysis from the DC operating point and print the
/// waveforms.
pub fn run_transient(
    circuit: &Circuit,
    tstep: f64,
    tstop: f64,
    options: &TransientOptions,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Table {
        println!("Transient Analysis (.TRAN {tstep} {tstop})");
        println!("==========================================");
        println!();
    }

    let span = TimeSpan::until(tstop)?;
    let config = options.config(tstep, tstop);
    let solution = circuit
        .solve_dae(span, &config)
        .with_context(|| format!("transient analysis to t = {tstop:e} failed"))?;

    print!("{}", render_transient(&solution, format)?);

    if format == OutputFormat::Table {
        let stats = &solution.stats;
        println!();
        println!(
            "Transient analysis complete: {} accepted steps, {} rejected.",
            stats.accepted_steps, stats.rejected_steps
        );
        println!(
            "Step size range: {:.3e} .. {:.3e} s",
            stats.min_step_used, stats.max_step_used
        );
        println!();
    }
    Ok(())
}
