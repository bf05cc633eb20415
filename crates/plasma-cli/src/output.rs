//! Result rendering for the terminal, CSV and JSON.

use std::fmt::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use plasma::{OperatingPoint, TransientSolution};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable table.
    #[default]
    Table,
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON.
    Json,
}

/// Render a DC operating point.
pub fn render_operating_point(point: &OperatingPoint, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Table => write_point_table(&mut out, point)?,
        OutputFormat::Csv => {
            let (names, values): (Vec<String>, Vec<f64>) = point.columns().into_iter().unzip();
            writeln!(out, "{}", names.join(","))?;
            writeln!(out, "{}", join_values(&values))?;
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(point)?;
            out.push('\n');
        }
    }
    Ok(out)
}

/// Render a transient waveform table.
pub fn render_transient(solution: &TransientSolution, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Table => write_waveform_table(&mut out, solution)?,
        OutputFormat::Csv => {
            writeln!(out, "{}", solution.header().join(","))?;
            for row in solution.rows() {
                writeln!(out, "{}", join_values(&row))?;
            }
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(solution)?;
            out.push('\n');
        }
    }
    Ok(out)
}

fn write_point_table(out: &mut String, point: &OperatingPoint) -> fmt::Result {
    writeln!(out, "Node Voltages:")?;
    for (label, v) in point.voltages() {
        writeln!(out, "  V({label}) = {v:.6} V")?;
    }
    if !point.currents().is_empty() {
        writeln!(out)?;
        writeln!(out, "Branch Currents:")?;
        for (name, i) in point.currents() {
            writeln!(out, "  I({name}) = {i:.6e} A")?;
        }
    }
    Ok(())
}

fn write_waveform_table(out: &mut String, solution: &TransientSolution) -> fmt::Result {
    let header = solution.header();
    for name in &header {
        write!(out, "{name:>14}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(14 * header.len()))?;
    for row in solution.rows() {
        let mut values = row.iter();
        if let Some(time) = values.next() {
            write!(out, "{time:>14.6e}")?;
        }
        for v in values {
            write!(out, "{v:>14.6}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:e}"))
        .collect::<Vec<_>>()
        .join(",")
}
