//! Plasma command-line circuit simulator.

mod analysis;
mod netlist;
mod output;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plasma_core::units::parse_value;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::analysis::{TransientOptions, run_dc_op, run_transient};
use crate::netlist::{Analysis, parse_netlist};
use crate::output::OutputFormat;

/// Linear circuit simulator for R, C, L, V and I netlists.
#[derive(Parser, Debug)]
#[command(name = "plasma")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input netlist file
    input: PathBuf,

    /// Run DC operating point analysis even if not in netlist
    #[arg(short = 'o', long)]
    op: bool,

    /// Run transient analysis to this stop time (e.g. 1m), overriding .tran
    #[arg(long, value_name = "STOP", value_parser = parse_time)]
    tran: Option<f64>,

    /// Absolute error tolerance
    #[arg(long, value_parser = parse_time)]
    atol: Option<f64>,

    /// Relative error tolerance
    #[arg(long, value_parser = parse_time)]
    rtol: Option<f64>,

    /// Maximum number of integrator steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// First trial step size
    #[arg(long, value_parser = parse_time)]
    initial_step: Option<f64>,

    /// Number of output intervals on the transient grid
    #[arg(long)]
    points: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Verbose output (repeat for debug logging)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_time(s: &str) -> Result<f64, String> {
    match parse_value(s) {
        Some(v) if v > 0.0 && v.is_finite() => Ok(v),
        Some(_) => Err(format!("'{s}' must be positive")),
        None => Err(format!("invalid value '{s}'")),
    }
}

/// Default log level for the number of `-v` flags.
fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG refines the -v default; `log` records from the library crates are bridged.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(log_level(cli.verbose).into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read netlist file: {}", cli.input.display()))?;
    let netlist = parse_netlist(&content)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;
    let circuit = &netlist.circuit;

    let mut analyses = netlist.analyses.clone();
    if let Some(stop) = cli.tran {
        analyses.retain(|a| !matches!(a, Analysis::Tran { .. }));
        analyses.push(Analysis::Tran {
            tstep: stop / 100.0,
            tstop: stop,
        });
    }
    if cli.op && !analyses.contains(&Analysis::Op) {
        analyses.insert(0, Analysis::Op);
    }
    if analyses.is_empty() {
        analyses.push(Analysis::Op);
    }

    if cli.verbose > 0 {
        println!("Plasma Circuit Simulator v{}", env!("CARGO_PKG_VERSION"));
        println!("Title: {}", circuit.title().unwrap_or("(untitled)"));
        println!("Nodes: {}", circuit.num_nodes());
        println!("Elements: {}", circuit.len());
        for element in circuit.elements() {
            println!("  {element}");
        }
        println!("Analyses: {analyses:?}");
        println!();
    }

    for warning in circuit.validate() {
        eprintln!("Warning: {warning}");
    }

    let options = TransientOptions {
        abs_tol: cli.atol,
        rel_tol: cli.rtol,
        max_steps: cli.max_steps,
        initial_step: cli.initial_step,
        points: cli.points,
    };

    for analysis in &analyses {
        match *analysis {
            Analysis::Op => run_dc_op(circuit, cli.format)?,
            Analysis::Tran { tstep, tstop } => {
                run_transient(circuit, tstep, tstop, &options, cli.format)?
            }
        }
    }

    Ok(())
}
