//! SPICE-style netlist reader.
//!
//! The first line is the title. `*` starts a comment line, `;` an inline
//! comment, and `+` continues the previous line. Element lines read
//! `<letter><name> <a> <b> [DC] <value>` for the letters R, C, L, V and I;
//! control lines are `.op`, `.tran <tstep> <tstop>` and `.end`.

use plasma::{Circuit, ElementKind, NodeLabel};
use plasma_core::units::parse_value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Circuit {
        line: usize,
        #[source]
        source: plasma::Error,
    },
}

/// An analysis requested by a control line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Analysis {
    /// DC operating point (.op).
    Op,
    /// Transient analysis (.tran tstep tstop).
    Tran { tstep: f64, tstop: f64 },
}

/// A parsed netlist.
#[derive(Debug)]
pub struct Netlist {
    pub circuit: Circuit,
    pub analyses: Vec<Analysis>,
}

/// Logical lines with continuations folded in, tagged with the physical
/// line number they start on.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    for (idx, raw) in content.lines().enumerate().skip(1) {
        let text = raw.split(';').next().unwrap_or_default().trim();
        if text.is_empty() || text.starts_with('*') {
            continue;
        }
        if let Some(rest) = text.strip_prefix('+') {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push(' ');
                prev.push_str(rest.trim());
                continue;
            }
        }
        lines.push((idx + 1, text.to_string()));
    }
    lines
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

fn value(line: usize, token: &str) -> Result<f64, ParseError> {
    parse_value(token).ok_or_else(|| syntax(line, format!("invalid value '{token}'")))
}

/// Parse a netlist.
pub fn parse_netlist(content: &str) -> Result<Netlist, ParseError> {
    let title = content.lines().next().map(str::trim).unwrap_or_default();
    let mut circuit = Circuit::with_title(title);
    let mut analyses = Vec::new();

    for (line, text) in logical_lines(content) {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            continue;
        };

        if first.starts_with('.') {
            match first.to_ascii_lowercase().as_str() {
                ".end" => break,
                ".op" => analyses.push(Analysis::Op),
                ".tran" => {
                    let [_, tstep, tstop] = tokens[..] else {
                        return Err(syntax(line, "expected .tran <tstep> <tstop>"));
                    };
                    let tstep = value(line, tstep)?;
                    let tstop = value(line, tstop)?;
                    if tstep <= 0.0 || tstop <= 0.0 {
                        return Err(syntax(line, ".tran times must be positive"));
                    }
                    analyses.push(Analysis::Tran { tstep, tstop });
                }
                other => return Err(syntax(line, format!("unsupported control line '{other}'"))),
            }
            continue;
        }

        let letter = first.chars().next().unwrap_or_default();
        let kind = ElementKind::from_letter(letter)
            .map_err(|_| syntax(line, format!("unknown element type '{letter}'")))?;

        let (a, b, raw_value) = match tokens[..] {
            [_, a, b, v] => (a, b, v),
            [_, a, b, dc, v]
                if dc.eq_ignore_ascii_case("dc")
                    && matches!(kind, ElementKind::VoltageSource | ElementKind::CurrentSource) =>
            {
                (a, b, v)
            }
            _ => {
                return Err(syntax(
                    line,
                    format!("expected {first} <node> <node> <value>"),
                ));
            }
        };

        circuit
            .add(
                kind,
                first,
                NodeLabel::from(a),
                NodeLabel::from(b),
                value(line, raw_value)?,
            )
            .map_err(|source| ParseError::Circuit { line, source })?;
    }

    Ok(Netlist { circuit, analyses })
}
