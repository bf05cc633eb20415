//! SI suffix handling for component values.

/// Recognized suffixes, longest first so `MEG` wins over `M`.
const SUFFIXES: &[(&str, f64)] = &[
    ("MEG", 1e6),
    ("T", 1e12),
    ("G", 1e9),
    ("K", 1e3),
    ("M", 1e-3),
    ("U", 1e-6),
    ("N", 1e-9),
    ("P", 1e-12),
    ("F", 1e-15),
];

/// Parse a SPICE-style value such as `4.7k`, `10MEG`, `100n` or `1e-3`.
///
/// Suffixes are case-insensitive. Trailing unit letters after a suffix are
/// ignored (`1kOhm`, `10uF`), as in SPICE.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let upper = s.to_ascii_uppercase();
    let split = upper
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit()
                || c == '.'
                || ((c == '-' || c == '+') && (i == 0 || upper[..i].ends_with('E')))
                || (c == 'E' && upper[i + 1..].starts_with(|n: char| n.is_ascii_digit() || n == '-' || n == '+')))
        })
        .map(|(i, _)| i)?;
    if split == 0 {
        return None;
    }

    let (number, rest) = upper.split_at(split);
    let value: f64 = number.parse().ok()?;
    let (multiplier, unit) = SUFFIXES
        .iter()
        .find(|(suffix, _)| rest.starts_with(suffix))
        .map(|&(suffix, m)| (m, &rest[suffix.len()..]))
        .unwrap_or((1.0, rest));
    if !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(value * multiplier)
}

/// Format a value with an engineering prefix, e.g. `3.3333` or `4.7000k`.
pub fn format_value(value: f64) -> String {
    const PREFIXES: &[(f64, &str)] = &[
        (1e12, "T"),
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "u"),
        (1e-9, "n"),
        (1e-12, "p"),
        (1e-15, "f"),
    ];

    let magnitude = value.abs();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return format!("{value:.4}");
    }
    match PREFIXES.iter().find(|&&(scale, _)| magnitude >= scale) {
        Some(&(scale, prefix)) => format!("{:.4}{}", value / scale, prefix),
        None => format!("{value:.4e}"),
    }
}
