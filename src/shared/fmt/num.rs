//! Number formatting utilities for human-readable display.
//!
//! All helpers take `f64` because every derived metric is a float. A value
//! that is not finite (an undefined ratio) renders as [`UNDEFINED`].

/// Placeholder shown for an undefined value (e.g. a ratio over a zero open).
pub const UNDEFINED: &str = "n/a";

/// Fixed decimal places, no grouping: `fixed(105.0, 2) == "105.00"`.
pub fn fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{:.1$}", value, decimals)
}

/// Fixed decimal places followed by a percent sign: `percent(5.0, 1) == "5.0%"`.
pub fn percent(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{:.1$}%", value, decimals)
}

/// Fixed decimal places with thousands separators: `grouped(1234.5, 2) == "1,234.50"`.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    group_thousands(&format!("{:.1$}", value, decimals))
}

/// Inserts `,` every three digits of the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
