//! Shared number formatting for the text exporters.

/// Format a float in fixed notation, right-aligned to `width`.
///
/// Matches C's `%W.Pf`: no exponent, `nan`/`inf`/`-inf` for non-finite values.
pub fn format_fixed(val: f64, width: usize, precision: usize) -> String {
    if !val.is_finite() {
        let text = if val.is_nan() {
            "nan"
        } else if val.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        return format!("{:>width$}", text, width = width);
    }
    format!("{:>width$.precision$}", val, width = width, precision = precision)
}

/// Format an integer right-aligned to `width`, like C's `%Wd`.
pub fn format_int(val: i64, width: usize) -> String {
    format!("{:>width$}", val, width = width)
}

/// Wrap a units string in square brackets.
///
/// Each end is checked on its own, so `K]` becomes `[K]` and `[K` becomes `[K]`.
/// The empty string becomes `[]`.
pub fn bracket_units(units: &str) -> String {
    let mut out = String::with_capacity(units.len() + 2);
    if !units.starts_with('[') {
        out.push('[');
    }
    out.push_str(units);
    if !units.ends_with(']') {
        out.push(']');
    }
    out
}
