//! Display helpers for monetary and ratio figures.
//!
//! Zero and non-finite inputs render as `--`, matching how missing metrics
//! are shown elsewhere in reports.

const PLACEHOLDER: &str = "--";

fn is_blank(value: f64) -> bool {
    value == 0.0 || !value.is_finite()
}

/// Whole-unit VND amount with `.` thousands separators, e.g. `1.234.567 ₫`.
pub fn format_currency(value: f64) -> String {
    if is_blank(value) {
        return PLACEHOLDER.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} ₫")
}

pub fn format_large_number(value: f64) -> String {
    if is_blank(value) {
        return PLACEHOLDER.to_string();
    }
    if value >= 1e12 {
        format!("{:.1} trillion", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.1} billion", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1} million", value / 1e6)
    } else {
        format_currency(value)
    }
}

pub fn format_number(value: f64) -> String {
    if is_blank(value) {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.2}")
}

pub fn format_percent(value: f64) -> String {
    if is_blank(value) {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.1}%")
}

/// One-decimal percentage with an explicit `+` on gains.
pub fn format_signed_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}
