use chrono::{DateTime, Utc};

use crate::agent::ParamValue;

/// Format an amount as Indonesian Rupiah: `Rp 150.000,00` (the gap is a
/// non-breaking space, `.` groups thousands, `,` separates two decimals).
pub fn format_rupiah(value: f64) -> String {
    if !value.is_finite() {
        return format!("Rp\u{a0}{}", value);
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}Rp\u{a0}{},{:02}", sign, grouped, fraction)
}

/// `queue_number` -> `Queue Number`
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display form of a data-bag value.
pub fn format_param_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Number(n) => format_rupiah(*n),
        ParamValue::Text(s) => s.clone(),
        ParamValue::List(items) => items.join(", "),
    }
}

/// `HH:MM`, 24-hour.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}
