//! Display formatting helpers.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Shorten a transaction hash to `first8...last8`.
///
/// Strings shorter than 16 characters are returned unchanged.
pub fn cut_tx_id(tx_id: &str) -> String {
    let chars: Vec<char> = tx_id.chars().collect();
    if chars.len() < 16 {
        return tx_id.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{head}...{tail}")
}

/// Upper-case the first character.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Compact English notation: `1.5K`, `2M`, `3.25B`.
pub fn format_number_en(num: f64) -> String {
    if num == 0.0 || num.is_nan() {
        return "0".to_string();
    }
    let (scaled, suffix) = if num >= 1e9 {
        (num / 1e9, "B")
    } else if num >= 1e6 {
        (num / 1e6, "M")
    } else if num >= 1e3 {
        (num / 1e3, "K")
    } else {
        (num, "")
    };
    format!("{}{suffix}", two_decimals(scaled))
}

/// Compact Chinese notation using 万 (1e4) and 亿 (1e8).
pub fn format_number_cn(num: f64) -> String {
    if num >= 1e8 {
        format!("{}亿", two_decimals(num / 1e8))
    } else if num >= 1e4 {
        format!("{}万", two_decimals(num / 1e4))
    } else {
        two_decimals(num)
    }
}

/// Fixed-point formatting with trailing zeros removed.
pub fn print_float(num: f64, digits: usize) -> String {
    let fixed = format!("{num:.digits$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Whole days from `now` until `end`, rounded to the nearest day.
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (end - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).round() as i64
}

fn two_decimals(num: f64) -> String {
    let fixed = format!("{num:.2}");
    match fixed.strip_suffix(".00") {
        Some(trimmed) => trimmed.to_string(),
        None => fixed,
    }
}
