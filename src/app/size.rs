//! Human-readable byte counts and counters for the report.
//!
//! Sizes use binary steps (1024) labelled with the short forms users expect
//! (KB, MB, GB, TB).

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with two decimals and the first unit at which the
/// value drops below 1024. Anything still at or above 1024 after the GB step
/// is rendered in TB without further division.
pub fn format_size(bytes: i64) -> String {
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} TB", value)
}

/// Convenience for the unsigned sizes reported by filesystem metadata.
pub fn format_bytes(bytes: u64) -> String {
    format_size(i64::try_from(bytes).unwrap_or(i64::MAX))
}

/// Digits grouped in threes from the right: `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
