//! Formatting helpers shared across renderers.

use crate::types::MonthKey;

/// Format a duration in milliseconds (e.g., "312h 45m", "7m").
pub fn duration_display(total_ms: u64) -> String {
    let total_mins = total_ms / 60_000;
    let hours = total_mins / 60;
    let mins = total_mins % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a month for display (e.g., "May 2023").
pub fn month_display(month: MonthKey) -> String {
    let name = match month.month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    };
    format!("{} {}", name, month.year)
}

/// Format a ratio as a percentage (e.g., 0.3333 -> "33.3%").
pub fn percent_display(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a count with a compact suffix (e.g., "14.2K").
pub fn count_display(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}
