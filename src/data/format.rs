use std::time::Duration;

use chrono::{Local, TimeZone};

/// Format a response time in milliseconds ("0 ms", "87 ms", "1.25 s").
pub fn format_response_time(ms: f64) -> String {
    if !ms.is_finite() || ms <= 0.0 {
        "0 ms".to_string()
    } else if ms < 1000.0 {
        format!("{:.0} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

/// Format a millisecond timestamp as local date and time, "-" for zero.
pub fn format_datetime(timestamp_ms: i64) -> String {
    if timestamp_ms == 0 {
        return "-".to_string();
    }
    local(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Short local time label used for chart rows ("14:05").
pub fn format_time_label(timestamp_ms: i64) -> String {
    local(timestamp_ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Axis label; includes the date for windows longer than a day.
pub fn format_axis_label(timestamp_ms: i64, span: Duration) -> String {
    let pattern = if span > Duration::from_secs(24 * 60 * 60) {
        "%m-%d %H:%M"
    } else {
        "%H:%M"
    };
    local(timestamp_ms)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

/// Certificate summary, e.g. "42d left" or "expired".
pub fn format_cert_days(days_left: Option<i64>) -> String {
    match days_left {
        Some(d) if d < 0 => "expired".to_string(),
        Some(d) => format!("{}d left", d),
        None => "-".to_string(),
    }
}

/// Age of a cache entry for the status bar.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

fn local(timestamp_ms: i64) -> Option<chrono::DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp_ms).single()
}
