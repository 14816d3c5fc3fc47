//! Human-readable formatting of the raw-numeric API fields.
//!
//! The server reports raw values and `null` sentinels; everything displayable
//! is produced here. Unavailable always renders as a dashed sentinel, never
//! as zero.

const BYTE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const SPEED_UNITS: [&str; 9] = [
    "B/s", "KB/s", "MB/s", "GB/s", "TB/s", "PB/s", "EB/s", "ZB/s", "YB/s",
];

pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", BYTE_UNITS[unit])
}

pub fn format_bytes_opt(bytes: Option<u64>) -> String {
    bytes.map(format_bytes).unwrap_or_else(|| "--".to_string())
}

pub fn format_speed(bytes_per_second: f64) -> String {
    if bytes_per_second == 0.0 {
        return "0 B/s".to_string();
    }
    let mut value = bytes_per_second;
    let mut unit = 0;
    while value >= 1024.0 && unit < SPEED_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", SPEED_UNITS[unit])
}

pub fn format_speed_opt(bytes_per_second: Option<f64>) -> String {
    bytes_per_second
        .map(format_speed)
        .unwrap_or_else(|| "-- B/s".to_string())
}

pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

pub fn format_gigabytes_opt(bytes: Option<u64>) -> String {
    bytes
        .map(format_gigabytes)
        .unwrap_or_else(|| "-- GB".to_string())
}

pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.1}%"))
        .unwrap_or_else(|| "--%".to_string())
}

/// Whole-number percentage, used for disk usage.
pub fn format_percent_whole(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.0}%"))
        .unwrap_or_else(|| "--%".to_string())
}

pub fn format_temperature(celsius: Option<f64>) -> String {
    celsius
        .map(|celsius| format!("{celsius:.1}°C"))
        .unwrap_or_else(|| "--°C".to_string())
}

/// Display classification of the CPU temperature.
pub fn temperature_status(celsius: Option<f64>) -> &'static str {
    match celsius {
        None => "N/A",
        Some(celsius) if celsius > 75.0 => "High",
        Some(celsius) if celsius > 60.0 => "Warm",
        Some(_) => "Normal",
    }
}

pub fn format_uptime(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "N/A".to_string();
    }
    let days = total_seconds / (3600 * 24);
    let hours = total_seconds % (3600 * 24) / 3600;
    let minutes = total_seconds % 3600 / 60;

    let mut uptime = String::new();
    if days > 0 {
        uptime.push_str(&format!("{days} days, "));
    }
    uptime.push_str(&format!("{hours} hours, {minutes} minutes"));
    uptime
}

pub fn format_uptime_opt(total_seconds: Option<u64>) -> String {
    total_seconds
        .map(format_uptime)
        .unwrap_or_else(|| "N/A".to_string())
}
