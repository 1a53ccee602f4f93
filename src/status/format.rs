//! Human-readable formatting for status values.

const SIZES: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count in the largest base-1000 unit that keeps the value
/// at or above one, rounded to a whole number.
///
/// Zero is special-cased as `"0 Byte"`. Counts beyond the terabyte range
/// stay in TB.
pub fn bytes_to_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < SIZES.len() && bytes / scale >= 1000 {
        scale *= 1000;
        unit += 1;
    }

    let value = (bytes as f64 / scale as f64).round();
    format!("{} {}", value as u64, SIZES[unit])
}

/// Format a number of seconds as zero-padded `HH:MM:SS`.
///
/// Hours do not roll over into days.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Timing probe text: elapsed milliseconds divided by 60, two decimals.
pub fn format_probe(elapsed_ms: f64) -> String {
    format!("{:.2} ms", elapsed_ms / 60.0)
}
