//! Display formatting shared by the feed renderers and the CLI.

/// Format a bubble alpha (0-255) as a whole percentage.
///
/// # Examples
/// ```
/// use killfeed_types::formatting::format_alpha_pct;
/// assert_eq!(format_alpha_pct(0), "0%");
/// assert_eq!(format_alpha_pct(170), "67%");
/// assert_eq!(format_alpha_pct(255), "100%");
/// ```
pub fn format_alpha_pct(alpha: u8) -> String {
    format!("{:.0}%", alpha as f32 / 255.0 * 100.0)
}

/// Wrap a display time in the brackets used by the feed's first segment.
///
/// # Examples
/// ```
/// use killfeed_types::formatting::format_time_tag;
/// assert_eq!(format_time_tag("10:00"), "[10:00]");
/// ```
pub fn format_time_tag(display_time: &str) -> String {
    format!("[{}]", display_time)
}

/// Format a duration in milliseconds as seconds, rounded to one decimal.
///
/// # Examples
/// ```
/// use killfeed_types::formatting::format_millis_as_secs;
/// assert_eq!(format_millis_as_secs(7500), "7.5s");
/// assert_eq!(format_millis_as_secs(1850), "1.9s");
/// assert_eq!(format_millis_as_secs(33), "0.0s");
/// ```
pub fn format_millis_as_secs(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}
