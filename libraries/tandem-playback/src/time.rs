//! Time display helpers

/// Format a duration in seconds for display
///
/// `M:SS` below one hour, `H:MM:SS` from one hour up. Fractions are
/// truncated; negative and non-finite inputs display as `0:00`.
pub fn time_display(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
