//! Fixed-width `HH:MM:SS` rendering.

use std::time::Duration;

/// Format elapsed time, rounding down. A stopwatch shows a second only
/// once it has fully passed.
pub fn format_elapsed(elapsed: Duration) -> String {
    format_hms(elapsed.as_secs())
}

/// Format remaining time, rounding up. A countdown ending mid-second
/// still shows the second that has not finished elapsing, and only
/// reads `00:00:00` once it is truly done.
pub fn format_remaining(remaining: Duration) -> String {
    let millis = remaining.as_millis() as u64;
    format_hms(millis.div_ceil(1_000))
}

fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
