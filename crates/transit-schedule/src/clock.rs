//! Service-day clock times.
//!
//! GTFS times are seconds past midnight of the service day and may run past
//! `24:00:00` for trips that finish after midnight, so neither parsing nor
//! formatting wraps at 24 hours.

/// Parse an `HH:MM:SS` string into seconds since midnight.
///
/// Anything that does not split into exactly three `:`-separated parts
/// yields `0`. A part that is not a number counts as `0` on its own, and a
/// total that would overflow `u32` also falls back to `0`.
pub fn parse_clock_time(value: &str) -> u32 {
    let parts: Vec<&str> = value.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return 0;
    };

    let component = |s: &str| s.trim().parse::<u32>().unwrap_or(0);

    component(hours)
        .checked_mul(3600)
        .and_then(|h| h.checked_add(component(minutes).checked_mul(60)?))
        .and_then(|hm| hm.checked_add(component(seconds)))
        .unwrap_or(0)
}

/// Render seconds since midnight as zero-padded `HH:MM:SS`.
///
/// Hours are not reduced modulo 24: `90000` renders as `25:00:00`.
pub fn format_clock_time(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
