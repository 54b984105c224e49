//! Time display formatting.
//!
//! Pure functions; anything time-relative takes `now` as a parameter
//! instead of reading the clock.

use chrono::{DateTime, Utc};

/// Format total seconds as `HH:MM:SS`. Negative input clamps to zero;
/// hours are zero-padded to two digits but not wrapped at 24.
pub fn format_time(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Convert an hours/minutes/seconds triple to total seconds.
/// No range validation; components are combined as given.
pub fn parse_time_to_seconds(hours: u64, minutes: u64, seconds: u64) -> u64 {
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Percentage of a countdown already elapsed, 0-100.
/// A zero-length timer counts as fully complete.
pub fn percent_complete(total_secs: u64, remaining_secs: u64) -> u32 {
    if total_secs == 0 {
        return 100;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    ((elapsed as f64 / total_secs as f64) * 100.0).round() as u32
}

/// Tiered human-readable time remaining until a target date.
///
/// Passed targets render a sentinel; under a day the `HH:MM:SS` clock;
/// under a week `"Xd Yh Zm"`; under thirty days `"X days, Y hours"`; beyond
/// that months and days, with a month counted as thirty days.
pub fn format_event_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = target.timestamp_millis() - now.timestamp_millis();

    if diff_ms <= 0 {
        return "Event passed".to_string();
    }

    let total_secs = diff_ms / 1000;
    let total_minutes = total_secs / 60;
    let total_hours = total_minutes / 60;
    let days = total_hours / 24;

    if days < 1 {
        return format_time(total_secs);
    }

    if days < 7 {
        let hours = total_hours % 24;
        let minutes = total_minutes % 60;
        return format!("{days}d {hours}h {minutes}m");
    }

    if days < 30 {
        let hours = total_hours % 24;
        return format!("{days} days, {hours} hours");
    }

    let months = days / 30;
    let rem_days = days % 30;
    format!(
        "{} month{}, {} day{}",
        months,
        if months > 1 { "s" } else { "" },
        rem_days,
        if rem_days != 1 { "s" } else { "" },
    )
}

/// Whether a date lies strictly in the past.
pub fn is_past(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date < now
}

/// Milliseconds until a target date, clamped to zero for passed targets.
pub fn ms_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (target.timestamp_millis() - now.timestamp_millis()).max(0) as u64
}
