//! Human readable renderings of hour counts.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::schedule::hours_between;

/// Renders `|hours|` as floored whole hours below a day, floored whole days otherwise.
pub fn format_duration(hours: f64) -> String {
    let hours = hours.abs();
    if hours < 24.0 {
        pluralize(hours.floor() as u64, "hour")
    } else {
        pluralize((hours / 24.0).floor() as u64, "day")
    }
}

fn pluralize(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// "in 5 hours" while the due instant is ahead, "overdue by 2 days" once it has passed.
pub fn describe_due(hours_until_due: f64) -> String {
    if hours_until_due > 0.0 {
        format!("in {}", format_duration(hours_until_due))
    } else {
        format!("overdue by {}", format_duration(hours_until_due))
    }
}

pub fn describe_since(hours_since: f64) -> String {
    format!("{} ago", format_duration(hours_since))
}

/// `Oct 3, 2025 (2 days ago)`, with the calendar date taken in the zone of `now`.
pub fn format_record_date<Tz>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    let offset = hours_between(timestamp, now);
    let relative = if offset >= 0.0 {
        describe_since(offset)
    } else {
        format!("in {}", format_duration(offset))
    };
    format!("{} ({relative})", local.format("%b %-d, %Y"))
}
