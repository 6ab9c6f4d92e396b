use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone};
use tracing::{trace, warn};

use crate::activity::WeekdaySet;

/// Upper bound on 24 hour pushes past excluded weekdays.
pub const MAX_EXCLUSION_ADVANCES: usize = 7;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Signed fractional hours from `from` to `to`.
pub fn hours_between<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> f64 {
    (to.timestamp_millis() - from.timestamp_millis()) as f64 / MILLIS_PER_HOUR
}

/// Shifts `instant` by fractional hours, saturating at the ends of the representable range.
pub fn add_hours<Tz: TimeZone>(instant: DateTime<Tz>, hours: f64) -> DateTime<Tz> {
    let shifted = Duration::try_milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
        .and_then(|delta| instant.clone().checked_add_signed(delta));
    match shifted {
        Some(shifted) => shifted,
        None => {
            warn!(hours, "interval leaves the representable range, saturating");
            range_edge(&instant.timezone(), hours > 0.0)
        }
    }
}

fn range_edge<Tz: TimeZone>(tz: &Tz, forward: bool) -> DateTime<Tz> {
    // A day inside the limit keeps the local view of any offset representable.
    let edge = if forward {
        NaiveDateTime::MAX - Duration::days(1)
    } else {
        NaiveDateTime::MIN + Duration::days(1)
    };
    tz.from_utc_datetime(&edge)
}

/// Due instant following a completion at `last_record_at`.
///
/// Weekdays are read in the zone `last_record_at` carries, so callers convert
/// record instants into the zone of their `now` before asking.
pub fn next_due_date<Tz: TimeZone>(
    last_record_at: &DateTime<Tz>,
    recurrence_hours: f64,
    excluded_weekdays: Option<WeekdaySet>,
) -> DateTime<Tz> {
    let mut next_due = add_hours(last_record_at.clone(), recurrence_hours);

    let Some(excluded) = excluded_weekdays.filter(|days| !days.is_empty()) else {
        return next_due;
    };

    let mut advances = 0;
    while excluded.contains(next_due.weekday()) && advances < MAX_EXCLUSION_ADVANCES {
        trace!(weekday = ?next_due.weekday(), "due date lands on excluded weekday");
        next_due = add_hours(next_due, 24.0);
        advances += 1;
    }

    if advances == MAX_EXCLUSION_ADVANCES && excluded.contains(next_due.weekday()) {
        warn!(
            excluded = ?excluded.indices(),
            "every candidate weekday is excluded, giving up after {MAX_EXCLUSION_ADVANCES} days"
        );
    }

    next_due
}
