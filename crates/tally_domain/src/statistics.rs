use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::{
    activity::{Activity, Record},
    duration::format_duration,
    schedule::hours_between,
};

/// Aggregates over the records that fall inside one time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatistics {
    pub record_count: usize,
    pub average_gap_hours: Option<f64>,
    /// Negative when completions come faster than the recurrence interval.
    pub average_delta_vs_schedule_hours: Option<f64>,
}

impl PeriodStatistics {
    /// "2 days slower than scheduled", or `None` when there is nothing to compare.
    pub fn compare_to_schedule(&self) -> Option<String> {
        let delta = self.average_delta_vs_schedule_hours?;
        let text = if delta < 0.0 {
            format!("{} faster than scheduled", format_duration(delta))
        } else if delta > 0.0 {
            format!("{} slower than scheduled", format_duration(delta))
        } else {
            "on schedule".to_string()
        };
        Some(text)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistics {
    pub current_month: PeriodStatistics,
    pub last_month: PeriodStatistics,
    pub all_time: PeriodStatistics,
}

/// Statistics for records inside `[window_start, window_end]`, both ends inclusive.
pub fn period_statistics<Tz: TimeZone>(
    records: &[Record],
    window_start: &DateTime<Tz>,
    window_end: &DateTime<Tz>,
    recurrence_hours: Option<f64>,
) -> PeriodStatistics {
    let start = window_start.with_timezone(&Utc);
    let end = window_end.with_timezone(&Utc);

    let mut in_window: Vec<DateTime<Utc>> = records
        .iter()
        .map(|record| record.timestamp)
        .filter(|timestamp| *timestamp >= start && *timestamp <= end)
        .collect();
    in_window.sort();

    let average_gap_hours = if in_window.len() < 2 {
        None
    } else {
        let total: f64 = in_window
            .windows(2)
            .map(|pair| hours_between(&pair[0], &pair[1]))
            .sum();
        Some(total / (in_window.len() - 1) as f64)
    };

    let average_delta_vs_schedule_hours = average_gap_hours
        .zip(recurrence_hours)
        .map(|(gap, scheduled)| gap - scheduled);

    PeriodStatistics {
        record_count: in_window.len(),
        average_gap_hours,
        average_delta_vs_schedule_hours,
    }
}

/// Current calendar month, previous calendar month, and the activity's lifetime up to `now`.
///
/// Month boundaries are taken in the zone of `now`.
pub fn calculate_period_statistics<Tz: TimeZone>(
    activity: &Activity,
    now: &DateTime<Tz>,
) -> ActivityStatistics {
    let this_month = start_of_month(now);
    let previous = this_month.clone() - Duration::milliseconds(1);
    let created_at = activity.created_at.with_timezone(&now.timezone());

    let stats = |start: &DateTime<Tz>, end: &DateTime<Tz>| {
        period_statistics(&activity.records, start, end, activity.recurrence_hours)
    };

    ActivityStatistics {
        current_month: stats(&this_month, &end_of_month(now)),
        last_month: stats(&start_of_month(&previous), &end_of_month(&previous)),
        all_time: stats(&created_at, now),
    }
}

/// Local midnight opening the month `instant` falls in.
pub fn start_of_month<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let first = first_of_month(instant.date_naive());
    local_midnight(&instant.timezone(), first)
}

/// Last millisecond of the month `instant` falls in.
pub fn end_of_month<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let next = first_of_month(instant.date_naive())
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    local_midnight(&instant.timezone(), next) - Duration::milliseconds(1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight: NaiveDateTime = date.and_time(NaiveTime::MIN);
    // A midnight swallowed by a DST jump resolves to the first wall-clock time that exists.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            (1..=8).find_map(|step| {
                tz.from_local_datetime(&(midnight + Duration::minutes(15 * step)))
                    .earliest()
            })
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}
