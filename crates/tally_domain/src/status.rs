use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    activity::Activity,
    duration::{describe_due, describe_since},
    schedule::{hours_between, next_due_date},
};

/// Hours before the due instant at which an activity stops being on track.
pub const ALMOST_OVERDUE_WINDOW_HOURS: f64 = 8.0;
/// Hours past the due instant after which an activity counts as fully overdue.
pub const SHORT_OVERDUE_WINDOW_HOURS: f64 = 24.0;

/// Urgency levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ActivityStatus {
    OnTrack,
    AlmostOverdue,
    ShortOverdue,
    Overdue,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::OnTrack,
        ActivityStatus::AlmostOverdue,
        ActivityStatus::ShortOverdue,
        ActivityStatus::Overdue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::OnTrack => "On Track",
            ActivityStatus::AlmostOverdue => "Almost Overdue",
            ActivityStatus::ShortOverdue => "Overdue",
            ActivityStatus::Overdue => "Very Overdue",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(hours_until_due: f64) -> ActivityStatus {
    if hours_until_due > ALMOST_OVERDUE_WINDOW_HOURS {
        ActivityStatus::OnTrack
    } else if hours_until_due > 0.0 {
        ActivityStatus::AlmostOverdue
    } else if hours_until_due > -SHORT_OVERDUE_WINDOW_HOURS {
        ActivityStatus::ShortOverdue
    } else {
        ActivityStatus::Overdue
    }
}

/// Timing picture of one activity at a given instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatusSnapshot {
    pub last_recorded_at: Option<DateTime<Utc>>,
    pub hours_since_last_record: Option<f64>,
    pub next_due_at: Option<DateTime<Utc>>,
    pub hours_until_due: Option<f64>,
    pub status: Option<ActivityStatus>,
}

impl ActivityStatusSnapshot {
    /// "in 3 hours" / "overdue by 2 days", when the activity has a due instant.
    pub fn due_text(&self) -> Option<String> {
        self.hours_until_due.map(describe_due)
    }

    pub fn since_text(&self) -> Option<String> {
        self.hours_since_last_record.map(describe_since)
    }
}

/// Computes the snapshot for `activity` as seen at `now`.
///
/// Excluded weekdays are evaluated in the zone of `now`. An activity only
/// carries a status once it has both a recurrence interval and a record.
pub fn activity_status<Tz: TimeZone>(
    activity: &Activity,
    now: &DateTime<Tz>,
) -> ActivityStatusSnapshot {
    let Some(last_recorded_at) = activity.last_recorded_at() else {
        return ActivityStatusSnapshot::default();
    };

    let mut snapshot = ActivityStatusSnapshot {
        last_recorded_at: Some(last_recorded_at),
        hours_since_last_record: Some(hours_between(&last_recorded_at, now)),
        ..ActivityStatusSnapshot::default()
    };

    if let Some(recurrence_hours) = activity.recurrence_hours {
        let last_local = last_recorded_at.with_timezone(&now.timezone());
        let next_due = next_due_date(&last_local, recurrence_hours, activity.excluded_weekdays);
        let hours_until_due = hours_between(now, &next_due);
        snapshot.next_due_at = Some(next_due.with_timezone(&Utc));
        snapshot.hours_until_due = Some(hours_until_due);
        snapshot.status = Some(classify(hours_until_due));
    }

    snapshot
}

/// [`activity_status`] against the local wall clock.
pub fn activity_status_now(activity: &Activity) -> ActivityStatusSnapshot {
    activity_status(activity, &Local::now())
}
