use std::cmp::Ordering;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{
    activity::{Activity, Record},
    status::{activity_status, ActivityStatus, ActivityStatusSnapshot},
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    #[default]
    All,
    Scheduled,
    Unscheduled,
}

impl ActivityKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Some(ActivityKind::All),
            "scheduled" => Some(ActivityKind::Scheduled),
            "unscheduled" | "nonscheduled" => Some(ActivityKind::Unscheduled),
            _ => None,
        }
    }

    fn admits(self, activity: &Activity) -> bool {
        match self {
            ActivityKind::All => true,
            ActivityKind::Scheduled => activity.is_scheduled(),
            ActivityKind::Unscheduled => !activity.is_scheduled(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry<'a> {
    pub activity: &'a Activity,
    pub snapshot: ActivityStatusSnapshot,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub on_track: usize,
    pub almost_overdue: usize,
    pub short_overdue: usize,
    pub overdue: usize,
    pub statusless: usize,
}

impl BoardSummary {
    pub fn count(&self, status: ActivityStatus) -> usize {
        match status {
            ActivityStatus::OnTrack => self.on_track,
            ActivityStatus::AlmostOverdue => self.almost_overdue,
            ActivityStatus::ShortOverdue => self.short_overdue,
            ActivityStatus::Overdue => self.overdue,
        }
    }

    pub fn total(&self) -> usize {
        self.on_track + self.almost_overdue + self.short_overdue + self.overdue + self.statusless
    }

    fn tally(&mut self, status: Option<ActivityStatus>) {
        let slot = match status {
            Some(ActivityStatus::OnTrack) => &mut self.on_track,
            Some(ActivityStatus::AlmostOverdue) => &mut self.almost_overdue,
            Some(ActivityStatus::ShortOverdue) => &mut self.short_overdue,
            Some(ActivityStatus::Overdue) => &mut self.overdue,
            None => &mut self.statusless,
        };
        *slot += 1;
    }
}

/// Filtered, urgency ordered view over activities handed in by storage.
#[derive(Debug, Clone, Default)]
pub struct ActivityBoard {
    name_filter: Option<String>,
    kind: ActivityKind,
}

#[derive(Debug, Default)]
pub struct ActivityBoardBuilder {
    name_filter: Option<String>,
    kind: ActivityKind,
}

impl ActivityBoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the activity name. Blank filters match everything.
    pub fn with_name_filter(mut self, filter: impl AsRef<str>) -> Self {
        let normalized = filter.as_ref().trim().to_lowercase();
        self.name_filter = (!normalized.is_empty()).then_some(normalized);
        self
    }

    pub fn with_kind(mut self, kind: ActivityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> ActivityBoard {
        ActivityBoard {
            name_filter: self.name_filter,
            kind: self.kind,
        }
    }
}

impl ActivityBoard {
    pub fn builder() -> ActivityBoardBuilder {
        ActivityBoardBuilder::new()
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn name_filter(&self) -> Option<&str> {
        self.name_filter.as_deref()
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        if !self.kind.admits(activity) {
            return false;
        }
        match &self.name_filter {
            Some(filter) => activity.name.to_lowercase().contains(filter.as_str()),
            None => true,
        }
    }

    /// Snapshots for every matching activity, most urgent first.
    ///
    /// Entries with a due instant come first, ascending by hours until due;
    /// the rest follow alphabetically.
    pub fn entries<'a, Tz: TimeZone>(
        &self,
        activities: &'a [Activity],
        now: &DateTime<Tz>,
    ) -> Vec<BoardEntry<'a>> {
        let mut entries: Vec<BoardEntry<'a>> = activities
            .iter()
            .filter(|activity| self.matches(activity))
            .map(|activity| {
                let snapshot = activity_status(activity, now);
                tracing::debug!(
                    name = %activity.name,
                    status = ?snapshot.status,
                    hours_until_due = ?snapshot.hours_until_due,
                    "derived activity status"
                );
                BoardEntry { activity, snapshot }
            })
            .collect();
        entries.sort_by(urgency_order);
        entries
    }

    pub fn summary(entries: &[BoardEntry<'_>]) -> BoardSummary {
        let mut summary = BoardSummary::default();
        for entry in entries {
            summary.tally(entry.snapshot.status);
        }
        summary
    }
}

/// Records newest first, the order the detail view lists them in.
pub fn sorted_records(activity: &Activity) -> Vec<&Record> {
    let mut records: Vec<&Record> = activity.records.iter().collect();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

fn urgency_order(a: &BoardEntry<'_>, b: &BoardEntry<'_>) -> Ordering {
    let due = match (a.snapshot.hours_until_due, b.snapshot.hours_until_due) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    due.then_with(|| {
        a.activity
            .name
            .to_lowercase()
            .cmp(&b.activity.name.to_lowercase())
    })
}
