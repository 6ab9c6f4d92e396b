use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use tally_domain::{
    board::BoardEntry,
    calculate_period_statistics,
    duration::{format_duration, format_record_date},
    Activity, ActivityBoard, ActivityKind, ActivityStatus, PeriodStatistics,
};
use tracing::{debug, info, warn};

const DEFAULT_DATA_FILE: &str = "activities.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_path: PathBuf,
    pub(crate) pinned_now: Option<DateTime<FixedOffset>>,
    pub(crate) name_filter: Option<String>,
    pub(crate) kind: ActivityKind,
    pub(crate) show_statistics: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_vars(|key| std::env::var(key).ok());
        if let Some(path) = std::env::args_os().nth(1) {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Builds a config from a variable lookup, ignoring values that do not parse.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("TALLY_DATA") {
            if !path.trim().is_empty() {
                config.data_path = PathBuf::from(path.trim());
            }
        }
        if let Some(now) = lookup("TALLY_NOW") {
            match DateTime::parse_from_rfc3339(now.trim()) {
                Ok(parsed) => config.pinned_now = Some(parsed),
                Err(err) => warn!(value = %now, %err, "ignoring unparsable TALLY_NOW"),
            }
        }
        if let Some(filter) = lookup("TALLY_NAME_FILTER") {
            if !filter.trim().is_empty() {
                config.name_filter = Some(filter);
            }
        }
        if let Some(kind) = lookup("TALLY_KIND") {
            match ActivityKind::parse(&kind) {
                Some(kind) => config.kind = kind,
                None => warn!(value = %kind, "unknown TALLY_KIND, listing all activities"),
            }
        }
        if let Some(flag) = lookup("TALLY_SHOW_STATS") {
            let flag = flag.trim().to_ascii_lowercase();
            config.show_statistics = !matches!(flag.as_str(), "0" | "false" | "no" | "off");
        }
        config
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub(crate) fn board(&self) -> ActivityBoard {
        let mut builder = ActivityBoard::builder().with_kind(self.kind);
        if let Some(filter) = &self.name_filter {
            builder = builder.with_name_filter(filter);
        }
        builder.build()
    }

    pub(crate) fn now(&self) -> DateTime<Local> {
        match self.pinned_now {
            Some(pinned) => pinned.with_timezone(&Local),
            None => Local::now(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            pinned_now: None,
            name_filter: None,
            kind: ActivityKind::All,
            show_statistics: true,
        }
    }
}

/// Reads the activity list storage hands over, dropping entries that break its invariants.
pub fn load_activities(path: impl AsRef<Path>) -> Result<Vec<Activity>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read activities from {}", path.display()))?;
    let parsed: Vec<Activity> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid activity list", path.display()))?;

    let total = parsed.len();
    let activities: Vec<Activity> = parsed
        .into_iter()
        .filter(|activity| match activity.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(name = %activity.name, %err, "skipping invalid activity");
                false
            }
        })
        .collect();
    info!(
        path = %path.display(),
        loaded = activities.len(),
        skipped = total - activities.len(),
        "activities loaded"
    );
    Ok(activities)
}

pub fn render_report<Tz>(
    activities: &[Activity],
    board: &ActivityBoard,
    now: &DateTime<Tz>,
    show_statistics: bool,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let entries = board.entries(activities, now);
    let summary = ActivityBoard::summary(&entries);

    let mut out = String::new();
    let counts: Vec<String> = ActivityStatus::ALL
        .iter()
        .map(|status| {
            let label = status.label().to_lowercase();
            format!("{} {label}", summary.count(*status))
        })
        .collect();
    let noun = if summary.total() == 1 { "activity" } else { "activities" };
    out.push_str(&format!(
        "{} {noun}: {}, {} without status\n",
        summary.total(),
        counts.join(", "),
        summary.statusless
    ));

    for entry in &entries {
        out.push('\n');
        render_entry(&mut out, entry, now, show_statistics);
    }
    out
}

fn render_entry<Tz>(out: &mut String, entry: &BoardEntry<'_>, now: &DateTime<Tz>, stats: bool)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let activity = entry.activity;
    let snapshot = &entry.snapshot;
    let heading = match snapshot.status {
        Some(status) => format!("{} [{status}]\n", activity.name),
        None => format!("{}\n", activity.name),
    };
    out.push_str(&heading);

    let mut facts = Vec::new();
    if let Some(every) = activity.recurrence_hours {
        facts.push(format!("every {}", format_duration(every)));
    }
    match snapshot.last_recorded_at {
        Some(last) => facts.push(format!("last done {}", format_record_date(&last, now))),
        None => facts.push("never done".to_string()),
    }
    if let Some(due) = snapshot.due_text() {
        facts.push(due);
    }
    out.push_str(&format!("  {}\n", facts.join(", ")));

    if stats {
        let windows = calculate_period_statistics(activity, now);
        for (label, period) in [
            ("this month", &windows.current_month),
            ("last month", &windows.last_month),
            ("all time", &windows.all_time),
        ] {
            out.push_str(&format!("  {label}: {}\n", describe_period(period)));
        }
    }
    debug!(name = %activity.name, "rendered activity");
}

fn describe_period(period: &PeriodStatistics) -> String {
    let noun = if period.record_count == 1 { "record" } else { "records" };
    let mut text = format!("{} {noun}", period.record_count);
    if let Some(gap) = period.average_gap_hours {
        text.push_str(&format!(", avg gap {}", format_duration(gap)));
    }
    if let Some(comparison) = period.compare_to_schedule() {
        text.push_str(&format!(" ({comparison})"));
    }
    text
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(path = %config.data_path.display(), kind = ?config.kind, "building report");
    let activities = load_activities(&config.data_path)?;
    let report = render_report(
        &activities,
        &config.board(),
        &config.now(),
        config.show_statistics,
    );
    print!("{report}");
    Ok(())
}
