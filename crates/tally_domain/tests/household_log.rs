use chrono::{DateTime, Duration, TimeZone, Utc};
use tally_domain::{
    board::sorted_records, calculate_period_statistics, Activity, ActivityBoard, ActivityKind,
    ActivityStatus,
};

const FIXTURE: &str = r#"[
  {
    "id": 1,
    "name": "Water plants",
    "description": "Balcony and kitchen",
    "createdAt": "2025-09-01T08:00:00Z",
    "records": [
      { "date": "2025-09-29T08:00:00Z" },
      { "date": "2025-10-01T08:00:00Z", "note": "balcony only" },
      { "date": "2025-10-03T08:00:00Z" },
      { "date": "2025-10-07T08:00:00Z" }
    ],
    "everyHours": 48,
    "excludedDays": [0]
  },
  {
    "id": 2,
    "name": "Clean gutters",
    "createdAt": "2025-01-01T00:00:00Z",
    "records": [],
    "everyHours": 2160
  },
  {
    "id": 3,
    "name": "Call grandma",
    "createdAt": "2025-08-15T00:00:00Z",
    "records": [
      { "date": "2025-09-14T18:00:00Z" },
      { "date": "2025-10-05T17:00:00Z" }
    ]
  },
  {
    "id": 4,
    "name": "Take out recycling",
    "createdAt": "2025-06-01T00:00:00Z",
    "records": [{ "date": "2025-10-08T19:00:00Z" }],
    "everyHours": 24,
    "excludedDays": [6]
  }
]"#;

fn load() -> Vec<Activity> {
    let activities: Vec<Activity> = serde_json::from_str(FIXTURE).expect("fixture parses");
    for activity in &activities {
        activity.validate().expect("fixture is valid");
    }
    activities
}

fn now() -> DateTime<Utc> {
    // Thursday evening.
    Utc.with_ymd_and_hms(2025, 10, 9, 20, 0, 0).unwrap()
}

#[test]
fn board_reports_each_household_task() {
    let activities = load();
    let board = ActivityBoard::builder().build();
    let entries = board.entries(&activities, &now());

    let order: Vec<&str> = entries.iter().map(|e| e.activity.name.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "Water plants",
            "Take out recycling",
            "Call grandma",
            "Clean gutters"
        ]
    );

    // Last watered Tuesday 08:00, due Thursday 08:00, now 12 hours late.
    let plants = &entries[0].snapshot;
    assert_eq!(plants.hours_until_due, Some(-12.0));
    assert_eq!(plants.status, Some(ActivityStatus::ShortOverdue));
    assert_eq!(plants.due_text().as_deref(), Some("overdue by 12 hours"));

    // Due Thursday 19:00 lands fine; one hour past.
    let recycling = &entries[1].snapshot;
    assert_eq!(recycling.status, Some(ActivityStatus::ShortOverdue));
    assert_eq!(recycling.hours_until_due, Some(-1.0));

    let grandma = &entries[2].snapshot;
    assert_eq!(grandma.status, None);
    assert_eq!(grandma.since_text().as_deref(), Some("4 days ago"));

    let gutters = &entries[3].snapshot;
    assert_eq!(gutters.last_recorded_at, None);
    assert_eq!(gutters.status, None);

    let summary = ActivityBoard::summary(&entries);
    assert_eq!(summary.count(ActivityStatus::ShortOverdue), 2);
    assert_eq!(summary.statusless, 2);
}

#[test]
fn status_walks_forward_until_recorded_again() {
    let mut activities = load();
    let plants = &activities[0];

    let mut seen = Vec::new();
    // Due Thursday 08:00; start six hours before it.
    let start = Utc.with_ymd_and_hms(2025, 10, 9, 2, 0, 0).unwrap();
    for hours in [0, 12, 30, 48] {
        let at = start + Duration::hours(hours);
        let snapshot = tally_domain::activity_status(plants, &at);
        seen.push(snapshot.status.expect("scheduled with records"));
    }
    assert_eq!(
        seen,
        vec![
            ActivityStatus::AlmostOverdue,
            ActivityStatus::ShortOverdue,
            ActivityStatus::Overdue,
            ActivityStatus::Overdue,
        ]
    );

    activities[0].records.push(tally_domain::Record::at(now()));
    let refreshed = tally_domain::activity_status(&activities[0], &now());
    assert_eq!(refreshed.status, Some(ActivityStatus::OnTrack));
    assert_eq!(refreshed.hours_until_due, Some(48.0));
}

#[test]
fn sunday_exclusion_pushes_due_to_monday() {
    let activities = load();
    let mut plants = activities[0].clone();
    // Friday 08:00 plus 48 hours is Sunday.
    let friday = Utc.with_ymd_and_hms(2025, 10, 10, 8, 0, 0).unwrap();
    plants.records.push(tally_domain::Record::at(friday));
    let snapshot = tally_domain::activity_status(&plants, &(friday + Duration::hours(1)));
    assert_eq!(
        snapshot.next_due_at,
        Some(Utc.with_ymd_and_hms(2025, 10, 13, 8, 0, 0).unwrap())
    );
}

#[test]
fn statistics_cover_three_windows() {
    let activities = load();
    let stats = calculate_period_statistics(&activities[0], &now());

    assert_eq!(stats.current_month.record_count, 3);
    assert_eq!(stats.current_month.average_gap_hours, Some(72.0));
    assert_eq!(stats.current_month.average_delta_vs_schedule_hours, Some(24.0));
    assert_eq!(
        stats.current_month.compare_to_schedule().as_deref(),
        Some("1 day slower than scheduled")
    );

    assert_eq!(stats.last_month.record_count, 1);
    assert_eq!(stats.last_month.average_gap_hours, None);

    assert_eq!(stats.all_time.record_count, 4);
    assert_eq!(stats.all_time.average_gap_hours, Some(64.0));

    let unscheduled = calculate_period_statistics(&activities[2], &now());
    assert_eq!(unscheduled.all_time.record_count, 2);
    assert_eq!(unscheduled.all_time.average_delta_vs_schedule_hours, None);
}

#[test]
fn detail_view_and_filters() {
    let activities = load();
    let newest = sorted_records(&activities[0]);
    assert_eq!(newest[0].timestamp, Utc.with_ymd_and_hms(2025, 10, 7, 8, 0, 0).unwrap());
    assert_eq!(newest[2].note.as_deref(), Some("balcony only"));

    let board = ActivityBoard::builder()
        .with_kind(ActivityKind::Scheduled)
        .with_name_filter("re")
        .build();
    let names: Vec<&str> = board
        .entries(&activities, &now())
        .iter()
        .map(|e| e.activity.name.as_str())
        .collect();
    assert_eq!(names, vec!["Take out recycling"]);
}
