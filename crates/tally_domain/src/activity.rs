use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Longest note, in characters, a record may carry.
pub const MAX_NOTE_LENGTH: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record {
    /// Builds a record, dropping blank notes and rejecting ones over [`MAX_NOTE_LENGTH`].
    pub fn new(timestamp: DateTime<Utc>, note: Option<String>) -> Result<Self> {
        let note = note.filter(|text| !text.trim().is_empty());
        if let Some(text) = &note {
            check_note(text)?;
        }
        Ok(Self { timestamp, note })
    }

    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            note: None,
        }
    }
}

fn check_note(text: &str) -> Result<()> {
    let length = text.chars().count();
    if length > MAX_NOTE_LENGTH {
        return Err(ValidationError::NoteTooLong {
            length,
            limit: MAX_NOTE_LENGTH,
        });
    }
    Ok(())
}

/// Set of weekdays, indexed 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b0111_1111);

    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Result<Self> {
        let mut set = Self::EMPTY;
        for index in indices {
            if index > 6 {
                return Err(ValidationError::WeekdayOutOfRange(index));
            }
            set.0 |= 1 << index;
        }
        Ok(set)
    }

    pub fn from_weekdays(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = Self::EMPTY;
        for day in days {
            set.insert(day);
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self.0 == Self::ALL.0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Sunday-based indices in ascending order.
    pub fn indices(self) -> Vec<u8> {
        (0..7).filter(|index| self.0 & (1 << index) != 0).collect()
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ValidationError;

    fn try_from(indices: Vec<u8>) -> Result<Self> {
        Self::from_indices(indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices()
    }
}

/// A recurring task together with every completion logged against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(
        default,
        alias = "everyHours",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurrence_hours: Option<f64>,
    #[serde(
        default,
        alias = "excludedDays",
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_weekdays: Option<WeekdaySet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

impl Activity {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            created_at,
            records: Vec::new(),
            recurrence_hours: None,
            excluded_weekdays: None,
            tag_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn every_hours(mut self, hours: f64) -> Self {
        self.recurrence_hours = Some(hours);
        self
    }

    pub fn excluding(mut self, days: WeekdaySet) -> Self {
        self.excluded_weekdays = Some(days);
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.recurrence_hours.is_some()
    }

    /// Latest completion, scanning every record since storage order is arbitrary.
    pub fn last_recorded_at(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|record| record.timestamp).max()
    }

    /// Checks the invariants storage is expected to uphold before handing the
    /// activity to the engine.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(hours) = self.recurrence_hours {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(ValidationError::NonPositiveRecurrence(hours));
            }
        }
        if self.excluded_weekdays.is_some_and(WeekdaySet::is_full) {
            return Err(ValidationError::AllWeekdaysExcluded);
        }
        for note in self.records.iter().filter_map(|record| record.note.as_deref()) {
            check_note(note)?;
        }
        Ok(())
    }
}
