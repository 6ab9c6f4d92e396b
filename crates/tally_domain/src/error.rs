use thiserror::Error;

/// Rejections raised when activities or records are checked at the storage boundary.
///
/// The scheduling engine itself never returns these; it accepts whatever it is
/// handed and stays total.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("activity name must not be empty")]
    EmptyName,
    #[error("note is {length} characters long, the limit is {limit}")]
    NoteTooLong { length: usize, limit: usize },
    #[error("recurrence interval must be a positive number of hours, got {0}")]
    NonPositiveRecurrence(f64),
    #[error("every weekday is excluded, no day is left to schedule on")]
    AllWeekdaysExcluded,
    #[error("weekday index {0} is outside 0..=6")]
    WeekdayOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
