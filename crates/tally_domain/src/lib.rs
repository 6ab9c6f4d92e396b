pub mod activity;
pub mod board;
pub mod duration;
pub mod error;
pub mod schedule;
pub mod statistics;
pub mod status;

pub use crate::activity::{Activity, Record, WeekdaySet, MAX_NOTE_LENGTH};
pub use crate::board::{ActivityBoard, ActivityBoardBuilder, ActivityKind};
pub use crate::error::{Result, ValidationError};
pub use crate::statistics::{calculate_period_statistics, period_statistics, PeriodStatistics};
pub use crate::status::{activity_status, classify, ActivityStatus, ActivityStatusSnapshot};
