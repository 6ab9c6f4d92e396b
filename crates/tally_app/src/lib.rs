pub mod app;

pub use crate::app::{load_activities, render_report, AppConfig};
