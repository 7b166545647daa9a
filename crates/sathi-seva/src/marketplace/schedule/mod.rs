//! Time arithmetic over a job's scheduled window.

mod duration;
mod evaluator;

pub use duration::{parse_minutes, DEFAULT_DURATION_MINUTES};
pub use evaluator::{ScheduleEvaluator, ScheduleStatus};
