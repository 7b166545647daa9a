use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::duration::parse_minutes;
use crate::marketplace::clock::Clock;
use crate::marketplace::domain::Job;

/// Whether a job's committed window has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Pending,
    Over,
}

impl ScheduleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Over => "over",
        }
    }
}

/// Derives start, end and status of a job in the marketplace's local time.
///
/// Jobs are scheduled as naive local date/time pairs; `offset` is used only to project the
/// injected wall clock into that same local frame.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleEvaluator {
    offset: FixedOffset,
}

impl ScheduleEvaluator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Scheduled date plus time of day (midnight when no time is set).
    pub fn compute_start(job: &Job) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(job.scheduled_date.trim(), "%Y-%m-%d").ok()?;
        let time = match job
            .scheduled_time
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        {
            Some(raw) => parse_time_of_day(raw)?,
            None => NaiveTime::from_hms_opt(0, 0, 0)?,
        };
        Some(date.and_time(time))
    }

    pub fn compute_end(job: &Job) -> Option<NaiveDateTime> {
        let start = Self::compute_start(job)?;
        let minutes = parse_minutes(job.duration.as_deref());
        start.checked_add_signed(Duration::minutes(i64::from(minutes)))
    }

    /// Status at a local instant. Unparseable schedules stay pending.
    pub fn status_at(job: &Job, now: NaiveDateTime) -> ScheduleStatus {
        match Self::compute_end(job) {
            Some(end) if now >= end => ScheduleStatus::Over,
            _ => ScheduleStatus::Pending,
        }
    }

    pub fn status(&self, job: &Job, clock: &dyn Clock) -> ScheduleStatus {
        Self::status_at(job, self.local_now(clock))
    }

    pub fn local_now(&self, clock: &dyn Clock) -> NaiveDateTime {
        clock.now().with_timezone(&self.offset).naive_local()
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}
