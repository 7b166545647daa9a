use serde::Serialize;

use crate::marketplace::domain::{Job, JobApplication, UserId};
use crate::marketplace::schedule::ScheduleStatus;

/// Who posted the job; the name is best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployerInfo {
    pub client_id: UserId,
    pub display_name: Option<String>,
}

/// Result of a successful apply call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReceipt {
    pub application: JobApplication,
    pub employer: EmployerInfo,
}

/// One row of a worker's schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub job: Job,
    pub application: JobApplication,
    pub status: ScheduleStatus,
}
