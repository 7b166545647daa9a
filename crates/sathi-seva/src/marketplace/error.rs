use serde::Serialize;

use super::domain::{ApplicationId, ApplicationStatus, JobId, JobStatus};

/// Coarse failure classes shared by every marketplace service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    ValidationFailure,
    DependencyFailure,
}

/// Input or state rejected before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("decision must be 'accepted' or 'rejected', got '{0}'")]
    InvalidDecision(String),
    #[error("unknown job status '{0}'")]
    UnknownJobStatus(String),
    #[error("worker has already applied to job {job_id}")]
    DuplicateApplication { job_id: JobId },
    #[error("job {job_id} is {status} and not accepting applications")]
    JobNotAcceptingApplications { job_id: JobId, status: JobStatus },
    #[error("clients cannot apply to their own job {job_id}")]
    SelfApplication { job_id: JobId },
    #[error("application {application_id} was already {status}")]
    AlreadyDecided {
        application_id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error("job {job_id} already has an assigned worker")]
    JobAlreadyAssigned { job_id: JobId },
    #[error("job cannot move from {from} to {to}")]
    IllegalTransition { from: JobStatus, to: JobStatus },
}
