use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::domain::{
    ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobPatch, NewApplication,
    NewJob, UserId, UserProfile,
};

/// Storage abstraction over posted jobs.
///
/// Every `find_*` listing only ever returns jobs newest first.
pub trait JobRepository: Send + Sync {
    /// Jobs with status `available`, optionally excluding one poster.
    fn find_available(&self, exclude_client: Option<&UserId>) -> Result<Vec<Job>, RepositoryError>;
    /// Available jobs whose required tags overlap `tags`.
    fn find_by_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude_client: Option<&UserId>,
    ) -> Result<Vec<Job>, RepositoryError>;
    fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn find_by_ids(&self, ids: &[JobId]) -> Result<Vec<Job>, RepositoryError>;
    /// Jobs the user posted or is assigned to.
    fn find_for_user(&self, user_id: &UserId) -> Result<Vec<Job>, RepositoryError>;
    fn create(&self, job: NewJob) -> Result<Job, RepositoryError>;
    fn update(&self, id: &JobId, patch: JobPatch) -> Result<Option<Job>, RepositoryError>;
    /// Assigns `worker_id` and moves the job to `assigned` in one step, only while the job is
    /// `available` with no worker. `Ok(None)` for an unknown job, [`RepositoryError::Conflict`]
    /// when the precondition no longer holds.
    fn assign_worker(
        &self,
        id: &JobId,
        worker_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError>;
    /// Undoes an assignment to `worker_id`, returning the job to `available`.
    /// `Ok(None)` when the job is unknown or no longer assigned to that worker.
    fn release_worker(
        &self,
        id: &JobId,
        worker_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError>;
}

/// Storage abstraction over job applications.
pub trait ApplicationRepository: Send + Sync {
    /// Returns [`RepositoryError::Conflict`] when the worker already applied to the job.
    fn create(&self, application: NewApplication) -> Result<JobApplication, RepositoryError>;
    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    /// Most recent first.
    fn find_by_worker(&self, worker_id: &UserId) -> Result<Vec<JobApplication>, RepositoryError>;
    /// Most recent first.
    fn find_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, RepositoryError>;
}

/// Storage abstraction over user profiles.
pub trait ProfileRepository: Send + Sync {
    fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    fn upsert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
