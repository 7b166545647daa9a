use std::sync::Arc;

use tracing::{info, warn};

use super::clock::Clock;
use super::domain::{normalize_tags, Job, JobDraft, JobId, JobPatch, JobStatus, NewJob, UserId};
use super::error::{ErrorKind, ValidationError};
use super::repository::{JobRepository, RepositoryError};

/// Job posting and lifecycle on the client side.
pub struct JobBoardService<J> {
    jobs: Arc<J>,
    clock: Arc<dyn Clock>,
}

impl<J> JobBoardService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(jobs: Arc<J>, clock: Arc<dyn Clock>) -> Self {
        Self { jobs, clock }
    }

    /// Validate a draft and publish it as an available job.
    pub fn post_job(&self, draft: JobDraft) -> Result<Job, JobServiceError> {
        let new_job = self.validate(draft)?;
        let job = self.jobs.create(new_job)?;
        info!(job_id = %job.id, client_id = %job.client_id, tags = job.required_tags.len(), "job posted");
        Ok(job)
    }

    /// Jobs the user posted or is working on, newest first.
    pub fn jobs_for_user(&self, user_id: &UserId) -> Vec<Job> {
        self.jobs.find_for_user(user_id).unwrap_or_else(|error| {
            warn!(%user_id, %error, "user jobs unavailable");
            Vec::new()
        })
    }

    pub fn get(&self, job_id: &JobId) -> Result<Job, JobServiceError> {
        self.jobs
            .find_by_id(job_id)?
            .ok_or_else(|| JobServiceError::NotFound(job_id.clone()))
    }

    /// Move a job along its lifecycle.
    ///
    /// `assigned` is only reachable by accepting an application.
    pub fn transition(&self, job_id: &JobId, next: JobStatus) -> Result<Job, JobServiceError> {
        let job = self.get(job_id)?;
        if next == JobStatus::Assigned || !job.status.can_transition_to(next) {
            return Err(ValidationError::IllegalTransition {
                from: job.status,
                to: next,
            }
            .into());
        }

        let updated = self
            .jobs
            .update(
                job_id,
                JobPatch {
                    status: Some(next),
                    updated_at: Some(self.clock.now()),
                },
            )?
            .ok_or_else(|| JobServiceError::NotFound(job_id.clone()))?;
        info!(%job_id, from = job.status.label(), to = next.label(), "job status changed");
        Ok(updated)
    }

    fn validate(&self, draft: JobDraft) -> Result<NewJob, ValidationError> {
        let title = required(draft.title, "title")?;
        let description = required(draft.description, "description")?;
        let location = required(draft.location, "location")?;
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(draft.amount));
        }

        Ok(NewJob {
            client_id: draft.client_id,
            title,
            description,
            location,
            amount: draft.amount,
            duration: draft
                .duration
                .map(|duration| duration.trim().to_string())
                .filter(|duration| !duration.is_empty()),
            scheduled_date: draft.scheduled_date.format("%Y-%m-%d").to_string(),
            scheduled_time: draft
                .scheduled_time
                .map(|time| time.format("%H:%M").to_string()),
            required_tags: normalize_tags(draft.required_tags),
            status: JobStatus::Available,
            created_at: self.clock.now(),
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::BlankField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl JobServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Repository(_) => ErrorKind::DependencyFailure,
        }
    }
}
