use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::views::{ApplyReceipt, EmployerInfo, ScheduleEntry};
use crate::marketplace::clock::Clock;
use crate::marketplace::domain::{
    ApplicationDecision, ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobStatus,
    NewApplication, UserId,
};
use crate::marketplace::error::{ErrorKind, ValidationError};
use crate::marketplace::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};
use crate::marketplace::schedule::ScheduleEvaluator;

/// Service composing the job, application and profile stores around the apply workflow.
pub struct ApplicationService<J, A, P> {
    jobs: Arc<J>,
    applications: Arc<A>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    evaluator: ScheduleEvaluator,
}

impl<J, A, P> ApplicationService<J, A, P>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        applications: Arc<A>,
        profiles: Arc<P>,
        clock: Arc<dyn Clock>,
        evaluator: ScheduleEvaluator,
    ) -> Self {
        Self {
            jobs,
            applications,
            profiles,
            clock,
            evaluator,
        }
    }

    /// Record a pending application from `worker_id` to `job_id`.
    ///
    /// A blank or missing message is replaced with one referencing the job.
    pub fn apply(
        &self,
        job_id: &JobId,
        worker_id: &UserId,
        message: Option<String>,
    ) -> Result<ApplyReceipt, ApplicationServiceError> {
        let job = self
            .jobs
            .find_by_id(job_id)?
            .ok_or_else(|| ApplicationServiceError::JobNotFound(job_id.clone()))?;

        if job.client_id == *worker_id {
            return Err(ValidationError::SelfApplication {
                job_id: job_id.clone(),
            }
            .into());
        }
        if job.status != JobStatus::Available {
            return Err(ValidationError::JobNotAcceptingApplications {
                job_id: job_id.clone(),
                status: job.status,
            }
            .into());
        }

        let employer = self.employer_for(&job);
        let message = message
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| default_message(job_id));

        let created = self.applications.create(NewApplication {
            job_id: job_id.clone(),
            worker_id: worker_id.clone(),
            message: Some(message),
            applied_at: self.clock.now(),
        });

        match created {
            Ok(application) => {
                info!(
                    application_id = %application.id,
                    %job_id,
                    %worker_id,
                    "application recorded"
                );
                Ok(ApplyReceipt {
                    application,
                    employer,
                })
            }
            Err(RepositoryError::Conflict) => Err(ValidationError::DuplicateApplication {
                job_id: job_id.clone(),
            }
            .into()),
            Err(source) => {
                warn!(%job_id, %worker_id, error = %source, "application insert failed");
                Err(ApplicationServiceError::ApplicationCreationFailed {
                    job_id: job_id.clone(),
                    employer,
                    source,
                })
            }
        }
    }

    /// All applications by a worker, most recent first.
    pub fn list_for_worker(&self, worker_id: &UserId) -> Vec<JobApplication> {
        self.applications
            .find_by_worker(worker_id)
            .unwrap_or_else(|error| {
                warn!(%worker_id, %error, "worker applications unavailable");
                Vec::new()
            })
    }

    /// Applicants for a job, most recent first.
    pub fn applications_for_job(&self, job_id: &JobId) -> Vec<JobApplication> {
        self.applications
            .find_by_job(job_id)
            .unwrap_or_else(|error| {
                warn!(%job_id, %error, "job applications unavailable");
                Vec::new()
            })
    }

    /// Pair each of the worker's applications with its job and schedule status.
    ///
    /// Applications whose job no longer resolves are skipped.
    pub fn build_schedule(&self, worker_id: &UserId) -> Vec<ScheduleEntry> {
        let applications = self.list_for_worker(worker_id);
        if applications.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let job_ids: Vec<JobId> = applications
            .iter()
            .filter(|application| seen.insert(application.job_id.clone()))
            .map(|application| application.job_id.clone())
            .collect();

        let jobs: HashMap<JobId, Job> = match self.jobs.find_by_ids(&job_ids) {
            Ok(jobs) => jobs.into_iter().map(|job| (job.id.clone(), job)).collect(),
            Err(error) => {
                warn!(%worker_id, %error, "schedule jobs unavailable");
                return Vec::new();
            }
        };

        let now = self.evaluator.local_now(self.clock.as_ref());
        let schedule: Vec<ScheduleEntry> = applications
            .into_iter()
            .filter_map(|application| {
                let job = jobs.get(&application.job_id)?.clone();
                let status = ScheduleEvaluator::status_at(&job, now);
                Some(ScheduleEntry {
                    job,
                    application,
                    status,
                })
            })
            .collect();
        debug!(%worker_id, entries = schedule.len(), "built schedule");
        schedule
    }

    /// Accept or reject a pending application.
    ///
    /// Decisions are final: a second decision is rejected. Accepting assigns the worker to the
    /// job, which must still be available with no worker. If the application cannot be marked
    /// afterwards the assignment is released again.
    pub fn decide(
        &self,
        application_id: &ApplicationId,
        decision: ApplicationDecision,
    ) -> Result<JobApplication, ApplicationServiceError> {
        let application = self
            .applications
            .find_by_id(application_id)?
            .ok_or_else(|| ApplicationServiceError::ApplicationNotFound(application_id.clone()))?;

        if application.status != ApplicationStatus::Pending {
            return Err(ValidationError::AlreadyDecided {
                application_id: application_id.clone(),
                status: application.status,
            }
            .into());
        }

        if decision == ApplicationDecision::Accepted {
            self.assign_worker(&application)?;
        }

        let updated = match self
            .applications
            .update_status(application_id, decision.status())
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.undo_assignment(&application, decision);
                return Err(ApplicationServiceError::ApplicationNotFound(
                    application_id.clone(),
                ));
            }
            Err(source) => {
                self.undo_assignment(&application, decision);
                return Err(source.into());
            }
        };

        info!(
            %application_id,
            job_id = %updated.job_id,
            decision = updated.status.label(),
            "application decided"
        );
        Ok(updated)
    }

    fn assign_worker(&self, application: &JobApplication) -> Result<(), ApplicationServiceError> {
        let job_id = &application.job_id;
        let job = self
            .jobs
            .find_by_id(job_id)?
            .ok_or_else(|| ApplicationServiceError::JobNotFound(job_id.clone()))?;

        if job.worker_id.is_some() {
            return Err(ValidationError::JobAlreadyAssigned {
                job_id: job_id.clone(),
            }
            .into());
        }
        if !job.status.can_transition_to(JobStatus::Assigned) {
            return Err(ValidationError::IllegalTransition {
                from: job.status,
                to: JobStatus::Assigned,
            }
            .into());
        }

        match self
            .jobs
            .assign_worker(job_id, &application.worker_id, self.clock.now())
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(ApplicationServiceError::JobNotFound(job_id.clone())),
            // Another acceptance got there between the read above and this write.
            Err(RepositoryError::Conflict) => Err(ValidationError::JobAlreadyAssigned {
                job_id: job_id.clone(),
            }
            .into()),
            Err(source) => Err(source.into()),
        }
    }

    fn undo_assignment(&self, application: &JobApplication, decision: ApplicationDecision) {
        if decision != ApplicationDecision::Accepted {
            return;
        }
        let job_id = &application.job_id;
        let worker_id = &application.worker_id;
        match self.jobs.release_worker(job_id, worker_id, self.clock.now()) {
            Ok(Some(_)) => info!(%job_id, %worker_id, "assignment released after failed decision"),
            Ok(None) => debug!(%job_id, %worker_id, "no assignment to release"),
            Err(error) => {
                warn!(%job_id, %worker_id, %error, "could not release assignment; job left assigned")
            }
        }
    }

    fn employer_for(&self, job: &Job) -> EmployerInfo {
        let display_name = match self.profiles.find_by_user_id(&job.client_id) {
            Ok(profile) => profile.and_then(|profile| profile.full_name),
            Err(error) => {
                debug!(client_id = %job.client_id, %error, "employer name lookup failed");
                None
            }
        };

        EmployerInfo {
            client_id: job.client_id.clone(),
            display_name,
        }
    }
}

fn default_message(job_id: &JobId) -> String {
    format!("Application for job {job_id}")
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("could not record application for job {job_id}: {source}")]
    ApplicationCreationFailed {
        job_id: JobId,
        employer: EmployerInfo,
        #[source]
        source: RepositoryError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::JobNotFound(_) | Self::ApplicationNotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::ApplicationCreationFailed { .. } | Self::Repository(_) => {
                ErrorKind::DependencyFailure
            }
        }
    }
}
