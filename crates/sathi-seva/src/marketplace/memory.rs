//! Mutex-backed stores used by the CLI demo, the HTTP service and tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobPatch, JobStatus,
    NewApplication, NewJob, UserId, UserProfile,
};
use super::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} store lock poisoned")))
}

/// Jobs kept in insertion order; listings walk it backwards so the newest comes first.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
    sequence: AtomicU64,
}

impl InMemoryJobRepository {
    fn listing<F>(&self, keep: F) -> Result<Vec<Job>, RepositoryError>
    where
        F: Fn(&Job) -> bool,
    {
        let jobs = lock(&self.jobs, "job")?;
        Ok(jobs.iter().rev().filter(|job| keep(job)).cloned().collect())
    }
}

impl JobRepository for InMemoryJobRepository {
    fn find_available(&self, exclude_client: Option<&UserId>) -> Result<Vec<Job>, RepositoryError> {
        self.listing(|job| {
            job.status == JobStatus::Available
                && exclude_client.map_or(true, |client| job.client_id != *client)
        })
    }

    fn find_by_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude_client: Option<&UserId>,
    ) -> Result<Vec<Job>, RepositoryError> {
        self.listing(|job| {
            job.status == JobStatus::Available
                && !job.required_tags.is_disjoint(tags)
                && exclude_client.map_or(true, |client| job.client_id != *client)
        })
    }

    fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let jobs = lock(&self.jobs, "job")?;
        Ok(jobs.iter().find(|job| job.id == *id).cloned())
    }

    fn find_by_ids(&self, ids: &[JobId]) -> Result<Vec<Job>, RepositoryError> {
        self.listing(|job| ids.contains(&job.id))
    }

    fn find_for_user(&self, user_id: &UserId) -> Result<Vec<Job>, RepositoryError> {
        self.listing(|job| job.client_id == *user_id || job.worker_id.as_ref() == Some(user_id))
    }

    fn create(&self, job: NewJob) -> Result<Job, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Job {
            id: JobId(format!("job-{id:06}")),
            client_id: job.client_id,
            title: job.title,
            description: job.description,
            location: job.location,
            amount: job.amount,
            duration: job.duration,
            scheduled_date: job.scheduled_date,
            scheduled_time: job.scheduled_time,
            required_tags: job.required_tags,
            status: job.status,
            worker_id: None,
            created_at: job.created_at,
            updated_at: job.created_at,
        };
        lock(&self.jobs, "job")?.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: &JobId, patch: JobPatch) -> Result<Option<Job>, RepositoryError> {
        let mut jobs = lock(&self.jobs, "job")?;
        let Some(job) = jobs.iter_mut().find(|job| job.id == *id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(updated_at) = patch.updated_at {
            job.updated_at = updated_at;
        }
        Ok(Some(job.clone()))
    }

    fn assign_worker(
        &self,
        id: &JobId,
        worker_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError> {
        let mut jobs = lock(&self.jobs, "job")?;
        let Some(job) = jobs.iter_mut().find(|job| job.id == *id) else {
            return Ok(None);
        };
        if job.status != JobStatus::Available || job.worker_id.is_some() {
            return Err(RepositoryError::Conflict);
        }
        job.status = JobStatus::Assigned;
        job.worker_id = Some(worker_id.clone());
        job.updated_at = at;
        Ok(Some(job.clone()))
    }

    fn release_worker(
        &self,
        id: &JobId,
        worker_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError> {
        let mut jobs = lock(&self.jobs, "job")?;
        let Some(job) = jobs
            .iter_mut()
            .find(|job| job.id == *id)
            .filter(|job| {
                job.status == JobStatus::Assigned && job.worker_id.as_ref() == Some(worker_id)
            })
        else {
            return Ok(None);
        };
        job.status = JobStatus::Available;
        job.worker_id = None;
        job.updated_at = at;
        Ok(Some(job.clone()))
    }
}

/// Applications with a (job, worker) uniqueness constraint.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    applications: Mutex<Vec<JobApplication>>,
    sequence: AtomicU64,
}

impl InMemoryApplicationRepository {
    fn listing<F>(&self, keep: F) -> Result<Vec<JobApplication>, RepositoryError>
    where
        F: Fn(&JobApplication) -> bool,
    {
        let applications = lock(&self.applications, "application")?;
        let mut matching: Vec<JobApplication> = applications
            .iter()
            .rev()
            .filter(|application| keep(application))
            .cloned()
            .collect();
        // Stable sort keeps newest-inserted first among equal timestamps.
        matching.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(matching)
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn create(&self, application: NewApplication) -> Result<JobApplication, RepositoryError> {
        let mut applications = lock(&self.applications, "application")?;
        if applications.iter().any(|existing| {
            existing.job_id == application.job_id && existing.worker_id == application.worker_id
        }) {
            return Err(RepositoryError::Conflict);
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = JobApplication {
            id: ApplicationId(format!("app-{id:06}")),
            job_id: application.job_id,
            worker_id: application.worker_id,
            status: ApplicationStatus::Pending,
            applied_at: application.applied_at,
            message: application.message,
        };
        applications.push(stored.clone());
        Ok(stored)
    }

    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let applications = lock(&self.applications, "application")?;
        Ok(applications
            .iter()
            .find(|application| application.id == *id)
            .cloned())
    }

    fn find_by_worker(&self, worker_id: &UserId) -> Result<Vec<JobApplication>, RepositoryError> {
        self.listing(|application| application.worker_id == *worker_id)
    }

    fn find_by_job(&self, job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        self.listing(|application| application.job_id == *job_id)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let mut applications = lock(&self.applications, "application")?;
        Ok(applications
            .iter_mut()
            .find(|application| application.id == *id)
            .map(|application| {
                application.status = status;
                application.clone()
            }))
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(lock(&self.profiles, "profile")?.get(user_id).cloned())
    }

    fn upsert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        lock(&self.profiles, "profile")?.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }
}
