use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use super::tags;
use crate::marketplace::domain::{Job, JobStatus, UserId, UserProfile};
use crate::marketplace::location::{self, Coordinates};
use crate::marketplace::repository::{JobRepository, ProfileRepository};

/// Builds the list of jobs a worker can take on.
///
/// Every method here is a read path: repository failures are logged and degrade to an empty
/// list so the feed always renders.
pub struct MatchingService<J, P> {
    jobs: Arc<J>,
    profiles: Arc<P>,
}

impl<J, P> MatchingService<J, P>
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(jobs: Arc<J>, profiles: Arc<P>) -> Self {
        Self { jobs, profiles }
    }

    /// Available jobs overlapping the worker's skills, or all available jobs when the worker
    /// has declared none. The viewer's own postings are never included.
    pub fn feed(&self, viewer_id: &UserId, worker_skills: &BTreeSet<String>) -> Vec<Job> {
        let fetched = if worker_skills.is_empty() {
            self.jobs.find_available(Some(viewer_id))
        } else {
            self.jobs.find_by_tags(worker_skills, Some(viewer_id))
        };

        let jobs = match fetched {
            Ok(jobs) => jobs,
            Err(error) => {
                warn!(%viewer_id, %error, "job feed unavailable, returning empty feed");
                return Vec::new();
            }
        };

        let feed: Vec<Job> = jobs
            .into_iter()
            .filter(|job| is_visible_to(job, viewer_id))
            .filter(|job| worker_skills.is_empty() || tags::matches(worker_skills, &job.required_tags))
            .collect();
        debug!(%viewer_id, skills = worker_skills.len(), jobs = feed.len(), "built job feed");
        feed
    }

    /// Available jobs whose poster lives in the viewer's city or locality.
    ///
    /// Jobs whose poster profile cannot be resolved are dropped.
    pub fn jobs_in_same_locality(
        &self,
        viewer_id: &UserId,
        viewer_city: Option<&str>,
        viewer_locality: Option<&str>,
    ) -> Vec<Job> {
        let jobs = self.available_for(viewer_id);
        let posters = self.resolve_posters(&jobs);

        jobs.into_iter()
            .filter(|job| {
                posters
                    .get(&job.client_id)
                    .and_then(Option::as_ref)
                    .is_some_and(|poster| {
                        location::same_place(viewer_city, poster.city.as_deref())
                            || location::same_place(viewer_locality, poster.locality.as_deref())
                    })
            })
            .collect()
    }

    /// Available jobs posted by users whose stored coordinates lie within `radius_km`.
    pub fn jobs_nearby(&self, viewer_id: &UserId, origin: Coordinates, radius_km: f64) -> Vec<Job> {
        let jobs = self.available_for(viewer_id);
        let posters = self.resolve_posters(&jobs);

        jobs.into_iter()
            .filter(|job| {
                posters
                    .get(&job.client_id)
                    .and_then(Option::as_ref)
                    .and_then(UserProfile::coordinates)
                    .is_some_and(|point| location::within_radius(origin, point, radius_km))
            })
            .collect()
    }

    fn available_for(&self, viewer_id: &UserId) -> Vec<Job> {
        match self.jobs.find_available(Some(viewer_id)) {
            Ok(jobs) => jobs
                .into_iter()
                .filter(|job| is_visible_to(job, viewer_id))
                .collect(),
            Err(error) => {
                warn!(%viewer_id, %error, "available jobs unavailable, returning empty list");
                Vec::new()
            }
        }
    }

    /// One profile lookup per distinct poster.
    fn resolve_posters(&self, jobs: &[Job]) -> HashMap<UserId, Option<UserProfile>> {
        let mut posters = HashMap::new();
        for job in jobs {
            if posters.contains_key(&job.client_id) {
                continue;
            }
            let profile = match self.profiles.find_by_user_id(&job.client_id) {
                Ok(profile) => profile,
                Err(error) => {
                    debug!(poster = %job.client_id, %error, "poster profile lookup failed");
                    None
                }
            };
            posters.insert(job.client_id.clone(), profile);
        }
        posters
    }
}

fn is_visible_to(job: &Job, viewer_id: &UserId) -> bool {
    job.status == JobStatus::Available && job.client_id != *viewer_id
}
