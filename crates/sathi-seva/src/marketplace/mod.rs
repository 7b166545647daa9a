//! Job matching, application and scheduling core of the marketplace.
//!
//! Storage sits behind the traits in [`repository`]; everything else is plain synchronous
//! logic over those traits, so each service can be exercised against the in-memory stores
//! in [`memory`].

pub mod applications;
pub mod clock;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod location;
pub mod matching;
pub mod memory;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod tagging;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::warn;

use crate::config::MarketplaceConfig;

pub use applications::{
    ApplicationService, ApplicationServiceError, ApplyReceipt, EmployerInfo, ScheduleEntry,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    ApplicationDecision, ApplicationId, ApplicationStatus, Job, JobApplication, JobDraft, JobId,
    JobStatus, UserId, UserProfile, VerificationStatus,
};
pub use error::{ErrorKind, ValidationError};
pub use jobs::{JobBoardService, JobServiceError};
pub use matching::MatchingService;
pub use memory::{InMemoryApplicationRepository, InMemoryJobRepository, InMemoryProfileRepository};
pub use profiles::{ProfileService, ProfileServiceError, ProfileUpdate};
pub use repository::{ApplicationRepository, JobRepository, ProfileRepository, RepositoryError};
pub use router::marketplace_router;
pub use schedule::{ScheduleEvaluator, ScheduleStatus};
pub use tagging::{TagRequest, TagSuggester, TagSuggestion, TagSuggestionService};

/// All marketplace services wired over one set of repositories.
pub struct Marketplace<J, A, P> {
    pub matching: MatchingService<J, P>,
    pub applications: ApplicationService<J, A, P>,
    pub jobs: JobBoardService<J>,
    pub profiles: ProfileService<P>,
    pub tags: TagSuggestionService,
    locality_radius_km: f64,
}

impl<J, A, P> Marketplace<J, A, P>
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
        config: &MarketplaceConfig,
        remote_tags: Option<Arc<dyn TagSuggester>>,
    ) -> Self {
        let evaluator = ScheduleEvaluator::new(config.utc_offset());
        Self {
            matching: MatchingService::new(jobs.clone(), profiles.clone()),
            applications: ApplicationService::new(
                jobs.clone(),
                applications,
                profiles.clone(),
                clock.clone(),
                evaluator,
            ),
            jobs: JobBoardService::new(jobs, clock.clone()),
            profiles: ProfileService::new(profiles, clock),
            tags: TagSuggestionService::new(remote_tags),
            locality_radius_km: config.locality_radius_km,
        }
    }

    pub fn locality_radius_km(&self) -> f64 {
        self.locality_radius_km
    }

    /// The viewer's feed, using the skills stored on their profile.
    pub fn feed_for(&self, viewer_id: &UserId) -> Vec<Job> {
        match self.profile_for_feed(viewer_id) {
            Some(profile) => self.matching.feed(viewer_id, &profile.skills),
            None => Vec::new(),
        }
    }

    /// Jobs posted in the viewer's stored city or locality.
    pub fn local_feed_for(&self, viewer_id: &UserId) -> Vec<Job> {
        match self.profile_for_feed(viewer_id) {
            Some(profile) => self.matching.jobs_in_same_locality(
                viewer_id,
                profile.city.as_deref(),
                profile.locality.as_deref(),
            ),
            None => Vec::new(),
        }
    }

    /// Jobs posted within `radius_km` (default: configured radius) of the viewer's position.
    pub fn nearby_feed_for(&self, viewer_id: &UserId, radius_km: Option<f64>) -> Vec<Job> {
        let radius_km = radius_km
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(self.locality_radius_km);
        match self
            .profile_for_feed(viewer_id)
            .and_then(|profile| profile.coordinates())
        {
            Some(origin) => self.matching.jobs_nearby(viewer_id, origin, radius_km),
            None => Vec::new(),
        }
    }

    fn profile_for_feed(&self, viewer_id: &UserId) -> Option<UserProfile> {
        match self.profiles.ensure_profile(viewer_id) {
            Ok(profile) => Some(profile),
            Err(error) => {
                warn!(%viewer_id, %error, "viewer profile unavailable, returning empty feed");
                None
            }
        }
    }
}
