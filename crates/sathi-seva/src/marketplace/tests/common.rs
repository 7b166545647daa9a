use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::MarketplaceConfig;
use crate::marketplace::domain::{
    ApplicationId, ApplicationStatus, Job, JobApplication, JobId, JobPatch, JobStatus,
    NewApplication, NewJob, UserId, UserProfile,
};
use crate::marketplace::location::{AddressDetails, Coordinates, Geocoder, LocationError, LocationProvider};
use crate::marketplace::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};
use crate::marketplace::{
    marketplace_router, FixedClock, InMemoryApplicationRepository, InMemoryJobRepository,
    InMemoryProfileRepository, Marketplace,
};

pub(super) type MemoryMarketplace =
    Marketplace<InMemoryJobRepository, InMemoryApplicationRepository, InMemoryProfileRepository>;

/// 2024-01-01 11:00 in India.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 5, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(now()))
}

pub(super) fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub(super) fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn new_job(client: &str, title: &str, required_tags: &[&str]) -> NewJob {
    NewJob {
        client_id: user(client),
        title: title.to_string(),
        description: format!("{title} needed this week"),
        location: "Indiranagar, Bengaluru".to_string(),
        amount: 800.0,
        duration: Some("2 hours".to_string()),
        scheduled_date: "2024-01-01".to_string(),
        scheduled_time: Some("10:00".to_string()),
        required_tags: tags(required_tags),
        status: JobStatus::Available,
        created_at: now(),
    }
}

pub(super) fn profile(id: &str, city: Option<&str>, locality: Option<&str>) -> UserProfile {
    let mut profile = UserProfile::new(user(id), now());
    profile.city = city.map(str::to_string);
    profile.locality = locality.map(str::to_string);
    profile
}

pub(super) struct Fixture {
    pub(super) jobs: Arc<InMemoryJobRepository>,
    pub(super) applications: Arc<InMemoryApplicationRepository>,
    pub(super) profiles: Arc<InMemoryProfileRepository>,
    pub(super) marketplace: Arc<MemoryMarketplace>,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let jobs = Arc::new(InMemoryJobRepository::default());
        let applications = Arc::new(InMemoryApplicationRepository::default());
        let profiles = Arc::new(InMemoryProfileRepository::default());
        let marketplace = Arc::new(Marketplace::new(
            jobs.clone(),
            applications.clone(),
            profiles.clone(),
            clock(),
            &MarketplaceConfig::default(),
            None,
        ));
        Self {
            jobs,
            applications,
            profiles,
            marketplace,
        }
    }

    pub(super) fn seed_job(&self, job: NewJob) -> Job {
        self.jobs.create(job).expect("job stored")
    }

    pub(super) fn seed_profile(&self, profile: UserProfile) -> UserProfile {
        self.profiles.upsert(profile).expect("profile stored")
    }

    pub(super) fn router(&self) -> axum::Router {
        marketplace_router(self.marketplace.clone())
    }
}

pub(super) struct UnavailableJobRepository;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

impl JobRepository for UnavailableJobRepository {
    fn find_available(&self, _exclude: Option<&UserId>) -> Result<Vec<Job>, RepositoryError> {
        Err(offline())
    }

    fn find_by_tags(
        &self,
        _tags: &BTreeSet<String>,
        _exclude: Option<&UserId>,
    ) -> Result<Vec<Job>, RepositoryError> {
        Err(offline())
    }

    fn find_by_id(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(offline())
    }

    fn find_by_ids(&self, _ids: &[JobId]) -> Result<Vec<Job>, RepositoryError> {
        Err(offline())
    }

    fn find_for_user(&self, _user_id: &UserId) -> Result<Vec<Job>, RepositoryError> {
        Err(offline())
    }

    fn create(&self, _job: NewJob) -> Result<Job, RepositoryError> {
        Err(offline())
    }

    fn update(&self, _id: &JobId, _patch: JobPatch) -> Result<Option<Job>, RepositoryError> {
        Err(offline())
    }

    fn assign_worker(
        &self,
        _id: &JobId,
        _worker_id: &UserId,
        _at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError> {
        Err(offline())
    }

    fn release_worker(
        &self,
        _id: &JobId,
        _worker_id: &UserId,
        _at: DateTime<Utc>,
    ) -> Result<Option<Job>, RepositoryError> {
        Err(offline())
    }
}

/// Accepts reads but refuses every write.
pub(super) struct ReadOnlyApplicationRepository;

impl ApplicationRepository for ReadOnlyApplicationRepository {
    fn create(&self, _application: NewApplication) -> Result<JobApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn find_by_id(&self, _id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(None)
    }

    fn find_by_worker(&self, _worker_id: &UserId) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(Vec::new())
    }

    fn find_by_job(&self, _job_id: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(offline())
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableProfileRepository;

impl ProfileRepository for UnavailableProfileRepository {
    fn find_by_user_id(&self, _user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Err(offline())
    }

    fn upsert(&self, _profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        Err(offline())
    }
}

pub(super) struct FixedLocation(pub(super) Result<Coordinates, LocationError>);

impl LocationProvider for FixedLocation {
    fn current(&self) -> Result<Coordinates, LocationError> {
        self.0.clone()
    }
}

pub(super) struct FixedGeocoder(pub(super) AddressDetails);

impl Geocoder for FixedGeocoder {
    fn reverse(&self, _coordinates: Coordinates) -> Result<AddressDetails, LocationError> {
        Ok(self.0.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
