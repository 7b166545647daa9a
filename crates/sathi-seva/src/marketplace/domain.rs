use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identifier issued by the authentication subsystem.
    UserId
);
string_id!(
    /// Identifier of a posted job.
    JobId
);
string_id!(
    /// Identifier of a worker's application to a job.
    ApplicationId
);

/// Identity check state of a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

/// Marketplace profile shared by clients and workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub verification_status: VerificationStatus,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub locality: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Blank profile created the first time a user shows up.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            full_name: None,
            phone: None,
            skills: BTreeSet::new(),
            verification_status: VerificationStatus::Pending,
            city: None,
            state: None,
            pincode: None,
            locality: None,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn coordinates(&self) -> Option<super::location::Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(super::location::Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Canonical job lifecycle.
///
/// Older rows were written with `open` instead of `available`; both deserialize to
/// [`JobStatus::Available`] and only `available` is ever written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[serde(alias = "open")]
    Available,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (current, JobStatus::Cancelled) => !current.is_terminal(),
            (JobStatus::Available, JobStatus::Assigned)
            | (JobStatus::Assigned, JobStatus::InProgress)
            | (JobStatus::InProgress, JobStatus::Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" | "open" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ValidationError::UnknownJobStatus(value.to_string())),
        }
    }
}

/// A posted job as stored by the job repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub client_id: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub amount: f64,
    pub duration: Option<String>,
    /// Calendar date as entered, normally `YYYY-MM-DD`.
    pub scheduled_date: String,
    /// Time of day as entered, normally `HH:MM`.
    pub scheduled_time: Option<String>,
    pub required_tags: BTreeSet<String>,
    pub status: JobStatus,
    pub worker_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied job posting before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub client_id: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub amount: f64,
    #[serde(default)]
    pub duration: Option<String>,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default)]
    pub required_tags: Vec<String>,
}

/// Validated job handed to [`super::repository::JobRepository::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub client_id: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub amount: f64,
    pub duration: Option<String>,
    pub scheduled_date: String,
    pub scheduled_time: Option<String>,
    pub required_tags: BTreeSet<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a stored job; `None` leaves the field untouched.
///
/// The assigned worker is not patchable: it only changes through
/// [`JobRepository::assign_worker`](super::repository::JobRepository::assign_worker) and
/// [`JobRepository::release_worker`](super::repository::JobRepository::release_worker).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A worker's application to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub worker_id: UserId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub message: Option<String>,
}

/// Application handed to [`super::repository::ApplicationRepository::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub job_id: JobId,
    pub worker_id: UserId,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Terminal outcome a client can record on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

impl ApplicationDecision {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            Self::Accepted => ApplicationStatus::Accepted,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl FromStr for ApplicationDecision {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ValidationError::InvalidDecision(value.to_string())),
        }
    }
}

/// Trim, drop blanks and deduplicate a list of tags.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
