use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::clock::Clock;
use super::domain::{normalize_tags, UserId, UserProfile};
use super::error::ErrorKind;
use super::location::{Geocoder, LocationError, LocationProvider};
use super::repository::{ProfileRepository, RepositoryError};

/// Editable profile fields; absent or blank values leave the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

/// Profile reads and the profile-edit flows the core depends on.
pub struct ProfileService<P> {
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> ProfileService<P>
where
    P: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }

    /// Fetch the user's profile, creating a blank one on first visit.
    pub fn ensure_profile(&self, user_id: &UserId) -> Result<UserProfile, ProfileServiceError> {
        if let Some(profile) = self.profiles.find_by_user_id(user_id)? {
            return Ok(profile);
        }

        let profile = self
            .profiles
            .upsert(UserProfile::new(user_id.clone(), self.clock.now()))?;
        info!(%user_id, "created profile on first visit");
        Ok(profile)
    }

    pub fn update_skills<I, S>(
        &self,
        user_id: &UserId,
        skills: I,
    ) -> Result<UserProfile, ProfileServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profile = self.ensure_profile(user_id)?;
        profile.skills = normalize_tags(skills);
        profile.updated_at = self.clock.now();
        let stored = self.profiles.upsert(profile)?;
        debug!(%user_id, skills = stored.skills.len(), "skills updated");
        Ok(stored)
    }

    /// Apply the non-blank fields of a profile edit.
    pub fn update_details(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfileServiceError> {
        let mut profile = self.ensure_profile(user_id)?;
        let ProfileUpdate {
            full_name,
            phone,
            city,
            locality,
        } = update;
        if let Some(full_name) = full_name.and_then(non_blank) {
            profile.full_name = Some(full_name);
        }
        if let Some(phone) = phone.and_then(non_blank) {
            profile.phone = Some(phone);
        }
        if let Some(city) = city.and_then(non_blank) {
            profile.city = Some(city);
        }
        if let Some(locality) = locality.and_then(non_blank) {
            profile.locality = Some(locality);
        }
        profile.updated_at = self.clock.now();

        let stored = self.profiles.upsert(profile)?;
        debug!(%user_id, "profile details updated");
        Ok(stored)
    }

    /// Store the user's current position and the address it resolves to.
    pub fn refresh_location(
        &self,
        user_id: &UserId,
        provider: &dyn LocationProvider,
        geocoder: &dyn Geocoder,
    ) -> Result<UserProfile, ProfileServiceError> {
        let coordinates = provider.current()?;
        let address = geocoder.reverse(coordinates)?;

        let mut profile = self.ensure_profile(user_id)?;
        profile.latitude = Some(coordinates.latitude);
        profile.longitude = Some(coordinates.longitude);
        profile.city = non_blank(address.city);
        profile.state = non_blank(address.state);
        profile.pincode = non_blank(address.pincode);
        profile.locality = non_blank(address.locality);
        profile.updated_at = self.clock.now();

        let stored = self.profiles.upsert(profile)?;
        info!(%user_id, city = stored.city.as_deref().unwrap_or(""), "location refreshed");
        Ok(stored)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ProfileServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Location(_) | Self::Repository(_) => ErrorKind::DependencyFailure,
        }
    }
}
