//! Role resolution for account profiles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error_mapping::{map_caregiver_error, map_profile_error};
use crate::domain::ports::{CapabilityQuery, CaregiverRepository, ProfileRepository};
use crate::domain::{Capabilities, Error, ProfileId, Role};

/// Resolves `{is_admin, is_caregiver}` for a profile.
#[derive(Clone)]
pub struct CapabilityService<P, C> {
    profiles: Arc<P>,
    caregivers: Arc<C>,
}

impl<P, C> CapabilityService<P, C> {
    /// Create the service from its repositories.
    pub fn new(profiles: Arc<P>, caregivers: Arc<C>) -> Self {
        Self {
            profiles,
            caregivers,
        }
    }
}

#[async_trait]
impl<P, C> CapabilityQuery for CapabilityService<P, C>
where
    P: ProfileRepository,
    C: CaregiverRepository,
{
    async fn resolve(&self, profile_id: &ProfileId) -> Result<Capabilities, Error> {
        let Some(profile) = self
            .profiles
            .find_by_id(profile_id)
            .await
            .map_err(map_profile_error)?
        else {
            return Ok(Capabilities::none());
        };

        let caregiver = self
            .caregivers
            .find_by_profile(profile_id)
            .await
            .map_err(map_caregiver_error)?;
        let is_caregiver = caregiver.as_ref().is_some_and(|c| c.is_active);

        Ok(Capabilities {
            is_admin: profile.role == Role::Admin,
            is_caregiver,
            caregiver_id: caregiver.map(|c| c.id),
            profile: Some(profile),
        })
    }
}
