//! Email and password login against stored profile digests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error_mapping::map_profile_error;
use crate::domain::ports::{LoginService, ProfileRepository};
use crate::domain::{Error, LoginCredentials, ProfileId};

/// Authenticates account profiles.
#[derive(Clone)]
pub struct AccountLoginService<P> {
    profiles: Arc<P>,
}

impl<P> AccountLoginService<P> {
    /// Create the service from the profile repository.
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl<P> LoginService for AccountLoginService<P>
where
    P: ProfileRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ProfileId, Error> {
        let found = self
            .profiles
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_profile_error)?;

        match found {
            Some((profile, digest)) if digest.matches(credentials.password()) => Ok(profile.id),
            Some(_) | None => {
                debug!("login rejected");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}
