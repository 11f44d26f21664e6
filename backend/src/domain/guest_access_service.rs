//! Guest access-code sessions.
//!
//! Sessions are re-verified against the caregiver record on every request:
//! a deactivated caregiver, a deleted caregiver, or a regenerated code each
//! revoke the session immediately.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::error_mapping::map_caregiver_error;
use crate::domain::ports::{
    CaregiverRepository, CaregiverRepositoryError, GuestAccess, INACTIVE_CAREGIVER, INVALID_CODE,
    SESSION_EXPIRED, SESSION_REVOKED,
};
use crate::domain::{AccessCode, CaregiverId, Error, GuestSession};

/// Attempts made to find an unused code before giving up.
pub const ACCESS_CODE_ATTEMPTS: usize = 5;

fn coded(error: Error, code: &str) -> Error {
    error.with_details(json!({ "code": code }))
}

/// Guest session service implementing [`GuestAccess`].
#[derive(Clone)]
pub struct GuestAccessService<C> {
    caregivers: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> GuestAccessService<C> {
    /// Create the service with its caregiver repository and clock.
    pub fn new(caregivers: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { caregivers, clock }
    }
}

#[async_trait]
impl<C> GuestAccess for GuestAccessService<C>
where
    C: CaregiverRepository,
{
    async fn login(&self, code: &AccessCode) -> Result<GuestSession, Error> {
        let mut matches = self
            .caregivers
            .find_by_access_code(code)
            .await
            .map_err(map_caregiver_error)?;

        if matches.len() != 1 {
            if matches.len() > 1 {
                warn!(matches = matches.len(), "access code matched several caregivers");
            }
            return Err(coded(Error::unauthorized("invalid access code"), INVALID_CODE));
        }
        let Some(caregiver) = matches.pop() else {
            return Err(coded(Error::unauthorized("invalid access code"), INVALID_CODE));
        };
        if !caregiver.is_active {
            return Err(coded(
                Error::forbidden("caregiver is inactive"),
                INACTIVE_CAREGIVER,
            ));
        }

        info!(caregiver_id = %caregiver.id, "guest session established");
        Ok(GuestSession {
            caregiver_id: caregiver.id,
            caregiver_name: caregiver.display_name().to_owned(),
            access_code: code.clone(),
            created_at: self.clock.utc(),
        })
    }

    async fn validate(&self, session: &GuestSession) -> Result<GuestSession, Error> {
        if session.is_expired(self.clock.utc()) {
            return Err(coded(
                Error::unauthorized("guest session expired"),
                SESSION_EXPIRED,
            ));
        }

        let caregiver = self
            .caregivers
            .find_by_id(&session.caregiver_id)
            .await
            .map_err(map_caregiver_error)?;
        let current = caregiver.filter(|c| {
            c.is_active && c.access_code.as_ref() == Some(&session.access_code)
        });
        let Some(caregiver) = current else {
            info!(caregiver_id = %session.caregiver_id, "guest session revoked");
            return Err(coded(
                Error::unauthorized("guest session revoked"),
                SESSION_REVOKED,
            ));
        };

        Ok(GuestSession {
            caregiver_name: caregiver.display_name().to_owned(),
            ..session.clone()
        })
    }

    async fn regenerate_code(&self, caregiver_id: &CaregiverId) -> Result<AccessCode, Error> {
        for attempt in 1..=ACCESS_CODE_ATTEMPTS {
            let code = AccessCode::generate(&mut rand::thread_rng());
            match self
                .caregivers
                .set_access_code(caregiver_id, Some(code.clone()))
                .await
            {
                Ok(true) => {
                    info!(%caregiver_id, "access code regenerated");
                    return Ok(code);
                }
                Ok(false) => return Err(Error::not_found("caregiver not found")),
                Err(CaregiverRepositoryError::AccessCodeTaken) => {
                    warn!(%caregiver_id, attempt, "access code collision, retrying");
                }
                Err(other) => return Err(map_caregiver_error(other)),
            }
        }
        Err(Error::conflict("could not allocate an unused access code"))
    }
}

#[cfg(test)]
#[path = "guest_access_service_tests.rs"]
mod tests;
