//! Driving port for guest access-code sessions.

use async_trait::async_trait;

use crate::domain::{AccessCode, CaregiverId, Error, GuestSession};

/// Detail code returned when no active caregiver holds the code.
pub const INVALID_CODE: &str = "invalid_code";
/// Detail code returned when the caregiver holding the code is inactive.
pub const INACTIVE_CAREGIVER: &str = "inactive_caregiver";
/// Detail code returned when a guest session is older than 24 hours.
pub const SESSION_EXPIRED: &str = "session_expired";
/// Detail code returned when a guest session no longer matches its caregiver.
pub const SESSION_REVOKED: &str = "session_revoked";

/// Guest session lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuestAccess: Send + Sync {
    /// Establish a session for the caregiver holding `code`.
    async fn login(&self, code: &AccessCode) -> Result<GuestSession, Error>;

    /// Check a stored session is neither expired nor revoked.
    ///
    /// Returns the session refreshed with the caregiver's current name.
    async fn validate(&self, session: &GuestSession) -> Result<GuestSession, Error>;

    /// Issue a new code for `caregiver_id`, replacing any previous one.
    async fn regenerate_code(&self, caregiver_id: &CaregiverId) -> Result<AccessCode, Error>;
}
