//! Guest caregiver sessions established with an access code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::caregiver::AccessCode;
use super::ids::CaregiverId;

/// Lifetime of a guest session.
pub const GUEST_SESSION_TTL_HOURS: i64 = 24;

/// Session state held for a code-authenticated caregiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSession {
    /// Acting caregiver.
    pub caregiver_id: CaregiverId,
    /// Name shown in the guest area.
    pub caregiver_name: String,
    /// Code the session was established with.
    pub access_code: AccessCode,
    /// When the session was established.
    pub created_at: DateTime<Utc>,
}

impl GuestSession {
    /// Whether more than 24 hours have passed since the session started.
    ///
    /// A session exactly 24 hours old is still valid.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::hours(GUEST_SESSION_TTL_HOURS)
    }

    /// When the session stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(GUEST_SESSION_TTL_HOURS)
    }
}
