//! Resolved capabilities of the acting identity.

use serde::Serialize;

use super::guest_session::GuestSession;
use super::ids::CaregiverId;
use super::profile::Profile;

/// What the current actor may do.
///
/// ## Invariants
/// - `is_caregiver` implies `caregiver_id` is present.
/// - An unknown profile yields [`Capabilities::none`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Profile role is admin.
    pub is_admin: bool,
    /// A linked active caregiver or a valid guest.
    pub is_caregiver: bool,
    /// Caregiver record acting on behalf of the actor.
    pub caregiver_id: Option<CaregiverId>,
    /// Account profile, absent for guests.
    pub profile: Option<Profile>,
}

impl Capabilities {
    /// Capabilities of an unknown actor.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Capabilities of a validated guest session.
    #[must_use]
    pub fn for_guest(session: &GuestSession) -> Self {
        Self {
            is_admin: false,
            is_caregiver: true,
            caregiver_id: Some(session.caregiver_id),
            profile: None,
        }
    }

    /// Caregiver id when the actor may perform caregiver actions.
    #[must_use]
    pub fn acting_caregiver(&self) -> Option<CaregiverId> {
        if self.is_caregiver {
            self.caregiver_id
        } else {
            None
        }
    }
}
