//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: the signed-in profile id and the guest
//! session established with an access code. Both live in the encrypted
//! session cookie.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, GuestSession, ProfileId};

pub(crate) const PROFILE_ID_KEY: &str = "profile_id";
pub(crate) const GUEST_SESSION_KEY: &str = "guest_session";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated profile id in the session cookie.
    pub fn persist_profile(&self, profile_id: &ProfileId) -> Result<(), Error> {
        self.0
            .insert(PROFILE_ID_KEY, profile_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current profile id from the session, if present.
    ///
    /// A value that no longer parses is treated as absent.
    pub fn profile_id(&self) -> Result<Option<ProfileId>, Error> {
        let raw = self
            .0
            .get::<String>(PROFILE_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match ProfileId::new(value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid profile id in session cookie");
                None
            }
        }))
    }

    /// Require a signed-in profile or return `401 Unauthorized`.
    pub fn require_profile_id(&self) -> Result<ProfileId, Error> {
        self.profile_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the profile id, keeping any guest session.
    pub fn forget_profile(&self) {
        self.0.remove(PROFILE_ID_KEY);
    }

    /// Store a guest session, replacing any earlier one.
    pub fn persist_guest(&self, guest: &GuestSession) -> Result<(), Error> {
        self.0
            .insert(GUEST_SESSION_KEY, guest)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the stored guest session, if present.
    ///
    /// A value that no longer deserializes is discarded.
    pub fn guest(&self) -> Result<Option<GuestSession>, Error> {
        match self.0.get::<GuestSession>(GUEST_SESSION_KEY) {
            Ok(guest) => Ok(guest),
            Err(error) => {
                warn!(%error, "unreadable guest session discarded");
                self.forget_guest();
                Ok(None)
            }
        }
    }

    /// Drop the guest session, keeping any signed-in profile.
    pub fn forget_guest(&self) {
        self.0.remove(GUEST_SESSION_KEY);
    }

    /// Remove everything and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(SessionContext::new(req.get_session())))
    }
}
