//! Request guards resolving who is acting on a request.
//!
//! [`Actor`] runs role resolution once per request: a signed-in profile is
//! resolved through [`CapabilityQuery`], otherwise a guest session is
//! re-validated through [`GuestAccess`]. [`AdminActor`] and
//! [`CaregiverActor`] narrow the actor and reject the request with `403`
//! when the capability is missing.
//!
//! [`CapabilityQuery`]: crate::domain::ports::CapabilityQuery
//! [`GuestAccess`]: crate::domain::ports::GuestAccess

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Capabilities, CaregiverId, Error, ErrorCode, GuestSession};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Identity resolved for the current request.
#[derive(Debug, Clone)]
pub struct Actor {
    /// What the actor may do.
    pub capabilities: Capabilities,
    /// Re-validated guest session when the actor signed in with a code.
    pub guest: Option<GuestSession>,
}

impl Actor {
    async fn resolve(state: &HttpState, session: &SessionContext) -> Result<Self, Error> {
        if let Some(profile_id) = session.profile_id()? {
            let capabilities = state.capabilities.resolve(&profile_id).await?;
            if capabilities.profile.is_some() {
                return Ok(Self {
                    capabilities,
                    guest: None,
                });
            }
            debug!(%profile_id, "session names an unknown profile");
            session.forget_profile();
        }

        let guest = validate_guest(state, session).await?;
        Ok(Self {
            capabilities: Capabilities::for_guest(&guest),
            guest: Some(guest),
        })
    }
}

/// Re-validate the stored guest session, discarding it when it has expired
/// or was revoked.
async fn validate_guest(state: &HttpState, session: &SessionContext) -> Result<GuestSession, Error> {
    let Some(stored) = session.guest()? else {
        return Err(Error::unauthorized("login required"));
    };
    match state.guest_access.validate(&stored).await {
        Ok(guest) => Ok(guest),
        Err(error) => {
            if error.code() == ErrorCode::Unauthorized {
                session.forget_guest();
            }
            Err(error)
        }
    }
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = http_state(req);
        let session = SessionContext::from_request(req, payload).into_inner();
        Box::pin(async move {
            let state = state?;
            let session = session?;
            Actor::resolve(&state, &session).await
        })
    }
}

/// A valid guest session, ignoring any signed-in account.
#[derive(Debug, Clone)]
pub struct GuestActor(pub GuestSession);

impl FromRequest for GuestActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = http_state(req);
        let session = SessionContext::from_request(req, payload).into_inner();
        Box::pin(async move {
            let state = state?;
            let session = session?;
            validate_guest(&state, &session).await.map(Self)
        })
    }
}

/// An actor holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

impl FromRequest for AdminActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let actor = Actor::from_request(req, payload);
        Box::pin(async move {
            let actor = actor.await?;
            if actor.capabilities.is_admin {
                Ok(Self(actor))
            } else {
                Err(Error::forbidden("admin access required"))
            }
        })
    }
}

/// An actor allowed to perform caregiver actions: an active linked
/// caregiver or a valid guest.
#[derive(Debug, Clone)]
pub struct CaregiverActor {
    /// Caregiver record the actor acts as.
    pub caregiver_id: CaregiverId,
    /// Underlying actor.
    pub actor: Actor,
}

impl FromRequest for CaregiverActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let actor = Actor::from_request(req, payload);
        Box::pin(async move {
            let actor = actor.await?;
            match actor.capabilities.acting_caregiver() {
                Some(caregiver_id) => Ok(Self {
                    caregiver_id,
                    actor,
                }),
                None => Err(Error::forbidden("caregiver access required")),
            }
        })
    }
}
