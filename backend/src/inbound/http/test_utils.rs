//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, Route, test, web};
use chrono::Utc;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    MockAppointmentCommand, MockCapabilityQuery, MockCarePlanCommand, MockCareTeamCommand,
    MockDailyLogCommand, MockDailyOverviewQuery, MockGuestAccess, MockLoginService,
    MockNotificationDispatch, MockPushSubscriptionCommand,
};
use crate::domain::{
    AccessCode, Capabilities, CaregiverId, Error, GuestSession, Profile, ProfileId, Role,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path, relative to the scope it is mounted in, of [`guest_seed_route`].
pub const GUEST_SEED_PATH: &str = "/test/guest/{caregiver_id}";

const PROFILE_SEED_PATH: &str = "/test/profile/{profile_id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}

/// [`HttpState`] built from mocks with no expectations.
///
/// Any port a test calls without first swapping in a configured mock panics,
/// which keeps each test explicit about the ports it touches.
#[derive(Clone)]
pub struct TestState(HttpState);

impl Default for TestState {
    fn default() -> Self {
        Self(HttpState {
            login: Arc::new(MockLoginService::new()),
            capabilities: Arc::new(MockCapabilityQuery::new()),
            guest_access: Arc::new(MockGuestAccess::new()),
            overview: Arc::new(MockDailyOverviewQuery::new()),
            daily_logs: Arc::new(MockDailyLogCommand::new()),
            care_team: Arc::new(MockCareTeamCommand::new()),
            care_plan: Arc::new(MockCarePlanCommand::new()),
            appointments: Arc::new(MockAppointmentCommand::new()),
            notifications: Arc::new(MockNotificationDispatch::new()),
            push_subscriptions: Arc::new(MockPushSubscriptionCommand::new()),
            clock: Arc::new(DefaultClock),
        })
    }
}

impl TestState {
    pub fn with_login(mut self, mock: MockLoginService) -> Self {
        self.0.login = Arc::new(mock);
        self
    }

    pub fn with_capabilities(mut self, mock: MockCapabilityQuery) -> Self {
        self.0.capabilities = Arc::new(mock);
        self
    }

    pub fn with_guest_access(mut self, mock: MockGuestAccess) -> Self {
        self.0.guest_access = Arc::new(mock);
        self
    }

    pub fn with_overview(mut self, mock: MockDailyOverviewQuery) -> Self {
        self.0.overview = Arc::new(mock);
        self
    }

    pub fn with_daily_logs(mut self, mock: MockDailyLogCommand) -> Self {
        self.0.daily_logs = Arc::new(mock);
        self
    }

    pub fn with_care_team(mut self, mock: MockCareTeamCommand) -> Self {
        self.0.care_team = Arc::new(mock);
        self
    }

    pub fn with_care_plan(mut self, mock: MockCarePlanCommand) -> Self {
        self.0.care_plan = Arc::new(mock);
        self
    }

    pub fn with_appointments(mut self, mock: MockAppointmentCommand) -> Self {
        self.0.appointments = Arc::new(mock);
        self
    }

    pub fn with_notifications(mut self, mock: MockNotificationDispatch) -> Self {
        self.0.notifications = Arc::new(mock);
        self
    }

    pub fn with_push_subscriptions(mut self, mock: MockPushSubscriptionCommand) -> Self {
        self.0.push_subscriptions = Arc::new(mock);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.0.clock = Arc::new(clock);
        self
    }

    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(self.0)
    }
}

/// A freshly created guest session for `caregiver_id`.
pub fn guest_fixture(caregiver_id: CaregiverId) -> GuestSession {
    GuestSession {
        caregiver_id,
        caregiver_name: "Sam".to_owned(),
        access_code: AccessCode::parse("123456").expect("fixture code"),
        created_at: Utc::now(),
    }
}

/// Guest access port that accepts every stored session as-is.
pub fn accepting_guest_access() -> MockGuestAccess {
    let mut guest_access = MockGuestAccess::new();
    guest_access
        .expect_validate()
        .returning(|session| Ok(session.clone()));
    guest_access
}

/// Route storing [`guest_fixture`] for the caregiver named in the path.
///
/// Mount it at [`GUEST_SEED_PATH`] inside the session-wrapped scope and replay
/// the returned cookie to act as that caregiver.
pub fn guest_seed_route() -> Route {
    web::get().to(|path: web::Path<String>, session: SessionContext| async move {
        let caregiver_id = CaregiverId::new(path.into_inner()).expect("seed caregiver id");
        session
            .persist_guest(&guest_fixture(caregiver_id))
            .expect("seed guest session");
        HttpResponse::NoContent().finish()
    })
}

/// Session cookie set by `response`, if any.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Capability port resolving every profile to an admin without a caregiver
/// record.
pub fn admin_capabilities() -> MockCapabilityQuery {
    let mut capabilities = MockCapabilityQuery::new();
    capabilities.expect_resolve().returning(|id| {
        Ok(Capabilities {
            is_admin: true,
            is_caregiver: false,
            caregiver_id: None,
            profile: Some(Profile {
                id: *id,
                role: Role::Admin,
                name: "Avery".to_owned(),
                email: "admin@example.org".to_owned(),
            }),
        })
    });
    capabilities
}

/// Capability port resolving every profile to an active linked caregiver.
pub fn caregiver_capabilities(caregiver_id: CaregiverId) -> MockCapabilityQuery {
    let mut capabilities = MockCapabilityQuery::new();
    capabilities.expect_resolve().returning(move |id| {
        Ok(Capabilities {
            is_admin: false,
            is_caregiver: true,
            caregiver_id: Some(caregiver_id),
            profile: Some(Profile {
                id: *id,
                role: Role::Caregiver,
                name: "Sam".to_owned(),
                email: "sam@example.org".to_owned(),
            }),
        })
    });
    capabilities
}

/// Send `request` to an `/api/v1` scope built by `configure`, optionally
/// signed in as `profile_id` first, and return the status and JSON body.
///
/// Non-JSON bodies decode as [`serde_json::Value::Null`].
pub async fn call_api(
    state: TestState,
    profile_id: Option<ProfileId>,
    configure: fn(&mut web::ServiceConfig),
    request: test::TestRequest,
) -> (StatusCode, serde_json::Value) {
    let app = test::init_service(
        App::new().app_data(state.into_data()).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .route(
                    PROFILE_SEED_PATH,
                    web::get().to(|path: web::Path<String>, session: SessionContext| async move {
                        let profile_id = ProfileId::new(path.into_inner()).expect("seed profile id");
                        session.persist_profile(&profile_id)?;
                        Ok::<_, Error>(HttpResponse::NoContent().finish())
                    }),
                )
                .configure(configure),
        ),
    )
    .await;
    let mut request = request;
    if let Some(profile_id) = profile_id {
        let seeded = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/test/profile/{profile_id}"))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&seeded).expect("session cookie");
        request = request.cookie(cookie);
    }
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (
        status,
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    )
}
