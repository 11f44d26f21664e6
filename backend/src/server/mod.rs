//! HTTP server assembly: session cookie, tracing, care API and probes.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::debug;

use carelink::Trace;
#[cfg(debug_assertions)]
use carelink::doc::ApiDoc;
use carelink::inbound::http::health::{HealthState, live, ready};
use carelink::inbound::http::routes::configure;
use carelink::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";

/// Attributes of the `session` cookie shared by account and guest logins.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
    ttl_hours: i64,
}

impl SessionCookie {
    /// The guest session stores the caregiver id and the access code it was
    /// issued for, so the cookie is encrypted rather than merely signed.
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_http_only(true)
            .cookie_secure(self.secure)
            .cookie_same_site(self.same_site)
            .cookie_content_security(CookieContentSecurity::Private)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(self.ttl_hours)),
            )
            .build()
    }
}

/// Construct the HTTP server and mark the service ready once bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the VAPID key cannot be loaded or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state: web::Data<HttpState> = build_http_state(&config.db_pool, &config.push)?;
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
        ttl_hours: config.session_ttl_hours,
    };
    debug!(
        secure = cookie.secure,
        ttl_hours = cookie.ttl_hours,
        "session cookie configured"
    );

    let probes = health_state.clone();
    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .wrap(cookie.middleware())
            .configure(configure);
        let app = App::new()
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
