//! Route table for the `/api/v1` scope.
//!
//! [`configure`] registers every REST handler together with extractor
//! settings that turn malformed JSON bodies and query strings into the usual
//! `invalid_request` error envelope. The caller owns the scope and its
//! session middleware:
//!
//! ```no_run
//! use actix_web::{App, web};
//! use carelink::inbound::http::routes::configure;
//!
//! let app = App::new().service(web::scope("/api/v1").configure(configure));
//! # let _ = app;
//! ```

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;
use crate::inbound::http::{admin, guest, logs, overview, push_subscriptions, users};

/// Largest JSON body accepted by any endpoint.
const JSON_LIMIT_BYTES: usize = 64 * 1024;

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected JSON body");
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "request body is too large"
        }
        _ => "request body is not valid JSON",
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": "invalid_body", "reason": err.to_string() }))
        .into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected query string");
    Error::invalid_request("query string is malformed")
        .with_details(json!({ "code": "invalid_query", "reason": err.to_string() }))
        .into()
}

/// Register every `/api/v1` handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    // Account and guest sessions.
    .service(users::login)
    .service(users::logout)
    .service(users::current_account)
    .service(guest::guest_login)
    .service(guest::guest_logout)
    .service(guest::guest_session)
    // Caregiver views and logging.
    .service(overview::daily_overview)
    .service(logs::set_task_log)
    .service(logs::clear_task_log)
    .service(logs::set_dose_log)
    .service(logs::clear_dose_log)
    .service(push_subscriptions::subscribe)
    .service(push_subscriptions::unsubscribe)
    // Administration.
    .service(admin::list_care_recipients)
    .service(admin::create_care_recipient)
    .service(admin::delete_care_recipient)
    .service(admin::list_caregivers)
    .service(admin::create_caregiver)
    .service(admin::set_caregiver_active)
    .service(admin::delete_caregiver)
    .service(admin::regenerate_access_code)
    .service(admin::create_schedules)
    .service(admin::delete_schedule)
    .service(admin::create_task)
    .service(admin::delete_task)
    .service(admin::create_medication)
    .service(admin::set_medication_active)
    .service(admin::delete_medication)
    .service(admin::create_medication_schedule)
    .service(admin::delete_medication_schedule)
    .service(admin::list_appointments)
    .service(admin::create_appointment)
    .service(admin::set_appointment_status)
    .service(admin::delete_appointment)
    .service(admin::broadcast_notification);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileId;
    use crate::inbound::http::test_utils::{TestState, admin_capabilities, call_api};
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::test as actix_test;
    use rstest::rstest;

    fn admin_state() -> TestState {
        TestState::default().with_capabilities(admin_capabilities())
    }

    #[rstest]
    #[case("{\"name\": ", ContentType::json())]
    #[case("[1, 2, 3]", ContentType::json())]
    #[case("{\"name\": \"Ruth\"}", ContentType::plaintext())]
    #[actix_web::test]
    async fn malformed_bodies_use_the_error_envelope(
        #[case] body: &'static str,
        #[case] content_type: ContentType,
    ) {
        let (status, value) = call_api(
            admin_state(),
            Some(ProfileId::random()),
            configure,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/care-recipients")
                .insert_header(content_type)
                .set_payload(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["code"], "invalid_body");
    }

    #[actix_web::test]
    async fn oversized_bodies_are_rejected() {
        let notes = "x".repeat(JSON_LIMIT_BYTES);
        let (status, value) = call_api(
            admin_state(),
            Some(ProfileId::random()),
            configure,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/care-recipients")
                .set_json(json!({ "name": "Ruth", "notes": notes })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "request body is too large");
    }

    #[rstest]
    #[case("/api/v1/caregivers/me/overview")]
    #[case("/api/v1/admin/caregivers")]
    #[case("/api/v1/admin/appointments")]
    #[case("/api/v1/me")]
    #[actix_web::test]
    async fn protected_routes_reject_anonymous_callers(#[case] uri: &str) {
        let (status, value) = call_api(
            TestState::default(),
            None,
            configure,
            actix_test::TestRequest::get().uri(uri),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(value["code"], "unauthorized");
    }
}
