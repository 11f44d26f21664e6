//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound HTTP adapter, the
//! error envelope ([`ErrorSchema`], [`ErrorCodeSchema`]) and the session
//! cookie security scheme. Request and response bodies reachable from a path
//! are collected automatically. Swagger UI serves the document in debug
//! builds.

use crate::domain::{DispatchReport, PushPayload, UserDispatchResult};
use crate::inbound::http::dto::{
    AppointmentResponse, CapabilitiesResponse, CareRecipientResponse, CaregiverResponse,
    DailyLogResponse, MedicationResponse, MedicationScheduleResponse, ProfileResponse,
    ScheduleResponse, TaskResponse,
};
use crate::inbound::http::overview::OverviewResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::{admin, guest, health, logs, overview, push_subscriptions, users};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/login or POST /api/v1/guest/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CareLink API",
        description = "Care coordination: daily schedules, medication and task logging, \
                       appointments and push notifications for caregivers and admins."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        users::login,
        users::logout,
        users::current_account,
        guest::guest_login,
        guest::guest_logout,
        guest::guest_session,
        overview::daily_overview,
        logs::set_task_log,
        logs::clear_task_log,
        logs::set_dose_log,
        logs::clear_dose_log,
        push_subscriptions::subscribe,
        push_subscriptions::unsubscribe,
        admin::list_care_recipients,
        admin::create_care_recipient,
        admin::delete_care_recipient,
        admin::list_caregivers,
        admin::create_caregiver,
        admin::set_caregiver_active,
        admin::delete_caregiver,
        admin::regenerate_access_code,
        admin::create_schedules,
        admin::delete_schedule,
        admin::create_task,
        admin::delete_task,
        admin::create_medication,
        admin::set_medication_active,
        admin::delete_medication,
        admin::create_medication_schedule,
        admin::delete_medication_schedule,
        admin::list_appointments,
        admin::create_appointment,
        admin::set_appointment_status,
        admin::delete_appointment,
        admin::broadcast_notification,
        health::ready,
        health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProfileResponse,
        CapabilitiesResponse,
        CareRecipientResponse,
        CaregiverResponse,
        ScheduleResponse,
        TaskResponse,
        MedicationResponse,
        MedicationScheduleResponse,
        AppointmentResponse,
        DailyLogResponse,
        OverviewResponse,
        PushPayload,
        DispatchReport,
        UserDispatchResult,
    )),
    tags(
        (name = "session", description = "Account and access-code sessions"),
        (name = "caregiver", description = "Daily overview and task or dose logging"),
        (name = "admin", description = "Care team, care plan and appointment administration"),
        (name = "notifications", description = "Push subscriptions and broadcasts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
