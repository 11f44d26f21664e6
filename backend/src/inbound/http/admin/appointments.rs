//! Appointments and push broadcasts.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::optional_text;
use crate::domain::ports::CreateAppointmentRequest;
use crate::domain::{
    AppointmentId, AppointmentStatus, CareRecipientId, CaregiverId, Error, ProfileId,
    PushPayload, UserDispatchResult,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::AppointmentResponse;
use crate::inbound::http::guards::AdminActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_date, parse_id, parse_optional_date,
    parse_optional_id, parse_wall_time, require, require_present,
};

/// Query of `GET /admin/appointments`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UpcomingAppointmentsQuery {
    /// Recipient whose appointments are listed.
    pub care_recipient_id: Option<String>,
    /// First date included, `YYYY-MM-DD`; defaults to the server's local date.
    pub from: Option<String>,
}

/// Body of `POST /admin/appointments`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAppointmentBody {
    /// Recipient attending.
    #[schema(format = Uuid)]
    pub care_recipient_id: Option<String>,
    /// Accompanying caregiver.
    #[schema(format = Uuid)]
    pub caregiver_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Time of day.
    pub time: Option<String>,
    /// Appointment type, e.g. `GP`.
    pub kind: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Body of `PATCH /admin/appointments/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentStatusBody {
    /// `scheduled`, `completed` or `cancelled`.
    pub status: Option<String>,
}

/// Body of `POST /admin/notifications`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BroadcastRequest {
    /// Profiles to notify.
    pub user_ids: Option<Vec<String>>,
    /// Notification content.
    pub notification: Option<PushPayload>,
}

/// Delivery report of a broadcast.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    /// One entry per requested profile, in request order.
    pub results: Vec<UserDispatchResult>,
}

fn parse_appointment_status(raw: Option<String>) -> Result<AppointmentStatus, Error> {
    let field = FieldName::new("status");
    let raw = require_present(raw, field)?;
    AppointmentStatus::from_str(raw.trim())
        .map_err(|err| invalid_value_error(field, &raw, &err.to_string()))
}

fn parse_payload(raw: Option<PushPayload>) -> Result<PushPayload, Error> {
    let payload = require(raw, FieldName::new("notification"))?;
    if payload.title.trim().is_empty() {
        return Err(invalid_value_error(
            FieldName::new("notification.title"),
            &payload.title,
            "must not be blank",
        ));
    }
    Ok(payload)
}

/// Upcoming scheduled appointments of a care recipient.
#[utoipa::path(
    get,
    path = "/api/v1/admin/appointments",
    params(UpcomingAppointmentsQuery),
    responses(
        (status = 200, description = "Appointments ordered by date then time", body = [AppointmentResponse]),
        (status = 400, description = "Invalid query", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listAppointments"
)]
#[get("/admin/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    query: web::Query<UpcomingAppointmentsQuery>,
) -> ApiResult<HttpResponse> {
    let UpcomingAppointmentsQuery {
        care_recipient_id,
        from,
    } = query.into_inner();
    let care_recipient_id = require(care_recipient_id, FieldName::new("careRecipientId"))?;
    let care_recipient_id: CareRecipientId =
        parse_id(&care_recipient_id, FieldName::new("careRecipientId"))?;
    let from = parse_optional_date(from.as_deref(), FieldName::new("from"))?
        .unwrap_or_else(|| state.clock.local().date_naive());
    let appointments = state
        .appointments
        .list_upcoming(&care_recipient_id, from)
        .await?;
    let body: Vec<_> = appointments.iter().map(AppointmentResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Book an appointment; an assigned caregiver with an account is notified.
#[utoipa::path(
    post,
    path = "/api/v1/admin/appointments",
    request_body = CreateAppointmentBody,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown recipient or caregiver", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createAppointment"
)]
#[post("/admin/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<CreateAppointmentBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let care_recipient_id = require(body.care_recipient_id, FieldName::new("careRecipientId"))?;
    let date = require(body.date, FieldName::new("date"))?;
    let time = require(body.time, FieldName::new("time"))?;
    let request = CreateAppointmentRequest {
        care_recipient_id: parse_id(&care_recipient_id, FieldName::new("careRecipientId"))?,
        caregiver_id: parse_optional_id::<CaregiverId>(
            optional_text(body.caregiver_id).as_deref(),
            FieldName::new("caregiverId"),
        )?,
        date: parse_date(&date, FieldName::new("date"))?,
        time: parse_wall_time(&time, FieldName::new("time"))?,
        kind: require_present(body.kind, FieldName::new("kind"))?,
        location: optional_text(body.location),
        notes: optional_text(body.notes),
    };
    let appointment = state.appointments.create_appointment(request).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(&appointment)))
}

/// Mark an appointment scheduled, completed or cancelled.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/appointments/{id}",
    params(("id" = String, Path, description = "Appointment identifier")),
    request_body = AppointmentStatusBody,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Unknown appointment", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setAppointmentStatus"
)]
#[patch("/admin/appointments/{id}")]
pub async fn set_appointment_status(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
    payload: web::Json<AppointmentStatusBody>,
) -> ApiResult<HttpResponse> {
    let id: AppointmentId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let status = parse_appointment_status(payload.into_inner().status)?;
    state.appointments.set_status(&id, status).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an appointment.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/appointments/{id}",
    params(("id" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown appointment", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteAppointment"
)]
#[delete("/admin/appointments/{id}")]
pub async fn delete_appointment(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: AppointmentId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.appointments.delete_appointment(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Push a notification to the listed profiles.
#[utoipa::path(
    post,
    path = "/api/v1/admin/notifications",
    request_body = BroadcastRequest,
    responses(
        (status = 200, description = "Per-profile delivery counts", body = BroadcastResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "broadcastNotification"
)]
#[post("/admin/notifications")]
pub async fn broadcast_notification(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<BroadcastRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let field = FieldName::new("userIds");
    let user_ids = require(body.user_ids, field)?
        .iter()
        .map(|raw| parse_id::<ProfileId>(raw, field))
        .collect::<Result<Vec<_>, _>>()?;
    let notification = parse_payload(body.notification)?;
    let results = state
        .notifications
        .send_to_users(&user_ids, &notification)
        .await?;
    Ok(HttpResponse::Ok().json(BroadcastResponse { results }))
}
