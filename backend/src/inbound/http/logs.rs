//! Daily log endpoints for tasks and medication doses.
//!
//! ```text
//! PUT    /api/v1/tasks/{taskId}/logs/{date}
//! DELETE /api/v1/tasks/{taskId}/logs/{date}
//! PUT    /api/v1/medication-schedules/{scheduleId}/logs/{date}
//! DELETE /api/v1/medication-schedules/{scheduleId}/logs/{date}
//! ```
//!
//! `PUT` bodies carry `{"status": "completed", "notes": "..."}`. Task logs
//! are kept per caregiver; dose logs are shared, so the last caregiver to
//! write wins. Clearing a log that does not exist succeeds.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, put, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::SetLogStatusRequest;
use crate::domain::{DailyLogStatus, Error, LogItem, MedicationScheduleId, TaskId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::DailyLogResponse;
use crate::inbound::http::guards::CaregiverActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_date, parse_id, require_present,
};

const STATUS: FieldName = FieldName::new("status");
const DATE: FieldName = FieldName::new("date");

/// Body of a log `PUT`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LogStatusRequest {
    /// `completed|skipped|unable` for tasks, `given|skipped|refused` for doses.
    #[schema(example = "completed")]
    pub status: Option<String>,
    /// Free-text notes; blank notes are dropped.
    pub notes: Option<String>,
}

fn parse_status(raw: Option<String>) -> Result<DailyLogStatus, Error> {
    let raw = require_present(raw, STATUS)?;
    DailyLogStatus::from_str(raw.trim())
        .map_err(|err| invalid_value_error(STATUS, &raw, &err.to_string()))
}

async fn record(
    state: &HttpState,
    actor: &CaregiverActor,
    item: LogItem,
    date: &str,
    body: LogStatusRequest,
) -> ApiResult<HttpResponse> {
    let date = parse_date(date, DATE)?;
    let status = parse_status(body.status)?;
    let entry = state
        .daily_logs
        .set_status(SetLogStatusRequest {
            item,
            caregiver_id: actor.caregiver_id,
            date,
            status,
            notes: body.notes,
        })
        .await?;
    Ok(HttpResponse::Ok().json(DailyLogResponse::from(&entry)))
}

async fn clear(
    state: &HttpState,
    actor: &CaregiverActor,
    item: LogItem,
    date: NaiveDate,
) -> ApiResult<HttpResponse> {
    state
        .daily_logs
        .clear_status(item, actor.caregiver_id, date)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record the acting caregiver's outcome for a task on a date.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{task_id}/logs/{date}",
    params(
        ("task_id" = String, Path, description = "Task identifier"),
        ("date" = String, Path, description = "Local date, YYYY-MM-DD")
    ),
    request_body = LogStatusRequest,
    responses(
        (status = 200, description = "Log recorded", body = DailyLogResponse),
        (status = 400, description = "Invalid status or path", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a caregiver", body = ErrorSchema)
    ),
    tags = ["caregiver"],
    operation_id = "setTaskLog"
)]
#[put("/tasks/{task_id}/logs/{date}")]
pub async fn set_task_log(
    state: web::Data<HttpState>,
    actor: CaregiverActor,
    path: web::Path<(String, String)>,
    payload: web::Json<LogStatusRequest>,
) -> ApiResult<HttpResponse> {
    let (task_id, date) = path.into_inner();
    let task_id: TaskId = parse_id(&task_id, FieldName::new("taskId"))?;
    record(&state, &actor, LogItem::Task(task_id), &date, payload.into_inner()).await
}

/// Remove the acting caregiver's log for a task on a date.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{task_id}/logs/{date}",
    params(
        ("task_id" = String, Path, description = "Task identifier"),
        ("date" = String, Path, description = "Local date, YYYY-MM-DD")
    ),
    responses(
        (status = 204, description = "Log cleared"),
        (status = 400, description = "Invalid path", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a caregiver", body = ErrorSchema)
    ),
    tags = ["caregiver"],
    operation_id = "clearTaskLog"
)]
#[delete("/tasks/{task_id}/logs/{date}")]
pub async fn clear_task_log(
    state: web::Data<HttpState>,
    actor: CaregiverActor,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (task_id, date) = path.into_inner();
    let task_id: TaskId = parse_id(&task_id, FieldName::new("taskId"))?;
    let date = parse_date(&date, DATE)?;
    clear(&state, &actor, LogItem::Task(task_id), date).await
}

/// Record the shared outcome of a medication dose on a date.
#[utoipa::path(
    put,
    path = "/api/v1/medication-schedules/{schedule_id}/logs/{date}",
    params(
        ("schedule_id" = String, Path, description = "Medication schedule identifier"),
        ("date" = String, Path, description = "Local date, YYYY-MM-DD")
    ),
    request_body = LogStatusRequest,
    responses(
        (status = 200, description = "Log recorded", body = DailyLogResponse),
        (status = 400, description = "Invalid status or path", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a caregiver", body = ErrorSchema)
    ),
    tags = ["caregiver"],
    operation_id = "setDoseLog"
)]
#[put("/medication-schedules/{schedule_id}/logs/{date}")]
pub async fn set_dose_log(
    state: web::Data<HttpState>,
    actor: CaregiverActor,
    path: web::Path<(String, String)>,
    payload: web::Json<LogStatusRequest>,
) -> ApiResult<HttpResponse> {
    let (schedule_id, date) = path.into_inner();
    let schedule_id: MedicationScheduleId =
        parse_id(&schedule_id, FieldName::new("scheduleId"))?;
    record(
        &state,
        &actor,
        LogItem::MedicationDose(schedule_id),
        &date,
        payload.into_inner(),
    )
    .await
}

/// Remove the shared log of a medication dose on a date.
#[utoipa::path(
    delete,
    path = "/api/v1/medication-schedules/{schedule_id}/logs/{date}",
    params(
        ("schedule_id" = String, Path, description = "Medication schedule identifier"),
        ("date" = String, Path, description = "Local date, YYYY-MM-DD")
    ),
    responses(
        (status = 204, description = "Log cleared"),
        (status = 400, description = "Invalid path", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a caregiver", body = ErrorSchema)
    ),
    tags = ["caregiver"],
    operation_id = "clearDoseLog"
)]
#[delete("/medication-schedules/{schedule_id}/logs/{date}")]
pub async fn clear_dose_log(
    state: web::Data<HttpState>,
    actor: CaregiverActor,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (schedule_id, date) = path.into_inner();
    let schedule_id: MedicationScheduleId =
        parse_id(&schedule_id, FieldName::new("scheduleId"))?;
    let date = parse_date(&date, DATE)?;
    clear(&state, &actor, LogItem::MedicationDose(schedule_id), date).await
}
