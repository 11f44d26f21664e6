//! Caregiver daily overview.
//!
//! ```text
//! GET /api/v1/caregivers/me/overview?date=2024-06-05&appointmentLimit=3
//! ```
//!
//! `date` is the caller's local date; when omitted the server's local date is
//! used. The view is recomputed on every request.

use actix_web::{HttpResponse, get, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ports::DailyOverviewRequest;
use crate::domain::{DailyOverview, DoseItem, MedicationItem, ScheduleItem, TaskItem};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{
    AppointmentResponse, CareRecipientResponse, DailyLogResponse, MedicationResponse,
    MedicationScheduleResponse, ScheduleResponse, TaskResponse,
};
use crate::inbound::http::guards::CaregiverActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, parse_optional_date};

const APPOINTMENT_LIMIT: FieldName = FieldName::new("appointmentLimit");

fn parse_appointment_limit(raw: Option<&str>) -> Result<Option<usize>, crate::domain::Error> {
    raw.map(|value| {
        value
            .parse::<usize>()
            .map_err(|_| invalid_value_error(APPOINTMENT_LIMIT, value, "must be a non-negative integer"))
    })
    .transpose()
}

/// Query parameters of the overview endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OverviewQuery {
    /// Local date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Cap on the number of upcoming appointments returned.
    #[param(value_type = Option<u32>)]
    pub appointment_limit: Option<String>,
}

/// A task with the acting caregiver's log for the date.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskItemResponse {
    /// Task definition.
    pub task: TaskResponse,
    /// Log for (task, caregiver, date).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<DailyLogResponse>,
}

/// A schedule active on the date.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemResponse {
    /// Shift definition.
    pub schedule: ScheduleResponse,
    /// Recipient served.
    pub care_recipient: CareRecipientResponse,
    /// Tasks ordered by due time, untimed last.
    pub tasks: Vec<TaskItemResponse>,
}

/// A dose due on the date with its shared log.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoseItemResponse {
    /// Dosing time.
    pub schedule: MedicationScheduleResponse,
    /// Log for (medication schedule, date), written by any caregiver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<DailyLogResponse>,
}

/// An active medication with the doses due on the date.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationItemResponse {
    /// Medication definition.
    pub medication: MedicationResponse,
    /// Doses ordered by time of day.
    pub doses: Vec<DoseItemResponse>,
}

/// Daily overview of a caregiver.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    /// Caregiver the view belongs to.
    #[schema(format = Uuid)]
    pub caregiver_id: String,
    /// Date the view was computed for.
    pub date: NaiveDate,
    /// `0 = Sunday` through `6 = Saturday`.
    pub day_of_week: u8,
    /// Recipients served on the date, in schedule order.
    pub recipients: Vec<CareRecipientResponse>,
    /// Schedules ordered by start time.
    pub schedules: Vec<ScheduleItemResponse>,
    /// Medications with at least one dose due.
    pub medications: Vec<MedicationItemResponse>,
    /// Upcoming scheduled appointments ordered by date then time.
    pub appointments: Vec<AppointmentResponse>,
}

impl From<&TaskItem> for TaskItemResponse {
    fn from(item: &TaskItem) -> Self {
        Self {
            task: TaskResponse::from(&item.task),
            log: item.log.as_ref().map(DailyLogResponse::from),
        }
    }
}

impl From<&ScheduleItem> for ScheduleItemResponse {
    fn from(item: &ScheduleItem) -> Self {
        Self {
            schedule: ScheduleResponse::from(&item.schedule),
            care_recipient: CareRecipientResponse::from(&item.care_recipient),
            tasks: item.tasks.iter().map(TaskItemResponse::from).collect(),
        }
    }
}

impl From<&DoseItem> for DoseItemResponse {
    fn from(item: &DoseItem) -> Self {
        Self {
            schedule: MedicationScheduleResponse::from(&item.schedule),
            log: item.log.as_ref().map(DailyLogResponse::from),
        }
    }
}

impl From<&MedicationItem> for MedicationItemResponse {
    fn from(item: &MedicationItem) -> Self {
        Self {
            medication: MedicationResponse::from(&item.medication),
            doses: item.doses.iter().map(DoseItemResponse::from).collect(),
        }
    }
}

impl From<&DailyOverview> for OverviewResponse {
    fn from(overview: &DailyOverview) -> Self {
        Self {
            caregiver_id: overview.caregiver_id.to_string(),
            date: overview.date,
            day_of_week: overview.day_of_week.value(),
            recipients: overview
                .recipients()
                .into_iter()
                .map(CareRecipientResponse::from)
                .collect(),
            schedules: overview
                .schedules
                .iter()
                .map(ScheduleItemResponse::from)
                .collect(),
            medications: overview
                .medications
                .iter()
                .map(MedicationItemResponse::from)
                .collect(),
            appointments: overview
                .appointments
                .iter()
                .map(AppointmentResponse::from)
                .collect(),
        }
    }
}

/// Today's schedules, tasks, doses and upcoming appointments for the acting
/// caregiver.
#[utoipa::path(
    get,
    path = "/api/v1/caregivers/me/overview",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Daily overview", body = OverviewResponse),
        (status = 400, description = "Malformed date", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a caregiver", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["caregiver"],
    operation_id = "dailyOverview"
)]
#[get("/caregivers/me/overview")]
pub async fn daily_overview(
    state: web::Data<HttpState>,
    actor: CaregiverActor,
    query: web::Query<OverviewQuery>,
) -> ApiResult<HttpResponse> {
    let OverviewQuery {
        date,
        appointment_limit,
    } = query.into_inner();
    let date = parse_optional_date(date.as_deref(), FieldName::new("date"))?
        .unwrap_or_else(|| state.clock.local().date_naive());
    let appointment_limit = parse_appointment_limit(appointment_limit.as_deref())?;
    let overview = state
        .overview
        .overview(DailyOverviewRequest {
            caregiver_id: actor.caregiver_id,
            date,
            appointment_limit,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(OverviewResponse::from(&overview)))
}
