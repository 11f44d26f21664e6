//! Schedules, tasks, medications and dosing times.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ActiveFlagRequest, optional_text};
use crate::domain::ports::{
    CreateMedicationRequest, CreateMedicationScheduleRequest, CreateSchedulesRequest,
    CreateTaskRequest, ScheduleDayOutcome,
};
use crate::domain::{
    CareRecipientId, CaregiverId, DayOfWeek, Error, Frequency, MedicationId,
    MedicationScheduleId, ScheduleId, TaskId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    MedicationResponse, MedicationScheduleResponse, ScheduleResponse, TaskResponse,
};
use crate::inbound::http::error::redact_if_internal;
use crate::inbound::http::guards::AdminActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_day_of_week, parse_id, parse_wall_time, require,
    require_present,
};

/// Body of `POST /admin/schedules`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSchedulesBody {
    /// Recipient receiving care.
    #[schema(format = Uuid)]
    pub care_recipient_id: Option<String>,
    /// Assigned caregiver.
    #[schema(format = Uuid)]
    pub caregiver_id: Option<String>,
    /// Days to schedule, `0 = Sunday`; one schedule is created per day.
    #[schema(example = json!([1, 3, 5]))]
    pub days_of_week: Option<Vec<i64>>,
    /// Shift start, `HH:MM` or `HH:MM:SS`.
    pub start_time: Option<String>,
    /// Shift end; may be earlier than the start for overnight shifts.
    pub end_time: Option<String>,
}

/// A day whose schedule could not be stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedScheduleDay {
    /// Day that failed.
    pub day_of_week: u8,
    /// Why it failed.
    #[schema(value_type = ErrorSchema)]
    pub error: Error,
}

/// Per-day outcome of a multi-day schedule request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulesResponse {
    /// Schedules stored.
    pub created: Vec<ScheduleResponse>,
    /// Days that failed; earlier successes are kept.
    pub failed: Vec<FailedScheduleDay>,
}

impl From<Vec<ScheduleDayOutcome>> for CreateSchedulesResponse {
    fn from(outcomes: Vec<ScheduleDayOutcome>) -> Self {
        let mut created = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                ScheduleDayOutcome::Created(schedule) => {
                    created.push(ScheduleResponse::from(&schedule));
                }
                ScheduleDayOutcome::Failed { day_of_week, error } => {
                    failed.push(FailedScheduleDay {
                        day_of_week: day_of_week.value(),
                        error: redact_if_internal(&error),
                    });
                }
            }
        }
        Self { created, failed }
    }
}

/// Body of `POST /admin/schedules/{id}/tasks`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskBody {
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Due time, `HH:MM` or `HH:MM:SS`.
    pub due_time: Option<String>,
    /// Position among untimed tasks.
    pub sort_order: Option<i32>,
}

/// Body of `POST /admin/medications`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMedicationBody {
    /// Recipient taking the medication.
    #[schema(format = Uuid)]
    pub care_recipient_id: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Dosage.
    pub dosage: Option<String>,
    /// Instructions.
    pub instructions: Option<String>,
}

/// Body of `POST /admin/medications/{id}/schedules`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMedicationScheduleBody {
    /// Time of day.
    pub time_of_day: Option<String>,
    /// `daily` or `weekly`.
    pub frequency: Option<String>,
    /// Required for weekly doses; ignored for daily ones.
    pub day_of_week: Option<i64>,
}

fn parse_days(raw: Option<Vec<i64>>) -> Result<Vec<DayOfWeek>, Error> {
    let field = FieldName::new("daysOfWeek");
    let raw = require(raw, field)?;
    raw.into_iter()
        .map(|day| parse_day_of_week(day, field))
        .collect()
}

fn parse_frequency(raw: Option<String>) -> Result<Frequency, Error> {
    let field = FieldName::new("frequency");
    let raw = require_present(raw, field)?;
    Frequency::from_str(raw.trim()).map_err(|err| invalid_value_error(field, &raw, &err.to_string()))
}

/// Schedule a caregiver on one or more weekdays.
///
/// Each day is stored independently. The response is `201` when every day
/// was stored and `200` with the failed days listed otherwise.
#[utoipa::path(
    post,
    path = "/api/v1/admin/schedules",
    request_body = CreateSchedulesBody,
    responses(
        (status = 201, description = "Every day stored", body = CreateSchedulesResponse),
        (status = 200, description = "Some days failed", body = CreateSchedulesResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createSchedules"
)]
#[post("/admin/schedules")]
pub async fn create_schedules(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<CreateSchedulesBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let care_recipient_id = require(body.care_recipient_id, FieldName::new("careRecipientId"))?;
    let caregiver_id = require(body.caregiver_id, FieldName::new("caregiverId"))?;
    let start_time = require(body.start_time, FieldName::new("startTime"))?;
    let end_time = require(body.end_time, FieldName::new("endTime"))?;
    let request = CreateSchedulesRequest {
        care_recipient_id: parse_id::<CareRecipientId>(
            &care_recipient_id,
            FieldName::new("careRecipientId"),
        )?,
        caregiver_id: parse_id::<CaregiverId>(&caregiver_id, FieldName::new("caregiverId"))?,
        days: parse_days(body.days_of_week)?,
        start_time: parse_wall_time(&start_time, FieldName::new("startTime"))?,
        end_time: parse_wall_time(&end_time, FieldName::new("endTime"))?,
    };
    let outcomes = state.care_plan.create_schedules(request).await?;
    let response = CreateSchedulesResponse::from(outcomes);
    if response.failed.is_empty() {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

/// Delete a schedule and its tasks.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/schedules/{id}",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteSchedule"
)]
#[delete("/admin/schedules/{id}")]
pub async fn delete_schedule(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ScheduleId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_plan.delete_schedule(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach a task to a schedule.
#[utoipa::path(
    post,
    path = "/api/v1/admin/schedules/{id}/tasks",
    params(("id" = String, Path, description = "Schedule identifier")),
    request_body = CreateTaskBody,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createTask"
)]
#[post("/admin/schedules/{id}/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
    payload: web::Json<CreateTaskBody>,
) -> ApiResult<HttpResponse> {
    let schedule_id: ScheduleId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();
    let request = CreateTaskRequest {
        schedule_id,
        title: require_present(body.title, FieldName::new("title"))?,
        description: optional_text(body.description),
        due_time: optional_text(body.due_time)
            .map(|raw| parse_wall_time(&raw, FieldName::new("dueTime")))
            .transpose()?,
        sort_order: body.sort_order.unwrap_or_default(),
    };
    let task = state.care_plan.create_task(request).await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(&task)))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown task", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteTask"
)]
#[delete("/admin/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: TaskId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_plan.delete_task(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a medication for a care recipient.
#[utoipa::path(
    post,
    path = "/api/v1/admin/medications",
    request_body = CreateMedicationBody,
    responses(
        (status = 201, description = "Medication created", body = MedicationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown care recipient", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createMedication"
)]
#[post("/admin/medications")]
pub async fn create_medication(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<CreateMedicationBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let care_recipient_id = require(body.care_recipient_id, FieldName::new("careRecipientId"))?;
    let request = CreateMedicationRequest {
        care_recipient_id: parse_id(&care_recipient_id, FieldName::new("careRecipientId"))?,
        name: require_present(body.name, FieldName::new("name"))?,
        dosage: require_present(body.dosage, FieldName::new("dosage"))?,
        instructions: optional_text(body.instructions),
    };
    let medication = state.care_plan.create_medication(request).await?;
    Ok(HttpResponse::Created().json(MedicationResponse::from(&medication)))
}

/// Activate or deactivate a medication.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/medications/{id}",
    params(("id" = String, Path, description = "Medication identifier")),
    request_body = ActiveFlagRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown medication", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setMedicationActive"
)]
#[patch("/admin/medications/{id}")]
pub async fn set_medication_active(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
    payload: web::Json<ActiveFlagRequest>,
) -> ApiResult<HttpResponse> {
    let id: MedicationId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let is_active = payload.into_inner().into_flag()?;
    state.care_plan.set_medication_active(&id, is_active).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a medication and its dosing times.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/medications/{id}",
    params(("id" = String, Path, description = "Medication identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown medication", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteMedication"
)]
#[delete("/admin/medications/{id}")]
pub async fn delete_medication(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: MedicationId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_plan.delete_medication(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a dosing time to a medication.
#[utoipa::path(
    post,
    path = "/api/v1/admin/medications/{id}/schedules",
    params(("id" = String, Path, description = "Medication identifier")),
    request_body = CreateMedicationScheduleBody,
    responses(
        (status = 201, description = "Dosing time created", body = MedicationScheduleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown medication", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createMedicationSchedule"
)]
#[post("/admin/medications/{id}/schedules")]
pub async fn create_medication_schedule(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
    payload: web::Json<CreateMedicationScheduleBody>,
) -> ApiResult<HttpResponse> {
    let medication_id: MedicationId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let body = payload.into_inner();
    let time_of_day = require(body.time_of_day, FieldName::new("timeOfDay"))?;
    let request = CreateMedicationScheduleRequest {
        medication_id,
        time_of_day: parse_wall_time(&time_of_day, FieldName::new("timeOfDay"))?,
        frequency: parse_frequency(body.frequency)?,
        day_of_week: body
            .day_of_week
            .map(|day| parse_day_of_week(day, FieldName::new("dayOfWeek")))
            .transpose()?,
    };
    let schedule = state.care_plan.create_medication_schedule(request).await?;
    Ok(HttpResponse::Created().json(MedicationScheduleResponse::from(&schedule)))
}

/// Delete a dosing time.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/medication-schedules/{id}",
    params(("id" = String, Path, description = "Medication schedule identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown dosing time", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteMedicationSchedule"
)]
#[delete("/admin/medication-schedules/{id}")]
pub async fn delete_medication_schedule(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: MedicationScheduleId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_plan.delete_medication_schedule(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCarePlanCommand;
    use crate::domain::{Medication, MedicationSchedule, ProfileId, Schedule, Task};
    use crate::inbound::http::test_utils::{TestState, admin_capabilities, call_api};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(create_schedules)
            .service(delete_schedule)
            .service(create_task)
            .service(delete_task)
            .service(create_medication)
            .service(set_medication_active)
            .service(delete_medication)
            .service(create_medication_schedule)
            .service(delete_medication_schedule);
    }

    fn admin_state() -> TestState {
        TestState::default().with_capabilities(admin_capabilities())
    }

    fn schedule_for(request: &CreateSchedulesRequest, day: DayOfWeek) -> Schedule {
        Schedule {
            id: ScheduleId::random(),
            care_recipient_id: request.care_recipient_id,
            caregiver_id: request.caregiver_id,
            day_of_week: day,
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
        }
    }

    fn schedules_body(days: Value) -> Value {
        json!({
            "careRecipientId": CareRecipientId::random().to_string(),
            "caregiverId": CaregiverId::random().to_string(),
            "daysOfWeek": days,
            "startTime": "22:00",
            "endTime": "06:00",
        })
    }

    async fn post_schedules(state: TestState, body: Value) -> (StatusCode, Value) {
        call_api(
            state,
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/schedules")
                .set_json(body),
        )
        .await
    }

    #[actix_web::test]
    async fn every_day_stored_is_created() {
        let mut care_plan = MockCarePlanCommand::new();
        care_plan
            .expect_create_schedules()
            .withf(|request| request.days.len() == 2 && request.start_time.as_str() == "22:00")
            .times(1)
            .returning(|request| {
                Ok(request
                    .days
                    .iter()
                    .map(|day| ScheduleDayOutcome::Created(schedule_for(&request, *day)))
                    .collect())
            });

        let (status, body) =
            post_schedules(admin_state().with_care_plan(care_plan), schedules_body(json!([1, 3])))
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["created"][1]["dayOfWeek"], 3);
        assert_eq!(body["failed"], json!([]));
    }

    #[actix_web::test]
    async fn partial_failures_are_reported_per_day() {
        let mut care_plan = MockCarePlanCommand::new();
        care_plan.expect_create_schedules().returning(|request| {
            Ok(request
                .days
                .iter()
                .map(|day| {
                    if day.value() == 5 {
                        ScheduleDayOutcome::Failed {
                            day_of_week: *day,
                            error: Error::internal("duplicate key value violates constraint"),
                        }
                    } else {
                        ScheduleDayOutcome::Created(schedule_for(&request, *day))
                    }
                })
                .collect())
        });

        let (status, body) = post_schedules(
            admin_state().with_care_plan(care_plan),
            schedules_body(json!([1, 5])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"][0]["dayOfWeek"], 1);
        assert_eq!(body["failed"][0]["dayOfWeek"], 5);
        assert_eq!(body["failed"][0]["error"]["code"], "internal_error");
        assert_eq!(
            body["failed"][0]["error"]["message"], "Internal server error",
            "store details stay server-side"
        );
    }

    #[rstest]
    #[case(json!([7]), "daysOfWeek", "invalid_day_of_week")]
    #[case(json!([-1]), "daysOfWeek", "invalid_day_of_week")]
    #[case(Value::Null, "daysOfWeek", "missing_field")]
    #[actix_web::test]
    async fn schedule_days_are_validated(
        #[case] days: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = post_schedules(admin_state(), schedules_body(days)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn malformed_times_are_rejected() {
        let mut body = schedules_body(json!([1]));
        body["startTime"] = json!("8:00");
        let (status, value) = post_schedules(admin_state(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "startTime");
        assert_eq!(value["details"]["code"], "invalid_time");
    }

    #[actix_web::test]
    async fn tasks_are_attached_to_the_schedule_in_the_path() {
        let schedule_id = ScheduleId::random();
        let mut care_plan = MockCarePlanCommand::new();
        care_plan
            .expect_create_task()
            .withf(move |request| {
                request.schedule_id == schedule_id
                    && request.title == "Lunch"
                    && request.due_time.as_ref().map(|time| time.as_str()) == Some("12:30")
                    && request.sort_order == 0
            })
            .times(1)
            .returning(|request| {
                Ok(Task {
                    id: TaskId::random(),
                    schedule_id: request.schedule_id,
                    title: request.title,
                    description: request.description,
                    due_time: request.due_time,
                    sort_order: request.sort_order,
                })
            });

        let (status, body) = call_api(
            admin_state().with_care_plan(care_plan),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/admin/schedules/{schedule_id}/tasks"))
                .set_json(json!({ "title": "Lunch", "dueTime": "12:30" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["scheduleId"], schedule_id.to_string());
        assert_eq!(body["dueTime"], "12:30");
    }

    #[actix_web::test]
    async fn medications_need_a_dosage() {
        let (status, body) = call_api(
            admin_state(),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/medications")
                .set_json(json!({
                    "careRecipientId": CareRecipientId::random().to_string(),
                    "name": "Metformin",
                })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "dosage");
    }

    #[actix_web::test]
    async fn medications_are_created() {
        let mut care_plan = MockCarePlanCommand::new();
        care_plan
            .expect_create_medication()
            .times(1)
            .returning(|request| {
                Ok(Medication {
                    id: MedicationId::random(),
                    care_recipient_id: request.care_recipient_id,
                    name: request.name,
                    dosage: request.dosage,
                    instructions: request.instructions,
                    is_active: true,
                })
            });

        let (status, body) = call_api(
            admin_state().with_care_plan(care_plan),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri("/api/v1/admin/medications")
                .set_json(json!({
                    "careRecipientId": CareRecipientId::random().to_string(),
                    "name": "Metformin",
                    "dosage": "500 mg",
                    "instructions": "with food",
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["isActive"], true);
        assert_eq!(body["instructions"], "with food");
    }

    #[rstest]
    #[case(json!({ "timeOfDay": "08:00", "frequency": "hourly" }), "frequency", "invalid_value")]
    #[case(json!({ "timeOfDay": "08:00" }), "frequency", "missing_field")]
    #[case(json!({ "frequency": "daily" }), "timeOfDay", "missing_field")]
    #[case(
        json!({ "timeOfDay": "08:00", "frequency": "weekly", "dayOfWeek": 9 }),
        "dayOfWeek",
        "invalid_day_of_week"
    )]
    #[actix_web::test]
    async fn dosing_times_are_validated(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = call_api(
            admin_state(),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/admin/medications/{}/schedules", MedicationId::random()))
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn weekly_dosing_times_carry_their_day() {
        let medication_id = MedicationId::random();
        let mut care_plan = MockCarePlanCommand::new();
        care_plan
            .expect_create_medication_schedule()
            .withf(move |request| {
                request.medication_id == medication_id
                    && request.frequency == Frequency::Weekly
                    && request.day_of_week.map(DayOfWeek::value) == Some(2)
            })
            .times(1)
            .returning(|request| {
                Ok(MedicationSchedule {
                    id: MedicationScheduleId::random(),
                    medication_id: request.medication_id,
                    time_of_day: request.time_of_day,
                    frequency: request.frequency,
                    day_of_week: request.day_of_week,
                })
            });

        let (status, body) = call_api(
            admin_state().with_care_plan(care_plan),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/admin/medications/{medication_id}/schedules"))
                .set_json(json!({ "timeOfDay": "20:00", "frequency": "weekly", "dayOfWeek": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["dayOfWeek"], 2);
        assert_eq!(body["frequency"], "weekly");
    }

    #[actix_web::test]
    async fn deleting_a_missing_task_is_not_found() {
        let mut care_plan = MockCarePlanCommand::new();
        care_plan
            .expect_delete_task()
            .returning(|_| Err(Error::not_found("task not found")));

        let (status, body) = call_api(
            admin_state().with_care_plan(care_plan),
            Some(ProfileId::random()),
            routes,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/tasks/{}", TaskId::random())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
