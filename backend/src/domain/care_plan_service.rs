//! Administration of schedules, tasks, medications and dosing times.
//!
//! Creating schedules for several weekdays issues one independent insert per
//! day. A failed day is reported alongside the days that succeeded; nothing
//! is rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::error_mapping::{map_medication_error, map_schedule_error};
use crate::domain::ports::{
    CarePlanCommand, CreateMedicationRequest, CreateMedicationScheduleRequest,
    CreateSchedulesRequest, CreateTaskRequest, MedicationRepository, ScheduleDayOutcome,
    ScheduleRepository,
};
use crate::domain::validation::{optional_text, require_text};
use crate::domain::{
    Error, Frequency, Medication, MedicationId, MedicationSchedule, MedicationScheduleId,
    Schedule, ScheduleId, Task, TaskId,
};

/// Service implementing [`CarePlanCommand`].
#[derive(Clone)]
pub struct CarePlanService<S, M> {
    schedules: Arc<S>,
    medications: Arc<M>,
}

impl<S, M> CarePlanService<S, M> {
    /// Create the service from its repositories.
    pub fn new(schedules: Arc<S>, medications: Arc<M>) -> Self {
        Self {
            schedules,
            medications,
        }
    }
}

fn invalid_field(field: &'static str, code: &'static str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn missing(found: bool, what: &str) -> Result<(), Error> {
    if found {
        Ok(())
    } else {
        Err(Error::not_found(format!("{what} not found")))
    }
}

#[async_trait]
impl<S, M> CarePlanCommand for CarePlanService<S, M>
where
    S: ScheduleRepository,
    M: MedicationRepository,
{
    async fn create_schedules(
        &self,
        request: CreateSchedulesRequest,
    ) -> Result<Vec<ScheduleDayOutcome>, Error> {
        if request.days.is_empty() {
            return Err(invalid_field(
                "daysOfWeek",
                "missing_field",
                "at least one day of week is required",
            ));
        }

        let mut days = request.days.clone();
        days.sort();
        days.dedup();

        let mut outcomes = Vec::with_capacity(days.len());
        for day_of_week in days {
            let schedule = Schedule {
                id: ScheduleId::random(),
                care_recipient_id: request.care_recipient_id,
                caregiver_id: request.caregiver_id,
                day_of_week,
                start_time: request.start_time.clone(),
                end_time: request.end_time.clone(),
            };
            match self.schedules.create(&schedule).await {
                Ok(()) => outcomes.push(ScheduleDayOutcome::Created(schedule)),
                Err(err) => {
                    warn!(day = day_of_week.value(), error = %err, "schedule insert failed");
                    outcomes.push(ScheduleDayOutcome::Failed {
                        day_of_week,
                        error: map_schedule_error(err),
                    });
                }
            }
        }
        info!(
            caregiver_id = %request.caregiver_id,
            created = outcomes
                .iter()
                .filter(|o| matches!(o, ScheduleDayOutcome::Created(_)))
                .count(),
            requested = outcomes.len(),
            "schedules created"
        );
        Ok(outcomes)
    }

    async fn delete_schedule(&self, id: &ScheduleId) -> Result<(), Error> {
        let found = self
            .schedules
            .delete(id)
            .await
            .map_err(map_schedule_error)?;
        missing(found, "schedule")
    }

    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error> {
        let task = Task {
            id: TaskId::random(),
            schedule_id: request.schedule_id,
            title: require_text("title", &request.title)?,
            description: optional_text(request.description),
            due_time: request.due_time,
            sort_order: request.sort_order,
        };
        self.schedules
            .create_task(&task)
            .await
            .map_err(map_schedule_error)?;
        Ok(task)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Error> {
        let found = self
            .schedules
            .delete_task(id)
            .await
            .map_err(map_schedule_error)?;
        missing(found, "task")
    }

    async fn create_medication(
        &self,
        request: CreateMedicationRequest,
    ) -> Result<Medication, Error> {
        let medication = Medication {
            id: MedicationId::random(),
            care_recipient_id: request.care_recipient_id,
            name: require_text("name", &request.name)?,
            dosage: require_text("dosage", &request.dosage)?,
            instructions: optional_text(request.instructions),
            is_active: true,
        };
        self.medications
            .create(&medication)
            .await
            .map_err(map_medication_error)?;
        info!(medication_id = %medication.id, "medication created");
        Ok(medication)
    }

    async fn set_medication_active(
        &self,
        id: &MedicationId,
        is_active: bool,
    ) -> Result<(), Error> {
        let found = self
            .medications
            .set_active(id, is_active)
            .await
            .map_err(map_medication_error)?;
        missing(found, "medication")
    }

    async fn delete_medication(&self, id: &MedicationId) -> Result<(), Error> {
        let found = self
            .medications
            .delete(id)
            .await
            .map_err(map_medication_error)?;
        missing(found, "medication")
    }

    async fn create_medication_schedule(
        &self,
        request: CreateMedicationScheduleRequest,
    ) -> Result<MedicationSchedule, Error> {
        let day_of_week = match (request.frequency, request.day_of_week) {
            (Frequency::Weekly, None) => {
                return Err(invalid_field(
                    "dayOfWeek",
                    "missing_field",
                    "weekly doses require a day of week",
                ));
            }
            (Frequency::Weekly, day) => day,
            (Frequency::Daily, _) => None,
        };
        let schedule = MedicationSchedule {
            id: MedicationScheduleId::random(),
            medication_id: request.medication_id,
            time_of_day: request.time_of_day,
            frequency: request.frequency,
            day_of_week,
        };
        self.medications
            .create_schedule(&schedule)
            .await
            .map_err(map_medication_error)?;
        Ok(schedule)
    }

    async fn delete_medication_schedule(&self, id: &MedicationScheduleId) -> Result<(), Error> {
        let found = self
            .medications
            .delete_schedule(id)
            .await
            .map_err(map_medication_error)?;
        missing(found, "medication schedule")
    }
}
