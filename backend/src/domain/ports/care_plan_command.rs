//! Driving port for administering schedules, tasks and medications.

use async_trait::async_trait;

use crate::domain::{
    CareRecipientId, CaregiverId, DayOfWeek, Error, Frequency, Medication, MedicationId,
    MedicationSchedule, MedicationScheduleId, Schedule, ScheduleId, Task, TaskId, WallTime,
};

/// Request to schedule a caregiver on one or more weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchedulesRequest {
    /// Recipient receiving care.
    pub care_recipient_id: CareRecipientId,
    /// Assigned caregiver.
    pub caregiver_id: CaregiverId,
    /// Days to create a schedule for; one independent insert each.
    pub days: Vec<DayOfWeek>,
    /// Shift start.
    pub start_time: WallTime,
    /// Shift end.
    pub end_time: WallTime,
}

/// Result of creating the schedule for one day.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleDayOutcome {
    /// The schedule was stored.
    Created(Schedule),
    /// The insert for this day failed; other days are unaffected.
    Failed {
        /// Day that failed.
        day_of_week: DayOfWeek,
        /// Why it failed.
        error: Error,
    },
}

/// Request to attach a task to a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    /// Owning schedule.
    pub schedule_id: ScheduleId,
    /// Task title, non-empty.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due time.
    pub due_time: Option<WallTime>,
    /// Position among untimed tasks.
    pub sort_order: i32,
}

/// Request to add a medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMedicationRequest {
    /// Recipient taking the medication.
    pub care_recipient_id: CareRecipientId,
    /// Medication name, non-empty.
    pub name: String,
    /// Dosage, non-empty.
    pub dosage: String,
    /// Administration instructions.
    pub instructions: Option<String>,
}

/// Request to add a dosing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMedicationScheduleRequest {
    /// Medication being dosed.
    pub medication_id: MedicationId,
    /// Time of day.
    pub time_of_day: WallTime,
    /// Recurrence.
    pub frequency: Frequency,
    /// Day for weekly doses.
    pub day_of_week: Option<DayOfWeek>,
}

/// Admin operations on care plans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarePlanCommand: Send + Sync {
    /// Create one schedule per requested day, reporting each day separately.
    async fn create_schedules(
        &self,
        request: CreateSchedulesRequest,
    ) -> Result<Vec<ScheduleDayOutcome>, Error>;

    /// Remove a schedule.
    async fn delete_schedule(&self, id: &ScheduleId) -> Result<(), Error>;

    /// Attach a task to a schedule.
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error>;

    /// Remove a task.
    async fn delete_task(&self, id: &TaskId) -> Result<(), Error>;

    /// Add a medication.
    async fn create_medication(&self, request: CreateMedicationRequest)
    -> Result<Medication, Error>;

    /// Activate or deactivate a medication.
    async fn set_medication_active(&self, id: &MedicationId, is_active: bool)
    -> Result<(), Error>;

    /// Remove a medication.
    async fn delete_medication(&self, id: &MedicationId) -> Result<(), Error>;

    /// Add a dosing time.
    async fn create_medication_schedule(
        &self,
        request: CreateMedicationScheduleRequest,
    ) -> Result<MedicationSchedule, Error>;

    /// Remove a dosing time.
    async fn delete_medication_schedule(&self, id: &MedicationScheduleId) -> Result<(), Error>;
}
