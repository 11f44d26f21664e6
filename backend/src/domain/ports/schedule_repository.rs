//! Port for weekly schedules and their tasks.

use async_trait::async_trait;

use crate::domain::{CaregiverId, DayOfWeek, Schedule, ScheduleId, Task, TaskId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by schedule repository adapters.
    pub enum ScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "schedule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "schedule repository query failed: {message}",
        /// A referenced recipient, caregiver or schedule does not exist.
        MissingReference { message: String } => "schedule reference missing: {message}",
    }
}

/// Persistence for schedules and tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Schedules of `caregiver_id` recurring on `day`.
    async fn list_for_caregiver_on(
        &self,
        caregiver_id: &CaregiverId,
        day: DayOfWeek,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError>;

    /// Fetch a schedule by identifier.
    async fn find_by_id(&self, id: &ScheduleId) -> Result<Option<Schedule>, ScheduleRepositoryError>;

    /// Insert a schedule.
    async fn create(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError>;

    /// Delete a schedule and its tasks. Returns `false` when it was missing.
    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError>;

    /// Tasks attached to any of `schedule_ids`, in no particular order.
    async fn list_tasks(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> Result<Vec<Task>, ScheduleRepositoryError>;

    /// Insert a task.
    async fn create_task(&self, task: &Task) -> Result<(), ScheduleRepositoryError>;

    /// Delete a task. Returns `false` when it was missing.
    async fn delete_task(&self, id: &TaskId) -> Result<bool, ScheduleRepositoryError>;
}
