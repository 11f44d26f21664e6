//! PostgreSQL-backed `ScheduleRepository` covering schedules and their tasks.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::{CaregiverId, DayOfWeek, Schedule, ScheduleId, Task, TaskId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{ScheduleRow, TaskRow, day_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::{schedules, tasks};

/// Diesel-backed implementation of the `ScheduleRepository` port.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScheduleRepositoryError {
    ScheduleRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ScheduleRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ScheduleRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint } => {
            ScheduleRepositoryError::missing_reference(constraint)
        }
        StoreFailure::UniqueViolation { .. } => ScheduleRepositoryError::query("duplicate row"),
        StoreFailure::Query(message) => ScheduleRepositoryError::query(message),
    }
}

fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, ScheduleRepositoryError>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ScheduleRepositoryError::query)
}

#[async_trait]
impl ScheduleRepository for DieselScheduleRepository {
    async fn list_for_caregiver_on(
        &self,
        caregiver_id: &CaregiverId,
        day: DayOfWeek,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ScheduleRow> = schedules::table
            .filter(schedules::caregiver_id.eq(caregiver_id.as_uuid()))
            .filter(schedules::day_of_week.eq(day_to_db(day)))
            .select(ScheduleRow::as_select())
            .order_by(schedules::start_time.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn find_by_id(&self, id: &ScheduleId) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ScheduleRow> = schedules::table
            .filter(schedules::id.eq(id.as_uuid()))
            .select(ScheduleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Schedule::try_from)
            .transpose()
            .map_err(ScheduleRepositoryError::query)
    }

    async fn create(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(schedules::table)
            .values(ScheduleRow::from(schedule))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(schedules::table.filter(schedules::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_tasks(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> Result<Vec<Task>, ScheduleRepositoryError> {
        if schedule_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = schedule_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::schedule_id.eq_any(uuids))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn create_task(&self, task: &Task) -> Result<(), ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tasks::table)
            .values(TaskRow::from(task))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
