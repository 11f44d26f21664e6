//! PostgreSQL-backed `AppointmentRepository`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{Appointment, AppointmentId, AppointmentStatus, CareRecipientId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::AppointmentRow;
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the `AppointmentRepository` port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    AppointmentRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => AppointmentRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint } => {
            AppointmentRepositoryError::missing_reference(constraint)
        }
        StoreFailure::UniqueViolation { .. } => AppointmentRepositoryError::query("duplicate row"),
        StoreFailure::Query(message) => AppointmentRepositoryError::query(message),
    }
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn list_from(
        &self,
        recipient_ids: &[CareRecipientId],
        from: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        if recipient_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = recipient_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::care_recipient_id.eq_any(uuids))
            .filter(appointments::appointment_date.ge(from))
            .filter(appointments::status.eq(AppointmentStatus::Scheduled.as_str()))
            .select(AppointmentRow::as_select())
            .order_by((
                appointments::appointment_date.asc(),
                appointments::appointment_time.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(Appointment::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppointmentRepositoryError::query)
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AppointmentRow> = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Appointment::try_from)
            .transpose()
            .map_err(AppointmentRepositoryError::query)
    }

    async fn create(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(appointments::table)
            .values(AppointmentRow::from(appointment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated =
            diesel::update(appointments::table.filter(appointments::id.eq(id.as_uuid())))
                .set(appointments::status.eq(status.as_str()))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted =
            diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
