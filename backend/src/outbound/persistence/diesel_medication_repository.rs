//! PostgreSQL-backed `MedicationRepository` covering medications and their
//! dosing schedules.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MedicationRepository, MedicationRepositoryError};
use crate::domain::{
    CareRecipientId, Medication, MedicationId, MedicationSchedule, MedicationScheduleId,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{MedicationRow, MedicationScheduleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{medication_schedules, medications};

/// Diesel-backed implementation of the `MedicationRepository` port.
#[derive(Clone)]
pub struct DieselMedicationRepository {
    pool: DbPool,
}

impl DieselMedicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MedicationRepositoryError {
    MedicationRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> MedicationRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => MedicationRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint } => {
            MedicationRepositoryError::missing_reference(constraint)
        }
        StoreFailure::UniqueViolation { .. } => MedicationRepositoryError::query("duplicate row"),
        StoreFailure::Query(message) => MedicationRepositoryError::query(message),
    }
}

#[async_trait]
impl MedicationRepository for DieselMedicationRepository {
    async fn list_active_for_recipients(
        &self,
        recipient_ids: &[CareRecipientId],
    ) -> Result<Vec<Medication>, MedicationRepositoryError> {
        if recipient_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = recipient_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MedicationRow> = medications::table
            .filter(medications::care_recipient_id.eq_any(uuids))
            .filter(medications::is_active.eq(true))
            .select(MedicationRow::as_select())
            .order_by(medications::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Medication::from).collect())
    }

    async fn list_schedules(
        &self,
        medication_ids: &[MedicationId],
    ) -> Result<Vec<MedicationSchedule>, MedicationRepositoryError> {
        if medication_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = medication_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MedicationScheduleRow> = medication_schedules::table
            .filter(medication_schedules::medication_id.eq_any(uuids))
            .select(MedicationScheduleRow::as_select())
            .order_by(medication_schedules::time_of_day.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(MedicationSchedule::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(MedicationRepositoryError::query)
    }

    async fn create(&self, medication: &Medication) -> Result<(), MedicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(medications::table)
            .values(MedicationRow::from(medication))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_active(
        &self,
        id: &MedicationId,
        is_active: bool,
    ) -> Result<bool, MedicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(medications::table.filter(medications::id.eq(id.as_uuid())))
            .set(medications::is_active.eq(is_active))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &MedicationId) -> Result<bool, MedicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(medications::table.filter(medications::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn create_schedule(
        &self,
        schedule: &MedicationSchedule,
    ) -> Result<(), MedicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(medication_schedules::table)
            .values(MedicationScheduleRow::from(schedule))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_schedule(
        &self,
        id: &MedicationScheduleId,
    ) -> Result<bool, MedicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            medication_schedules::table.filter(medication_schedules::id.eq(id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
