//! PostgreSQL-backed `CareRecipientRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CareRecipientRepository, CareRecipientRepositoryError};
use crate::domain::{CareRecipient, CareRecipientId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::CareRecipientRow;
use super::pool::{DbPool, PoolError};
use super::schema::care_recipients;

/// Diesel-backed implementation of the `CareRecipientRepository` port.
#[derive(Clone)]
pub struct DieselCareRecipientRepository {
    pool: DbPool,
}

impl DieselCareRecipientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CareRecipientRepositoryError {
    CareRecipientRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CareRecipientRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => CareRecipientRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } | StoreFailure::ForeignKeyViolation { .. } => {
            CareRecipientRepositoryError::query("constraint violation")
        }
        StoreFailure::Query(message) => CareRecipientRepositoryError::query(message),
    }
}

#[async_trait]
impl CareRecipientRepository for DieselCareRecipientRepository {
    async fn list(&self) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CareRecipientRow> = care_recipients::table
            .select(CareRecipientRow::as_select())
            .order_by(care_recipients::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(CareRecipient::from).collect())
    }

    async fn find_many(
        &self,
        ids: &[CareRecipientId],
    ) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CareRecipientRow> = care_recipients::table
            .filter(care_recipients::id.eq_any(uuids))
            .select(CareRecipientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(CareRecipient::from).collect())
    }

    async fn create(&self, recipient: &CareRecipient) -> Result<(), CareRecipientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(care_recipients::table)
            .values(CareRecipientRow::from(recipient))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CareRecipientId) -> Result<bool, CareRecipientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted =
            diesel::delete(care_recipients::table.filter(care_recipients::id.eq(id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
