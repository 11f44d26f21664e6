//! PostgreSQL-backed `ProfileRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{PasswordDigest, Profile, ProfileId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_row(
        &self,
        filter: impl FnOnce(
            profiles::BoxedQuery<'static, diesel::pg::Pg>,
        ) -> profiles::BoxedQuery<'static, diesel::pg::Pg>
        + Send,
    ) -> Result<Option<(Profile, PasswordDigest)>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = filter(profiles::table.into_boxed())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ProfileRow::into_profile)
            .transpose()
            .map_err(ProfileRepositoryError::query)
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    ProfileRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ProfileRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } | StoreFailure::ForeignKeyViolation { .. } => {
            ProfileRepositoryError::query("constraint violation")
        }
        StoreFailure::Query(message) => ProfileRepositoryError::query(message),
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let uuid = *id.as_uuid();
        let found = self
            .find_row(move |query| query.filter(profiles::id.eq(uuid)))
            .await?;
        Ok(found.map(|(profile, _)| profile))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Profile, PasswordDigest)>, ProfileRepositoryError> {
        let email = email.to_owned();
        self.find_row(move |query| query.filter(profiles::email.eq(email)))
            .await
    }
}
