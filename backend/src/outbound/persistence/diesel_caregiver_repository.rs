//! PostgreSQL-backed `CaregiverRepository`.
//!
//! Linked caregivers read their name and email from the joined profile row.
//! The unique index on `access_code` is the authority on code collisions; a
//! violation surfaces as [`CaregiverRepositoryError::AccessCodeTaken`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CaregiverRepository, CaregiverRepositoryError};
use crate::domain::{AccessCode, Caregiver, CaregiverId, NewCaregiver, NewCaregiverContact, ProfileId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{CaregiverRow, NewCaregiverRow, ProfileContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::{caregivers, profiles};

type CaregiverQuery<'a> = diesel::helper_types::IntoBoxed<
    'a,
    diesel::helper_types::LeftJoin<caregivers::table, profiles::table>,
    diesel::pg::Pg,
>;

/// Diesel-backed implementation of the `CaregiverRepository` port.
#[derive(Clone)]
pub struct DieselCaregiverRepository {
    pool: DbPool,
}

impl DieselCaregiverRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        filter: impl FnOnce(CaregiverQuery<'static>) -> CaregiverQuery<'static> + Send,
    ) -> Result<Vec<Caregiver>, CaregiverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = caregivers::table.left_join(profiles::table).into_boxed();
        let rows: Vec<(CaregiverRow, Option<ProfileContactRow>)> = filter(query)
            .select((
                CaregiverRow::as_select(),
                Option::<ProfileContactRow>::as_select(),
            ))
            .order_by(caregivers::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, profile)| row.into_caregiver(profile))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CaregiverRepositoryError::query)
    }

    async fn load_one(
        &self,
        filter: impl FnOnce(CaregiverQuery<'static>) -> CaregiverQuery<'static> + Send,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError> {
        Ok(self.load(filter).await?.into_iter().next())
    }
}

fn map_pool_error(error: PoolError) -> CaregiverRepositoryError {
    CaregiverRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CaregiverRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.constraint_mentions("access_code") {
        return CaregiverRepositoryError::access_code_taken();
    }
    match failure {
        StoreFailure::Connection(message) => CaregiverRepositoryError::connection(message),
        StoreFailure::UniqueViolation { .. } => {
            CaregiverRepositoryError::invalid_profile_link("profile is already linked")
        }
        StoreFailure::ForeignKeyViolation { .. } => {
            CaregiverRepositoryError::invalid_profile_link("profile does not exist")
        }
        StoreFailure::Query(message) => CaregiverRepositoryError::query(message),
    }
}

#[async_trait]
impl CaregiverRepository for DieselCaregiverRepository {
    async fn list(&self) -> Result<Vec<Caregiver>, CaregiverRepositoryError> {
        self.load(|query| query).await
    }

    async fn find_by_id(
        &self,
        id: &CaregiverId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError> {
        let uuid = *id.as_uuid();
        self.load_one(move |query| query.filter(caregivers::id.eq(uuid)))
            .await
    }

    async fn find_by_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError> {
        let uuid = *profile_id.as_uuid();
        self.load_one(move |query| query.filter(caregivers::profile_id.eq(uuid)))
            .await
    }

    async fn find_by_access_code(
        &self,
        code: &AccessCode,
    ) -> Result<Vec<Caregiver>, CaregiverRepositoryError> {
        let code = code.as_str().to_owned();
        self.load(move |query| query.filter(caregivers::access_code.eq(code)))
            .await
    }

    async fn create(&self, caregiver: &NewCaregiver) -> Result<Caregiver, CaregiverRepositoryError> {
        let (profile_id, name, phone, email) = match &caregiver.contact {
            NewCaregiverContact::Linked(profile_id) => (Some(*profile_id.as_uuid()), None, None, None),
            NewCaregiverContact::Guest { name, phone, email } => (
                None,
                Some(name.as_str()),
                phone.as_deref(),
                email.as_deref(),
            ),
        };
        let row = NewCaregiverRow {
            id: *caregiver.id.as_uuid(),
            profile_id,
            name,
            phone,
            email,
            access_code: caregiver.access_code.as_ref().map(AccessCode::as_str),
            is_active: caregiver.is_active,
        };

        {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::insert_into(caregivers::table)
                .values(&row)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }

        self.find_by_id(&caregiver.id)
            .await?
            .ok_or_else(|| CaregiverRepositoryError::query("inserted caregiver not readable"))
    }

    async fn set_active(
        &self,
        id: &CaregiverId,
        is_active: bool,
    ) -> Result<bool, CaregiverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(caregivers::table.filter(caregivers::id.eq(id.as_uuid())))
            .set(caregivers::is_active.eq(is_active))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_access_code(
        &self,
        id: &CaregiverId,
        code: Option<AccessCode>,
    ) -> Result<bool, CaregiverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(caregivers::table.filter(caregivers::id.eq(id.as_uuid())))
            .set(caregivers::access_code.eq(code.as_ref().map(AccessCode::as_str)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CaregiverId) -> Result<bool, CaregiverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(caregivers::table.filter(caregivers::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind, message: &str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(message.to_owned()))
    }

    #[rstest]
    #[case(
        database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"caregivers_access_code_key\""
        ),
        CaregiverRepositoryError::access_code_taken()
    )]
    #[case(
        database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"caregivers_profile_id_key\""
        ),
        CaregiverRepositoryError::invalid_profile_link("profile is already linked")
    )]
    #[case(
        database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "violates foreign key constraint \"caregivers_profile_id_fkey\""
        ),
        CaregiverRepositoryError::invalid_profile_link("profile does not exist")
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, "closed"),
        CaregiverRepositoryError::connection("database connection error")
    )]
    fn diesel_errors_map_to_port_errors(
        #[case] error: DieselError,
        #[case] expected: CaregiverRepositoryError,
    ) {
        assert_eq!(map_diesel_error(error), expected);
    }
}
