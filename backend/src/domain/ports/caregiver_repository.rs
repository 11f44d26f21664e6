//! Port for caregiver persistence, including guest access codes.

use async_trait::async_trait;

use crate::domain::{AccessCode, Caregiver, CaregiverId, NewCaregiver, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by caregiver repository adapters.
    pub enum CaregiverRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "caregiver repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "caregiver repository query failed: {message}",
        /// Another caregiver already holds the access code.
        AccessCodeTaken => "access code is already assigned to another caregiver",
        /// The linked profile does not exist or is already linked.
        InvalidProfileLink { message: String } => "invalid profile link: {message}",
    }
}

/// Persistence for caregivers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaregiverRepository: Send + Sync {
    /// List every caregiver ordered by display name.
    async fn list(&self) -> Result<Vec<Caregiver>, CaregiverRepositoryError>;

    /// Fetch a caregiver by identifier.
    async fn find_by_id(
        &self,
        id: &CaregiverId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError>;

    /// Fetch the caregiver linked to a profile.
    async fn find_by_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError>;

    /// Every caregiver whose code equals `code` exactly.
    ///
    /// Codes are unique in the store, so callers treat more than one match
    /// as a failed lookup.
    async fn find_by_access_code(
        &self,
        code: &AccessCode,
    ) -> Result<Vec<Caregiver>, CaregiverRepositoryError>;

    /// Insert a caregiver and return it with contact details resolved.
    async fn create(&self, caregiver: &NewCaregiver) -> Result<Caregiver, CaregiverRepositoryError>;

    /// Set the active flag. Returns `false` when the caregiver is missing.
    async fn set_active(
        &self,
        id: &CaregiverId,
        is_active: bool,
    ) -> Result<bool, CaregiverRepositoryError>;

    /// Overwrite the access code. Returns `false` when the caregiver is
    /// missing and fails with [`CaregiverRepositoryError::AccessCodeTaken`]
    /// on a uniqueness violation.
    async fn set_access_code(
        &self,
        id: &CaregiverId,
        code: Option<AccessCode>,
    ) -> Result<bool, CaregiverRepositoryError>;

    /// Delete a caregiver. Returns `false` when it was missing.
    async fn delete(&self, id: &CaregiverId) -> Result<bool, CaregiverRepositoryError>;
}
