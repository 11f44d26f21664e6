//! Driving port for administering care recipients and caregivers.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    CareRecipient, CareRecipientId, Caregiver, CaregiverId, Error, NewCaregiverContact,
};

/// Request to register a care recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCareRecipientRequest {
    /// Display name, non-empty.
    pub name: String,
    /// Date of birth, when known.
    pub date_of_birth: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request to register a caregiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCaregiverRequest {
    /// Linked profile or guest contact details.
    pub contact: NewCaregiverContact,
    /// Issue an access code straight away.
    pub issue_access_code: bool,
}

/// Admin operations on the care team.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CareTeamCommand: Send + Sync {
    /// Every care recipient.
    async fn list_care_recipients(&self) -> Result<Vec<CareRecipient>, Error>;

    /// Register a care recipient.
    async fn create_care_recipient(
        &self,
        request: CreateCareRecipientRequest,
    ) -> Result<CareRecipient, Error>;

    /// Remove a care recipient.
    async fn delete_care_recipient(&self, id: &CareRecipientId) -> Result<(), Error>;

    /// Every caregiver.
    async fn list_caregivers(&self) -> Result<Vec<Caregiver>, Error>;

    /// Register a caregiver.
    async fn create_caregiver(&self, request: CreateCaregiverRequest) -> Result<Caregiver, Error>;

    /// Activate or deactivate a caregiver.
    async fn set_caregiver_active(&self, id: &CaregiverId, is_active: bool) -> Result<(), Error>;

    /// Remove a caregiver.
    async fn delete_caregiver(&self, id: &CaregiverId) -> Result<(), Error>;
}
