//! Port for medications and their dosing times.

use async_trait::async_trait;

use crate::domain::{
    CareRecipientId, Medication, MedicationId, MedicationSchedule, MedicationScheduleId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by medication repository adapters.
    pub enum MedicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "medication repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "medication repository query failed: {message}",
        /// A referenced recipient or medication does not exist.
        MissingReference { message: String } => "medication reference missing: {message}",
    }
}

/// Persistence for medications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    /// Active medications belonging to any of `recipient_ids`.
    async fn list_active_for_recipients(
        &self,
        recipient_ids: &[CareRecipientId],
    ) -> Result<Vec<Medication>, MedicationRepositoryError>;

    /// Dosing times of any of `medication_ids`.
    async fn list_schedules(
        &self,
        medication_ids: &[MedicationId],
    ) -> Result<Vec<MedicationSchedule>, MedicationRepositoryError>;

    /// Insert a medication.
    async fn create(&self, medication: &Medication) -> Result<(), MedicationRepositoryError>;

    /// Set the active flag. Returns `false` when the medication is missing.
    async fn set_active(
        &self,
        id: &MedicationId,
        is_active: bool,
    ) -> Result<bool, MedicationRepositoryError>;

    /// Delete a medication and its dosing times. Returns `false` when it was
    /// missing.
    async fn delete(&self, id: &MedicationId) -> Result<bool, MedicationRepositoryError>;

    /// Insert a dosing time.
    async fn create_schedule(
        &self,
        schedule: &MedicationSchedule,
    ) -> Result<(), MedicationRepositoryError>;

    /// Delete a dosing time. Returns `false` when it was missing.
    async fn delete_schedule(
        &self,
        id: &MedicationScheduleId,
    ) -> Result<bool, MedicationRepositoryError>;
}
