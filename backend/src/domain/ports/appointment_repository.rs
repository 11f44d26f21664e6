//! Port for appointment persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Appointment, AppointmentId, AppointmentStatus, CareRecipientId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
        /// A referenced recipient or caregiver does not exist.
        MissingReference { message: String } => "appointment reference missing: {message}",
    }
}

/// Persistence for appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments on or after `from` for any of `recipient_ids`.
    ///
    /// Adapters may return any status; callers filter and order.
    async fn list_from(
        &self,
        recipient_ids: &[CareRecipientId],
        from: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Fetch an appointment by identifier.
    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Insert an appointment.
    async fn create(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Update the status. Returns `false` when the appointment is missing.
    async fn set_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<bool, AppointmentRepositoryError>;

    /// Delete an appointment. Returns `false` when it was missing.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError>;
}
