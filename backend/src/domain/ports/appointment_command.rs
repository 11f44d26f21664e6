//! Driving port for administering appointments.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, CareRecipientId, CaregiverId, Error, WallTime,
};

/// Request to book an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    /// Recipient attending.
    pub care_recipient_id: CareRecipientId,
    /// Accompanying caregiver, notified when linked to an account.
    pub caregiver_id: Option<CaregiverId>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time of day.
    pub time: WallTime,
    /// Appointment type, non-empty.
    pub kind: String,
    /// Location.
    pub location: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Admin operations on appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Scheduled appointments on or after `from` for a recipient, ordered by
    /// date then time.
    async fn list_upcoming(
        &self,
        care_recipient_id: &CareRecipientId,
        from: NaiveDate,
    ) -> Result<Vec<Appointment>, Error>;

    /// Book an appointment.
    async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, Error>;

    /// Change an appointment's status.
    async fn set_status(&self, id: &AppointmentId, status: AppointmentStatus)
    -> Result<(), Error>;

    /// Remove an appointment.
    async fn delete_appointment(&self, id: &AppointmentId) -> Result<(), Error>;
}
