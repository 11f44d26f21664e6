//! Appointment administration.
//!
//! Booking an appointment with an accompanying caregiver who has an account
//! notifies that caregiver. Notification failures are logged and never fail
//! the booking.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::error_mapping::{map_appointment_error, map_caregiver_error};
use crate::domain::ports::{
    AppointmentCommand, AppointmentRepository, CaregiverRepository, CreateAppointmentRequest,
    NotificationDispatch,
};
use crate::domain::validation::{optional_text, require_text};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, CareRecipientId, Error, PushPayload,
    upcoming_appointments,
};

/// Service implementing [`AppointmentCommand`].
#[derive(Clone)]
pub struct AppointmentService<A, C, N: ?Sized> {
    appointments: Arc<A>,
    caregivers: Arc<C>,
    notifications: Arc<N>,
}

impl<A, C, N: ?Sized> AppointmentService<A, C, N> {
    /// Create the service from its collaborators.
    pub fn new(appointments: Arc<A>, caregivers: Arc<C>, notifications: Arc<N>) -> Self {
        Self {
            appointments,
            caregivers,
            notifications,
        }
    }
}

fn assignment_payload(appointment: &Appointment) -> PushPayload {
    PushPayload::new(
        "New appointment",
        format!(
            "{} on {} at {}",
            appointment.kind, appointment.date, appointment.time
        ),
    )
    .with_url("/caregiver")
    .with_tag(format!("appointment-{}", appointment.id))
}

impl<A, C, N: ?Sized> AppointmentService<A, C, N>
where
    A: AppointmentRepository,
    C: CaregiverRepository,
    N: NotificationDispatch,
{
    async fn notify_assignee(&self, appointment: &Appointment) -> Result<(), Error> {
        let Some(caregiver_id) = appointment.caregiver_id else {
            return Ok(());
        };
        let caregiver = self
            .caregivers
            .find_by_id(&caregiver_id)
            .await
            .map_err(map_caregiver_error)?;
        let Some(profile_id) = caregiver.and_then(|c| c.profile_id()) else {
            return Ok(());
        };
        let report = self
            .notifications
            .send_to_user(&profile_id, &assignment_payload(appointment))
            .await?;
        info!(
            appointment_id = %appointment.id,
            sent = report.sent,
            failed = report.failed,
            "appointment notification dispatched"
        );
        Ok(())
    }
}

#[async_trait]
impl<A, C, N: ?Sized> AppointmentCommand for AppointmentService<A, C, N>
where
    A: AppointmentRepository,
    C: CaregiverRepository,
    N: NotificationDispatch,
{
    async fn list_upcoming(
        &self,
        care_recipient_id: &CareRecipientId,
        from: NaiveDate,
    ) -> Result<Vec<Appointment>, Error> {
        let appointments = self
            .appointments
            .list_from(std::slice::from_ref(care_recipient_id), from)
            .await
            .map_err(map_appointment_error)?;
        Ok(upcoming_appointments(appointments, from, None))
    }

    async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, Error> {
        let appointment = Appointment {
            id: AppointmentId::random(),
            care_recipient_id: request.care_recipient_id,
            caregiver_id: request.caregiver_id,
            date: request.date,
            time: request.time,
            kind: require_text("kind", &request.kind)?,
            location: optional_text(request.location),
            notes: optional_text(request.notes),
            status: AppointmentStatus::Scheduled,
        };
        self.appointments
            .create(&appointment)
            .await
            .map_err(map_appointment_error)?;
        info!(appointment_id = %appointment.id, "appointment created");

        if let Err(err) = self.notify_assignee(&appointment).await {
            warn!(appointment_id = %appointment.id, error = %err, "appointment notification failed");
        }
        Ok(appointment)
    }

    async fn set_status(&self, id: &AppointmentId, status: AppointmentStatus) -> Result<(), Error> {
        if self
            .appointments
            .set_status(id, status)
            .await
            .map_err(map_appointment_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("appointment not found"))
        }
    }

    async fn delete_appointment(&self, id: &AppointmentId) -> Result<(), Error> {
        if self
            .appointments
            .delete(id)
            .await
            .map_err(map_appointment_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("appointment not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockAppointmentRepository, MockCaregiverRepository, MockNotificationDispatch,
    };
    use crate::domain::{
        Caregiver, CaregiverContact, CaregiverId, DispatchReport, ErrorCode, ProfileId, WallTime,
    };
    use rstest::rstest;

    type Service =
        AppointmentService<MockAppointmentRepository, MockCaregiverRepository, MockNotificationDispatch>;

    fn request(caregiver_id: Option<CaregiverId>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            care_recipient_id: CareRecipientId::random(),
            caregiver_id,
            date: NaiveDate::from_ymd_opt(2024, 6, 7).expect("valid date"),
            time: WallTime::parse("10:30").expect("valid time"),
            kind: "Dentist".to_owned(),
            location: Some(" High Street ".to_owned()),
            notes: None,
        }
    }

    fn service(
        appointments: MockAppointmentRepository,
        caregivers: MockCaregiverRepository,
        notifications: MockNotificationDispatch,
    ) -> Service {
        AppointmentService::new(
            Arc::new(appointments),
            Arc::new(caregivers),
            Arc::new(notifications),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn linked_assignees_are_notified() {
        let profile_id = ProfileId::random();
        let caregiver = Caregiver {
            id: CaregiverId::random(),
            contact: CaregiverContact::Linked {
                profile_id,
                name: "Ada".to_owned(),
                email: "ada@example.org".to_owned(),
            },
            access_code: None,
            is_active: true,
        };
        let caregiver_id = caregiver.id;
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_create().times(1).return_once(|_| Ok(()));
        let mut caregivers = MockCaregiverRepository::new();
        caregivers
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(caregiver)));
        let mut notifications = MockNotificationDispatch::new();
        notifications
            .expect_send_to_user()
            .withf(move |id, payload| *id == profile_id && payload.body.contains("Dentist"))
            .times(1)
            .return_once(|_, _| Ok(DispatchReport { sent: 1, failed: 0 }));

        let created = service(appointments, caregivers, notifications)
            .create_appointment(request(Some(caregiver_id)))
            .await
            .expect("appointment created");

        assert_eq!(created.status, AppointmentStatus::Scheduled);
        assert_eq!(created.location.as_deref(), Some("High Street"));
    }

    #[rstest]
    #[tokio::test]
    async fn notification_failures_do_not_fail_the_booking() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_create().times(1).return_once(|_| Ok(()));
        let mut caregivers = MockCaregiverRepository::new();
        caregivers.expect_find_by_id().times(1).return_once(|_| {
            Ok(Some(Caregiver {
                id: CaregiverId::random(),
                contact: CaregiverContact::Linked {
                    profile_id: ProfileId::random(),
                    name: "Ada".to_owned(),
                    email: "ada@example.org".to_owned(),
                },
                access_code: None,
                is_active: true,
            }))
        });
        let mut notifications = MockNotificationDispatch::new();
        notifications
            .expect_send_to_user()
            .times(1)
            .return_once(|_, _| Err(Error::service_unavailable("push store down")));

        service(appointments, caregivers, notifications)
            .create_appointment(request(Some(CaregiverId::random())))
            .await
            .expect("booking survives notification failure");
    }

    #[rstest]
    #[tokio::test]
    async fn unassigned_appointments_skip_notification() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_create().times(1).return_once(|_| Ok(()));
        let mut caregivers = MockCaregiverRepository::new();
        caregivers.expect_find_by_id().never();
        let mut notifications = MockNotificationDispatch::new();
        notifications.expect_send_to_user().never();

        service(appointments, caregivers, notifications)
            .create_appointment(request(None))
            .await
            .expect("appointment created");
    }

    #[rstest]
    #[tokio::test]
    async fn updating_a_missing_appointment_is_not_found() {
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_set_status()
            .times(1)
            .return_once(|_, _| Ok(false));

        let err = service(
            appointments,
            MockCaregiverRepository::new(),
            MockNotificationDispatch::new(),
        )
        .set_status(&AppointmentId::random(), AppointmentStatus::Cancelled)
        .await
        .expect_err("missing appointment");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
