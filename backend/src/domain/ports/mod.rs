//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PushTransport`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`GuestAccess`],
//! [`LoginService`], [`NotificationDispatch`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_command;
mod appointment_repository;
mod capability_query;
mod care_plan_command;
mod care_recipient_repository;
mod care_team_command;
mod caregiver_repository;
mod daily_log_command;
mod daily_log_repository;
mod daily_overview_query;
mod guest_access;
mod login_service;
mod medication_repository;
mod notification_dispatch;
mod profile_repository;
mod push_subscription_repository;
mod push_transport;
mod schedule_repository;

#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::{AppointmentCommand, CreateAppointmentRequest};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use capability_query::MockCapabilityQuery;
pub use capability_query::CapabilityQuery;
#[cfg(test)]
pub use care_plan_command::MockCarePlanCommand;
pub use care_plan_command::{
    CarePlanCommand, CreateMedicationRequest, CreateMedicationScheduleRequest,
    CreateSchedulesRequest, CreateTaskRequest, ScheduleDayOutcome,
};
#[cfg(test)]
pub use care_recipient_repository::MockCareRecipientRepository;
pub use care_recipient_repository::{CareRecipientRepository, CareRecipientRepositoryError};
#[cfg(test)]
pub use care_team_command::MockCareTeamCommand;
pub use care_team_command::{
    CareTeamCommand, CreateCareRecipientRequest, CreateCaregiverRequest,
};
#[cfg(test)]
pub use caregiver_repository::MockCaregiverRepository;
pub use caregiver_repository::{CaregiverRepository, CaregiverRepositoryError};
#[cfg(test)]
pub use daily_log_command::MockDailyLogCommand;
pub use daily_log_command::{DailyLogCommand, SetLogStatusRequest};
#[cfg(test)]
pub use daily_log_repository::MockDailyLogRepository;
pub use daily_log_repository::{DailyLogRepository, DailyLogRepositoryError};
#[cfg(test)]
pub use daily_overview_query::MockDailyOverviewQuery;
pub use daily_overview_query::{DailyOverviewQuery, DailyOverviewRequest};
#[cfg(test)]
pub use guest_access::MockGuestAccess;
pub use guest_access::{
    GuestAccess, INACTIVE_CAREGIVER, INVALID_CODE, SESSION_EXPIRED, SESSION_REVOKED,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use medication_repository::MockMedicationRepository;
pub use medication_repository::{MedicationRepository, MedicationRepositoryError};
#[cfg(test)]
pub use notification_dispatch::{MockNotificationDispatch, MockPushSubscriptionCommand};
pub use notification_dispatch::{NotificationDispatch, PushSubscriptionCommand};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use push_subscription_repository::MockPushSubscriptionRepository;
pub use push_subscription_repository::{
    PushSubscriptionRepository, PushSubscriptionRepositoryError,
};
#[cfg(test)]
pub use push_transport::MockPushTransport;
pub use push_transport::{PushTransport, PushTransportError};
#[cfg(test)]
pub use schedule_repository::MockScheduleRepository;
pub use schedule_repository::{ScheduleRepository, ScheduleRepositoryError};
