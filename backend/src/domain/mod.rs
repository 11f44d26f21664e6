//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed care-coordination entities and the
//! use-case services that operate on them. Services depend only on the ports
//! in [`ports`]; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Entities: Profile, Caregiver, CareRecipient, Schedule, Task, Medication,
//!   MedicationSchedule, Appointment, DailyLogEntry, PushSubscription,
//!   GuestSession.
//! - Services implementing the driving ports.

pub mod appointment;
pub mod auth;
pub mod capabilities;
pub mod care_recipient;
pub mod caregiver;
pub mod daily_log;
pub mod daily_overview;
pub mod error;
pub mod guest_session;
pub mod ids;
pub mod medication;
pub mod notification;
pub mod ports;
pub mod profile;
pub mod schedule;
pub mod trace_id;

mod error_mapping;
mod validation;

mod account_login_service;
mod appointment_service;
mod capability_service;
mod care_plan_service;
mod care_team_service;
mod daily_log_service;
mod daily_overview_service;
mod guest_access_service;
mod notification_service;

pub use self::account_login_service::AccountLoginService;
pub use self::appointment::{
    Appointment, AppointmentStatus, UnknownAppointmentStatusError, upcoming_appointments,
};
pub use self::appointment_service::AppointmentService;
pub use self::auth::{LoginCredentials, LoginValidationError, PasswordDigest, StoredCredentials};
pub use self::capabilities::Capabilities;
pub use self::capability_service::CapabilityService;
pub use self::care_plan_service::CarePlanService;
pub use self::care_recipient::CareRecipient;
pub use self::care_team_service::CareTeamService;
pub use self::caregiver::{
    ACCESS_CODE_MAX, ACCESS_CODE_MIN, AccessCode, AccessCodeError, Caregiver, CaregiverContact,
    NewCaregiver, NewCaregiverContact,
};
pub use self::daily_log::{
    DailyLogEntry, DailyLogKey, DailyLogStatus, LogItem, LogKind, NaturalKeyPolicy,
    UnknownLogStatusError,
};
pub use self::daily_log_service::DailyLogService;
pub use self::daily_overview::{DailyOverview, DoseItem, MedicationItem, ScheduleItem, TaskItem};
pub use self::daily_overview_service::{DailyOverviewRepositories, DailyOverviewService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::guest_access_service::{ACCESS_CODE_ATTEMPTS, GuestAccessService};
pub use self::guest_session::{GUEST_SESSION_TTL_HOURS, GuestSession};
pub use self::ids::{
    AppointmentId, CareRecipientId, CaregiverId, IdValidationError, MedicationId,
    MedicationScheduleId, ProfileId, ScheduleId, TaskId,
};
pub use self::medication::{Frequency, Medication, MedicationSchedule, UnknownFrequencyError};
pub use self::notification::{DispatchReport, PushPayload, PushSubscription, UserDispatchResult};
pub use self::notification_service::NotificationService;
pub use self::profile::{Profile, Role, UnknownRoleError};
pub use self::schedule::{
    DayOfWeek, DayOfWeekError, Schedule, Task, WallTime, WallTimeError, compare_tasks, sort_tasks,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use carelink::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
