//! Translation of adapter port errors into domain errors.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal_error`, whose message is redacted before it reaches a client.

use crate::domain::Error;
use crate::domain::ports::{
    AppointmentRepositoryError, CareRecipientRepositoryError, CaregiverRepositoryError,
    DailyLogRepositoryError, MedicationRepositoryError, ProfileRepositoryError,
    PushSubscriptionRepositoryError, ScheduleRepositoryError,
};

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

pub(crate) fn map_caregiver_error(error: CaregiverRepositoryError) -> Error {
    match error {
        CaregiverRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("caregiver repository unavailable: {message}"))
        }
        CaregiverRepositoryError::Query { message } => {
            Error::internal(format!("caregiver repository error: {message}"))
        }
        CaregiverRepositoryError::AccessCodeTaken => {
            Error::conflict("access code is already in use")
        }
        CaregiverRepositoryError::InvalidProfileLink { message } => {
            Error::invalid_request(format!("invalid profile link: {message}"))
        }
    }
}

pub(crate) fn map_care_recipient_error(error: CareRecipientRepositoryError) -> Error {
    match error {
        CareRecipientRepositoryError::Connection { message } => Error::service_unavailable(
            format!("care recipient repository unavailable: {message}"),
        ),
        CareRecipientRepositoryError::Query { message } => {
            Error::internal(format!("care recipient repository error: {message}"))
        }
    }
}

pub(crate) fn map_schedule_error(error: ScheduleRepositoryError) -> Error {
    match error {
        ScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schedule repository unavailable: {message}"))
        }
        ScheduleRepositoryError::Query { message } => {
            Error::internal(format!("schedule repository error: {message}"))
        }
        ScheduleRepositoryError::MissingReference { message } => {
            Error::not_found(format!("referenced record not found: {message}"))
        }
    }
}

pub(crate) fn map_medication_error(error: MedicationRepositoryError) -> Error {
    match error {
        MedicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("medication repository unavailable: {message}"))
        }
        MedicationRepositoryError::Query { message } => {
            Error::internal(format!("medication repository error: {message}"))
        }
        MedicationRepositoryError::MissingReference { message } => {
            Error::not_found(format!("referenced record not found: {message}"))
        }
    }
}

pub(crate) fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::MissingReference { message } => {
            Error::not_found(format!("referenced record not found: {message}"))
        }
    }
}

pub(crate) fn map_daily_log_error(error: DailyLogRepositoryError) -> Error {
    match error {
        DailyLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("daily log repository unavailable: {message}"))
        }
        DailyLogRepositoryError::Query { message } => {
            Error::internal(format!("daily log repository error: {message}"))
        }
        DailyLogRepositoryError::MissingReference { message } => {
            Error::not_found(format!("logged item not found: {message}"))
        }
    }
}

pub(crate) fn map_push_subscription_error(error: PushSubscriptionRepositoryError) -> Error {
    match error {
        PushSubscriptionRepositoryError::Connection { message } => Error::service_unavailable(
            format!("push subscription repository unavailable: {message}"),
        ),
        PushSubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("push subscription repository error: {message}"))
        }
        PushSubscriptionRepositoryError::EndpointTaken => {
            Error::conflict("push endpoint is registered to another account")
        }
    }
}
