//! Response bodies shared by several handler modules.
//!
//! Identifiers, dates and times are rendered as strings; days of the week as
//! integers `0..=6` with `0 = Sunday`; wall-clock times exactly as stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Appointment, Capabilities, CareRecipient, Caregiver, CaregiverContact, DailyLogEntry,
    Medication, MedicationSchedule, Profile, Schedule, Task,
};

/// Signed-in account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Profile identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// `admin` or `caregiver`.
    #[schema(example = "admin")]
    pub role: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            role: profile.role.as_str().to_owned(),
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

/// What the current actor may do.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesResponse {
    /// Admin role.
    pub is_admin: bool,
    /// Active linked caregiver or valid guest.
    pub is_caregiver: bool,
    /// Caregiver record acted as.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = Uuid)]
    pub caregiver_id: Option<String>,
    /// Account profile; absent for guests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponse>,
}

impl From<&Capabilities> for CapabilitiesResponse {
    fn from(capabilities: &Capabilities) -> Self {
        Self {
            is_admin: capabilities.is_admin,
            is_caregiver: capabilities.is_caregiver,
            caregiver_id: capabilities.caregiver_id.map(|id| id.to_string()),
            profile: capabilities.profile.as_ref().map(ProfileResponse::from),
        }
    }
}

/// A caregiver with contact details resolved from the authoritative source.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverResponse {
    /// Caregiver identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Linked profile, absent for guest caregivers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = Uuid)]
    pub profile_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Phone number, guests only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Current six-digit guest access code.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "482913")]
    pub access_code: Option<String>,
    /// Inactive caregivers cannot log in or act.
    pub is_active: bool,
}

impl From<&Caregiver> for CaregiverResponse {
    fn from(caregiver: &Caregiver) -> Self {
        let (profile_id, phone, email) = match &caregiver.contact {
            CaregiverContact::Linked {
                profile_id, email, ..
            } => (Some(profile_id.to_string()), None, Some(email.clone())),
            CaregiverContact::Guest { phone, email, .. } => (None, phone.clone(), email.clone()),
        };
        Self {
            id: caregiver.id.to_string(),
            profile_id,
            name: caregiver.display_name().to_owned(),
            phone,
            email,
            access_code: caregiver
                .access_code
                .as_ref()
                .map(|code| code.as_str().to_owned()),
            is_active: caregiver.is_active,
        }
    }
}

/// A person receiving care.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CareRecipientResponse {
    /// Recipient identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Date of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Notes for caregivers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&CareRecipient> for CareRecipientResponse {
    fn from(recipient: &CareRecipient) -> Self {
        Self {
            id: recipient.id.to_string(),
            name: recipient.name.clone(),
            date_of_birth: recipient.date_of_birth,
            notes: recipient.notes.clone(),
        }
    }
}

/// Weekly shift.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// Schedule identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Recipient receiving care.
    #[schema(format = Uuid)]
    pub care_recipient_id: String,
    /// Assigned caregiver.
    #[schema(format = Uuid)]
    pub caregiver_id: String,
    /// `0 = Sunday` through `6 = Saturday`.
    #[schema(minimum = 0, maximum = 6)]
    pub day_of_week: u8,
    /// Shift start, `HH:MM` or `HH:MM:SS`.
    #[schema(example = "08:00")]
    pub start_time: String,
    /// Shift end.
    #[schema(example = "16:00")]
    pub end_time: String,
}

impl From<&Schedule> for ScheduleResponse {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id.to_string(),
            care_recipient_id: schedule.care_recipient_id.to_string(),
            caregiver_id: schedule.caregiver_id.to_string(),
            day_of_week: schedule.day_of_week.value(),
            start_time: schedule.start_time.to_string(),
            end_time: schedule.end_time.to_string(),
        }
    }
}

/// Checklist item of a schedule.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Owning schedule.
    #[schema(format = Uuid)]
    pub schedule_id: String,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
    /// Position among untimed tasks.
    pub sort_order: i32,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            schedule_id: task.schedule_id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_time: task.due_time.as_ref().map(ToString::to_string),
            sort_order: task.sort_order,
        }
    }
}

/// Medication of a care recipient.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationResponse {
    /// Medication identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Recipient taking the medication.
    #[schema(format = Uuid)]
    pub care_recipient_id: String,
    /// Name.
    pub name: String,
    /// Dosage.
    #[schema(example = "10 mg")]
    pub dosage: String,
    /// Instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Inactive medications are hidden from daily views.
    pub is_active: bool,
}

impl From<&Medication> for MedicationResponse {
    fn from(medication: &Medication) -> Self {
        Self {
            id: medication.id.to_string(),
            care_recipient_id: medication.care_recipient_id.to_string(),
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            instructions: medication.instructions.clone(),
            is_active: medication.is_active,
        }
    }
}

/// Dosing time of a medication.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationScheduleResponse {
    /// Schedule identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Medication dosed.
    #[schema(format = Uuid)]
    pub medication_id: String,
    /// Time of day.
    #[schema(example = "08:00")]
    pub time_of_day: String,
    /// `daily` or `weekly`.
    #[schema(example = "daily")]
    pub frequency: String,
    /// Day for weekly doses.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(minimum = 0, maximum = 6)]
    pub day_of_week: Option<u8>,
}

impl From<&MedicationSchedule> for MedicationScheduleResponse {
    fn from(schedule: &MedicationSchedule) -> Self {
        Self {
            id: schedule.id.to_string(),
            medication_id: schedule.medication_id.to_string(),
            time_of_day: schedule.time_of_day.to_string(),
            frequency: schedule.frequency.as_str().to_owned(),
            day_of_week: schedule.day_of_week.map(|day| day.value()),
        }
    }
}

/// Appointment of a care recipient.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    /// Appointment identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Recipient attending.
    #[schema(format = Uuid)]
    pub care_recipient_id: String,
    /// Accompanying caregiver.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(format = Uuid)]
    pub caregiver_id: Option<String>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time of day.
    #[schema(example = "14:30")]
    pub time: String,
    /// Appointment type.
    #[schema(example = "GP")]
    pub kind: String,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `scheduled`, `completed` or `cancelled`.
    pub status: String,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            care_recipient_id: appointment.care_recipient_id.to_string(),
            caregiver_id: appointment.caregiver_id.map(|id| id.to_string()),
            date: appointment.date,
            time: appointment.time.to_string(),
            kind: appointment.kind.clone(),
            location: appointment.location.clone(),
            notes: appointment.notes.clone(),
            status: appointment.status.as_str().to_owned(),
        }
    }
}

/// Recorded outcome of a task or dose on a date.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogResponse {
    /// Outcome, e.g. `completed` or `given`.
    pub status: String,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Caregiver who wrote the current state.
    #[schema(format = Uuid)]
    pub recorded_by: String,
    /// When the current state was written.
    pub logged_at: DateTime<Utc>,
    /// Date the log applies to.
    pub date: NaiveDate,
}

impl From<&DailyLogEntry> for DailyLogResponse {
    fn from(entry: &DailyLogEntry) -> Self {
        Self {
            status: entry.status.as_str().to_owned(),
            notes: entry.notes.clone(),
            recorded_by: entry.recorded_by.to_string(),
            logged_at: entry.logged_at,
            date: entry.key.date(),
        }
    }
}
