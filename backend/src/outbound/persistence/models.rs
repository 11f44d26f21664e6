//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate the
//! stored encodings and report a message on mismatch so adapters can surface
//! a query error instead of panicking.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccessCode, Appointment, AppointmentId, AppointmentStatus, CareRecipient, CareRecipientId,
    Caregiver, CaregiverContact, CaregiverId, DayOfWeek, Frequency, Medication, MedicationId,
    MedicationSchedule, MedicationScheduleId, PasswordDigest, Profile, ProfileId,
    PushSubscription, Role, Schedule, ScheduleId, Task, TaskId, WallTime,
};

use super::schema::{
    appointments, care_recipients, caregivers, medication_logs, medication_schedules,
    medications, profiles, push_subscriptions, schedules, task_logs, tasks,
};

fn parse_wall_time(raw: &str, column: &str) -> Result<WallTime, String> {
    WallTime::parse(raw).map_err(|err| format!("invalid {column} `{raw}`: {err}"))
}

fn parse_day(raw: i16, column: &str) -> Result<DayOfWeek, String> {
    DayOfWeek::new(i64::from(raw)).map_err(|err| format!("invalid {column}: {err}"))
}

/// Encode a day of the week for a `SMALLINT` column.
pub(crate) fn day_to_db(day: DayOfWeek) -> i16 {
    i16::from(day.value())
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub name: String,
    pub email: String,
    pub password_salt: String,
    pub password_digest: String,
}

impl ProfileRow {
    pub(crate) fn into_profile(self) -> Result<(Profile, PasswordDigest), String> {
        let role: Role = self.role.parse().map_err(|err| format!("{err}"))?;
        let digest = PasswordDigest::from_stored(self.password_salt, self.password_digest);
        Ok((
            Profile {
                id: ProfileId::from_uuid(self.id),
                role,
                name: self.name,
                email: self.email,
            },
            digest,
        ))
    }
}

/// Linked-profile contact columns joined onto caregiver reads.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileContactRow {
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Caregivers
// ---------------------------------------------------------------------------

/// Row struct for reading from the caregivers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = caregivers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CaregiverRow {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub access_code: Option<String>,
    pub is_active: bool,
}

impl CaregiverRow {
    /// Combine the caregiver columns with the joined profile contact.
    pub(crate) fn into_caregiver(
        self,
        profile: Option<ProfileContactRow>,
    ) -> Result<Caregiver, String> {
        let contact = match (self.profile_id, profile) {
            (Some(profile_id), Some(profile)) => CaregiverContact::Linked {
                profile_id: ProfileId::from_uuid(profile_id),
                name: profile.name,
                email: profile.email,
            },
            (Some(profile_id), None) => {
                return Err(format!("caregiver {} links missing profile {profile_id}", self.id));
            }
            (None, _) => CaregiverContact::Guest {
                name: self
                    .name
                    .ok_or_else(|| format!("guest caregiver {} has no name", self.id))?,
                phone: self.phone,
                email: self.email,
            },
        };
        let access_code = self
            .access_code
            .as_deref()
            .map(AccessCode::parse)
            .transpose()
            .map_err(|err| format!("invalid access code on caregiver {}: {err}", self.id))?;
        Ok(Caregiver {
            id: CaregiverId::from_uuid(self.id),
            contact,
            access_code,
            is_active: self.is_active,
        })
    }
}

/// Insertable struct for creating caregiver records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = caregivers)]
pub(crate) struct NewCaregiverRow<'a> {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub access_code: Option<&'a str>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Care recipients
// ---------------------------------------------------------------------------

/// Row struct for the care_recipients table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = care_recipients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CareRecipientRow {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<CareRecipientRow> for CareRecipient {
    fn from(row: CareRecipientRow) -> Self {
        Self {
            id: CareRecipientId::from_uuid(row.id),
            name: row.name,
            date_of_birth: row.date_of_birth,
            notes: row.notes,
        }
    }
}

impl From<&CareRecipient> for CareRecipientRow {
    fn from(value: &CareRecipient) -> Self {
        Self {
            id: *value.id.as_uuid(),
            name: value.name.clone(),
            date_of_birth: value.date_of_birth,
            notes: value.notes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedules and tasks
// ---------------------------------------------------------------------------

/// Row struct for the schedules table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub care_recipient_id: Uuid,
    pub caregiver_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = String;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ScheduleId::from_uuid(row.id),
            care_recipient_id: CareRecipientId::from_uuid(row.care_recipient_id),
            caregiver_id: CaregiverId::from_uuid(row.caregiver_id),
            day_of_week: parse_day(row.day_of_week, "day_of_week")?,
            start_time: parse_wall_time(&row.start_time, "start_time")?,
            end_time: parse_wall_time(&row.end_time, "end_time")?,
        })
    }
}

impl From<&Schedule> for ScheduleRow {
    fn from(value: &Schedule) -> Self {
        Self {
            id: *value.id.as_uuid(),
            care_recipient_id: *value.care_recipient_id.as_uuid(),
            caregiver_id: *value.caregiver_id.as_uuid(),
            day_of_week: day_to_db(value.day_of_week),
            start_time: value.start_time.as_str().to_owned(),
            end_time: value.end_time.as_str().to_owned(),
        }
    }
}

/// Row struct for the tasks table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_time: Option<String>,
    pub sort_order: i32,
}

impl TryFrom<TaskRow> for Task {
    type Error = String;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::from_uuid(row.id),
            schedule_id: ScheduleId::from_uuid(row.schedule_id),
            title: row.title,
            description: row.description,
            due_time: row
                .due_time
                .as_deref()
                .map(|raw| parse_wall_time(raw, "due_time"))
                .transpose()?,
            sort_order: row.sort_order,
        })
    }
}

impl From<&Task> for TaskRow {
    fn from(value: &Task) -> Self {
        Self {
            id: *value.id.as_uuid(),
            schedule_id: *value.schedule_id.as_uuid(),
            title: value.title.clone(),
            description: value.description.clone(),
            due_time: value.due_time.as_ref().map(|time| time.as_str().to_owned()),
            sort_order: value.sort_order,
        }
    }
}

// ---------------------------------------------------------------------------
// Medications
// ---------------------------------------------------------------------------

/// Row struct for the medications table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = medications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicationRow {
    pub id: Uuid,
    pub care_recipient_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub instructions: Option<String>,
    pub is_active: bool,
}

impl From<MedicationRow> for Medication {
    fn from(row: MedicationRow) -> Self {
        Self {
            id: MedicationId::from_uuid(row.id),
            care_recipient_id: CareRecipientId::from_uuid(row.care_recipient_id),
            name: row.name,
            dosage: row.dosage,
            instructions: row.instructions,
            is_active: row.is_active,
        }
    }
}

impl From<&Medication> for MedicationRow {
    fn from(value: &Medication) -> Self {
        Self {
            id: *value.id.as_uuid(),
            care_recipient_id: *value.care_recipient_id.as_uuid(),
            name: value.name.clone(),
            dosage: value.dosage.clone(),
            instructions: value.instructions.clone(),
            is_active: value.is_active,
        }
    }
}

/// Row struct for the medication_schedules table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = medication_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicationScheduleRow {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub time_of_day: String,
    pub frequency: String,
    pub day_of_week: Option<i16>,
}

impl TryFrom<MedicationScheduleRow> for MedicationSchedule {
    type Error = String;

    fn try_from(row: MedicationScheduleRow) -> Result<Self, Self::Error> {
        let frequency: Frequency = row.frequency.parse().map_err(|err| format!("{err}"))?;
        Ok(Self {
            id: MedicationScheduleId::from_uuid(row.id),
            medication_id: MedicationId::from_uuid(row.medication_id),
            time_of_day: parse_wall_time(&row.time_of_day, "time_of_day")?,
            frequency,
            day_of_week: row
                .day_of_week
                .map(|day| parse_day(day, "day_of_week"))
                .transpose()?,
        })
    }
}

impl From<&MedicationSchedule> for MedicationScheduleRow {
    fn from(value: &MedicationSchedule) -> Self {
        Self {
            id: *value.id.as_uuid(),
            medication_id: *value.medication_id.as_uuid(),
            time_of_day: value.time_of_day.as_str().to_owned(),
            frequency: value.frequency.as_str().to_owned(),
            day_of_week: value.day_of_week.map(day_to_db),
        }
    }
}

// ---------------------------------------------------------------------------
// Daily logs
// ---------------------------------------------------------------------------

/// Row struct for the task_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskLogRow {
    pub task_id: Uuid,
    pub caregiver_id: Uuid,
    pub log_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// Insertable struct for task log upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_logs)]
pub(crate) struct NewTaskLogRow<'a> {
    pub id: Uuid,
    pub task_id: Uuid,
    pub caregiver_id: Uuid,
    pub log_date: NaiveDate,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub logged_at: DateTime<Utc>,
}

/// Row struct for the medication_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medication_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicationLogRow {
    pub medication_schedule_id: Uuid,
    pub caregiver_id: Uuid,
    pub log_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// Insertable struct for medication log upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = medication_logs)]
pub(crate) struct NewMedicationLogRow<'a> {
    pub id: Uuid,
    pub medication_schedule_id: Uuid,
    pub caregiver_id: Uuid,
    pub log_date: NaiveDate,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub logged_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// Row struct for the appointments table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub care_recipient_id: Uuid,
    pub caregiver_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub kind: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = String;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = row.status.parse().map_err(|err| format!("{err}"))?;
        Ok(Self {
            id: AppointmentId::from_uuid(row.id),
            care_recipient_id: CareRecipientId::from_uuid(row.care_recipient_id),
            caregiver_id: row.caregiver_id.map(CaregiverId::from_uuid),
            date: row.appointment_date,
            time: parse_wall_time(&row.appointment_time, "appointment_time")?,
            kind: row.kind,
            location: row.location,
            notes: row.notes,
            status,
        })
    }
}

impl From<&Appointment> for AppointmentRow {
    fn from(value: &Appointment) -> Self {
        Self {
            id: *value.id.as_uuid(),
            care_recipient_id: *value.care_recipient_id.as_uuid(),
            caregiver_id: value.caregiver_id.map(|id| *id.as_uuid()),
            appointment_date: value.date,
            appointment_time: value.time.as_str().to_owned(),
            kind: value.kind.clone(),
            location: value.location.clone(),
            notes: value.notes.clone(),
            status: value.status.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Push subscriptions
// ---------------------------------------------------------------------------

/// Row struct for reading push subscriptions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = push_subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PushSubscriptionRow {
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_agent: Option<String>,
}

impl From<PushSubscriptionRow> for PushSubscription {
    fn from(row: PushSubscriptionRow) -> Self {
        Self {
            user_id: ProfileId::from_uuid(row.user_id),
            endpoint: row.endpoint,
            p256dh: row.p256dh,
            auth: row.auth,
            user_agent: row.user_agent,
        }
    }
}

/// Insertable struct for push subscription upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = push_subscriptions)]
pub(crate) struct NewPushSubscriptionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: &'a str,
    pub p256dh: &'a str,
    pub auth: &'a str,
    pub user_agent: Option<&'a str>,
}
