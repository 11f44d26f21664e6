//! Appointments for care recipients.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AppointmentId, CareRecipientId, CaregiverId};
use super::schedule::WallTime;

/// Appointment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Still to happen.
    Scheduled,
    /// Took place.
    Completed,
    /// Called off.
    Cancelled,
}

impl AppointmentStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored appointment status is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct UnknownAppointmentStatusError(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownAppointmentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownAppointmentStatusError(other.to_owned())),
        }
    }
}

/// Appointment belonging to a care recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Appointment identifier.
    pub id: AppointmentId,
    /// Recipient attending the appointment.
    pub care_recipient_id: CareRecipientId,
    /// Optional accompanying caregiver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caregiver_id: Option<CaregiverId>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time of day.
    pub time: WallTime,
    /// Free-form appointment type, e.g. "GP" or "dentist".
    pub kind: String,
    /// Where the appointment takes place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Additional notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Lifecycle state.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Whether the appointment is still scheduled on or after `today`.
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.status == AppointmentStatus::Scheduled && self.date >= today
    }
}

/// Keep upcoming appointments ordered by date then time, optionally capped.
pub fn upcoming_appointments(
    appointments: impl IntoIterator<Item = Appointment>,
    today: NaiveDate,
    limit: Option<usize>,
) -> Vec<Appointment> {
    let mut upcoming: Vec<_> = appointments
        .into_iter()
        .filter(|appointment| appointment.is_upcoming(today))
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    if let Some(limit) = limit {
        upcoming.truncate(limit);
    }
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn appointment(date: (i32, u32, u32), time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: AppointmentId::random(),
            care_recipient_id: CareRecipientId::random(),
            caregiver_id: None,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
            time: WallTime::parse(time).expect("valid time"),
            kind: "GP".to_owned(),
            location: None,
            notes: None,
            status,
        }
    }

    #[rstest]
    fn keeps_scheduled_future_appointments_in_order() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).expect("valid date");
        let items = vec![
            appointment((2024, 6, 7), "09:00", AppointmentStatus::Scheduled),
            appointment((2024, 6, 4), "09:00", AppointmentStatus::Scheduled),
            appointment((2024, 6, 5), "14:00", AppointmentStatus::Scheduled),
            appointment((2024, 6, 5), "08:15", AppointmentStatus::Scheduled),
            appointment((2024, 6, 6), "10:00", AppointmentStatus::Cancelled),
        ];
        let upcoming = upcoming_appointments(items, today, None);
        let keys: Vec<_> = upcoming
            .iter()
            .map(|a| format!("{} {}", a.date, a.time))
            .collect();
        assert_eq!(
            keys,
            ["2024-06-05 08:15", "2024-06-05 14:00", "2024-06-07 09:00"]
        );
    }

    #[rstest]
    fn caps_to_limit() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).expect("valid date");
        let items = vec![
            appointment((2024, 6, 6), "09:00", AppointmentStatus::Scheduled),
            appointment((2024, 6, 7), "09:00", AppointmentStatus::Scheduled),
        ];
        assert_eq!(upcoming_appointments(items, today, Some(1)).len(), 1);
    }
}
