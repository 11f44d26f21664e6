//! Medications and their dosing times.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{CareRecipientId, MedicationId, MedicationScheduleId};
use super::schedule::{DayOfWeek, WallTime};

/// Medication belonging to a care recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Medication identifier.
    pub id: MedicationId,
    /// Recipient taking the medication.
    pub care_recipient_id: CareRecipientId,
    /// Medication name.
    pub name: String,
    /// Dosage, e.g. "10 mg".
    pub dosage: String,
    /// Free-text administration instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Inactive medications never appear in daily views.
    pub is_active: bool,
}

/// How often a dosing time recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Once a week on the schedule's day.
    Weekly,
}

impl Frequency {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored frequency string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown medication frequency: {0}")]
pub struct UnknownFrequencyError(pub String);

impl FromStr for Frequency {
    type Err = UnknownFrequencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(UnknownFrequencyError(other.to_owned())),
        }
    }
}

/// Dosing time for a medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationSchedule {
    /// Schedule identifier.
    pub id: MedicationScheduleId,
    /// Medication being dosed.
    pub medication_id: MedicationId,
    /// Time of day for the dose.
    pub time_of_day: WallTime,
    /// Recurrence.
    pub frequency: Frequency,
    /// Day for weekly doses. Ignored for daily doses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
}

impl MedicationSchedule {
    /// Whether a dose is due on `day`.
    ///
    /// # Examples
    /// ```
    /// use carelink::domain::{
    ///     DayOfWeek, Frequency, MedicationId, MedicationSchedule, MedicationScheduleId, WallTime,
    /// };
    ///
    /// let schedule = MedicationSchedule {
    ///     id: MedicationScheduleId::random(),
    ///     medication_id: MedicationId::random(),
    ///     time_of_day: WallTime::parse("08:00").unwrap(),
    ///     frequency: Frequency::Weekly,
    ///     day_of_week: Some(DayOfWeek::new(3).unwrap()),
    /// };
    /// assert!(schedule.applies_on(DayOfWeek::new(3).unwrap()));
    /// assert!(!schedule.applies_on(DayOfWeek::new(4).unwrap()));
    /// ```
    #[must_use]
    pub fn applies_on(&self, day: DayOfWeek) -> bool {
        match self.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => self.day_of_week == Some(day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn schedule(frequency: Frequency, day: Option<i64>) -> MedicationSchedule {
        MedicationSchedule {
            id: MedicationScheduleId::random(),
            medication_id: MedicationId::random(),
            time_of_day: WallTime::parse("08:00").expect("valid time"),
            frequency,
            day_of_week: day.map(|d| DayOfWeek::new(d).expect("valid day")),
        }
    }

    #[rstest]
    fn weekly_schedule_applies_only_on_its_day() {
        let weekly = schedule(Frequency::Weekly, Some(3));
        for day in 0..=6 {
            let applies = weekly.applies_on(DayOfWeek::new(day).expect("valid day"));
            assert_eq!(applies, day == 3, "day {day}");
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(1))]
    fn daily_schedule_applies_every_day(#[case] stored_day: Option<i64>) {
        let daily = schedule(Frequency::Daily, stored_day);
        assert!((0..=6).all(|day| daily.applies_on(DayOfWeek::new(day).expect("valid day"))));
    }

    #[rstest]
    fn weekly_schedule_without_day_never_applies() {
        let weekly = schedule(Frequency::Weekly, None);
        assert!((0..=6).all(|day| !weekly.applies_on(DayOfWeek::new(day).expect("valid day"))));
    }
}
