//! Per-day logs of caregiver actions on tasks and medication doses.
//!
//! Task logs and dose logs follow one protocol and differ only in their
//! status vocabulary and in which fields make up the natural key. The key
//! composition is an explicit [`NaturalKeyPolicy`] per [`LogKind`]:
//!
//! - task logs are keyed by `(task, caregiver, date)`, so each caregiver keeps
//!   their own record;
//! - dose logs are keyed by `(medication schedule, date)`, so any caregiver's
//!   entry overwrites the shared daily record. The acting caregiver is still
//!   recorded on the row.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CaregiverId, MedicationScheduleId, TaskId};

/// Which fields besides the item and date make a log unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKeyPolicy {
    /// The acting caregiver is part of the key.
    PerCaregiver,
    /// One record per item and day, whoever logged it.
    SharedAcrossCaregivers,
}

/// Kind of item a log refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Checklist task.
    Task,
    /// Medication dose.
    MedicationDose,
}

impl LogKind {
    /// Natural key composition for this kind.
    #[must_use]
    pub const fn natural_key_policy(self) -> NaturalKeyPolicy {
        match self {
            Self::Task => NaturalKeyPolicy::PerCaregiver,
            Self::MedicationDose => NaturalKeyPolicy::SharedAcrossCaregivers,
        }
    }

    /// Statuses this kind accepts.
    #[must_use]
    pub const fn vocabulary(self) -> &'static [DailyLogStatus] {
        match self {
            Self::Task => &[
                DailyLogStatus::Completed,
                DailyLogStatus::Skipped,
                DailyLogStatus::Unable,
            ],
            Self::MedicationDose => &[
                DailyLogStatus::Given,
                DailyLogStatus::Skipped,
                DailyLogStatus::Refused,
            ],
        }
    }

    /// Whether `status` belongs to this kind's vocabulary.
    #[must_use]
    pub fn accepts(self, status: DailyLogStatus) -> bool {
        self.vocabulary().contains(&status)
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => f.write_str("task"),
            Self::MedicationDose => f.write_str("medication dose"),
        }
    }
}

/// Outcome recorded for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyLogStatus {
    /// Task done.
    Completed,
    /// Deliberately not done.
    Skipped,
    /// Task could not be done.
    Unable,
    /// Dose administered.
    Given,
    /// Dose refused by the recipient.
    Refused,
}

impl DailyLogStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Unable => "unable",
            Self::Given => "given",
            Self::Refused => "refused",
        }
    }
}

impl fmt::Display for DailyLogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log status: {0}")]
pub struct UnknownLogStatusError(pub String);

impl FromStr for DailyLogStatus {
    type Err = UnknownLogStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            "unable" => Ok(Self::Unable),
            "given" => Ok(Self::Given),
            "refused" => Ok(Self::Refused),
            other => Err(UnknownLogStatusError(other.to_owned())),
        }
    }
}

/// Item a log refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogItem {
    /// A schedule task.
    Task(TaskId),
    /// A medication dosing time.
    MedicationDose(MedicationScheduleId),
}

impl LogItem {
    /// Kind of the referenced item.
    #[must_use]
    pub const fn kind(self) -> LogKind {
        match self {
            Self::Task(_) => LogKind::Task,
            Self::MedicationDose(_) => LogKind::MedicationDose,
        }
    }
}

/// Natural key of a daily log row.
///
/// # Examples
/// ```
/// use carelink::domain::{CaregiverId, DailyLogKey, LogItem, MedicationScheduleId};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
/// let dose = LogItem::MedicationDose(MedicationScheduleId::random());
/// let key = DailyLogKey::new(dose, CaregiverId::random(), date);
/// assert_eq!(key.caregiver_id(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DailyLogKey {
    item: LogItem,
    caregiver_id: Option<CaregiverId>,
    date: NaiveDate,
}

impl DailyLogKey {
    /// Build the key for `caregiver` acting on `item` on `date`, dropping
    /// the caregiver when the item's policy shares records.
    #[must_use]
    pub fn new(item: LogItem, caregiver: CaregiverId, date: NaiveDate) -> Self {
        let caregiver_id = match item.kind().natural_key_policy() {
            NaturalKeyPolicy::PerCaregiver => Some(caregiver),
            NaturalKeyPolicy::SharedAcrossCaregivers => None,
        };
        Self {
            item,
            caregiver_id,
            date,
        }
    }

    /// Referenced item.
    #[must_use]
    pub const fn item(&self) -> LogItem {
        self.item
    }

    /// Caregiver component, present only for per-caregiver kinds.
    #[must_use]
    pub const fn caregiver_id(&self) -> Option<CaregiverId> {
        self.caregiver_id
    }

    /// Calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A stored daily log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLogEntry {
    /// Natural key.
    pub key: DailyLogKey,
    /// Caregiver who wrote the current state.
    pub recorded_by: CaregiverId,
    /// Recorded outcome.
    pub status: DailyLogStatus,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// When the current state was written.
    pub logged_at: DateTime<Utc>,
}
