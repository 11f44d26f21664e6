//! Computed daily view of a caregiver's work.
//!
//! Nothing here is persisted; [`DailyOverview`] is recomputed from the store
//! on every request.

use chrono::NaiveDate;

use super::appointment::Appointment;
use super::care_recipient::CareRecipient;
use super::daily_log::DailyLogEntry;
use super::ids::{CareRecipientId, CaregiverId};
use super::medication::{Medication, MedicationSchedule};
use super::schedule::{DayOfWeek, Schedule, Task};

/// A task with today's log, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Task definition.
    pub task: Task,
    /// Log for (task, caregiver, date).
    pub log: Option<DailyLogEntry>,
}

/// A schedule active today with its recipient and ordered tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItem {
    /// Schedule definition.
    pub schedule: Schedule,
    /// Recipient served by the schedule.
    pub care_recipient: CareRecipient,
    /// Tasks in due-time order.
    pub tasks: Vec<TaskItem>,
}

/// A dose due today with today's shared log, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseItem {
    /// Dosing time.
    pub schedule: MedicationSchedule,
    /// Log for (medication schedule, date).
    pub log: Option<DailyLogEntry>,
}

/// An active medication with its doses due today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationItem {
    /// Medication definition.
    pub medication: Medication,
    /// Doses ordered by time of day.
    pub doses: Vec<DoseItem>,
}

/// Daily overview for one caregiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyOverview {
    /// Caregiver the view belongs to.
    pub caregiver_id: CaregiverId,
    /// Date the view was computed for.
    pub date: NaiveDate,
    /// Day of week of `date`.
    pub day_of_week: DayOfWeek,
    /// Schedules active on `date`, ordered by start time.
    pub schedules: Vec<ScheduleItem>,
    /// Medications with at least one dose due on `date`.
    pub medications: Vec<MedicationItem>,
    /// Upcoming scheduled appointments ordered by date then time.
    pub appointments: Vec<Appointment>,
}

impl DailyOverview {
    /// Recipients served today, in first-seen schedule order.
    pub fn recipients(&self) -> Vec<&CareRecipient> {
        let mut seen: Vec<CareRecipientId> = Vec::new();
        let mut recipients = Vec::new();
        for item in &self.schedules {
            if !seen.contains(&item.care_recipient.id) {
                seen.push(item.care_recipient.id);
                recipients.push(&item.care_recipient);
            }
        }
        recipients
    }
}
