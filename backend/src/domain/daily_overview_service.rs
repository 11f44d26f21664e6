//! Daily overview aggregation for caregivers.
//!
//! For a caregiver and a date the service reads today's schedules, their
//! recipients and tasks, the recipients' active medications filtered to doses
//! due today, the matching logs, and upcoming appointments. Everything is
//! recomputed per call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::error_mapping::{
    map_appointment_error, map_care_recipient_error, map_daily_log_error, map_medication_error,
    map_schedule_error,
};
use crate::domain::ports::{
    AppointmentRepository, CareRecipientRepository, DailyLogRepository, DailyOverviewQuery,
    DailyOverviewRequest, MedicationRepository, ScheduleRepository,
};
use crate::domain::{
    CareRecipientId, DailyLogEntry, DailyLogKey, DailyOverview, DayOfWeek, DoseItem, Error,
    LogItem, Medication, MedicationId, MedicationItem, MedicationSchedule, ScheduleId,
    ScheduleItem, Task, TaskItem, compare_tasks, upcoming_appointments,
};

/// Repositories read by [`DailyOverviewService`].
pub struct DailyOverviewRepositories<S, R, M, A, L> {
    /// Schedules and tasks.
    pub schedules: Arc<S>,
    /// Care recipients.
    pub recipients: Arc<R>,
    /// Medications and dosing times.
    pub medications: Arc<M>,
    /// Appointments.
    pub appointments: Arc<A>,
    /// Task and dose logs.
    pub logs: Arc<L>,
}

impl<S, R, M, A, L> Clone for DailyOverviewRepositories<S, R, M, A, L> {
    fn clone(&self) -> Self {
        Self {
            schedules: Arc::clone(&self.schedules),
            recipients: Arc::clone(&self.recipients),
            medications: Arc::clone(&self.medications),
            appointments: Arc::clone(&self.appointments),
            logs: Arc::clone(&self.logs),
        }
    }
}

/// Service implementing [`DailyOverviewQuery`].
#[derive(Clone)]
pub struct DailyOverviewService<S, R, M, A, L> {
    repos: DailyOverviewRepositories<S, R, M, A, L>,
}

impl<S, R, M, A, L> DailyOverviewService<S, R, M, A, L> {
    /// Create the service from its repositories.
    pub fn new(repos: DailyOverviewRepositories<S, R, M, A, L>) -> Self {
        Self { repos }
    }
}

fn distinct<T: Copy + Eq + std::hash::Hash>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|value| seen.insert(*value)).collect()
}

fn group_tasks(tasks: Vec<Task>) -> HashMap<ScheduleId, Vec<Task>> {
    let mut grouped: HashMap<ScheduleId, Vec<Task>> = HashMap::new();
    for task in tasks {
        grouped.entry(task.schedule_id).or_default().push(task);
    }
    for list in grouped.values_mut() {
        list.sort_by(compare_tasks);
    }
    grouped
}

impl<S, R, M, A, L> DailyOverviewService<S, R, M, A, L>
where
    S: ScheduleRepository,
    R: CareRecipientRepository,
    M: MedicationRepository,
    A: AppointmentRepository,
    L: DailyLogRepository,
{
    async fn load_medications(
        &self,
        recipient_ids: &[CareRecipientId],
        day: DayOfWeek,
    ) -> Result<Vec<(Medication, Vec<MedicationSchedule>)>, Error> {
        let medications = self
            .repos
            .medications
            .list_active_for_recipients(recipient_ids)
            .await
            .map_err(map_medication_error)?;
        let medications: Vec<_> = medications.into_iter().filter(|m| m.is_active).collect();
        if medications.is_empty() {
            return Ok(Vec::new());
        }

        let medication_ids: Vec<MedicationId> = medications.iter().map(|m| m.id).collect();
        let schedules = self
            .repos
            .medications
            .list_schedules(&medication_ids)
            .await
            .map_err(map_medication_error)?;

        let mut by_medication: HashMap<MedicationId, Vec<_>> = HashMap::new();
        for schedule in schedules.into_iter().filter(|s| s.applies_on(day)) {
            by_medication
                .entry(schedule.medication_id)
                .or_default()
                .push(schedule);
        }

        let mut result = Vec::new();
        for medication in medications {
            let Some(mut doses) = by_medication.remove(&medication.id) else {
                continue;
            };
            doses.sort_by(|a, b| a.time_of_day.cmp(&b.time_of_day));
            result.push((medication, doses));
        }
        result.sort_by(|(a, a_doses), (b, b_doses)| {
            a_doses[0]
                .time_of_day
                .cmp(&b_doses[0].time_of_day)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(result)
    }
}

#[async_trait]
impl<S, R, M, A, L> DailyOverviewQuery for DailyOverviewService<S, R, M, A, L>
where
    S: ScheduleRepository,
    R: CareRecipientRepository,
    M: MedicationRepository,
    A: AppointmentRepository,
    L: DailyLogRepository,
{
    async fn overview(&self, request: DailyOverviewRequest) -> Result<DailyOverview, Error> {
        let DailyOverviewRequest {
            caregiver_id,
            date,
            appointment_limit,
        } = request;
        let day = DayOfWeek::from_date(date);
        let mut overview = DailyOverview {
            caregiver_id,
            date,
            day_of_week: day,
            schedules: Vec::new(),
            medications: Vec::new(),
            appointments: Vec::new(),
        };

        let mut schedules = self
            .repos
            .schedules
            .list_for_caregiver_on(&caregiver_id, day)
            .await
            .map_err(map_schedule_error)?;
        schedules.retain(|s| s.day_of_week == day);
        if schedules.is_empty() {
            return Ok(overview);
        }
        schedules.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        let recipient_ids = distinct(schedules.iter().map(|s| s.care_recipient_id));
        let recipients: HashMap<_, _> = self
            .repos
            .recipients
            .find_many(&recipient_ids)
            .await
            .map_err(map_care_recipient_error)?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let schedule_ids: Vec<_> = schedules.iter().map(|s| s.id).collect();
        let mut tasks = group_tasks(
            self.repos
                .schedules
                .list_tasks(&schedule_ids)
                .await
                .map_err(map_schedule_error)?,
        );
        let medications = self.load_medications(&recipient_ids, day).await?;

        let task_keys = tasks
            .values()
            .flatten()
            .map(|t| DailyLogKey::new(LogItem::Task(t.id), caregiver_id, date));
        let dose_keys = medications.iter().flat_map(move |(_, doses)| {
            doses
                .iter()
                .map(move |d| DailyLogKey::new(LogItem::MedicationDose(d.id), caregiver_id, date))
        });
        let keys: Vec<DailyLogKey> = task_keys.chain(dose_keys).collect();
        let mut logs: HashMap<DailyLogKey, DailyLogEntry> = if keys.is_empty() {
            HashMap::new()
        } else {
            self.repos
                .logs
                .find_many(&keys)
                .await
                .map_err(map_daily_log_error)?
                .into_iter()
                .map(|entry| (entry.key, entry))
                .collect()
        };

        for schedule in schedules {
            let Some(care_recipient) = recipients.get(&schedule.care_recipient_id).cloned() else {
                warn!(schedule_id = %schedule.id, "schedule references a missing care recipient");
                continue;
            };
            let tasks = tasks
                .remove(&schedule.id)
                .unwrap_or_default()
                .into_iter()
                .map(|task| {
                    let key = DailyLogKey::new(LogItem::Task(task.id), caregiver_id, date);
                    TaskItem {
                        log: logs.remove(&key),
                        task,
                    }
                })
                .collect();
            overview.schedules.push(ScheduleItem {
                schedule,
                care_recipient,
                tasks,
            });
        }

        overview.medications = medications
            .into_iter()
            .map(|(medication, doses)| MedicationItem {
                medication,
                doses: doses
                    .into_iter()
                    .map(|schedule| {
                        let key =
                            DailyLogKey::new(LogItem::MedicationDose(schedule.id), caregiver_id, date);
                        DoseItem {
                            log: logs.remove(&key),
                            schedule,
                        }
                    })
                    .collect(),
            })
            .collect();

        let appointments = self
            .repos
            .appointments
            .list_from(&recipient_ids, date)
            .await
            .map_err(map_appointment_error)?;
        overview.appointments = upcoming_appointments(appointments, date, appointment_limit);

        Ok(overview)
    }
}

#[cfg(test)]
#[path = "daily_overview_service_tests.rs"]
mod tests;
