//! PostgreSQL-backed `DailyLogRepository`.
//!
//! Task logs and medication dose logs live in separate tables with the same
//! shape. The natural key of each table mirrors the kind's key policy, and
//! writes use `ON CONFLICT .. DO UPDATE` on that key so a second log for the
//! same key overwrites the first.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DailyLogRepository, DailyLogRepositoryError};
use crate::domain::{
    CaregiverId, DailyLogEntry, DailyLogKey, DailyLogStatus, LogItem, MedicationScheduleId, TaskId,
};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{MedicationLogRow, NewMedicationLogRow, NewTaskLogRow, TaskLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{medication_logs, task_logs};

/// Diesel-backed implementation of the `DailyLogRepository` port.
#[derive(Clone)]
pub struct DieselDailyLogRepository {
    pool: DbPool,
}

impl DieselDailyLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DailyLogRepositoryError {
    DailyLogRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> DailyLogRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => DailyLogRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { constraint } => {
            DailyLogRepositoryError::missing_reference(constraint)
        }
        StoreFailure::UniqueViolation { .. } => DailyLogRepositoryError::query("duplicate log"),
        StoreFailure::Query(message) => DailyLogRepositoryError::query(message),
    }
}

fn parse_status(raw: &str) -> Result<DailyLogStatus, DailyLogRepositoryError> {
    raw.parse::<DailyLogStatus>()
        .map_err(|err| DailyLogRepositoryError::query(err.to_string()))
}

fn task_log_entry(row: TaskLogRow) -> Result<DailyLogEntry, DailyLogRepositoryError> {
    let caregiver_id = CaregiverId::from_uuid(row.caregiver_id);
    Ok(DailyLogEntry {
        key: DailyLogKey::new(
            LogItem::Task(TaskId::from_uuid(row.task_id)),
            caregiver_id,
            row.log_date,
        ),
        recorded_by: caregiver_id,
        status: parse_status(&row.status)?,
        notes: row.notes,
        logged_at: row.logged_at,
    })
}

fn medication_log_entry(row: MedicationLogRow) -> Result<DailyLogEntry, DailyLogRepositoryError> {
    let recorded_by = CaregiverId::from_uuid(row.caregiver_id);
    Ok(DailyLogEntry {
        key: DailyLogKey::new(
            LogItem::MedicationDose(MedicationScheduleId::from_uuid(row.medication_schedule_id)),
            recorded_by,
            row.log_date,
        ),
        recorded_by,
        status: parse_status(&row.status)?,
        notes: row.notes,
        logged_at: row.logged_at,
    })
}

/// Split keys into per-table id and date lists.
#[derive(Default)]
struct KeyBatches {
    task_ids: Vec<Uuid>,
    task_dates: Vec<chrono::NaiveDate>,
    dose_ids: Vec<Uuid>,
    dose_dates: Vec<chrono::NaiveDate>,
}

impl KeyBatches {
    fn from_keys(keys: &[DailyLogKey]) -> Self {
        let mut batches = Self::default();
        for key in keys {
            match key.item() {
                LogItem::Task(task_id) => {
                    batches.task_ids.push(*task_id.as_uuid());
                    batches.task_dates.push(key.date());
                }
                LogItem::MedicationDose(schedule_id) => {
                    batches.dose_ids.push(*schedule_id.as_uuid());
                    batches.dose_dates.push(key.date());
                }
            }
        }
        batches
    }
}

#[async_trait]
impl DailyLogRepository for DieselDailyLogRepository {
    async fn upsert(&self, entry: &DailyLogEntry) -> Result<(), DailyLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = entry.key;
        match key.item() {
            LogItem::Task(task_id) => {
                let caregiver_id = key.caregiver_id().unwrap_or(entry.recorded_by);
                let row = NewTaskLogRow {
                    id: Uuid::new_v4(),
                    task_id: *task_id.as_uuid(),
                    caregiver_id: *caregiver_id.as_uuid(),
                    log_date: key.date(),
                    status: entry.status.as_str(),
                    notes: entry.notes.as_deref(),
                    logged_at: entry.logged_at,
                };
                diesel::insert_into(task_logs::table)
                    .values(&row)
                    .on_conflict((task_logs::task_id, task_logs::caregiver_id, task_logs::log_date))
                    .do_update()
                    .set((
                        task_logs::status.eq(excluded(task_logs::status)),
                        task_logs::notes.eq(excluded(task_logs::notes)),
                        task_logs::logged_at.eq(excluded(task_logs::logged_at)),
                    ))
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
            LogItem::MedicationDose(schedule_id) => {
                let row = NewMedicationLogRow {
                    id: Uuid::new_v4(),
                    medication_schedule_id: *schedule_id.as_uuid(),
                    caregiver_id: *entry.recorded_by.as_uuid(),
                    log_date: key.date(),
                    status: entry.status.as_str(),
                    notes: entry.notes.as_deref(),
                    logged_at: entry.logged_at,
                };
                diesel::insert_into(medication_logs::table)
                    .values(&row)
                    .on_conflict((
                        medication_logs::medication_schedule_id,
                        medication_logs::log_date,
                    ))
                    .do_update()
                    .set((
                        medication_logs::caregiver_id.eq(excluded(medication_logs::caregiver_id)),
                        medication_logs::status.eq(excluded(medication_logs::status)),
                        medication_logs::notes.eq(excluded(medication_logs::notes)),
                        medication_logs::logged_at.eq(excluded(medication_logs::logged_at)),
                    ))
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        }
    }

    async fn delete(&self, key: &DailyLogKey) -> Result<bool, DailyLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = match (key.item(), key.caregiver_id()) {
            (LogItem::Task(task_id), Some(caregiver_id)) => diesel::delete(
                task_logs::table
                    .filter(task_logs::task_id.eq(task_id.as_uuid()))
                    .filter(task_logs::caregiver_id.eq(caregiver_id.as_uuid()))
                    .filter(task_logs::log_date.eq(key.date())),
            )
            .execute(&mut conn)
            .await,
            (LogItem::Task(_), None) => {
                return Err(DailyLogRepositoryError::query("task log key without caregiver"));
            }
            (LogItem::MedicationDose(schedule_id), _) => diesel::delete(
                medication_logs::table
                    .filter(medication_logs::medication_schedule_id.eq(schedule_id.as_uuid()))
                    .filter(medication_logs::log_date.eq(key.date())),
            )
            .execute(&mut conn)
            .await,
        }
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(&self, key: &DailyLogKey) -> Result<Option<DailyLogEntry>, DailyLogRepositoryError> {
        Ok(self
            .find_many(std::slice::from_ref(key))
            .await?
            .into_iter()
            .next())
    }

    async fn find_many(
        &self,
        keys: &[DailyLogKey],
    ) -> Result<Vec<DailyLogEntry>, DailyLogRepositoryError> {
        let KeyBatches {
            task_ids,
            task_dates,
            dose_ids,
            dose_dates,
        } = KeyBatches::from_keys(keys);
        let wanted: HashSet<&DailyLogKey> = keys.iter().collect();
        let mut entries = Vec::new();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        if !task_ids.is_empty() {
            let rows: Vec<TaskLogRow> = task_logs::table
                .filter(task_logs::task_id.eq_any(task_ids))
                .filter(task_logs::log_date.eq_any(task_dates))
                .select(TaskLogRow::as_select())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            for row in rows {
                entries.push(task_log_entry(row)?);
            }
        }

        if !dose_ids.is_empty() {
            let rows: Vec<MedicationLogRow> = medication_logs::table
                .filter(medication_logs::medication_schedule_id.eq_any(dose_ids))
                .filter(medication_logs::log_date.eq_any(dose_dates))
                .select(MedicationLogRow::as_select())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            for row in rows {
                entries.push(medication_log_entry(row)?);
            }
        }

        entries.retain(|entry| wanted.contains(&entry.key));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).expect("valid date")
    }

    #[rstest]
    fn medication_rows_drop_the_caregiver_from_the_key() {
        let recorded_by = Uuid::new_v4();
        let entry = medication_log_entry(MedicationLogRow {
            medication_schedule_id: Uuid::new_v4(),
            caregiver_id: recorded_by,
            log_date: date(),
            status: "given".to_owned(),
            notes: None,
            logged_at: Utc::now(),
        })
        .expect("valid row");

        assert_eq!(entry.key.caregiver_id(), None);
        assert_eq!(entry.recorded_by, CaregiverId::from_uuid(recorded_by));
    }

    #[rstest]
    fn task_rows_keep_the_caregiver_in_the_key() {
        let caregiver = Uuid::new_v4();
        let entry = task_log_entry(TaskLogRow {
            task_id: Uuid::new_v4(),
            caregiver_id: caregiver,
            log_date: date(),
            status: "completed".to_owned(),
            notes: Some("done".to_owned()),
            logged_at: Utc::now(),
        })
        .expect("valid row");

        assert_eq!(entry.key.caregiver_id(), Some(CaregiverId::from_uuid(caregiver)));
        assert_eq!(entry.status, DailyLogStatus::Completed);
    }

    #[rstest]
    fn unknown_stored_status_is_a_query_error() {
        let result = task_log_entry(TaskLogRow {
            task_id: Uuid::new_v4(),
            caregiver_id: Uuid::new_v4(),
            log_date: date(),
            status: "teleported".to_owned(),
            notes: None,
            logged_at: Utc::now(),
        });
        assert!(matches!(result, Err(DailyLogRepositoryError::Query { .. })));
    }

    #[rstest]
    fn keys_are_batched_per_table() {
        let caregiver = CaregiverId::random();
        let keys = [
            DailyLogKey::new(LogItem::Task(TaskId::random()), caregiver, date()),
            DailyLogKey::new(LogItem::Task(TaskId::random()), caregiver, date()),
            DailyLogKey::new(
                LogItem::MedicationDose(MedicationScheduleId::random()),
                caregiver,
                date(),
            ),
        ];
        let batches = KeyBatches::from_keys(&keys);
        assert_eq!(batches.task_ids.len(), 2);
        assert_eq!(batches.dose_ids.len(), 1);
    }
}
