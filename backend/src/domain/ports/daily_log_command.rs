//! Driving port for recording and retracting daily log entries.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CaregiverId, DailyLogEntry, DailyLogStatus, Error, LogItem};

/// Request to record an outcome for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLogStatusRequest {
    /// Logged item.
    pub item: LogItem,
    /// Acting caregiver.
    pub caregiver_id: CaregiverId,
    /// Day the outcome applies to.
    pub date: NaiveDate,
    /// Outcome; must belong to the item's vocabulary.
    pub status: DailyLogStatus,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Record, retract and read daily logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyLogCommand: Send + Sync {
    /// Insert or overwrite the log for the request's natural key.
    async fn set_status(&self, request: SetLogStatusRequest) -> Result<DailyLogEntry, Error>;

    /// Delete the log for the natural key. Succeeds when none exists.
    async fn clear_status(
        &self,
        item: LogItem,
        caregiver_id: CaregiverId,
        date: NaiveDate,
    ) -> Result<(), Error>;

    /// Current log for the natural key.
    async fn find_status(
        &self,
        item: LogItem,
        caregiver_id: CaregiverId,
        date: NaiveDate,
    ) -> Result<Option<DailyLogEntry>, Error>;
}
