//! Port for task and medication dose logs.
//!
//! Adapters store each [`crate::domain::LogKind`] in its own table and key
//! rows by the composition carried in [`DailyLogKey`].

use async_trait::async_trait;

use crate::domain::{DailyLogEntry, DailyLogKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by daily log repository adapters.
    pub enum DailyLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "daily log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "daily log repository query failed: {message}",
        /// The logged item or caregiver does not exist.
        MissingReference { message: String } => "daily log reference missing: {message}",
    }
}

/// Persistence for daily logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyLogRepository: Send + Sync {
    /// Insert the entry or overwrite status, notes, recorder and timestamp of
    /// the row sharing its natural key.
    async fn upsert(&self, entry: &DailyLogEntry) -> Result<(), DailyLogRepositoryError>;

    /// Delete the row for `key`. Returns `false` when none existed.
    async fn delete(&self, key: &DailyLogKey) -> Result<bool, DailyLogRepositoryError>;

    /// Fetch the row for `key`.
    async fn find(&self, key: &DailyLogKey) -> Result<Option<DailyLogEntry>, DailyLogRepositoryError>;

    /// Fetch the rows for every key that has one.
    async fn find_many(
        &self,
        keys: &[DailyLogKey],
    ) -> Result<Vec<DailyLogEntry>, DailyLogRepositoryError>;
}
