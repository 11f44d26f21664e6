//! Recording and retracting task and dose outcomes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::error_mapping::map_daily_log_error;
use crate::domain::ports::{DailyLogCommand, DailyLogRepository, SetLogStatusRequest};
use crate::domain::{CaregiverId, DailyLogEntry, DailyLogKey, Error, LogItem};

/// Service implementing [`DailyLogCommand`].
#[derive(Clone)]
pub struct DailyLogService<L> {
    logs: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> DailyLogService<L> {
    /// Create the service with its log repository and clock.
    pub fn new(logs: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { logs, clock }
    }
}

fn log_store_failure(err: Error, action: &str) -> Error {
    error!(action, error = %err, "daily log mutation failed");
    err
}

#[async_trait]
impl<L> DailyLogCommand for DailyLogService<L>
where
    L: DailyLogRepository,
{
    async fn set_status(&self, request: SetLogStatusRequest) -> Result<DailyLogEntry, Error> {
        let kind = request.item.kind();
        if !kind.accepts(request.status) {
            let allowed: Vec<_> = kind.vocabulary().iter().map(|s| s.as_str()).collect();
            return Err(Error::invalid_request(format!(
                "status {} is not valid for a {kind} log",
                request.status
            ))
            .with_details(json!({
                "field": "status",
                "code": "unsupported_status",
                "allowed": allowed,
            })));
        }

        let entry = DailyLogEntry {
            key: DailyLogKey::new(request.item, request.caregiver_id, request.date),
            recorded_by: request.caregiver_id,
            status: request.status,
            notes: request
                .notes
                .map(|notes| notes.trim().to_owned())
                .filter(|notes| !notes.is_empty()),
            logged_at: self.clock.utc(),
        };
        self.logs
            .upsert(&entry)
            .await
            .map_err(map_daily_log_error)
            .map_err(|err| log_store_failure(err, "set_status"))?;
        info!(
            kind = %kind,
            caregiver_id = %request.caregiver_id,
            date = %request.date,
            status = %request.status,
            "daily log recorded"
        );
        Ok(entry)
    }

    async fn clear_status(
        &self,
        item: LogItem,
        caregiver_id: CaregiverId,
        date: NaiveDate,
    ) -> Result<(), Error> {
        let key = DailyLogKey::new(item, caregiver_id, date);
        let removed = self
            .logs
            .delete(&key)
            .await
            .map_err(map_daily_log_error)
            .map_err(|err| log_store_failure(err, "clear_status"))?;
        info!(kind = %item.kind(), %caregiver_id, %date, removed, "daily log cleared");
        Ok(())
    }

    async fn find_status(
        &self,
        item: LogItem,
        caregiver_id: CaregiverId,
        date: NaiveDate,
    ) -> Result<Option<DailyLogEntry>, Error> {
        let key = DailyLogKey::new(item, caregiver_id, date);
        self.logs.find(&key).await.map_err(map_daily_log_error)
    }
}
