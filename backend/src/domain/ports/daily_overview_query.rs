//! Driving port for the caregiver daily overview.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CaregiverId, DailyOverview, Error};

/// Request for a caregiver's overview of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyOverviewRequest {
    /// Caregiver whose schedules are read.
    pub caregiver_id: CaregiverId,
    /// Day being viewed.
    pub date: NaiveDate,
    /// Cap on the number of upcoming appointments.
    pub appointment_limit: Option<usize>,
}

/// Read the computed overview.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyOverviewQuery: Send + Sync {
    /// Compute the overview for `request`.
    async fn overview(&self, request: DailyOverviewRequest) -> Result<DailyOverview, Error>;
}
