//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AppointmentCommand, CapabilityQuery, CarePlanCommand, CareTeamCommand, DailyLogCommand,
    DailyOverviewQuery, GuestAccess, LoginService, NotificationDispatch, PushSubscriptionCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Email/password authentication.
    pub login: Arc<dyn LoginService>,
    /// Role resolution for signed-in profiles.
    pub capabilities: Arc<dyn CapabilityQuery>,
    /// Access-code sessions.
    pub guest_access: Arc<dyn GuestAccess>,
    /// Caregiver daily view.
    pub overview: Arc<dyn DailyOverviewQuery>,
    /// Task and dose logging.
    pub daily_logs: Arc<dyn DailyLogCommand>,
    /// Care recipients and caregivers.
    pub care_team: Arc<dyn CareTeamCommand>,
    /// Schedules, tasks and medications.
    pub care_plan: Arc<dyn CarePlanCommand>,
    /// Appointments.
    pub appointments: Arc<dyn AppointmentCommand>,
    /// Push fan-out.
    pub notifications: Arc<dyn NotificationDispatch>,
    /// Push subscription bookkeeping.
    pub push_subscriptions: Arc<dyn PushSubscriptionCommand>,
    /// Server clock; supplies "today" when the client sends no date.
    pub clock: Arc<dyn Clock>,
}
