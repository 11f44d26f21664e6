//! Builders wiring Diesel repositories and domain services into
//! [`HttpState`].

use std::fs::File;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use carelink::domain::ports::{NotificationDispatch, PushTransport};
use carelink::domain::{
    AccountLoginService, AppointmentService, CapabilityService, CarePlanService, CareTeamService,
    DailyLogService, DailyOverviewRepositories, DailyOverviewService, GuestAccessService,
    NotificationService,
};
use carelink::inbound::http::state::HttpState;
use carelink::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselCareRecipientRepository, DieselCaregiverRepository,
    DieselDailyLogRepository, DieselMedicationRepository, DieselProfileRepository,
    DieselPushSubscriptionRepository, DieselScheduleRepository,
};
use carelink::outbound::push::{DisabledPushTransport, VapidIdentity, WebPushTransport};

use super::config::PushSettings;

/// One repository handle per table family, all sharing the same pool.
struct Repositories {
    profiles: Arc<DieselProfileRepository>,
    caregivers: Arc<DieselCaregiverRepository>,
    recipients: Arc<DieselCareRecipientRepository>,
    schedules: Arc<DieselScheduleRepository>,
    medications: Arc<DieselMedicationRepository>,
    appointments: Arc<DieselAppointmentRepository>,
    logs: Arc<DieselDailyLogRepository>,
    push_subscriptions: Arc<DieselPushSubscriptionRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            caregivers: Arc::new(DieselCaregiverRepository::new(pool.clone())),
            recipients: Arc::new(DieselCareRecipientRepository::new(pool.clone())),
            schedules: Arc::new(DieselScheduleRepository::new(pool.clone())),
            medications: Arc::new(DieselMedicationRepository::new(pool.clone())),
            appointments: Arc::new(DieselAppointmentRepository::new(pool.clone())),
            logs: Arc::new(DieselDailyLogRepository::new(pool.clone())),
            push_subscriptions: Arc::new(DieselPushSubscriptionRepository::new(pool.clone())),
        }
    }
}

/// Load the VAPID key when one is configured; otherwise push delivery is
/// disabled and every send is reported as failed.
fn build_push_transport(settings: &PushSettings) -> std::io::Result<Arc<dyn PushTransport>> {
    let (Some(path), Some(subject)) = (&settings.vapid_key_file, &settings.vapid_subject) else {
        warn!("VAPID key or subject not configured; push delivery disabled");
        return Ok(Arc::new(DisabledPushTransport));
    };
    let pem = File::open(path).map_err(|err| {
        std::io::Error::other(format!("failed to open VAPID key {}: {err}", path.display()))
    })?;
    let transport = WebPushTransport::from_pem(pem, VapidIdentity::new(subject), settings.timeout)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(path = %path.display(), "push delivery enabled");
    Ok(Arc::new(transport))
}

/// Build the handler state from a database pool and push settings.
///
/// # Errors
///
/// Returns [`std::io::Error`] when a configured VAPID key cannot be loaded.
pub(super) fn build_http_state(
    pool: &DbPool,
    push: &PushSettings,
) -> std::io::Result<web::Data<HttpState>> {
    let repos = Repositories::new(pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let transport = build_push_transport(push)?;

    let notifications = Arc::new(NotificationService::new(
        Arc::clone(&repos.push_subscriptions),
        transport,
    ));
    let dispatch: Arc<dyn NotificationDispatch> = notifications.clone();

    let overview = DailyOverviewService::new(DailyOverviewRepositories {
        schedules: Arc::clone(&repos.schedules),
        recipients: Arc::clone(&repos.recipients),
        medications: Arc::clone(&repos.medications),
        appointments: Arc::clone(&repos.appointments),
        logs: Arc::clone(&repos.logs),
    });

    Ok(web::Data::new(HttpState {
        login: Arc::new(AccountLoginService::new(Arc::clone(&repos.profiles))),
        capabilities: Arc::new(CapabilityService::new(
            Arc::clone(&repos.profiles),
            Arc::clone(&repos.caregivers),
        )),
        guest_access: Arc::new(GuestAccessService::new(
            Arc::clone(&repos.caregivers),
            Arc::clone(&clock),
        )),
        overview: Arc::new(overview),
        daily_logs: Arc::new(DailyLogService::new(
            Arc::clone(&repos.logs),
            Arc::clone(&clock),
        )),
        care_team: Arc::new(CareTeamService::new(
            Arc::clone(&repos.recipients),
            Arc::clone(&repos.caregivers),
        )),
        care_plan: Arc::new(CarePlanService::new(
            Arc::clone(&repos.schedules),
            Arc::clone(&repos.medications),
        )),
        appointments: Arc::new(AppointmentService::new(
            Arc::clone(&repos.appointments),
            Arc::clone(&repos.caregivers),
            dispatch,
        )),
        notifications: notifications.clone(),
        push_subscriptions: notifications,
        clock,
    }))
}
