//! In-memory adapters and an app harness for end-to-end HTTP tests.
//!
//! [`MemoryStore`] implements every driven repository port over
//! mutex-guarded tables, so the real domain services run unchanged behind
//! the real routes. [`RecordingPushTransport`] captures deliveries and can
//! report chosen endpoints as gone. [`SharedClock`] lets a test move time
//! forward between requests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use carelink::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, CareRecipientRepository,
    CareRecipientRepositoryError, CaregiverRepository, CaregiverRepositoryError,
    DailyLogRepository, DailyLogRepositoryError, MedicationRepository, MedicationRepositoryError,
    NotificationDispatch, ProfileRepository, ProfileRepositoryError, PushSubscriptionRepository,
    PushSubscriptionRepositoryError, PushTransport, PushTransportError, ScheduleRepository,
    ScheduleRepositoryError,
};
use carelink::domain::{
    AccessCode, AccountLoginService, Appointment, AppointmentId, AppointmentService,
    AppointmentStatus, CapabilityService, CarePlanService, CareRecipient, CareRecipientId,
    CareTeamService, Caregiver, CaregiverContact, CaregiverId, DailyLogEntry, DailyLogKey,
    DailyLogService, DailyOverviewRepositories, DailyOverviewService, DayOfWeek,
    GuestAccessService, LogItem, Medication, MedicationId, MedicationSchedule,
    MedicationScheduleId, NewCaregiver, NewCaregiverContact, NotificationService,
    PasswordDigest, Profile, ProfileId, PushPayload, PushSubscription, Role, Schedule, ScheduleId,
    Task, TaskId,
};
use carelink::inbound::http::routes::configure;
use carelink::inbound::http::state::HttpState;

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct horse battery";
/// Seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.org";
/// Seeded caregiver account.
pub const CAREGIVER_EMAIL: &str = "carer@example.org";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[derive(Default)]
struct Tables {
    profiles: Vec<(Profile, PasswordDigest)>,
    caregivers: Vec<Caregiver>,
    recipients: Vec<CareRecipient>,
    schedules: Vec<Schedule>,
    tasks: Vec<Task>,
    medications: Vec<Medication>,
    medication_schedules: Vec<MedicationSchedule>,
    appointments: Vec<Appointment>,
    logs: HashMap<DailyLogKey, DailyLogEntry>,
    subscriptions: Vec<PushSubscription>,
    failing_schedule_days: HashSet<DayOfWeek>,
}

impl Tables {
    fn profile(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles
            .iter()
            .map(|(profile, _)| profile)
            .find(|profile| profile.id == *id)
    }

    fn contact_for(&self, contact: &NewCaregiverContact) -> Result<CaregiverContact, CaregiverRepositoryError> {
        match contact {
            NewCaregiverContact::Linked(profile_id) => {
                let profile = self.profile(profile_id).ok_or_else(|| {
                    CaregiverRepositoryError::invalid_profile_link(format!(
                        "profile {profile_id} does not exist"
                    ))
                })?;
                if self
                    .caregivers
                    .iter()
                    .any(|c| c.profile_id() == Some(*profile_id))
                {
                    return Err(CaregiverRepositoryError::invalid_profile_link(format!(
                        "profile {profile_id} is already linked"
                    )));
                }
                Ok(CaregiverContact::Linked {
                    profile_id: *profile_id,
                    name: profile.name.clone(),
                    email: profile.email.clone(),
                })
            }
            NewCaregiverContact::Guest { name, phone, email } => Ok(CaregiverContact::Guest {
                name: name.clone(),
                phone: phone.clone(),
                email: email.clone(),
            }),
        }
    }

    fn code_taken(&self, code: &AccessCode, except: Option<CaregiverId>) -> bool {
        self.caregivers
            .iter()
            .any(|c| Some(c.id) != except && c.access_code.as_ref() == Some(code))
    }

    fn remove_schedules(&mut self, keep: impl Fn(&Schedule) -> bool) {
        let removed: Vec<ScheduleId> = self
            .schedules
            .iter()
            .filter(|s| !keep(s))
            .map(|s| s.id)
            .collect();
        self.schedules.retain(|s| keep(s));
        let tasks: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| removed.contains(&t.schedule_id))
            .map(|t| t.id)
            .collect();
        self.tasks.retain(|t| !removed.contains(&t.schedule_id));
        self.logs
            .retain(|key, _| !matches!(key.item(), LogItem::Task(id) if tasks.contains(&id)));
    }
}

/// Every repository port backed by one set of in-memory tables.
///
/// Deletes cascade the way the database foreign keys do.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Add an account profile with [`PASSWORD`].
    pub fn seed_profile(&self, role: Role, name: &str, email: &str) -> Profile {
        let profile = Profile {
            id: ProfileId::random(),
            role,
            name: name.to_owned(),
            email: email.to_owned(),
        };
        lock(&self.tables)
            .profiles
            .push((profile.clone(), PasswordDigest::generate(PASSWORD)));
        profile
    }

    /// Make every schedule insert for `day` fail with a query error.
    pub fn fail_schedule_inserts_on(&self, day: DayOfWeek) {
        lock(&self.tables).failing_schedule_days.insert(day);
    }

    /// Stored push subscriptions, in insertion order.
    pub fn subscriptions(&self) -> Vec<PushSubscription> {
        lock(&self.tables).subscriptions.clone()
    }

    /// Add a push subscription directly.
    pub fn seed_subscription(&self, user_id: ProfileId, endpoint: &str) {
        lock(&self.tables).subscriptions.push(PushSubscription {
            user_id,
            endpoint: endpoint.to_owned(),
            p256dh: "BPk2".to_owned(),
            auth: "c2VjcmV0".to_owned(),
            user_agent: None,
        });
    }

    /// Number of stored schedules.
    pub fn schedule_count(&self) -> usize {
        lock(&self.tables).schedules.len()
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(lock(&self.tables).profile(id).cloned())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Profile, PasswordDigest)>, ProfileRepositoryError> {
        Ok(lock(&self.tables)
            .profiles
            .iter()
            .find(|(profile, _)| profile.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl CaregiverRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Caregiver>, CaregiverRepositoryError> {
        Ok(lock(&self.tables).caregivers.clone())
    }

    async fn find_by_id(
        &self,
        id: &CaregiverId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError> {
        Ok(lock(&self.tables)
            .caregivers
            .iter()
            .find(|c| c.id == *id)
            .cloned())
    }

    async fn find_by_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<Caregiver>, CaregiverRepositoryError> {
        Ok(lock(&self.tables)
            .caregivers
            .iter()
            .find(|c| c.profile_id() == Some(*profile_id))
            .cloned())
    }

    async fn find_by_access_code(
        &self,
        code: &AccessCode,
    ) -> Result<Vec<Caregiver>, CaregiverRepositoryError> {
        Ok(lock(&self.tables)
            .caregivers
            .iter()
            .filter(|c| c.access_code.as_ref() == Some(code))
            .cloned()
            .collect())
    }

    async fn create(&self, caregiver: &NewCaregiver) -> Result<Caregiver, CaregiverRepositoryError> {
        let mut tables = lock(&self.tables);
        if let Some(code) = &caregiver.access_code {
            if tables.code_taken(code, None) {
                return Err(CaregiverRepositoryError::access_code_taken());
            }
        }
        let created = Caregiver {
            id: caregiver.id,
            contact: tables.contact_for(&caregiver.contact)?,
            access_code: caregiver.access_code.clone(),
            is_active: caregiver.is_active,
        };
        tables.caregivers.push(created.clone());
        Ok(created)
    }

    async fn set_active(
        &self,
        id: &CaregiverId,
        is_active: bool,
    ) -> Result<bool, CaregiverRepositoryError> {
        let mut tables = lock(&self.tables);
        let Some(caregiver) = tables.caregivers.iter_mut().find(|c| c.id == *id) else {
            return Ok(false);
        };
        caregiver.is_active = is_active;
        Ok(true)
    }

    async fn set_access_code(
        &self,
        id: &CaregiverId,
        code: Option<AccessCode>,
    ) -> Result<bool, CaregiverRepositoryError> {
        let mut tables = lock(&self.tables);
        if let Some(code) = &code {
            if tables.code_taken(code, Some(*id)) {
                return Err(CaregiverRepositoryError::access_code_taken());
            }
        }
        let Some(caregiver) = tables.caregivers.iter_mut().find(|c| c.id == *id) else {
            return Ok(false);
        };
        caregiver.access_code = code;
        Ok(true)
    }

    async fn delete(&self, id: &CaregiverId) -> Result<bool, CaregiverRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.caregivers.len();
        tables.caregivers.retain(|c| c.id != *id);
        if tables.caregivers.len() == before {
            return Ok(false);
        }
        tables.remove_schedules(|s| s.caregiver_id != *id);
        for appointment in &mut tables.appointments {
            if appointment.caregiver_id == Some(*id) {
                appointment.caregiver_id = None;
            }
        }
        tables.logs.retain(|_, entry| entry.recorded_by != *id);
        Ok(true)
    }
}

#[async_trait]
impl CareRecipientRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError> {
        let mut recipients = lock(&self.tables).recipients.clone();
        recipients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(recipients)
    }

    async fn find_many(
        &self,
        ids: &[CareRecipientId],
    ) -> Result<Vec<CareRecipient>, CareRecipientRepositoryError> {
        Ok(lock(&self.tables)
            .recipients
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn create(&self, recipient: &CareRecipient) -> Result<(), CareRecipientRepositoryError> {
        lock(&self.tables).recipients.push(recipient.clone());
        Ok(())
    }

    async fn delete(&self, id: &CareRecipientId) -> Result<bool, CareRecipientRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.recipients.len();
        tables.recipients.retain(|r| r.id != *id);
        if tables.recipients.len() == before {
            return Ok(false);
        }
        tables.remove_schedules(|s| s.care_recipient_id != *id);
        let medications: Vec<MedicationId> = tables
            .medications
            .iter()
            .filter(|m| m.care_recipient_id == *id)
            .map(|m| m.id)
            .collect();
        tables.medications.retain(|m| m.care_recipient_id != *id);
        tables
            .medication_schedules
            .retain(|s| !medications.contains(&s.medication_id));
        tables.appointments.retain(|a| a.care_recipient_id != *id);
        Ok(true)
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn list_for_caregiver_on(
        &self,
        caregiver_id: &CaregiverId,
        day: DayOfWeek,
    ) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        Ok(lock(&self.tables)
            .schedules
            .iter()
            .filter(|s| s.caregiver_id == *caregiver_id && s.day_of_week == day)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ScheduleId) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        Ok(lock(&self.tables)
            .schedules
            .iter()
            .find(|s| s.id == *id)
            .cloned())
    }

    async fn create(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut tables = lock(&self.tables);
        if tables.failing_schedule_days.contains(&schedule.day_of_week) {
            return Err(ScheduleRepositoryError::query("deadlock detected"));
        }
        if !tables.recipients.iter().any(|r| r.id == schedule.care_recipient_id) {
            return Err(ScheduleRepositoryError::missing_reference("care recipient"));
        }
        if !tables.caregivers.iter().any(|c| c.id == schedule.caregiver_id) {
            return Err(ScheduleRepositoryError::missing_reference("caregiver"));
        }
        tables.schedules.push(schedule.clone());
        Ok(())
    }

    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut tables = lock(&self.tables);
        let found = tables.schedules.iter().any(|s| s.id == *id);
        tables.remove_schedules(|s| s.id != *id);
        Ok(found)
    }

    async fn list_tasks(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> Result<Vec<Task>, ScheduleRepositoryError> {
        Ok(lock(&self.tables)
            .tasks
            .iter()
            .filter(|t| schedule_ids.contains(&t.schedule_id))
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &Task) -> Result<(), ScheduleRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.schedules.iter().any(|s| s.id == task.schedule_id) {
            return Err(ScheduleRepositoryError::missing_reference("schedule"));
        }
        tables.tasks.push(task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool, ScheduleRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != *id);
        tables
            .logs
            .retain(|key, _| key.item() != LogItem::Task(*id));
        Ok(tables.tasks.len() != before)
    }
}

#[async_trait]
impl MedicationRepository for MemoryStore {
    async fn list_active_for_recipients(
        &self,
        recipient_ids: &[CareRecipientId],
    ) -> Result<Vec<Medication>, MedicationRepositoryError> {
        Ok(lock(&self.tables)
            .medications
            .iter()
            .filter(|m| m.is_active && recipient_ids.contains(&m.care_recipient_id))
            .cloned()
            .collect())
    }

    async fn list_schedules(
        &self,
        medication_ids: &[MedicationId],
    ) -> Result<Vec<MedicationSchedule>, MedicationRepositoryError> {
        Ok(lock(&self.tables)
            .medication_schedules
            .iter()
            .filter(|s| medication_ids.contains(&s.medication_id))
            .cloned()
            .collect())
    }

    async fn create(&self, medication: &Medication) -> Result<(), MedicationRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables
            .recipients
            .iter()
            .any(|r| r.id == medication.care_recipient_id)
        {
            return Err(MedicationRepositoryError::missing_reference("care recipient"));
        }
        tables.medications.push(medication.clone());
        Ok(())
    }

    async fn set_active(
        &self,
        id: &MedicationId,
        is_active: bool,
    ) -> Result<bool, MedicationRepositoryError> {
        let mut tables = lock(&self.tables);
        let Some(medication) = tables.medications.iter_mut().find(|m| m.id == *id) else {
            return Ok(false);
        };
        medication.is_active = is_active;
        Ok(true)
    }

    async fn delete(&self, id: &MedicationId) -> Result<bool, MedicationRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.medications.len();
        tables.medications.retain(|m| m.id != *id);
        tables.medication_schedules.retain(|s| s.medication_id != *id);
        Ok(tables.medications.len() != before)
    }

    async fn create_schedule(
        &self,
        schedule: &MedicationSchedule,
    ) -> Result<(), MedicationRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.medications.iter().any(|m| m.id == schedule.medication_id) {
            return Err(MedicationRepositoryError::missing_reference("medication"));
        }
        tables.medication_schedules.push(schedule.clone());
        Ok(())
    }

    async fn delete_schedule(
        &self,
        id: &MedicationScheduleId,
    ) -> Result<bool, MedicationRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.medication_schedules.len();
        tables.medication_schedules.retain(|s| s.id != *id);
        tables
            .logs
            .retain(|key, _| key.item() != LogItem::MedicationDose(*id));
        Ok(tables.medication_schedules.len() != before)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn list_from(
        &self,
        recipient_ids: &[CareRecipientId],
        from: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(lock(&self.tables)
            .appointments
            .iter()
            .filter(|a| recipient_ids.contains(&a.care_recipient_id) && a.date >= from)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(lock(&self.tables)
            .appointments
            .iter()
            .find(|a| a.id == *id)
            .cloned())
    }

    async fn create(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables
            .recipients
            .iter()
            .any(|r| r.id == appointment.care_recipient_id)
        {
            return Err(AppointmentRepositoryError::missing_reference("care recipient"));
        }
        if let Some(caregiver_id) = appointment.caregiver_id {
            if !tables.caregivers.iter().any(|c| c.id == caregiver_id) {
                return Err(AppointmentRepositoryError::missing_reference("caregiver"));
            }
        }
        tables.appointments.push(appointment.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<bool, AppointmentRepositoryError> {
        let mut tables = lock(&self.tables);
        let Some(appointment) = tables.appointments.iter_mut().find(|a| a.id == *id) else {
            return Ok(false);
        };
        appointment.status = status;
        Ok(true)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != *id);
        Ok(tables.appointments.len() != before)
    }
}

#[async_trait]
impl DailyLogRepository for MemoryStore {
    async fn upsert(&self, entry: &DailyLogEntry) -> Result<(), DailyLogRepositoryError> {
        let mut tables = lock(&self.tables);
        let exists = match entry.key.item() {
            LogItem::Task(id) => tables.tasks.iter().any(|t| t.id == id),
            LogItem::MedicationDose(id) => tables.medication_schedules.iter().any(|s| s.id == id),
        };
        if !exists {
            return Err(DailyLogRepositoryError::missing_reference("logged item"));
        }
        tables.logs.insert(entry.key, entry.clone());
        Ok(())
    }

    async fn delete(&self, key: &DailyLogKey) -> Result<bool, DailyLogRepositoryError> {
        Ok(lock(&self.tables).logs.remove(key).is_some())
    }

    async fn find(&self, key: &DailyLogKey) -> Result<Option<DailyLogEntry>, DailyLogRepositoryError> {
        Ok(lock(&self.tables).logs.get(key).cloned())
    }

    async fn find_many(
        &self,
        keys: &[DailyLogKey],
    ) -> Result<Vec<DailyLogEntry>, DailyLogRepositoryError> {
        let tables = lock(&self.tables);
        Ok(keys
            .iter()
            .filter_map(|key| tables.logs.get(key).cloned())
            .collect())
    }
}

#[async_trait]
impl PushSubscriptionRepository for MemoryStore {
    async fn upsert(
        &self,
        subscription: &PushSubscription,
    ) -> Result<(), PushSubscriptionRepositoryError> {
        let mut tables = lock(&self.tables);
        match tables
            .subscriptions
            .iter_mut()
            .find(|s| s.endpoint == subscription.endpoint)
        {
            Some(existing) if existing.user_id != subscription.user_id => {
                Err(PushSubscriptionRepositoryError::endpoint_taken())
            }
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => {
                tables.subscriptions.push(subscription.clone());
                Ok(())
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: &ProfileId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionRepositoryError> {
        Ok(lock(&self.tables)
            .subscriptions
            .iter()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn delete_by_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| s.endpoint != endpoint);
        Ok(tables.subscriptions.len() != before)
    }

    async fn delete_for_user(
        &self,
        user_id: &ProfileId,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionRepositoryError> {
        let mut tables = lock(&self.tables);
        let before = tables.subscriptions.len();
        tables
            .subscriptions
            .retain(|s| !(s.user_id == *user_id && s.endpoint == endpoint));
        Ok(tables.subscriptions.len() != before)
    }
}

/// Push transport recording every delivery attempt.
#[derive(Default)]
pub struct RecordingPushTransport {
    sent: Mutex<Vec<(String, PushPayload)>>,
    gone: Mutex<HashSet<String>>,
}

impl RecordingPushTransport {
    /// Report `endpoint` as expired from now on.
    pub fn mark_gone(&self, endpoint: &str) {
        lock(&self.gone).insert(endpoint.to_owned());
    }

    /// Endpoints and payloads accepted so far.
    pub fn sent(&self) -> Vec<(String, PushPayload)> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl PushTransport for RecordingPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushTransportError> {
        if lock(&self.gone).contains(&subscription.endpoint) {
            return Err(PushTransportError::gone("410 Gone"));
        }
        lock(&self.sent).push((subscription.endpoint.clone(), payload.clone()));
        Ok(())
    }
}

/// Clock a test can move forward between requests.
pub struct SharedClock(Mutex<DateTime<Utc>>);

impl SharedClock {
    /// Start at `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move time forward.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = lock(&self.0);
        *now += by;
    }
}

impl Clock for SharedClock {
    fn local(&self) -> DateTime<Local> {
        lock(&self.0).with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Shared adapters plus the state built from them.
pub struct Harness {
    /// Repository tables.
    pub store: Arc<MemoryStore>,
    /// Push deliveries.
    pub push: Arc<RecordingPushTransport>,
    /// Time seen by the services.
    pub clock: Arc<SharedClock>,
    /// Seeded admin account.
    pub admin: Profile,
    /// Seeded account that can be linked to a caregiver.
    pub carer: Profile,
    state: web::Data<HttpState>,
}

impl Harness {
    /// Seed one admin and one caregiver account and wire the real services.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let push = Arc::new(RecordingPushTransport::default());
        let start = Utc
            .with_ymd_and_hms(2024, 6, 5, 9, 0, 0)
            .single()
            .expect("valid start time");
        let clock = Arc::new(SharedClock::starting_at(start));
        let admin = store.seed_profile(Role::Admin, "Ada Admin", ADMIN_EMAIL);
        let carer = store.seed_profile(Role::Caregiver, "Cara Carer", CAREGIVER_EMAIL);
        let state = build_state(&store, &push, &clock);
        Self {
            store,
            push,
            clock,
            admin,
            carer,
            state,
        }
    }

    /// Initialise the `/api/v1` scope behind a private cookie session.
    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .cookie_content_security(CookieContentSecurity::Private)
            .build();
        actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .service(web::scope("/api/v1").wrap(session).configure(configure)),
        )
        .await
    }
}

fn build_state(
    store: &Arc<MemoryStore>,
    push: &Arc<RecordingPushTransport>,
    clock: &Arc<SharedClock>,
) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = clock.clone();
    let notifications = Arc::new(NotificationService::new(Arc::clone(store), Arc::clone(push)));
    let dispatch: Arc<dyn NotificationDispatch> = notifications.clone();
    web::Data::new(HttpState {
        login: Arc::new(AccountLoginService::new(Arc::clone(store))),
        capabilities: Arc::new(CapabilityService::new(Arc::clone(store), Arc::clone(store))),
        guest_access: Arc::new(GuestAccessService::new(Arc::clone(store), Arc::clone(&clock))),
        overview: Arc::new(DailyOverviewService::new(DailyOverviewRepositories {
            schedules: Arc::clone(store),
            recipients: Arc::clone(store),
            medications: Arc::clone(store),
            appointments: Arc::clone(store),
            logs: Arc::clone(store),
        })),
        daily_logs: Arc::new(DailyLogService::new(Arc::clone(store), Arc::clone(&clock))),
        care_team: Arc::new(CareTeamService::new(Arc::clone(store), Arc::clone(store))),
        care_plan: Arc::new(CarePlanService::new(Arc::clone(store), Arc::clone(store))),
        appointments: Arc::new(AppointmentService::new(
            Arc::clone(store),
            Arc::clone(store),
            dispatch,
        )),
        notifications: notifications.clone(),
        push_subscriptions: notifications,
        clock,
    })
}

/// A cookie jar holding at most the session cookie.
#[derive(Default, Clone)]
pub struct Client {
    cookie: Option<Cookie<'static>>,
}

/// Status and JSON body (or `Null`) of a response.
pub struct Reply {
    /// Response status.
    pub status: StatusCode,
    /// Parsed body, `Value::Null` when empty.
    pub body: Value,
}

impl Reply {
    /// `code` of an error envelope.
    pub fn error_code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }

    /// `details.code` of an error envelope.
    pub fn detail_code(&self) -> &str {
        self.body["details"]["code"].as_str().unwrap_or_default()
    }
}

impl Client {
    /// Send `req` with the current session cookie and keep any cookie the
    /// response sets.
    pub async fn send<S, B>(&mut self, app: &S, req: actix_test::TestRequest) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = actix_test::call_service(app, req.to_request()).await;
        if let Some(cookie) = res.response().cookies().find(|c| c.name() == "session") {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        let status = res.status();
        let bytes = actix_test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        Reply { status, body }
    }

    /// Sign in with an account.
    pub async fn login<S, B>(&mut self, app: &S, email: &str) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "email": email, "password": PASSWORD }));
        self.send(app, req).await
    }

    /// Sign in with a guest access code.
    pub async fn guest_login<S, B>(&mut self, app: &S, code: &str) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/guest/login")
            .set_json(serde_json::json!({ "accessCode": code }));
        self.send(app, req).await
    }

    /// `GET` a path under the API scope.
    pub async fn get<S, B>(&mut self, app: &S, path: &str) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::get().uri(&format!("/api/v1{path}"));
        self.send(app, req).await
    }

    /// `POST` a JSON body to a path under the API scope.
    pub async fn post<S, B>(&mut self, app: &S, path: &str, body: Value) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/v1{path}"))
            .set_json(body);
        self.send(app, req).await
    }

    /// `PUT` a JSON body to a path under the API scope.
    pub async fn put<S, B>(&mut self, app: &S, path: &str, body: Value) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/v1{path}"))
            .set_json(body);
        self.send(app, req).await
    }

    /// `PATCH` a JSON body to a path under the API scope.
    pub async fn patch<S, B>(&mut self, app: &S, path: &str, body: Value) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::patch()
            .uri(&format!("/api/v1{path}"))
            .set_json(body);
        self.send(app, req).await
    }

    /// `DELETE` a path under the API scope.
    pub async fn delete<S, B>(&mut self, app: &S, path: &str) -> Reply
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = actix_test::TestRequest::delete().uri(&format!("/api/v1{path}"));
        self.send(app, req).await
    }
}
