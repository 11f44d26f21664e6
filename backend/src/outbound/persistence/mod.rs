//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak into the domain.
//! - **Strongly typed errors**: Diesel failures are classified once and then
//!   mapped into each port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use carelink::outbound::persistence::{DbPool, DieselCaregiverRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/carelink")).await?;
//! let caregivers = DieselCaregiverRepository::new(pool);
//! # let _ = caregivers;
//! # Ok(())
//! # }
//! ```

mod diesel_appointment_repository;
mod diesel_care_recipient_repository;
mod diesel_caregiver_repository;
mod diesel_daily_log_repository;
mod diesel_error_mapping;
mod diesel_medication_repository;
mod diesel_profile_repository;
mod diesel_push_subscription_repository;
mod diesel_schedule_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_care_recipient_repository::DieselCareRecipientRepository;
pub use diesel_caregiver_repository::DieselCaregiverRepository;
pub use diesel_daily_log_repository::DieselDailyLogRepository;
pub use diesel_medication_repository::DieselMedicationRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_push_subscription_repository::DieselPushSubscriptionRepository;
pub use diesel_schedule_repository::DieselScheduleRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
