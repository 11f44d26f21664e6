//! Care coordination backend.
//!
//! Admins maintain care recipients, caregivers, recurring schedules,
//! medications and appointments. Caregivers, signed in with an account or a
//! six-digit access code, see what is due on a given day and record what
//! happened. The crate is laid out hexagonally:
//!
//! - [`domain`]: entities, services and the ports they depend on.
//! - [`inbound`]: the actix-web REST adapter.
//! - [`outbound`]: PostgreSQL repositories and the Web Push transport.
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
