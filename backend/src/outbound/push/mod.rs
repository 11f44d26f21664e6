//! Web Push delivery adapters implementing [`PushTransport`].
//!
//! [`PushTransport`]: crate::domain::ports::PushTransport

mod web_push_transport;

pub use web_push_transport::{DisabledPushTransport, VapidIdentity, WebPushTransport};
