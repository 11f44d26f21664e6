//! Port for delivering a payload to one push subscription.

use async_trait::async_trait;

use crate::domain::{PushPayload, PushSubscription};

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by push transports.
    pub enum PushTransportError {
        /// The push service reports the subscription as permanently gone.
        Gone { message: String } => "push subscription gone: {message}",
        /// Delivery failed for any other reason.
        Failed { message: String } => "push delivery failed: {message}",
    }
}

/// Sends encrypted, signed Web Push messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Deliver `payload` to `subscription`.
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushTransportError>;
}
