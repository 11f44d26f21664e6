//! Driving port for resolving what an account may do.

use async_trait::async_trait;

use crate::domain::{Capabilities, Error, ProfileId};

/// Resolve account capabilities once per request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapabilityQuery: Send + Sync {
    /// Capabilities of `profile_id`.
    ///
    /// An unknown profile is not an error; it yields
    /// [`Capabilities::none`].
    async fn resolve(&self, profile_id: &ProfileId) -> Result<Capabilities, Error>;
}
