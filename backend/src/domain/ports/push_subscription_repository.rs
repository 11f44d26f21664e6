//! Port for stored browser push subscriptions.

use async_trait::async_trait;

use crate::domain::{ProfileId, PushSubscription};

use super::define_port_error;

define_port_error! {
    /// Errors raised by push subscription repository adapters.
    pub enum PushSubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "push subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "push subscription repository query failed: {message}",
        /// The endpoint is registered to a different profile.
        EndpointTaken => "push endpoint is registered to another profile",
    }
}

/// Persistence for push subscriptions, unique on endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSubscriptionRepository: Send + Sync {
    /// Insert the subscription or refresh the keys of the row sharing its
    /// endpoint. Fails with `EndpointTaken` when that row has another owner.
    async fn upsert(
        &self,
        subscription: &PushSubscription,
    ) -> Result<(), PushSubscriptionRepositoryError>;

    /// Every subscription owned by `user_id`.
    async fn list_for_user(
        &self,
        user_id: &ProfileId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionRepositoryError>;

    /// Delete a subscription by endpoint regardless of owner.
    async fn delete_by_endpoint(&self, endpoint: &str)
    -> Result<bool, PushSubscriptionRepositoryError>;

    /// Delete a subscription by endpoint if `user_id` owns it.
    async fn delete_for_user(
        &self,
        user_id: &ProfileId,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionRepositoryError>;
}
