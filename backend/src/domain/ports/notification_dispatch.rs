//! Driving ports for push notification delivery and subscription bookkeeping.

use async_trait::async_trait;

use crate::domain::{
    DispatchReport, Error, ProfileId, PushPayload, PushSubscription, UserDispatchResult,
};

/// Fan a payload out to users' push subscriptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Deliver `payload` to every subscription of `user_id`.
    async fn send_to_user(
        &self,
        user_id: &ProfileId,
        payload: &PushPayload,
    ) -> Result<DispatchReport, Error>;

    /// Deliver `payload` to each user in turn, reporting per user.
    async fn send_to_users(
        &self,
        user_ids: &[ProfileId],
        payload: &PushPayload,
    ) -> Result<Vec<UserDispatchResult>, Error>;
}

/// Store and remove a user's push subscriptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSubscriptionCommand: Send + Sync {
    /// Insert or overwrite the subscription sharing the endpoint.
    async fn subscribe(&self, subscription: PushSubscription) -> Result<(), Error>;

    /// Remove the user's subscription for `endpoint`.
    async fn unsubscribe(&self, user_id: &ProfileId, endpoint: &str) -> Result<(), Error>;
}
