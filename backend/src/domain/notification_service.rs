//! Push notification fan-out and subscription bookkeeping.
//!
//! Every subscription of a user is attempted concurrently and independently,
//! and so is every user of a broadcast. A user whose subscriptions cannot be
//! read is reported with an error code instead of aborting the broadcast.
//! A transport `Gone` result deletes the subscription; the attempt still
//! counts as failed. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::error_mapping::map_push_subscription_error;
use crate::domain::ports::{
    NotificationDispatch, PushSubscriptionCommand, PushSubscriptionRepository, PushTransport,
    PushTransportError,
};
use crate::domain::{
    DispatchReport, Error, ProfileId, PushPayload, PushSubscription, UserDispatchResult,
};

/// Service implementing [`NotificationDispatch`] and
/// [`PushSubscriptionCommand`].
#[derive(Clone)]
pub struct NotificationService<S, T: ?Sized> {
    subscriptions: Arc<S>,
    transport: Arc<T>,
}

impl<S, T: ?Sized> NotificationService<S, T> {
    /// Create the service from the subscription store and transport.
    pub fn new(subscriptions: Arc<S>, transport: Arc<T>) -> Self {
        Self {
            subscriptions,
            transport,
        }
    }
}

impl<S, T: ?Sized> NotificationService<S, T>
where
    S: PushSubscriptionRepository,
    T: PushTransport,
{
    async fn deliver(&self, subscription: &PushSubscription, payload: &PushPayload) -> bool {
        match self.transport.send(subscription, payload).await {
            Ok(()) => true,
            Err(PushTransportError::Gone { message }) => {
                info!(user_id = %subscription.user_id, %message, "pruning gone push subscription");
                if let Err(err) = self
                    .subscriptions
                    .delete_by_endpoint(&subscription.endpoint)
                    .await
                {
                    warn!(error = %err, "failed to delete gone push subscription");
                }
                false
            }
            Err(PushTransportError::Failed { message }) => {
                warn!(user_id = %subscription.user_id, %message, "push delivery failed");
                false
            }
        }
    }
}

#[async_trait]
impl<S, T: ?Sized> NotificationDispatch for NotificationService<S, T>
where
    S: PushSubscriptionRepository,
    T: PushTransport,
{
    async fn send_to_user(
        &self,
        user_id: &ProfileId,
        payload: &PushPayload,
    ) -> Result<DispatchReport, Error> {
        let subscriptions = self
            .subscriptions
            .list_for_user(user_id)
            .await
            .map_err(map_push_subscription_error)?;
        if subscriptions.is_empty() {
            debug!(%user_id, "no push subscriptions");
            return Ok(DispatchReport::default());
        }

        let outcomes = join_all(
            subscriptions
                .iter()
                .map(|subscription| self.deliver(subscription, payload)),
        )
        .await;
        let sent = outcomes.iter().filter(|delivered| **delivered).count();
        Ok(DispatchReport {
            sent,
            failed: outcomes.len() - sent,
        })
    }

    async fn send_to_users(
        &self,
        user_ids: &[ProfileId],
        payload: &PushPayload,
    ) -> Result<Vec<UserDispatchResult>, Error> {
        let results = join_all(user_ids.iter().map(|user_id| async move {
            match self.send_to_user(user_id, payload).await {
                Ok(report) => UserDispatchResult::delivered(*user_id, report),
                Err(err) => {
                    warn!(%user_id, error = %err.message(), "push subscriptions unavailable");
                    UserDispatchResult::unreachable(*user_id, err.code())
                }
            }
        }))
        .await;
        Ok(results)
    }
}

#[async_trait]
impl<S, T: ?Sized> PushSubscriptionCommand for NotificationService<S, T>
where
    S: PushSubscriptionRepository,
    T: PushTransport,
{
    async fn subscribe(&self, subscription: PushSubscription) -> Result<(), Error> {
        self.subscriptions
            .upsert(&subscription)
            .await
            .map_err(map_push_subscription_error)
    }

    async fn unsubscribe(&self, user_id: &ProfileId, endpoint: &str) -> Result<(), Error> {
        let removed = self
            .subscriptions
            .delete_for_user(user_id, endpoint)
            .await
            .map_err(map_push_subscription_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("push subscription not found"))
        }
    }
}
