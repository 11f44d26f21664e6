//! PostgreSQL-backed `PushSubscriptionRepository`.
//!
//! Subscriptions are unique on `endpoint`. Re-subscribing from the same
//! browser refreshes the keys of the existing row; an endpoint owned by
//! another profile is left untouched and reported as taken.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PushSubscriptionRepository, PushSubscriptionRepositoryError};
use crate::domain::{ProfileId, PushSubscription};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::{NewPushSubscriptionRow, PushSubscriptionRow};
use super::pool::{DbPool, PoolError};
use super::schema::push_subscriptions;

/// Diesel-backed implementation of the `PushSubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselPushSubscriptionRepository {
    pool: DbPool,
}

impl DieselPushSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PushSubscriptionRepositoryError {
    PushSubscriptionRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> PushSubscriptionRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => PushSubscriptionRepositoryError::connection(message),
        StoreFailure::ForeignKeyViolation { .. } => {
            PushSubscriptionRepositoryError::query("subscription owner does not exist")
        }
        StoreFailure::UniqueViolation { .. } => {
            PushSubscriptionRepositoryError::query("duplicate subscription")
        }
        StoreFailure::Query(message) => PushSubscriptionRepositoryError::query(message),
    }
}

#[async_trait]
impl PushSubscriptionRepository for DieselPushSubscriptionRepository {
    async fn upsert(
        &self,
        subscription: &PushSubscription,
    ) -> Result<(), PushSubscriptionRepositoryError> {
        use diesel::query_dsl::methods::FilterDsl;

        let row = NewPushSubscriptionRow {
            id: Uuid::new_v4(),
            user_id: *subscription.user_id.as_uuid(),
            endpoint: &subscription.endpoint,
            p256dh: &subscription.p256dh,
            auth: &subscription.auth,
            user_agent: subscription.user_agent.as_deref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::insert_into(push_subscriptions::table)
            .values(&row)
            .on_conflict(push_subscriptions::endpoint)
            .do_update()
            .set((
                push_subscriptions::p256dh.eq(excluded(push_subscriptions::p256dh)),
                push_subscriptions::auth.eq(excluded(push_subscriptions::auth)),
                push_subscriptions::user_agent.eq(excluded(push_subscriptions::user_agent)),
                push_subscriptions::updated_at.eq(diesel::dsl::now),
            ))
            .filter(push_subscriptions::user_id.eq(row.user_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        // Zero rows: the conflicting row belongs to someone else.
        if affected == 0 {
            return Err(PushSubscriptionRepositoryError::endpoint_taken());
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &ProfileId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PushSubscriptionRow> = push_subscriptions::table
            .filter(push_subscriptions::user_id.eq(user_id.as_uuid()))
            .select(PushSubscriptionRow::as_select())
            .order_by(push_subscriptions::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(PushSubscription::from).collect())
    }

    async fn delete_by_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            push_subscriptions::table.filter(push_subscriptions::endpoint.eq(endpoint)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_for_user(
        &self,
        user_id: &ProfileId,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            push_subscriptions::table
                .filter(push_subscriptions::endpoint.eq(endpoint))
                .filter(push_subscriptions::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
