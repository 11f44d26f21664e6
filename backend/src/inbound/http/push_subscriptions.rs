//! Push subscription endpoints for signed-in accounts.
//!
//! ```text
//! PUT    /api/v1/push-subscriptions {"endpoint":"https://...","p256dh":"...","auth":"..."}
//! DELETE /api/v1/push-subscriptions {"endpoint":"https://..."}
//! ```

use actix_web::{HttpResponse, delete, put, web};
use serde::Deserialize;
use url::Url;
use utoipa::ToSchema;

use crate::domain::{Error, PushSubscription};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, require_present};

const ENDPOINT: FieldName = FieldName::new("endpoint");

/// Browser subscription as produced by `PushManager.subscribe()`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscribeRequest {
    /// Push service endpoint.
    #[schema(example = "https://push.example.net/send/abc")]
    pub endpoint: Option<String>,
    /// Client public key, base64url.
    pub p256dh: Option<String>,
    /// Client auth secret, base64url.
    pub auth: Option<String>,
    /// Browser user agent.
    pub user_agent: Option<String>,
}

/// Endpoint of the subscription to remove.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UnsubscribeRequest {
    /// Push service endpoint.
    pub endpoint: Option<String>,
}

fn parse_endpoint(raw: Option<String>) -> Result<String, Error> {
    let raw = require_present(raw, ENDPOINT)?;
    let endpoint = raw.trim();
    match Url::parse(endpoint) {
        Ok(url) if url.scheme() == "https" && url.has_host() => Ok(endpoint.to_owned()),
        _ => Err(invalid_value_error(
            ENDPOINT,
            endpoint,
            "must be an absolute https URL",
        )),
    }
}

/// Store or refresh a push subscription for the signed-in profile.
#[utoipa::path(
    put,
    path = "/api/v1/push-subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 204, description = "Subscription stored"),
        (status = 400, description = "Invalid subscription", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 409, description = "Endpoint registered to another account", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "subscribePush"
)]
#[put("/push-subscriptions")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_profile_id()?;
    let SubscribeRequest {
        endpoint,
        p256dh,
        auth,
        user_agent,
    } = payload.into_inner();
    let subscription = PushSubscription {
        user_id,
        endpoint: parse_endpoint(endpoint)?,
        p256dh: require_present(p256dh, FieldName::new("p256dh"))?,
        auth: require_present(auth, FieldName::new("auth"))?,
        user_agent: user_agent.filter(|agent| !agent.trim().is_empty()),
    };
    state.push_subscriptions.subscribe(subscription).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove one of the signed-in profile's push subscriptions.
#[utoipa::path(
    delete,
    path = "/api/v1/push-subscriptions",
    request_body = UnsubscribeRequest,
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 400, description = "Missing endpoint", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "No such subscription", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "unsubscribePush"
)]
#[delete("/push-subscriptions")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UnsubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_profile_id()?;
    let endpoint = require_present(payload.into_inner().endpoint, ENDPOINT)?;
    state
        .push_subscriptions
        .unsubscribe(&user_id, endpoint.trim())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
