//! Push notification payloads, subscriptions, and dispatch reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ErrorCode;
use super::ids::ProfileId;

/// Notification content forwarded to the push transport.
///
/// The JSON shape is also what the client notification-click handler reads
/// back; `data.url` selects the window to focus.
///
/// # Examples
/// ```
/// use carelink::domain::PushPayload;
///
/// let payload = PushPayload::new("Medication due", "Aspirin at 08:00").with_url("/today");
/// let json = serde_json::to_value(&payload).unwrap();
/// assert_eq!(json["url"], "/today");
/// assert!(json.get("icon").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Badge URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Tag used to replace earlier notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// URL opened on click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Keep the notification until the user acts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    /// Arbitrary extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

impl PushPayload {
    /// Payload with only a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
            badge: None,
            tag: None,
            url: None,
            require_interaction: None,
            data: None,
        }
    }

    /// Set the click-through URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the replacement tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A browser push subscription owned by a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscription {
    /// Owning profile.
    pub user_id: ProfileId,
    /// Push service endpoint, unique across subscriptions.
    pub endpoint: String,
    /// Client public key, base64url.
    pub p256dh: String,
    /// Client auth secret, base64url.
    pub auth: String,
    /// Browser user agent at subscription time.
    pub user_agent: Option<String>,
}

/// Delivery counts for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
pub struct DispatchReport {
    /// Subscriptions the transport accepted.
    pub sent: usize,
    /// Subscriptions that failed, including pruned ones.
    pub failed: usize,
}

/// Delivery outcome for one user in a multi-user dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDispatchResult {
    /// Target profile.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: ProfileId,
    /// Delivery counts.
    #[serde(flatten)]
    pub report: DispatchReport,
    /// Set when the user's subscriptions could not be read; the counts are
    /// then zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "service_unavailable")]
    pub error: Option<ErrorCode>,
}

impl UserDispatchResult {
    /// Outcome of a user whose subscriptions were attempted.
    pub fn delivered(user_id: ProfileId, report: DispatchReport) -> Self {
        Self {
            user_id,
            report,
            error: None,
        }
    }

    /// Outcome of a user whose subscriptions could not be looked up.
    pub fn unreachable(user_id: ProfileId, code: ErrorCode) -> Self {
        Self {
            user_id,
            report: DispatchReport::default(),
            error: Some(code),
        }
    }
}
