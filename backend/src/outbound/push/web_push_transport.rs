//! Reqwest-backed Web Push transport.
//!
//! `web-push` handles VAPID signing and aes128gcm payload encryption; this
//! adapter owns the HTTP exchange with the browser push service and maps its
//! responses. A 404 or 410 from the push service means the subscription is
//! gone and is reported as [`PushTransportError::Gone`] so the dispatcher can
//! prune it.

use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use web_push::{
    ContentEncoding, PartialVapidSignatureBuilder, SubscriptionInfo, VapidSignatureBuilder,
    WebPushMessage, WebPushMessageBuilder,
};

use crate::domain::ports::{PushTransport, PushTransportError};
use crate::domain::{PushPayload, PushSubscription};

const DEFAULT_TTL_SECONDS: u32 = 24 * 60 * 60;

/// VAPID application identity.
pub struct VapidIdentity {
    /// Contact URI sent in the `sub` claim, e.g. `mailto:ops@example.org`.
    pub subject: String,
    /// Seconds the push service may hold an undelivered message.
    pub ttl_seconds: u32,
}

impl VapidIdentity {
    /// Identity with the default one-day TTL.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

/// Push transport that signs and encrypts with `web-push` and sends with
/// `reqwest`.
pub struct WebPushTransport {
    client: Client,
    signer: PartialVapidSignatureBuilder,
    identity: VapidIdentity,
}

impl WebPushTransport {
    /// Build a transport from a PEM-encoded VAPID private key.
    ///
    /// # Errors
    ///
    /// Returns [`PushTransportError::Failed`] when the key cannot be parsed or
    /// the HTTP client cannot be built.
    pub fn from_pem(
        pem: impl Read,
        identity: VapidIdentity,
        timeout: Duration,
    ) -> Result<Self, PushTransportError> {
        let signer = VapidSignatureBuilder::from_pem_no_sub(pem)
            .map_err(|err| PushTransportError::failed(format!("invalid VAPID key: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PushTransportError::failed(format!("http client: {err}")))?;
        Ok(Self {
            client,
            signer,
            identity,
        })
    }

    fn build_message(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<WebPushMessage, PushTransportError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.as_str(),
            subscription.p256dh.as_str(),
            subscription.auth.as_str(),
        );
        let content = serde_json::to_vec(payload)
            .map_err(|err| PushTransportError::failed(format!("payload encoding: {err}")))?;

        let mut signature = self.signer.clone().add_sub_info(&info);
        signature.add_claim("sub", self.identity.subject.as_str());
        let signature = signature
            .build()
            .map_err(|err| PushTransportError::failed(format!("VAPID signing: {err}")))?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &content);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.identity.ttl_seconds);
        builder
            .build()
            .map_err(|err| PushTransportError::failed(format!("payload encryption: {err}")))
    }
}

/// Map a push service response status onto the port result.
fn map_status(status: StatusCode, body: &str) -> Result<(), PushTransportError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            Err(PushTransportError::gone(format!("push service returned {status}")))
        }
        _ => Err(PushTransportError::failed(format!(
            "push service returned {status}: {body}"
        ))),
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushTransportError> {
        let message = self.build_message(subscription, payload)?;
        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());
        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }
        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }
        request = match message.payload {
            Some(encrypted) => {
                let mut request = request
                    .header("Content-Encoding", encrypted.content_encoding.to_str())
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream");
                for (name, value) in encrypted.crypto_headers {
                    request = request.header(name, value);
                }
                request.body(encrypted.content)
            }
            None => request.header(reqwest::header::CONTENT_LENGTH, "0"),
        };

        let response = request
            .send()
            .await
            .map_err(|err| PushTransportError::failed(err.to_string()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(%status, "push service responded");
        map_status(status, &body)
    }
}

/// Transport used when no VAPID key is configured; every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushTransport;

#[async_trait]
impl PushTransport for DisabledPushTransport {
    async fn send(
        &self,
        _subscription: &PushSubscription,
        _payload: &PushPayload,
    ) -> Result<(), PushTransportError> {
        Err(PushTransportError::failed("push delivery is not configured"))
    }
}
