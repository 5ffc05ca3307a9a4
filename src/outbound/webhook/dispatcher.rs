use crate::domain::ports::{DomainEvent, EventSink};
use crate::domain::records::Record;
use crate::outbound::webhook::delivery_log::DeliveryLog;
use crate::outbound::webhook::http_client::{DeliveryClient, DeliveryError};
use crate::outbound::webhook::registry::{Subscriber, SubscriberRegistry};
use crate::outbound::webhook::serializer::serialize_record;
use crate::outbound::webhook::signer::HmacSigner;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fans one domain event out to every matching endpoint.
///
/// Responsibilities:
/// 1. Build the event envelope and encode it once, so every subscriber
///    (and the signature) sees the same byte sequence.
/// 2. Ask the registry for active subscribers matching the event type.
/// 3. Per subscriber: write the pending log row, sign when a secret is
///    set, POST, finalize the row with whatever outcome resulted.
///
/// Subscribers are processed sequentially in registry order, one attempt
/// each. Every failure is contained here: `dispatch` returns nothing, and
/// the triggering operation proceeds identically whether endpoints were
/// reachable or not. The delivery log is the only place outcomes surface.
pub struct WebhookDispatcher {
    registry: Arc<dyn SubscriberRegistry>,

    delivery_log: Arc<dyn DeliveryLog>,

    /// HTTP client reused across all requests.
    http_client: DeliveryClient,
}

impl WebhookDispatcher {
    /// Create a dispatcher with a default delivery client (30 s timeout)
    pub fn new(
        registry: Arc<dyn SubscriberRegistry>,
        delivery_log: Arc<dyn DeliveryLog>,
    ) -> Result<Self, DeliveryError> {
        Ok(Self::with_client(
            registry,
            delivery_log,
            DeliveryClient::new()?,
        ))
    }

    /// Create a dispatcher with a pre-configured delivery client
    pub fn with_client(
        registry: Arc<dyn SubscriberRegistry>,
        delivery_log: Arc<dyn DeliveryLog>,
        http_client: DeliveryClient,
    ) -> Self {
        Self {
            registry,
            delivery_log,
            http_client,
        }
    }

    /// Notify every matching endpoint of one domain event.
    ///
    /// `extra` entries are merged into the envelope after the standard
    /// keys, so a caller-supplied key wins on collision.
    pub async fn dispatch(
        &self,
        event_type: &str,
        record: &dyn Record,
        extra: Option<Map<String, Value>>,
    ) {
        debug!(event_type = %event_type, "Dispatching event");

        // Build the envelope once for all matching subscribers.
        let envelope = build_envelope(event_type, record, extra);
        let body = match serde_json::to_string(&Value::Object(envelope.clone())) {
            Ok(body) => body,
            Err(e) => {
                error!(
                    event_type = %event_type,
                    error = %e,
                    "Failed to encode webhook payload, dispatch dropped"
                );
                return;
            }
        };

        let subscribers = match self.registry.find_active_subscribers(event_type).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!(
                    event_type = %event_type,
                    error = %e,
                    "Subscriber lookup failed, dispatch dropped"
                );
                return;
            }
        };

        if subscribers.is_empty() {
            debug!(event_type = %event_type, "No subscribers matched, event dropped");
            return;
        }

        for subscriber in &subscribers {
            self.deliver_to(subscriber, event_type, &envelope, &body)
                .await;
        }
    }

    /// Run one delivery cycle for a single subscriber.
    ///
    /// Nothing propagates out of here; a subscriber's failure must not
    /// block delivery to the ones after it.
    async fn deliver_to(
        &self,
        subscriber: &Subscriber,
        event_type: &str,
        envelope: &Map<String, Value>,
        body: &str,
    ) {
        // Pending row first: the log must show the attempt even if the
        // process dies mid-call.
        let attempt_id = match self
            .delivery_log
            .record(subscriber.id, event_type, Value::Object(envelope.clone()))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(
                    subscriber_id = %subscriber.id,
                    event_type = %event_type,
                    error = %e,
                    "Failed to write pending delivery row, skipping endpoint"
                );
                return;
            }
        };

        let signature = subscriber
            .signing_secret()
            .map(|secret| HmacSigner::new(secret).sign(body.as_bytes()));

        let result = self
            .http_client
            .deliver(&subscriber.url, event_type, body, signature.as_deref())
            .await;

        let finalized = match result {
            Ok(response) => {
                let success = response.status_code < 400;

                if success {
                    info!(
                        subscriber_id = %subscriber.id,
                        event_type = %event_type,
                        status_code = response.status_code,
                        "Webhook delivered successfully"
                    );
                } else {
                    warn!(
                        subscriber_id = %subscriber.id,
                        event_type = %event_type,
                        status_code = response.status_code,
                        "Webhook rejected by endpoint"
                    );
                }

                self.delivery_log
                    .finalize(attempt_id, Some(response.status_code), response.body, success)
                    .await
            }
            Err(e) => {
                warn!(
                    subscriber_id = %subscriber.id,
                    event_type = %event_type,
                    url = %subscriber.url,
                    error = %e,
                    "Webhook delivery failed"
                );

                self.delivery_log
                    .finalize(attempt_id, None, e.to_string(), false)
                    .await
            }
        };

        if let Err(e) = finalized {
            error!(
                subscriber_id = %subscriber.id,
                attempt_id = %attempt_id,
                error = %e,
                "Failed to record delivery outcome"
            );
        }
    }
}

#[async_trait]
impl EventSink for WebhookDispatcher {
    async fn publish(&self, event: DomainEvent<'_>) {
        self.dispatch(event.event_type, event.record, event.extra)
            .await;
    }
}

// ---------------------------------------------------------------------------
// Envelope building
// ---------------------------------------------------------------------------

/// Assemble the transport envelope for one domain event.
///
/// The `timestamp` key is always present: the record's creation time in
/// ISO-8601 when it has one, JSON null otherwise.
fn build_envelope(
    event_type: &str,
    record: &dyn Record,
    extra: Option<Map<String, Value>>,
) -> Map<String, Value> {
    let mut envelope = Map::new();

    envelope.insert(
        "event_type".to_string(),
        Value::String(event_type.to_string()),
    );
    envelope.insert(
        "timestamp".to_string(),
        record
            .created_at()
            .map_or(Value::Null, |t| Value::String(t.to_rfc3339())),
    );
    envelope.insert(
        "data".to_string(),
        Value::Object(serialize_record(record)),
    );

    if let Some(extra) = extra {
        for (key, value) in extra {
            envelope.insert(key, value);
        }
    }

    envelope
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
