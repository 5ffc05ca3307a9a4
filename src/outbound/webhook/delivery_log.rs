use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors raised by the delivery log store
#[derive(Debug, Error)]
pub enum DeliveryLogError {
    #[error("delivery attempt not found: {0}")]
    NotFound(Uuid),

    #[error("delivery attempt already finalized: {0}")]
    AlreadyFinalized(Uuid),

    #[error("delivery log storage failed: {0}")]
    Storage(String),
}

/// Durable record of one subscriber-specific notification try.
///
/// The row is written in a pending state before the network call and
/// completed exactly once afterwards. A row that stays pending (null
/// status, zero attempts) marks a delivery interrupted mid-flight,
/// distinguishable from a completed network failure (null status,
/// attempts 1, error text in the body) and from an HTTP failure
/// (status >= 400, attempts 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryAttempt {
    pub id: Uuid,

    pub subscriber_id: Uuid,

    pub event_type: String,

    /// The exact document sent, kept even when delivery fails, for
    /// audit and out-of-band replay
    pub payload: Value,

    /// None means no HTTP response was ever received
    pub status_code: Option<u16>,

    /// Response text, or the transport error description on failure
    pub response_body: String,

    pub success: bool,

    pub attempts: u32,

    pub created_at: DateTime<Utc>,
}

impl DeliveryAttempt {
    /// Pending shape, written before the network call starts
    fn pending(subscriber_id: Uuid, event_type: &str, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            subscriber_id,
            event_type: event_type.to_string(),
            payload,
            status_code: None,
            response_body: String::new(),
            success: false,
            attempts: 0,
            created_at: Utc::now(),
        }
    }
}

/// Append-only store of delivery attempts
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    /// Write the pending row for an attempt about to start; the returned
    /// id is the handle for `finalize`
    async fn record(
        &self,
        subscriber_id: Uuid,
        event_type: &str,
        payload: Value,
    ) -> Result<Uuid, DeliveryLogError>;

    /// Complete a pending row exactly once with the attempt outcome.
    /// `attempts` is written as 1 whatever the outcome was; no retry
    /// machinery exists to raise it further.
    async fn finalize(
        &self,
        attempt_id: Uuid,
        status_code: Option<u16>,
        response_body: String,
        success: bool,
    ) -> Result<(), DeliveryLogError>;

    async fn get(&self, attempt_id: Uuid) -> Result<DeliveryAttempt, DeliveryLogError>;

    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<DeliveryAttempt>, DeliveryLogError>;

    /// Most recent attempts first, capped at `limit`
    async fn list_recent(&self, limit: usize) -> Result<Vec<DeliveryAttempt>, DeliveryLogError>;
}

/// In-memory delivery log backed by an append-ordered list
pub struct InMemoryDeliveryLog {
    attempts: RwLock<Vec<DeliveryAttempt>>,
}

impl InMemoryDeliveryLog {
    pub fn new() -> Self {
        Self {
            attempts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryDeliveryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryLog for InMemoryDeliveryLog {
    async fn record(
        &self,
        subscriber_id: Uuid,
        event_type: &str,
        payload: Value,
    ) -> Result<Uuid, DeliveryLogError> {
        let attempt = DeliveryAttempt::pending(subscriber_id, event_type, payload);
        let id = attempt.id;

        let mut attempts = self.attempts.write().await;
        attempts.push(attempt);

        Ok(id)
    }

    async fn finalize(
        &self,
        attempt_id: Uuid,
        status_code: Option<u16>,
        response_body: String,
        success: bool,
    ) -> Result<(), DeliveryLogError> {
        let mut attempts = self.attempts.write().await;

        let attempt = attempts
            .iter_mut()
            .find(|a| a.id == attempt_id)
            .ok_or(DeliveryLogError::NotFound(attempt_id))?;

        if attempt.attempts > 0 {
            return Err(DeliveryLogError::AlreadyFinalized(attempt_id));
        }

        attempt.status_code = status_code;
        attempt.response_body = response_body;
        attempt.success = success;
        attempt.attempts = 1;

        Ok(())
    }

    async fn get(&self, attempt_id: Uuid) -> Result<DeliveryAttempt, DeliveryLogError> {
        let attempts = self.attempts.read().await;

        attempts
            .iter()
            .find(|a| a.id == attempt_id)
            .cloned()
            .ok_or(DeliveryLogError::NotFound(attempt_id))
    }

    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<DeliveryAttempt>, DeliveryLogError> {
        let attempts = self.attempts.read().await;

        Ok(attempts
            .iter()
            .filter(|a| a.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<DeliveryAttempt>, DeliveryLogError> {
        let attempts = self.attempts.read().await;

        Ok(attempts.iter().rev().take(limit).cloned().collect())
    }
}
