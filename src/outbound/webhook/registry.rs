use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors raised by endpoint registration and lookup
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("at least one event type is required")]
    NoEventTypes,

    #[error("subscriber not found: {0}")]
    NotFound(Uuid),

    #[error("subscriber storage failed: {0}")]
    Storage(String),
}

/// A registered webhook endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    pub id: Uuid,

    pub url: String,

    /// Event types this endpoint wants, matched by exact string membership
    pub event_types: Vec<String>,

    pub is_active: bool,

    /// Shared signing secret; empty means deliveries are unsigned
    #[serde(skip_serializing, default)]
    pub secret: String,

    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    /// Check if this subscriber should receive a given event type.
    ///
    /// Inactive subscribers never match. The membership test is exact:
    /// no wildcard, prefix, or subscribe-to-everything form exists.
    pub fn matches_event(&self, event_type: &str) -> bool {
        if !self.is_active {
            return false;
        }

        self.event_types.iter().any(|t| t == event_type)
    }

    /// Secret to sign outgoing payloads with, or `None` when unsigned
    pub fn signing_secret(&self) -> Option<&str> {
        if self.secret.is_empty() {
            None
        } else {
            Some(&self.secret)
        }
    }
}

/// Registration input for a webhook endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscriber {
    pub url: String,

    pub event_types: Vec<String>,

    #[serde(default)]
    pub secret: String,
}

impl NewSubscriber {
    /// Validate the registration before any subscriber row is written
    pub fn validate(&self) -> Result<(), RegistryError> {
        let parsed = reqwest::Url::parse(&self.url).map_err(|e| RegistryError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RegistryError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if self.event_types.is_empty() {
            return Err(RegistryError::NoEventTypes);
        }

        Ok(())
    }

    /// Event types with duplicates removed, first occurrence wins
    fn normalized_event_types(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.event_types.len());
        for event_type in &self.event_types {
            if !seen.contains(event_type) {
                seen.push(event_type.clone());
            }
        }
        seen
    }
}

/// Durable store of webhook endpoint registrations
#[async_trait]
pub trait SubscriberRegistry: Send + Sync {
    /// Register an endpoint. Idempotent on URL: re-registering an existing
    /// URL updates its event types and secret (and re-activates it) instead
    /// of creating a duplicate row.
    async fn register(&self, registration: NewSubscriber) -> Result<Subscriber, RegistryError>;

    /// Active subscribers whose event-type set contains `event_type`,
    /// in stable registration order
    async fn find_active_subscribers(
        &self,
        event_type: &str,
    ) -> Result<Vec<Subscriber>, RegistryError>;

    async fn get(&self, id: Uuid) -> Result<Subscriber, RegistryError>;

    async fn list(&self) -> Result<Vec<Subscriber>, RegistryError>;

    /// Enable or disable dispatch to an endpoint
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Subscriber, RegistryError>;

    /// Replace the signing secret; an empty string turns signing off
    async fn rotate_secret(&self, id: Uuid, secret: String) -> Result<Subscriber, RegistryError>;
}

/// In-memory registry backed by a registration-ordered list
pub struct InMemorySubscriberRegistry {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl InMemorySubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemorySubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriberRegistry for InMemorySubscriberRegistry {
    async fn register(&self, registration: NewSubscriber) -> Result<Subscriber, RegistryError> {
        registration.validate()?;
        let event_types = registration.normalized_event_types();

        let mut subscribers = self.subscribers.write().await;

        if let Some(existing) = subscribers.iter_mut().find(|s| s.url == registration.url) {
            existing.event_types = event_types;
            existing.secret = registration.secret;
            existing.is_active = true;
            return Ok(existing.clone());
        }

        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            url: registration.url,
            event_types,
            is_active: true,
            secret: registration.secret,
            created_at: Utc::now(),
        };
        subscribers.push(subscriber.clone());

        Ok(subscriber)
    }

    async fn find_active_subscribers(
        &self,
        event_type: &str,
    ) -> Result<Vec<Subscriber>, RegistryError> {
        let subscribers = self.subscribers.read().await;

        Ok(subscribers
            .iter()
            .filter(|s| s.matches_event(event_type))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Subscriber, RegistryError> {
        let subscribers = self.subscribers.read().await;

        subscribers
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Subscriber>, RegistryError> {
        let subscribers = self.subscribers.read().await;
        Ok(subscribers.clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Subscriber, RegistryError> {
        let mut subscribers = self.subscribers.write().await;

        let subscriber = subscribers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        subscriber.is_active = active;
        Ok(subscriber.clone())
    }

    async fn rotate_secret(&self, id: Uuid, secret: String) -> Result<Subscriber, RegistryError> {
        let mut subscribers = self.subscribers.write().await;

        let subscriber = subscribers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        subscriber.secret = secret;
        Ok(subscriber.clone())
    }
}
