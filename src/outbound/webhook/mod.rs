// Webhook delivery module
//
// Leaf components (no knowledge of each other):
//   serializer, signer, http_client, registry, delivery_log
//
// Orchestration:
//   dispatcher: looks up subscribers for an event, drives one delivery
//   cycle per match, and records every outcome in the delivery log

pub mod delivery_log;
pub mod dispatcher;
pub mod http_client;
pub mod registry;
pub mod serializer;
pub mod signer;

// Re-export commonly used types
pub use delivery_log::{DeliveryAttempt, DeliveryLog, DeliveryLogError, InMemoryDeliveryLog};
pub use dispatcher::WebhookDispatcher;
pub use http_client::{DeliveryClient, DeliveryError, DeliveryResponse};
pub use registry::{
    InMemorySubscriberRegistry, NewSubscriber, RegistryError, Subscriber, SubscriberRegistry,
};
pub use serializer::serialize_record;
pub use signer::{format_signature_header, parse_signature_header, HmacSigner};
