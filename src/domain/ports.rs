/*
   This module specifies the API by which the record-keeping layer hands
   domain events to the outbound notification machinery.
*/

use crate::domain::records::Record;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A domain mutation on its way to interested external observers
pub struct DomainEvent<'a> {
    /// Dot-namespaced identifier, `<entity>.<action>`
    pub event_type: &'a str,

    /// The record that triggered the event; borrowed for the duration of
    /// one publish call only
    pub record: &'a dyn Record,

    /// Additional key/value pairs merged into the outgoing payload.
    /// On key collision the extra value wins.
    pub extra: Option<Map<String, Value>>,
}

impl<'a> DomainEvent<'a> {
    pub fn new(event_type: &'a str, record: &'a dyn Record) -> Self {
        Self {
            event_type,
            record,
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Sink for domain events raised after create/update/delete operations.
///
/// Publishing is strictly one-way: implementations contain every failure
/// internally, so the operation that raised the event can never fail or
/// learn whether observers were reachable. Notification outcomes are
/// visible only through the delivery log.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: DomainEvent<'_>);
}
