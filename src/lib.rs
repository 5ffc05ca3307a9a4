//! Chamahub backend: membership and finance record keeping with an
//! outbound webhook core that notifies subscribed endpoints of domain
//! events.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod server;
pub mod telemetry;
