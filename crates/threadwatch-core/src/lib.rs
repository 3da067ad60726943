//! threadwatch core — routing config, event bus, and the notifier.
//!
//! This crate provides:
//! - **config**: `RoutingConfig` schema, the JSON loader, `.env` and token lookup
//! - **routing**: `RoutingTable` — source matching and destination listing
//! - **bus**: `EventBus` carrying `ThreadCreatedEvent`s from the gateway to the relay
//! - **formatting**: thread deep links, mention tokens, message templates
//! - **notifier**: pure fanout planning plus delivery through a `MessageSink`
//!
//! Nothing in here talks to the network; the Discord side lives in
//! `threadwatch-channels`.

pub mod bus;
pub mod config;
pub mod formatting;
pub mod notifier;
pub mod routing;

pub use bus::queue::EventBus;
pub use bus::types::{OutboundMessage, ThreadCreatedEvent};
pub use config::{ConfigError, RoutingConfig};
pub use notifier::{DeliveryReport, MessageSink, Notifier, SentMessage};
pub use routing::RoutingTable;
