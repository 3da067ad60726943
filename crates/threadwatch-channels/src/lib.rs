//! threadwatch channels — the platform side of the relay.
//!
//! This crate provides:
//! - **base**: the `EventSubscriber` trait the relay drives
//! - **discord**: `DiscordGateway`, a raw gateway v10 subscriber for THREAD_CREATE
//! - **rest**: `DiscordRest`, the REST `MessageSink` (send + embed suppression)

pub mod base;
pub mod discord;
pub mod rest;

pub use base::EventSubscriber;
pub use discord::DiscordGateway;
pub use rest::DiscordRest;
