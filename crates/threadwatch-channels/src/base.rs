//! EventSubscriber trait — the interface the relay uses to drive a platform
//! event stream.
//!
//! - `connect()` — open the connection; failure here is a startup failure
//! - `start()` — long-running: publish `ThreadCreatedEvent`s to the bus
//! - `stop()` — graceful shutdown
//! - `name()` — identifier for logs

use async_trait::async_trait;

/// A live subscription that feeds thread events into the `EventBus`.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Subscriber name (e.g. "discord").
    fn name(&self) -> &str;

    /// Open the connection. Called once before `start()`.
    ///
    /// An error here means the process never came up and should exit.
    async fn connect(&self) -> anyhow::Result<()>;

    /// Run until `stop()` is called. Returns an error only when the
    /// subscription can't continue at all (e.g. the token was rejected).
    async fn start(&self) -> anyhow::Result<()>;

    /// Graceful shutdown.
    async fn stop(&self) -> anyhow::Result<()>;
}
