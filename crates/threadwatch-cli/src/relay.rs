//! `threadwatch run` — wires config, gateway, and notifier together.
//!
//! Startup sequence:
//! 1. Load `.env`, the routing config, and the bot token
//! 2. Create the event bus, REST sink, and notifier
//! 3. Open the gateway connection (failure here is fatal)
//! 4. Relay: consume thread events and notify, until a termination signal

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use threadwatch_channels::{DiscordGateway, DiscordRest, EventSubscriber};
use threadwatch_core::config::{load_config, load_env_file, load_token};
use threadwatch_core::{EventBus, Notifier, RoutingTable};

use crate::{helpers, signals};

/// Buffered thread events between gateway and relay.
const EVENT_BUFFER: usize = 100;

/// How long a stopped subscriber gets to close its connection.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Paths and names for `run`, straight from the command line.
pub struct RunOptions {
    pub config: PathBuf,
    pub env_file: PathBuf,
    pub token_var: String,
}

/// Start up and relay until a termination signal.
pub async fn run(opts: RunOptions) -> Result<()> {
    // 1. Config and token
    load_env_file(Some(&opts.env_file))?;
    let config = load_config(Some(&opts.config))?;
    let token = load_token(&opts.token_var)?;
    let table = Arc::new(RoutingTable::new(config));

    // 2. Bus, sink, notifier
    let bus = Arc::new(EventBus::new(EVENT_BUFFER));
    let sink = Arc::new(DiscordRest::new(token.clone()).context("could not create discord client")?);
    let notifier = Notifier::new(table.clone(), sink);

    // 3. Gateway
    let gateway: Arc<dyn EventSubscriber> = Arc::new(DiscordGateway::new(token, bus.clone()));
    gateway
        .connect()
        .await
        .context("error opening discord connection")?;

    info!(
        sources = table.source_count(),
        destinations = table.destination_count(),
        template = table.settings().template.as_str(),
        suppress_embeds = table.settings().suppress_embeds,
        "relay starting"
    );
    helpers::print_banner(&table);

    // 4. Relay
    serve(gateway, bus, notifier, signals::shutdown_signal()).await?;

    println!("  Stopped.");
    Ok(())
}

/// Run the subscriber and handle its events until `shutdown` resolves.
///
/// Events are handled one at a time. A subscriber that fails after
/// connecting ends the relay with its error. On shutdown the subscriber is
/// stopped and its task awaited (bounded by `STOP_TIMEOUT`) so the
/// connection is closed before the process exits.
pub async fn serve<F>(
    subscriber: Arc<dyn EventSubscriber>,
    bus: Arc<EventBus>,
    notifier: Notifier,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let sub = subscriber.clone();
    let mut sub_task = tokio::spawn(async move { sub.start().await });
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = bus.consume() => {
                match event {
                    Some(event) => {
                        let report = notifier.notify(&event).await;
                        if report.attempted > 0 {
                            info!(
                                thread = %event.thread_id,
                                sent = report.sent,
                                failed = report.failed,
                                "notification fanout done"
                            );
                        }
                    }
                    None => {
                        info!("event bus closed");
                        break;
                    }
                }
            }
            result = &mut sub_task => {
                return match result {
                    Ok(Ok(())) => {
                        info!(subscriber = subscriber.name(), "subscriber exited");
                        Ok(())
                    }
                    Ok(Err(e)) => Err(e.context(format!("{} subscriber failed", subscriber.name()))),
                    Err(e) => Err(anyhow::anyhow!("{} subscriber panicked: {e}", subscriber.name())),
                };
            }
            _ = &mut shutdown => {
                info!("shutting down");
                subscriber.stop().await?;
                match tokio::time::timeout(STOP_TIMEOUT, &mut sub_task).await {
                    Ok(Ok(Ok(()))) => info!(subscriber = subscriber.name(), "subscriber closed"),
                    Ok(Ok(Err(e))) => {
                        warn!(subscriber = subscriber.name(), error = %e, "subscriber failed while closing")
                    }
                    Ok(Err(e)) => {
                        warn!(subscriber = subscriber.name(), error = %e, "subscriber panicked while closing")
                    }
                    Err(_) => {
                        warn!(subscriber = subscriber.name(), "subscriber did not close in time");
                        sub_task.abort();
                    }
                }
                break;
            }
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
