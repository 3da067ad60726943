//! Discord gateway subscriber — raw Gateway v10 WebSocket.
//!
//! Only listens; all sending goes through `DiscordRest`.
//!
//! Features:
//! - HELLO / IDENTIFY / RESUME handshake with heartbeat + zombie detection
//! - READY logs the bot user and keeps the session for resumes
//! - THREAD_CREATE → `ThreadCreatedEvent` on the bus
//! - Reconnect after a dropped session; fatal close codes end the subscriber

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use threadwatch_core::{EventBus, ThreadCreatedEvent};

use crate::base::EventSubscriber;

// ─────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────

/// Default Gateway WebSocket URL.
const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// Query appended to the resume URL handed out in READY.
const GATEWAY_QUERY: &str = "?v=10&encoding=json";

/// GUILDS (1) carries THREAD_CREATE; nothing else is needed.
const DEFAULT_INTENTS: u64 = 1;

/// Used when HELLO omits the interval.
const DEFAULT_HEARTBEAT_MS: u64 = 41250;

/// Wait between a dropped session and the next connection attempt.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Close codes after which reconnecting can't help (bad token, bad intents...).
const FATAL_CLOSE_CODES: &[u16] = &[4004, 4010, 4011, 4012, 4013, 4014];

// Gateway opcodes
const OP_DISPATCH: u64 = 0;
const OP_HEARTBEAT: u64 = 1;
const OP_IDENTIFY: u64 = 2;
const OP_RESUME: u64 = 6;
const OP_RECONNECT: u64 = 7;
const OP_INVALID_SESSION: u64 = 9;
const OP_HELLO: u64 = 10;
const OP_HEARTBEAT_ACK: u64 = 11;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// The gateway refused us in a way a reconnect won't fix.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("discord closed the gateway with code {code}: {reason}")]
    Fatal { code: u16, reason: String },
}

// ─────────────────────────────────────────────
// DiscordGateway
// ─────────────────────────────────────────────

/// Discord event subscriber over the raw Gateway WebSocket.
pub struct DiscordGateway {
    /// Bot token from Discord Developer Portal.
    token: String,
    /// Where thread events are published.
    bus: Arc<EventBus>,
    /// Gateway WebSocket URL.
    gateway_url: String,
    /// Gateway intents bitmask.
    intents: u64,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
    /// Set once `stop()` has been called.
    stopping: AtomicBool,
    /// Connection opened by `connect()`, consumed by the first session.
    pending: Mutex<Option<WsStream>>,
    /// Gateway sequence number for heartbeats.
    seq: Arc<Mutex<Option<u64>>>,
    /// Whether last heartbeat was ACKed (zombie detection).
    heartbeat_acked: Arc<Mutex<bool>>,
    /// Session ID for resume.
    session_id: Mutex<Option<String>>,
    /// Resume gateway URL (with query).
    resume_url: Mutex<Option<String>>,
}

impl DiscordGateway {
    /// Create a new gateway subscriber.
    pub fn new(token: String, bus: Arc<EventBus>) -> Self {
        Self::with_gateway_url(token, bus, DEFAULT_GATEWAY_URL)
    }

    /// Create a subscriber pointed at a custom gateway URL.
    pub fn with_gateway_url(token: String, bus: Arc<EventBus>, url: impl Into<String>) -> Self {
        Self {
            token,
            bus,
            gateway_url: url.into(),
            intents: DEFAULT_INTENTS,
            shutdown: Arc::new(Notify::new()),
            stopping: AtomicBool::new(false),
            pending: Mutex::new(None),
            seq: Arc::new(Mutex::new(None)),
            heartbeat_acked: Arc::new(Mutex::new(true)),
            session_id: Mutex::new(None),
            resume_url: Mutex::new(None),
        }
    }

    async fn open(&self, url: &str) -> anyhow::Result<WsStream> {
        debug!(url = %url, "connecting to discord gateway");
        let (ws, _) = tokio_tungstenite::connect_async(url)
            .await
            .with_context(|| format!("could not open discord gateway at {url}"))?;
        Ok(ws)
    }

    /// Resume URL if READY handed one out, else the default gateway.
    async fn session_url(&self) -> String {
        self.resume_url
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| self.gateway_url.clone())
    }

    /// Run sessions until shutdown or a fatal close.
    async fn run_gateway(&self) -> anyhow::Result<()> {
        loop {
            if self.stopping.load(Ordering::SeqCst) {
                return Ok(());
            }

            let pending = self.pending.lock().await.take();
            let result = match pending {
                Some(ws) => self.gateway_session(ws).await,
                None => {
                    let url = self.session_url().await;
                    match self.open(&url).await {
                        Ok(ws) => self.gateway_session(ws).await,
                        Err(e) => Err(e),
                    }
                }
            };

            match result {
                Ok(()) => {
                    info!("discord gateway session ended normally");
                    return Ok(());
                }
                Err(e) if e.downcast_ref::<GatewayError>().is_some() => {
                    error!(error = %e, "discord gateway closed, not reconnecting");
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, "discord gateway error, reconnecting in 5s");
                    tokio::select! {
                        _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                        _ = self.shutdown.notified() => {
                            info!("discord shutdown during reconnect wait");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Single Gateway WebSocket session. `Ok` only on requested shutdown.
    async fn gateway_session(&self, ws: WsStream) -> anyhow::Result<()> {
        let (write, mut read) = ws.split();
        let write = Arc::new(Mutex::new(write));
        let mut heartbeat: Option<tokio::task::JoinHandle<()>> = None;

        let result = loop {
            tokio::select! {
                msg = read.next() => {
                    let msg = match msg {
                        Some(Ok(m)) => m,
                        Some(Err(e)) => break Err(anyhow::Error::from(e).context("discord ws read error")),
                        None => break Err(anyhow::anyhow!("discord ws stream ended")),
                    };

                    let text = match msg {
                        WsMessage::Text(t) => t.to_string(),
                        WsMessage::Close(frame) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.to_string()))
                                .unwrap_or((1000, String::new()));
                            if FATAL_CLOSE_CODES.contains(&code) {
                                break Err(GatewayError::Fatal { code, reason }.into());
                            }
                            break Err(anyhow::anyhow!("discord ws closed by server (code {code})"));
                        }
                        _ => continue,
                    };

                    let payload: Value = match serde_json::from_str(&text) {
                        Ok(v) => v,
                        Err(e) => {
                            warn!(error = %e, "discord ws invalid json");
                            continue;
                        }
                    };

                    if let Some(s) = payload["s"].as_u64() {
                        *self.seq.lock().await = Some(s);
                    }

                    match payload["op"].as_u64() {
                        Some(OP_HELLO) => {
                            let interval = payload["d"]["heartbeat_interval"]
                                .as_u64()
                                .unwrap_or(DEFAULT_HEARTBEAT_MS);
                            debug!(interval_ms = interval, "discord HELLO received");

                            if let Some(h) = heartbeat.take() {
                                h.abort();
                            }
                            *self.heartbeat_acked.lock().await = true;
                            heartbeat = Some(self.spawn_heartbeat(write.clone(), interval));

                            let hello_reply = self.handshake_payload().await.to_string();
                            if let Err(e) = write.lock().await.send(WsMessage::text(hello_reply)).await {
                                break Err(e.into());
                            }
                        }
                        Some(OP_DISPATCH) => self.handle_dispatch(&payload).await,
                        Some(OP_HEARTBEAT_ACK) => {
                            *self.heartbeat_acked.lock().await = true;
                        }
                        Some(OP_HEARTBEAT) => {
                            // Server asked for an immediate beat
                            let s = *self.seq.lock().await;
                            let hb = json!({"op": OP_HEARTBEAT, "d": s}).to_string();
                            if let Err(e) = write.lock().await.send(WsMessage::text(hb)).await {
                                break Err(e.into());
                            }
                        }
                        Some(OP_RECONNECT) => {
                            info!("discord server requested reconnect");
                            break Err(anyhow::anyhow!("reconnect requested"));
                        }
                        Some(OP_INVALID_SESSION) => {
                            let resumable = payload["d"].as_bool().unwrap_or(false);
                            warn!(resumable = resumable, "discord invalid session");
                            if !resumable {
                                *self.session_id.lock().await = None;
                                *self.resume_url.lock().await = None;
                            }
                            break Err(anyhow::anyhow!("invalid session"));
                        }
                        _ => {}
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("discord shutdown signal received");
                    let _ = write.lock().await.send(WsMessage::Close(None)).await;
                    break Ok(());
                }
            }
        };

        if let Some(h) = heartbeat {
            h.abort();
        }
        result
    }

    /// IDENTIFY for a fresh session, RESUME when one is on record.
    async fn handshake_payload(&self) -> Value {
        let session = self.session_id.lock().await.clone();
        match session {
            Some(sid) => {
                let s = *self.seq.lock().await;
                json!({
                    "op": OP_RESUME,
                    "d": {
                        "token": self.token,
                        "session_id": sid,
                        "seq": s
                    }
                })
            }
            None => json!({
                "op": OP_IDENTIFY,
                "d": {
                    "token": self.token,
                    "intents": self.intents,
                    "properties": {
                        "os": std::env::consts::OS,
                        "browser": "threadwatch",
                        "device": "threadwatch"
                    }
                }
            }),
        }
    }

    /// Beat every `interval` ms. A missed ACK closes the socket so the
    /// session loop sees the stream end and reconnects.
    fn spawn_heartbeat(
        &self,
        write: Arc<Mutex<WsSink>>,
        interval: u64,
    ) -> tokio::task::JoinHandle<()> {
        let seq = self.seq.clone();
        let acked = self.heartbeat_acked.clone();

        tokio::spawn(async move {
            let jitter = interval as f64 * rand_jitter();
            tokio::time::sleep(Duration::from_millis(jitter as u64)).await;

            loop {
                {
                    let mut acked = acked.lock().await;
                    if !*acked {
                        warn!("discord heartbeat not ACKed, closing connection");
                        let _ = write.lock().await.close().await;
                        break;
                    }
                    *acked = false;
                }

                let s = *seq.lock().await;
                let hb = json!({"op": OP_HEARTBEAT, "d": s}).to_string();
                if let Err(e) = write.lock().await.send(WsMessage::text(hb)).await {
                    warn!(error = %e, "discord heartbeat write error");
                    break;
                }

                tokio::time::sleep(Duration::from_millis(interval)).await;
            }
        })
    }

    /// Handle an op-0 DISPATCH payload.
    async fn handle_dispatch(&self, payload: &Value) {
        let event_name = payload["t"].as_str().unwrap_or("");
        let data = &payload["d"];

        match event_name {
            "READY" => {
                if let Some(sid) = data["session_id"].as_str() {
                    *self.session_id.lock().await = Some(sid.to_string());
                }
                if let Some(url) = data["resume_gateway_url"].as_str() {
                    let url = format!("{}/{GATEWAY_QUERY}", url.trim_end_matches('/'));
                    *self.resume_url.lock().await = Some(url);
                }
                let user = data["user"]["username"].as_str().unwrap_or("unknown");
                info!(user = user, "connected to discord");
            }
            "RESUMED" => {
                info!("discord session resumed");
            }
            "THREAD_CREATE" => self.handle_thread_create(data).await,
            _ => {
                debug!(event = event_name, "discord event (unhandled)");
            }
        }
    }

    /// Handle a THREAD_CREATE event from the Gateway.
    async fn handle_thread_create(&self, data: &Value) {
        if is_membership_notice(data) {
            debug!(
                thread = data["id"].as_str().unwrap_or("?"),
                "added to an existing thread, ignoring"
            );
            return;
        }

        let Some(event) = parse_thread_create(data) else {
            warn!("THREAD_CREATE payload missing guild, parent, id or name; ignoring");
            return;
        };

        debug!(
            guild = %event.guild_id,
            parent = %event.parent_id,
            thread = %event.thread_id,
            "discord thread created"
        );

        if let Err(e) = self.bus.publish(event).await {
            error!(error = %e, "failed to publish thread event to bus");
        }
    }
}

/// THREAD_CREATE also fires when the bot joins an existing private thread;
/// those carry a `member` object and no `newly_created` flag.
pub fn is_membership_notice(data: &Value) -> bool {
    data.get("member").is_some() && !data["newly_created"].as_bool().unwrap_or(false)
}

/// Extract the fields the notifier needs from a THREAD_CREATE payload.
pub fn parse_thread_create(data: &Value) -> Option<ThreadCreatedEvent> {
    Some(ThreadCreatedEvent::new(
        data["guild_id"].as_str()?,
        data["parent_id"].as_str()?,
        data["id"].as_str()?,
        data["name"].as_str()?,
    ))
}

/// Simple jitter: a random fraction between 0.0 and 1.0 for heartbeat.
fn rand_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos as f64) / 1_000_000_000.0
}

#[async_trait]
impl EventSubscriber for DiscordGateway {
    fn name(&self) -> &str {
        "discord"
    }

    async fn connect(&self) -> anyhow::Result<()> {
        if self.token.is_empty() {
            return Err(anyhow::anyhow!("discord token is empty"));
        }

        let ws = self.open(&self.gateway_url).await?;
        *self.pending.lock().await = Some(ws);
        info!("discord connection opened");
        Ok(())
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("starting discord subscriber (gateway v10)");
        self.run_gateway().await
    }

    async fn stop(&self) -> anyhow::Result<()> {
        info!("stopping discord subscriber");
        self.stopping.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_gateway() -> (DiscordGateway, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new(32));
        (DiscordGateway::new("test_token".into(), bus.clone()), bus)
    }

    fn thread_create(d: Value) -> Value {
        json!({ "op": 0, "s": 3, "t": "THREAD_CREATE", "d": d })
    }

    #[test]
    fn test_subscriber_name() {
        let (gw, _) = create_test_gateway();
        assert_eq!(gw.name(), "discord");
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_INTENTS, 1);
        assert!(FATAL_CLOSE_CODES.contains(&4004));
        assert!(!FATAL_CLOSE_CODES.contains(&4000));
    }

    #[test]
    fn test_rand_jitter_range() {
        let j = rand_jitter();
        assert!((0.0..1.0).contains(&j));
    }

    #[test]
    fn test_parse_thread_create() {
        let data = json!({
            "id": "T1",
            "guild_id": "G1",
            "parent_id": "C1",
            "name": "Bug",
            "type": 11,
            "newly_created": true
        });
        let ev = parse_thread_create(&data).unwrap();
        assert_eq!(ev, ThreadCreatedEvent::new("G1", "C1", "T1", "Bug"));
    }

    #[test]
    fn test_parse_thread_create_missing_parent() {
        let data = json!({ "id": "T1", "guild_id": "G1", "name": "Bug" });
        assert!(parse_thread_create(&data).is_none());
    }

    #[test]
    fn test_membership_notice() {
        let joined = json!({ "id": "T1", "member": { "user_id": "B1" } });
        assert!(is_membership_notice(&joined));

        let created = json!({ "id": "T1", "member": { "user_id": "B1" }, "newly_created": true });
        assert!(!is_membership_notice(&created));

        let plain = json!({ "id": "T1", "newly_created": true });
        assert!(!is_membership_notice(&plain));
    }

    #[tokio::test]
    async fn test_thread_create_publishes() {
        let (gw, bus) = create_test_gateway();

        gw.handle_dispatch(&thread_create(json!({
            "id": "T1",
            "guild_id": "G1",
            "parent_id": "C1",
            "name": "Bug",
            "newly_created": true
        })))
        .await;

        let ev = bus.consume().await.unwrap();
        assert_eq!(ev.guild_id, "G1");
        assert_eq!(ev.parent_id, "C1");
        assert_eq!(ev.thread_id, "T1");
        assert_eq!(ev.name, "Bug");
    }

    #[tokio::test]
    async fn test_thread_join_not_published() {
        let (gw, bus) = create_test_gateway();

        gw.handle_dispatch(&thread_create(json!({
            "id": "T1",
            "guild_id": "G1",
            "parent_id": "C1",
            "name": "old thread",
            "member": { "user_id": "B1" }
        })))
        .await;
        gw.handle_dispatch(&thread_create(json!({
            "id": "T2",
            "guild_id": "G1",
            "parent_id": "C1",
            "name": "next",
            "newly_created": true
        })))
        .await;

        // The first event was dropped, so the next one on the bus is T2.
        assert_eq!(bus.consume().await.unwrap().thread_id, "T2");
    }

    #[tokio::test]
    async fn test_ready_stores_session() {
        let (gw, _) = create_test_gateway();

        gw.handle_dispatch(&json!({
            "op": 0,
            "t": "READY",
            "d": {
                "session_id": "sess-1",
                "resume_gateway_url": "wss://gateway-us-east1-b.discord.gg",
                "user": { "username": "threadwatch" }
            }
        }))
        .await;

        assert_eq!(gw.session_id.lock().await.as_deref(), Some("sess-1"));
        assert_eq!(
            gw.session_url().await,
            "wss://gateway-us-east1-b.discord.gg/?v=10&encoding=json"
        );
    }

    #[tokio::test]
    async fn test_session_url_default() {
        let (gw, _) = create_test_gateway();
        assert_eq!(gw.session_url().await, DEFAULT_GATEWAY_URL);
    }

    #[tokio::test]
    async fn test_handshake_identify_then_resume() {
        let (gw, _) = create_test_gateway();

        let identify = gw.handshake_payload().await;
        assert_eq!(identify["op"], OP_IDENTIFY);
        assert_eq!(identify["d"]["token"], "test_token");
        assert_eq!(identify["d"]["intents"], 1);

        *gw.session_id.lock().await = Some("sess-1".into());
        *gw.seq.lock().await = Some(42);
        let resume = gw.handshake_payload().await;
        assert_eq!(resume["op"], OP_RESUME);
        assert_eq!(resume["d"]["session_id"], "sess-1");
        assert_eq!(resume["d"]["seq"], 42);
    }

    #[tokio::test]
    async fn test_connect_empty_token() {
        let bus = Arc::new(EventBus::new(4));
        let gw = DiscordGateway::new(String::new(), bus);
        assert!(gw.connect().await.is_err());
    }

    #[tokio::test]
    async fn test_connect_unreachable_gateway() {
        let bus = Arc::new(EventBus::new(4));
        let gw = DiscordGateway::with_gateway_url("test_token".into(), bus, "ws://127.0.0.1:1");
        let err = gw.connect().await.unwrap_err();
        assert!(err.to_string().contains("could not open discord gateway"));
    }

    // ── Live sessions against a local gateway ──

    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;

    type ServerWs = WebSocketStream<TcpStream>;

    /// Accept one gateway connection on a local port and hand it to `script`.
    async fn local_gateway<F, Fut>(script: F) -> String
    where
        F: FnOnce(ServerWs) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            script(ws).await;
        });
        format!("ws://{addr}")
    }

    async fn send_json(ws: &mut ServerWs, payload: Value) {
        ws.send(WsMessage::text(payload.to_string())).await.unwrap();
    }

    /// Next non-heartbeat payload the client sent.
    async fn next_client_payload(ws: &mut ServerWs) -> Value {
        while let Some(Ok(msg)) = ws.next().await {
            if let WsMessage::Text(t) = msg {
                let v: Value = serde_json::from_str(&t).unwrap();
                if v["op"] != OP_HEARTBEAT {
                    return v;
                }
            }
        }
        panic!("client went away before sending a payload");
    }

    fn hello() -> Value {
        json!({ "op": OP_HELLO, "d": { "heartbeat_interval": 60000 } })
    }

    #[tokio::test]
    async fn test_live_session_identifies_and_stops_with_close() {
        let (handshake_tx, handshake_rx) = tokio::sync::oneshot::channel();
        let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();

        let url = local_gateway(|mut ws| async move {
            send_json(&mut ws, hello()).await;
            let _ = handshake_tx.send(next_client_payload(&mut ws).await);

            send_json(&mut ws, json!({
                "op": 0, "s": 1, "t": "READY",
                "d": { "session_id": "sess-1", "user": { "username": "threadwatch" } }
            }))
            .await;
            send_json(&mut ws, thread_create(json!({
                "id": "T1",
                "guild_id": "G1",
                "parent_id": "C1",
                "name": "Bug",
                "newly_created": true
            })))
            .await;

            let mut got_close = false;
            while let Some(Ok(msg)) = ws.next().await {
                if let WsMessage::Close(_) = msg {
                    got_close = true;
                    break;
                }
            }
            let _ = closed_tx.send(got_close);
        })
        .await;

        let bus = Arc::new(EventBus::new(8));
        let gw = Arc::new(DiscordGateway::with_gateway_url("test_token".into(), bus.clone(), url));
        gw.connect().await.unwrap();
        let runner = {
            let gw = gw.clone();
            tokio::spawn(async move { gw.start().await })
        };

        let identify = handshake_rx.await.unwrap();
        assert_eq!(identify["op"], OP_IDENTIFY);
        assert_eq!(identify["d"]["token"], "test_token");
        assert_eq!(identify["d"]["intents"], DEFAULT_INTENTS);

        let ev = tokio::time::timeout(Duration::from_secs(5), bus.consume())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ev, ThreadCreatedEvent::new("G1", "C1", "T1", "Bug"));
        assert_eq!(gw.session_id.lock().await.as_deref(), Some("sess-1"));

        gw.stop().await.unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert!(closed_rx.await.unwrap());
    }

    #[tokio::test]
    async fn test_live_session_fatal_close_ends_start() {
        let url = local_gateway(|mut ws| async move {
            send_json(&mut ws, hello()).await;
            let _ = next_client_payload(&mut ws).await;
            let frame = CloseFrame {
                code: CloseCode::from(4004u16),
                reason: "Authentication failed.".into(),
            };
            let _ = ws.send(WsMessage::Close(Some(frame))).await;
            while ws.next().await.is_some() {}
        })
        .await;

        let bus = Arc::new(EventBus::new(4));
        let gw = DiscordGateway::with_gateway_url("bad_token".into(), bus, url);
        gw.connect().await.unwrap();

        let err = tokio::time::timeout(Duration::from_secs(5), gw.start())
            .await
            .unwrap()
            .unwrap_err();
        match err.downcast_ref::<GatewayError>() {
            Some(GatewayError::Fatal { code, reason }) => {
                assert_eq!(*code, 4004);
                assert_eq!(reason, "Authentication failed.");
            }
            None => panic!("expected a fatal gateway error, got {err:#}"),
        }
    }

    #[tokio::test]
    async fn test_start_after_stop_returns() {
        let (gw, _) = create_test_gateway();
        gw.stop().await.unwrap();
        assert!(gw.start().await.is_ok());
    }
}
