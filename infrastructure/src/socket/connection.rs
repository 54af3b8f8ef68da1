//! Socket.IO client connection over a single WebSocket.
//!
//! [`SocketIoConnection`] implements the [`PubSubConnection`] port. One
//! background task owns the WebSocket exclusively: it reads frames, answers
//! heartbeats, dispatches events into the listener table, and flushes the
//! outbound queue once the namespace handshake has completed.
//!
//! `emit` never touches the socket. It encodes the frame and pushes it onto an
//! unbounded channel, so emits issued before the handshake are buffered and
//! sent in order afterwards.

use super::codec::{self, Packet};
use super::config::SocketConfig;
use super::error::{Result, SocketError};
use futures::{SinkExt, StreamExt};
use inbox_application::ports::connection::{
    ConnectionError, Listener, ListenerId, PubSubConnection,
};
use inbox_application::ports::traffic_logger::{TrafficEvent, TrafficLogger};
use inbox_application::ListenerTable;
use inbox_domain::events;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::AUTHORIZATION};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Silence tolerated before the server's `open` packet tells us its timings
const INITIAL_LIVENESS_WINDOW: Duration = Duration::from_secs(45);

/// State shared between the handle and the background task
struct Shared {
    listeners: ListenerTable,
    connected: AtomicBool,
    closed: AtomicBool,
    sid: RwLock<Option<String>>,
    traffic: Arc<dyn TrafficLogger>,
}

impl Shared {
    fn set_sid(&self, sid: Option<String>) {
        *self.sid.write().unwrap_or_else(|e| e.into_inner()) = sid;
    }
}

/// How the background task ended
#[derive(Debug, PartialEq)]
enum Ending {
    /// Was connected; becomes a `disconnect` event
    Disconnected(String),
    /// Never got connected; becomes a `connect_error` event
    ConnectFailed(String),
}

fn lost(connected: bool, reason: &str) -> Ending {
    if connected {
        Ending::Disconnected(reason.to_string())
    } else {
        Ending::ConnectFailed(reason.to_string())
    }
}

/// A client connection to a Socket.IO server (default namespace only).
pub struct SocketIoConnection {
    shared: Arc<Shared>,
    outbound: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl SocketIoConnection {
    /// Start connecting in the background and return the handle immediately.
    ///
    /// When `token` is given it is sent as an `Authorization: Bearer` header
    /// and as the namespace auth payload `{"token": ..}`. Must be called from
    /// within a tokio runtime; otherwise the connection is born closed.
    pub fn open(
        config: SocketConfig,
        token: Option<String>,
        traffic: Arc<dyn TrafficLogger>,
    ) -> Arc<Self> {
        let shared = Arc::new(Shared {
            listeners: ListenerTable::new(),
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            sid: RwLock::new(None),
            traffic,
        });
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let task_shared = Arc::clone(&shared);
                let task_cancel = cancel.clone();
                handle.spawn(async move {
                    run(config, token, task_shared, outbound_rx, task_cancel).await;
                });
            }
            Err(_) => {
                warn!("Socket: no async runtime available, connection stays closed");
                shared.closed.store(true, Ordering::SeqCst);
            }
        }

        Arc::new(Self {
            shared,
            outbound,
            cancel,
        })
    }

    /// Disconnect from the server. Outstanding listeners receive `disconnect`.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

impl Drop for SocketIoConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl PubSubConnection for SocketIoConnection {
    fn id(&self) -> Option<String> {
        self.shared
            .sid
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        self.shared.listeners.add(event, listener, false)
    }

    fn once(&self, event: &str, listener: Listener) -> ListenerId {
        self.shared.listeners.add(event, listener, true)
    }

    fn off(&self, event: &str, id: ListenerId) -> bool {
        self.shared.listeners.remove(event, id)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.shared.listeners.count(event)
    }

    fn emit(&self, event: &str, payload: Value) -> std::result::Result<(), ConnectionError> {
        if events::is_reserved(event) {
            return Err(ConnectionError::ReservedEvent(event.to_string()));
        }
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }

        self.shared
            .traffic
            .log(TrafficEvent::outbound(event, &payload));
        let frame = codec::encode(&Packet::event(event, payload))
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;
        self.outbound
            .send(frame)
            .map_err(|_| ConnectionError::Closed)
    }
}

/// Background task: connect, pump frames, report how it ended.
async fn run(
    config: SocketConfig,
    token: Option<String>,
    shared: Arc<Shared>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) {
    let ending = tokio::select! {
        _ = cancel.cancelled() => Ending::ConnectFailed("io client disconnect".to_string()),
        connected = connect(&config, token.as_deref()) => match connected {
            Ok(ws) => pump(ws, token.as_deref(), &shared, &mut outbound, &cancel).await,
            Err(e) => Ending::ConnectFailed(e.to_string()),
        },
    };

    shared.connected.store(false, Ordering::SeqCst);
    shared.closed.store(true, Ordering::SeqCst);
    outbound.close();

    match ending {
        Ending::Disconnected(reason) => {
            shared
                .listeners
                .dispatch(events::DISCONNECT, &Value::String(reason));
        }
        Ending::ConnectFailed(message) => {
            warn!("Socket: connection to {} failed: {}", config.url, message);
            shared
                .listeners
                .dispatch(events::CONNECT_ERROR, &Value::String(message));
        }
    }
}

/// Open the WebSocket (HTTP upgrade) with the optional bearer token.
async fn connect(config: &SocketConfig, token: Option<&str>) -> Result<WsStream> {
    let endpoint = config.endpoint()?;
    debug!("Socket: connecting to {}", endpoint);

    // wss:// needs a process-wide rustls provider; a second install is a no-op
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut request = endpoint.as_str().into_client_request()?;
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| SocketError::Handshake(format!("invalid token header: {}", e)))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    let (ws, _response) = tokio::time::timeout(config.connect_timeout, connect_async(request))
        .await
        .map_err(|_| {
            SocketError::Handshake(format!("timed out after {:?}", config.connect_timeout))
        })??;
    Ok(ws)
}

async fn send_packet(ws: &mut WsStream, packet: &Packet) -> Result<()> {
    let frame = codec::encode(packet)?;
    trace!("Socket sent: {}", frame);
    ws.send(Message::Text(frame.into())).await?;
    Ok(())
}

/// Single owner of the WebSocket until it ends.
async fn pump(
    mut ws: WsStream,
    token: Option<&str>,
    shared: &Shared,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    cancel: &CancellationToken,
) -> Ending {
    let mut connected = false;
    let mut liveness = INITIAL_LIVENESS_WINDOW;
    let deadline = tokio::time::sleep(liveness);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if connected {
                    let _ = send_packet(&mut ws, &Packet::Disconnect).await;
                }
                let _ = ws.close(None).await;
                return lost(connected, "io client disconnect");
            }

            _ = &mut deadline => {
                return lost(connected, if connected { "ping timeout" } else { "handshake timed out" });
            }

            frame = outbound.recv(), if connected => {
                let Some(frame) = frame else {
                    return lost(connected, "io client disconnect");
                };
                trace!("Socket sent: {}", frame);
                if let Err(e) = ws.send(Message::Text(frame.into())).await {
                    warn!("Socket: write failed: {}", e);
                    return lost(connected, "transport error");
                }
            }

            message = ws.next() => {
                deadline.as_mut().reset(tokio::time::Instant::now() + liveness);

                let text = match message {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = ws.send(Message::Pong(payload)).await;
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => return lost(connected, "transport close"),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("Socket: read failed: {}", e);
                        return lost(connected, "transport error");
                    }
                };
                trace!("Socket received: {}", text.as_str());

                let packet = match codec::decode(text.as_str()) {
                    Ok(packet) => packet,
                    Err(e) => {
                        warn!("Socket: dropping malformed frame: {}", e);
                        continue;
                    }
                };

                match packet {
                    Packet::Open(info) => {
                        liveness = info.liveness_window();
                        deadline.as_mut().reset(tokio::time::Instant::now() + liveness);
                        let auth = token.map(|t| json!({ "token": t }));
                        if let Err(e) = send_packet(&mut ws, &Packet::Connect(auth)).await {
                            return Ending::ConnectFailed(e.to_string());
                        }
                    }
                    Packet::Ping => {
                        if send_packet(&mut ws, &Packet::Pong).await.is_err() {
                            return lost(connected, "transport error");
                        }
                    }
                    Packet::Connect(ack) => {
                        let sid = ack
                            .as_ref()
                            .and_then(|v| v.get("sid"))
                            .and_then(Value::as_str)
                            .map(str::to_string);
                        shared.set_sid(sid);
                        connected = true;
                        shared.connected.store(true, Ordering::SeqCst);
                        shared.listeners.dispatch(events::CONNECT, &Value::Null);
                    }
                    Packet::ConnectError(value) => {
                        let message = value
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| value.to_string());
                        let _ = ws.close(None).await;
                        return Ending::ConnectFailed(message);
                    }
                    Packet::Event { event, data } => {
                        shared.traffic.log(TrafficEvent::inbound(&event, &data));
                        let handled = shared.listeners.dispatch(&event, &data);
                        if handled == 0 {
                            debug!("Socket: no listener for '{}'", event);
                        }
                    }
                    Packet::Disconnect => {
                        info!("Socket: server closed the namespace");
                        return lost(connected, "io server disconnect");
                    }
                    Packet::Close => return lost(connected, "transport close"),
                    Packet::Pong | Packet::Noop => {}
                    Packet::Ignored(kind) => debug!("Socket: ignoring {} packet", kind),
                }
            }
        }
    }
}
