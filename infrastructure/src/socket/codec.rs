//! Socket.IO v4 text codec.
//!
//! Each WebSocket text frame carries one Engine.IO packet; Engine.IO
//! `message` packets (`4`) carry one Socket.IO packet. Only the default
//! namespace is spoken, so the two layers are flattened into [`Packet`].
//!
//! ```text
//! 0{"sid":..,"pingInterval":..}   open
//! 1                               close
//! 2 / 3                           ping / pong
//! 40{"token":..}                  connect (client → server, auth optional)
//! 40{"sid":".."}                  connect (server → client)
//! 41                              disconnect
//! 42["event",data]                event
//! 44{"message":".."}              connect error
//! ```

use super::error::{Result, SocketError};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Parameters announced by the server in the Engine.IO `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl OpenInfo {
    /// Longest silence tolerated before the server is considered gone
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval + self.ping_timeout)
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(OpenInfo),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect. Client side carries the auth payload, server side
    /// carries `{"sid": ..}`.
    Connect(Option<Value>),
    Disconnect,
    Event { event: String, data: Value },
    ConnectError(Value),
    /// Valid but unsupported here (acks, binary packets, other namespaces,
    /// transport upgrades).
    Ignored(&'static str),
}

impl Packet {
    pub fn event(event: impl Into<String>, data: Value) -> Self {
        Packet::Event {
            event: event.into(),
            data,
        }
    }
}

/// Decode one text frame.
pub fn decode(frame: &str) -> Result<Packet> {
    let mut chars = frame.chars();
    let engine = chars
        .next()
        .ok_or_else(|| SocketError::Protocol("empty frame".to_string()))?;
    let rest = chars.as_str();

    match engine {
        '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '5' => Ok(Packet::Ignored("upgrade")),
        '6' => Ok(Packet::Noop),
        other => Err(SocketError::Protocol(format!(
            "unknown Engine.IO packet type '{}'",
            other
        ))),
    }
}

fn decode_message(body: &str) -> Result<Packet> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| SocketError::Protocol("empty Socket.IO packet".to_string()))?;
    let mut rest = chars.as_str();

    // Namespaced packets look like `/admin,...`; only `/` is ours
    if rest.starts_with('/') {
        let (namespace, tail) = rest.split_once(',').unwrap_or((rest, ""));
        if namespace != "/" {
            return Ok(Packet::Ignored("foreign namespace"));
        }
        rest = tail;
    }

    match kind {
        '0' => {
            if rest.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                Ok(Packet::Connect(Some(serde_json::from_str(rest)?)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(strip_ack_id(rest)),
        '3' => Ok(Packet::Ignored("ack")),
        '4' => {
            let value = if rest.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(rest)?
            };
            Ok(Packet::ConnectError(value))
        }
        '5' | '6' => Ok(Packet::Ignored("binary")),
        other => Err(SocketError::Protocol(format!(
            "unknown Socket.IO packet type '{}'",
            other
        ))),
    }
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_event(body: &str) -> Result<Packet> {
    let Value::Array(mut args) = serde_json::from_str(body)? else {
        return Err(SocketError::Protocol("event payload is not an array".to_string()));
    };
    if args.is_empty() {
        return Err(SocketError::Protocol("event without a name".to_string()));
    }
    let Value::String(event) = args.remove(0) else {
        return Err(SocketError::Protocol("event name is not a string".to_string()));
    };

    let data = match args.len() {
        0 => Value::Null,
        1 => args.remove(0),
        _ => Value::Array(args),
    };
    Ok(Packet::Event { event, data })
}

/// Encode a packet as a text frame.
///
/// A `null` event payload is sent as an event without arguments.
pub fn encode(packet: &Packet) -> Result<String> {
    let frame = match packet {
        Packet::Open(_) => return Err(SocketError::Protocol("open is server-only".to_string())),
        Packet::Close => "1".to_string(),
        Packet::Ping => "2".to_string(),
        Packet::Pong => "3".to_string(),
        Packet::Noop => "6".to_string(),
        Packet::Connect(None) => "40".to_string(),
        Packet::Connect(Some(auth)) => format!("40{}", serde_json::to_string(auth)?),
        Packet::Disconnect => "41".to_string(),
        Packet::Event { event, data } => {
            let args = if data.is_null() {
                Value::Array(vec![Value::String(event.clone())])
            } else {
                Value::Array(vec![Value::String(event.clone()), data.clone()])
            };
            format!("42{}", serde_json::to_string(&args)?)
        }
        Packet::ConnectError(value) => format!("44{}", serde_json::to_string(value)?),
        Packet::Ignored(kind) => {
            return Err(SocketError::Protocol(format!("cannot encode {} packet", kind)));
        }
    };
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_open() {
        let packet = decode(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();
        let Packet::Open(info) = packet else {
            panic!("expected open, got {:?}", packet);
        };
        assert_eq!(info.sid, "abc");
        assert_eq!(info.liveness_window(), Duration::from_secs(45));
        assert_eq!(info.max_payload, Some(1_000_000));
    }

    #[test]
    fn test_decode_heartbeat_and_close() {
        assert_eq!(decode("2").unwrap(), Packet::Ping);
        assert_eq!(decode("3").unwrap(), Packet::Pong);
        assert_eq!(decode("1").unwrap(), Packet::Close);
        assert_eq!(decode("6").unwrap(), Packet::Noop);
    }

    #[test]
    fn test_decode_connect_ack() {
        assert_eq!(
            decode(r#"40{"sid":"xyz"}"#).unwrap(),
            Packet::Connect(Some(json!({ "sid": "xyz" })))
        );
        assert_eq!(decode("40").unwrap(), Packet::Connect(None));
        assert_eq!(
            decode(r#"40/,{"sid":"xyz"}"#).unwrap(),
            Packet::Connect(Some(json!({ "sid": "xyz" })))
        );
    }

    #[test]
    fn test_decode_event_argument_shapes() {
        assert_eq!(
            decode(r#"42["conversations",[{"id":1}]]"#).unwrap(),
            Packet::event("conversations", json!([{ "id": 1 }]))
        );
        assert_eq!(decode(r#"42["ping"]"#).unwrap(), Packet::event("ping", Value::Null));
        assert_eq!(
            decode(r#"42["multi",1,"two"]"#).unwrap(),
            Packet::event("multi", json!([1, "two"]))
        );
    }

    #[test]
    fn test_decode_event_with_ack_id() {
        assert_eq!(
            decode(r#"4217["replySent",{"success":true}]"#).unwrap(),
            Packet::event("replySent", json!({ "success": true }))
        );
    }

    #[test]
    fn test_decode_connect_error_and_disconnect() {
        assert_eq!(
            decode(r#"44{"message":"Not authorized"}"#).unwrap(),
            Packet::ConnectError(json!({ "message": "Not authorized" }))
        );
        assert_eq!(decode("41").unwrap(), Packet::Disconnect);
    }

    #[test]
    fn test_decode_ignores_unsupported_packets() {
        assert_eq!(decode(r#"42/admin,["x",1]"#).unwrap(), Packet::Ignored("foreign namespace"));
        assert_eq!(decode(r#"431[{}]"#).unwrap(), Packet::Ignored("ack"));
        assert_eq!(decode("451-[\"x\"]").unwrap(), Packet::Ignored("binary"));
        assert_eq!(decode("5").unwrap(), Packet::Ignored("upgrade"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("9").is_err());
        assert!(decode("4").is_err());
        assert!(decode(r#"42{"not":"array"}"#).is_err());
        assert!(decode("42[]").is_err());
        assert!(decode("42[1,2]").is_err());
    }

    #[test]
    fn test_encode_client_packets() {
        assert_eq!(encode(&Packet::Pong).unwrap(), "3");
        assert_eq!(encode(&Packet::Connect(None)).unwrap(), "40");
        assert_eq!(
            encode(&Packet::Connect(Some(json!({ "token": "t" })))).unwrap(),
            r#"40{"token":"t"}"#
        );
        assert_eq!(encode(&Packet::Disconnect).unwrap(), "41");
    }

    #[test]
    fn test_encode_event_omits_null_payload() {
        assert_eq!(
            encode(&Packet::event("getConversations", Value::Null)).unwrap(),
            r#"42["getConversations"]"#
        );
        assert_eq!(
            encode(&Packet::event("getMessages", json!({ "conversationId": 4 }))).unwrap(),
            r#"42["getMessages",{"conversationId":4}]"#
        );
    }

    #[test]
    fn test_encode_server_only_packets_fails() {
        assert!(encode(&Packet::Ignored("ack")).is_err());
    }
}
