//! WebSocket message types: inbound client events and the outbound envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClientSignal, ConnectionId, ServerEvent};
use crate::error::GatewayError;

/// Top-level envelope for every server to client frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Server-generated frame ID.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Server → Client event (`matched`, `receiveMessage`, ...).
    Event,
    /// Server → Client error for a rejected frame.
    Error,
}

impl WsMessage {
    /// Wraps a [`ServerEvent`] in an `event` envelope.
    #[must_use]
    pub fn event(event: &ServerEvent) -> Self {
        Self::new(
            WsMessageType::Event,
            serde_json::to_value(event).unwrap_or_default(),
        )
    }

    /// Wraps a [`GatewayError`] in an `error` envelope.
    #[must_use]
    pub fn error(err: &GatewayError) -> Self {
        Self::new(
            WsMessageType::Error,
            serde_json::json!({
                "code": err.status_code().as_u16(),
                "message": err.to_string(),
            }),
        )
    }

    fn new(msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Serializes the envelope to a JSON text frame.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Events a client can send over WebSocket.
///
/// Frames look like `{"event": "sendMessage", "data": ...}`. `data` may be
/// omitted: `next` ignores it and `sendMessage` relays `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// End the current session and look for a new partner.
    Next,
    /// Offer a call to the partner.
    CallUser {
        /// Must be the current partner's id.
        user_to_call: ConnectionId,
        /// Opaque signaling data.
        signal_data: serde_json::Value,
    },
    /// Answer the partner's call.
    AnswerCall {
        /// Opaque signaling data.
        signal: serde_json::Value,
    },
    /// Chat message for the partner.
    SendMessage(serde_json::Value),
}

/// Raw inbound frame before the event name is resolved.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallUserData {
    user_to_call: ConnectionId,
    signal_data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AnswerCallData {
    signal: serde_json::Value,
}

impl ClientEvent {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidMessage`] for malformed JSON, an
    /// unknown event name, or `callUser`/`answerCall` data missing its
    /// fields.
    pub fn parse(text: &str) -> Result<Self, GatewayError> {
        let frame: InboundFrame = serde_json::from_str(text).map_err(invalid)?;
        match frame.event.as_str() {
            "next" => Ok(Self::Next),
            "callUser" => {
                let data: CallUserData = serde_json::from_value(frame.data).map_err(invalid)?;
                Ok(Self::CallUser {
                    user_to_call: data.user_to_call,
                    signal_data: data.signal_data,
                })
            }
            "answerCall" => {
                let data: AnswerCallData = serde_json::from_value(frame.data).map_err(invalid)?;
                Ok(Self::AnswerCall { signal: data.signal })
            }
            "sendMessage" => Ok(Self::SendMessage(frame.data)),
            other => Err(GatewayError::InvalidMessage(format!("unknown event `{other}`"))),
        }
    }

    /// Converts a relayable event into a [`ClientSignal`]; `None` for `next`.
    #[must_use]
    pub fn into_signal(self) -> Option<ClientSignal> {
        match self {
            Self::Next => None,
            Self::CallUser {
                user_to_call,
                signal_data,
            } => Some(ClientSignal::CallUser {
                user_to_call,
                signal_data,
            }),
            Self::AnswerCall { signal } => Some(ClientSignal::AnswerCall { signal }),
            Self::SendMessage(message) => Some(ClientSignal::SendMessage(message)),
        }
    }
}

fn invalid(err: serde_json::Error) -> GatewayError {
    GatewayError::InvalidMessage(err.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_next_without_data() {
        let Ok(event) = ClientEvent::parse(r#"{"event":"next"}"#) else {
            panic!("next should parse");
        };
        assert_eq!(event, ClientEvent::Next);
        assert_eq!(event.into_signal(), None);
    }

    #[test]
    fn parses_send_message_with_any_payload() {
        let Ok(event) = ClientEvent::parse(r#"{"event":"sendMessage","data":{"text":"hi"}}"#)
        else {
            panic!("sendMessage should parse");
        };
        assert_eq!(
            event.into_signal(),
            Some(ClientSignal::SendMessage(serde_json::json!({"text": "hi"})))
        );
    }

    #[test]
    fn send_message_without_data_relays_null() {
        let Ok(event) = ClientEvent::parse(r#"{"event":"sendMessage"}"#) else {
            panic!("sendMessage without data should parse");
        };
        assert_eq!(
            event.into_signal(),
            Some(ClientSignal::SendMessage(serde_json::Value::Null))
        );
    }

    #[test]
    fn next_ignores_any_data() {
        for frame in [
            r#"{"event":"next","data":{}}"#,
            r#"{"event":"next","data":null}"#,
            r#"{"event":"next","data":"again"}"#,
        ] {
            let Ok(event) = ClientEvent::parse(frame) else {
                panic!("{frame} should parse");
            };
            assert_eq!(event, ClientEvent::Next);
        }
    }

    #[test]
    fn parses_call_user() {
        let target = uuid::Uuid::from_u128(42);
        let frame = format!(
            r#"{{"event":"callUser","data":{{"userToCall":"{target}","signalData":{{"sdp":"x"}}}}}}"#
        );
        let Ok(event) = ClientEvent::parse(&frame) else {
            panic!("callUser should parse");
        };
        assert_eq!(
            event,
            ClientEvent::CallUser {
                user_to_call: ConnectionId::from_uuid(target),
                signal_data: serde_json::json!({"sdp": "x"}),
            }
        );
    }

    #[test]
    fn answer_call_ignores_extra_fields() {
        let Ok(event) =
            ClientEvent::parse(r#"{"event":"answerCall","data":{"signal":"s","to":"whoever"}}"#)
        else {
            panic!("answerCall should parse");
        };
        assert_eq!(
            event,
            ClientEvent::AnswerCall {
                signal: serde_json::json!("s")
            }
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_frames() {
        assert!(matches!(
            ClientEvent::parse(r#"{"event":"broadcast","data":"hi"}"#),
            Err(GatewayError::InvalidMessage(_))
        ));
        assert!(ClientEvent::parse("not json").is_err());
        assert!(ClientEvent::parse(r#"{"data":"no event name"}"#).is_err());
        assert!(ClientEvent::parse(r#"{"event":"callUser","data":{}}"#).is_err());
        assert!(ClientEvent::parse(r#"{"event":"answerCall"}"#).is_err());
    }

    #[test]
    fn event_envelope_wraps_payload() {
        let msg = WsMessage::event(&ServerEvent::Matched {
            partner_id: ConnectionId::from_uuid(uuid::Uuid::from_u128(1)),
        });
        assert_eq!(msg.msg_type, WsMessageType::Event);
        assert_eq!(
            msg.payload.get("event").and_then(|v| v.as_str()),
            Some("matched")
        );
        assert!(msg.to_json().contains(r#""type":"event""#));
    }

    #[test]
    fn error_envelope_uses_status_code() {
        let msg = WsMessage::error(&GatewayError::InvalidMessage("bad".to_string()));
        assert_eq!(msg.msg_type, WsMessageType::Error);
        assert_eq!(msg.payload.get("code").and_then(|v| v.as_u64()), Some(400));
    }
}
