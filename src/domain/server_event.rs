//! Events delivered from the server to a single connection.
//!
//! Every notification the engine or the relay produces is a [`ServerEvent`].
//! Events are pushed through a [`super::ConnectionHandle`] and serialized by
//! the WebSocket layer as `{"event": <name>, "data": {...}}`.

use serde::{Deserialize, Serialize};

use super::ConnectionId;

/// Why a chat session ended, from the point of view of the partner that stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatEndReason {
    /// The partner's connection closed.
    PartnerDisconnected,
    /// The partner asked for the next match.
    PartnerLeft,
}

impl ChatEndReason {
    /// Human-readable message shown to the remaining partner.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PartnerDisconnected => "Your partner has disconnected.",
            Self::PartnerLeft => "Your partner has left.",
        }
    }
}

/// Server to client event.
///
/// Signaling and chat payloads are carried as opaque [`serde_json::Value`]s
/// and never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First event on every connection: tells the client its own id.
    Connected {
        /// Identifier assigned to this connection.
        connection_id: ConnectionId,
    },

    /// The connection was paired with a partner.
    Matched {
        /// Identifier of the new partner.
        partner_id: ConnectionId,
    },

    /// The partner is offering a call.
    CallUser {
        /// Opaque signaling data (SDP offer, ICE candidate, ...).
        signal: serde_json::Value,
        /// Connection that placed the call.
        from: ConnectionId,
    },

    /// The partner accepted a call.
    CallAccepted {
        /// Opaque signaling data (SDP answer, ...).
        signal: serde_json::Value,
    },

    /// Chat message from the partner, forwarded verbatim.
    ReceiveMessage(serde_json::Value),

    /// The current session is over.
    ChatEnded {
        /// Machine-readable reason.
        reason: ChatEndReason,
        /// Human-readable message.
        message: String,
    },
}

impl ServerEvent {
    /// Builds a [`ServerEvent::ChatEnded`] carrying the reason's message.
    #[must_use]
    pub fn chat_ended(reason: ChatEndReason) -> Self {
        Self::ChatEnded {
            reason,
            message: reason.message().to_string(),
        }
    }

    /// Returns the wire event name as a static string slice.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Matched { .. } => "matched",
            Self::CallUser { .. } => "callUser",
            Self::CallAccepted { .. } => "callAccepted",
            Self::ReceiveMessage(_) => "receiveMessage",
            Self::ChatEnded { .. } => "chatEnded",
        }
    }
}
