//! Client payloads that are forwarded to the current partner.

use super::ConnectionId;

/// A relayable client event.
///
/// The payloads are opaque: SDP offers and answers, ICE candidates and chat
/// messages all pass through as [`serde_json::Value`] without validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientSignal {
    /// Offer a call to `user_to_call`, which must be the current partner.
    CallUser {
        /// Intended recipient.
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

impl ClientSignal {
    /// Returns the wire event name as a static string slice.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::CallUser { .. } => "callUser",
            Self::AnswerCall { .. } => "answerCall",
            Self::SendMessage(_) => "sendMessage",
        }
    }
}
