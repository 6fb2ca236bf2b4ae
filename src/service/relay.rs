//! Stateless forwarding of signaling and chat payloads between partners.

use crate::domain::{
    ActiveSessionTable, ClientSignal, ConnectionId, ConnectionRegistry, ServerEvent,
};

/// What happened to a relayed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Queued on the partner's connection.
    Delivered,
    /// The sender has no partner; nothing was sent.
    NotPaired,
    /// `callUser` named someone other than the current partner.
    NotPartner,
    /// The partner exists but its connection refused the event.
    Dropped,
}

/// Routes a [`ClientSignal`] to the sender's current partner.
///
/// Borrows the session table and the registry for the duration of one
/// relay; it has no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct SignalRelay<'a> {
    sessions: &'a ActiveSessionTable,
    registry: &'a ConnectionRegistry,
}

impl<'a> SignalRelay<'a> {
    /// Creates a relay over the given table and registry.
    #[must_use]
    pub const fn new(sessions: &'a ActiveSessionTable, registry: &'a ConnectionRegistry) -> Self {
        Self { sessions, registry }
    }

    /// Forwards `signal` from `from` to its partner.
    ///
    /// Unpaired senders are silently ignored. Only `callUser` attaches
    /// routing metadata (the caller's id); everything else is forwarded
    /// as-is.
    pub fn relay(&self, from: ConnectionId, signal: ClientSignal) -> RelayOutcome {
        let Some(partner) = self.sessions.lookup(from) else {
            tracing::debug!(%from, event = signal.event_name(), "sender not paired, dropping");
            return RelayOutcome::NotPaired;
        };

        let event = match signal {
            ClientSignal::CallUser {
                user_to_call,
                signal_data,
            } => {
                if user_to_call != partner {
                    tracing::debug!(%from, %user_to_call, "call target is not the partner");
                    return RelayOutcome::NotPartner;
                }
                ServerEvent::CallUser {
                    signal: signal_data,
                    from,
                }
            }
            ClientSignal::AnswerCall { signal } => ServerEvent::CallAccepted { signal },
            ClientSignal::SendMessage(message) => ServerEvent::ReceiveMessage(message),
        };

        if self.registry.send(partner, event) {
            RelayOutcome::Delivered
        } else {
            RelayOutcome::Dropped
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ConnectionHandle;
    use tokio::sync::mpsc;

    fn id(n: u128) -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::from_u128(n))
    }

    struct Fixture {
        sessions: ActiveSessionTable,
        registry: ConnectionRegistry,
        receivers: Vec<(ConnectionId, mpsc::Receiver<ServerEvent>)>,
    }

    impl Fixture {
        fn new(ids: &[ConnectionId]) -> Self {
            let mut registry = ConnectionRegistry::new();
            let mut receivers = Vec::new();
            for id in ids {
                let (handle, rx) = ConnectionHandle::channel(*id, 8);
                registry.register(handle);
                receivers.push((*id, rx));
            }
            Self {
                sessions: ActiveSessionTable::new(),
                registry,
                receivers,
            }
        }

        fn relay(&self, from: ConnectionId, signal: ClientSignal) -> RelayOutcome {
            SignalRelay::new(&self.sessions, &self.registry).relay(from, signal)
        }

        fn drain(&mut self, target: ConnectionId) -> Vec<ServerEvent> {
            let mut events = Vec::new();
            for (id, rx) in &mut self.receivers {
                if *id == target {
                    while let Ok(event) = rx.try_recv() {
                        events.push(event);
                    }
                }
            }
            events
        }
    }

    #[test]
    fn message_reaches_partner_only() {
        let mut fx = Fixture::new(&[id(1), id(2), id(3)]);
        fx.sessions.pair(id(1), id(2));

        let outcome = fx.relay(id(1), ClientSignal::SendMessage(serde_json::json!("hi")));
        assert_eq!(outcome, RelayOutcome::Delivered);
        assert_eq!(
            fx.drain(id(2)),
            vec![ServerEvent::ReceiveMessage(serde_json::json!("hi"))]
        );
        assert!(fx.drain(id(1)).is_empty());
        assert!(fx.drain(id(3)).is_empty());
    }

    #[test]
    fn unpaired_sender_is_ignored() {
        let mut fx = Fixture::new(&[id(1), id(2)]);
        let outcome = fx.relay(id(1), ClientSignal::SendMessage(serde_json::json!("hi")));
        assert_eq!(outcome, RelayOutcome::NotPaired);
        assert!(fx.drain(id(2)).is_empty());
    }

    #[test]
    fn call_user_attaches_caller_id() {
        let mut fx = Fixture::new(&[id(1), id(2)]);
        fx.sessions.pair(id(1), id(2));
        let offer = serde_json::json!({"type": "offer", "sdp": "v=0"});

        let outcome = fx.relay(
            id(1),
            ClientSignal::CallUser {
                user_to_call: id(2),
                signal_data: offer.clone(),
            },
        );
        assert_eq!(outcome, RelayOutcome::Delivered);
        assert_eq!(
            fx.drain(id(2)),
            vec![ServerEvent::CallUser {
                signal: offer,
                from: id(1),
            }]
        );
    }

    #[test]
    fn call_user_to_stranger_is_refused() {
        let mut fx = Fixture::new(&[id(1), id(2), id(3)]);
        fx.sessions.pair(id(1), id(2));

        let outcome = fx.relay(
            id(1),
            ClientSignal::CallUser {
                user_to_call: id(3),
                signal_data: serde_json::Value::Null,
            },
        );
        assert_eq!(outcome, RelayOutcome::NotPartner);
        assert!(fx.drain(id(3)).is_empty());
        assert!(fx.drain(id(2)).is_empty());
    }

    #[test]
    fn answer_becomes_call_accepted() {
        let mut fx = Fixture::new(&[id(1), id(2)]);
        fx.sessions.pair(id(1), id(2));
        let answer = serde_json::json!({"type": "answer"});

        fx.relay(id(2), ClientSignal::AnswerCall { signal: answer.clone() });
        assert_eq!(
            fx.drain(id(1)),
            vec![ServerEvent::CallAccepted { signal: answer }]
        );
    }

    #[test]
    fn vanished_partner_reports_dropped() {
        let mut fx = Fixture::new(&[id(1), id(2)]);
        fx.sessions.pair(id(1), id(2));
        fx.registry.unregister(id(2));

        let outcome = fx.relay(id(1), ClientSignal::SendMessage(serde_json::json!("hi")));
        assert_eq!(outcome, RelayOutcome::Dropped);
    }
}
