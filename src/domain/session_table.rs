//! Symmetric table of active one-to-one sessions.

use std::collections::HashMap;

use super::ConnectionId;

/// Maps every paired connection to its partner.
///
/// # Invariant
///
/// `lookup(a) == Some(b)` if and only if `lookup(b) == Some(a)`. Both
/// directions are written and erased inside the same `&mut self` call, so
/// no caller can observe a half-paired entry.
#[derive(Debug, Default)]
pub struct ActiveSessionTable {
    partners: HashMap<ConnectionId, ConnectionId>,
}

impl ActiveSessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `a` with `b` in both directions.
    ///
    /// Returns `false` and leaves the table unchanged if `a == b` or if
    /// either side is already paired.
    pub fn pair(&mut self, a: ConnectionId, b: ConnectionId) -> bool {
        if a == b || self.partners.contains_key(&a) || self.partners.contains_key(&b) {
            return false;
        }
        self.partners.insert(a, b);
        self.partners.insert(b, a);
        true
    }

    /// Dissolves the session containing `a`, returning the former partner.
    ///
    /// Returns `None` if `a` is not paired, so a second call is a no-op.
    pub fn unpair(&mut self, a: ConnectionId) -> Option<ConnectionId> {
        let partner = self.partners.remove(&a)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    /// Returns the current partner of `a`.
    #[must_use]
    pub fn lookup(&self, a: ConnectionId) -> Option<ConnectionId> {
        self.partners.get(&a).copied()
    }

    /// Returns `true` if `a` is in a session.
    #[must_use]
    pub fn is_paired(&self, a: ConnectionId) -> bool {
        self.partners.contains_key(&a)
    }

    /// Returns the number of sessions (each session counts once).
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// Iterates over every `(connection, partner)` direction.
    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionId, &ConnectionId)> {
        self.partners.iter()
    }
}
