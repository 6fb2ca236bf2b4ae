//! FIFO queue of connections waiting for a partner.

use std::collections::{HashSet, VecDeque};

use super::ConnectionId;

/// Ordered set of connections waiting to be paired.
///
/// Insertion order decides who is matched first. A [`VecDeque`] keeps the
/// order and a [`HashSet`] mirrors its contents for O(1) membership, so an id
/// can never be queued twice.
#[derive(Debug, Default)]
pub struct AvailablePool {
    queue: VecDeque<ConnectionId>,
    members: HashSet<ConnectionId>,
}

impl AvailablePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the back of the queue.
    ///
    /// Returns `false` (and keeps the existing position) if `id` is already
    /// waiting.
    pub fn enqueue(&mut self, id: ConnectionId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    /// Puts `id` at the head of the queue, ahead of everyone waiting.
    ///
    /// Returns `false` (and keeps the existing position) if `id` is already
    /// waiting.
    pub fn push_front(&mut self, id: ConnectionId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.queue.push_front(id);
        true
    }

    /// Removes `id` wherever it sits in the queue.
    ///
    /// Returns `false` if `id` was not waiting.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.queue.retain(|queued| *queued != id);
        true
    }

    /// Pops the two longest-waiting ids, oldest first.
    ///
    /// Leaves the pool untouched and returns `None` when fewer than two ids
    /// are waiting.
    pub fn dequeue_two(&mut self) -> Option<(ConnectionId, ConnectionId)> {
        if self.queue.len() < 2 {
            return None;
        }
        let first = self.queue.pop_front()?;
        let second = self.queue.pop_front()?;
        self.members.remove(&first);
        self.members.remove(&second);
        Some((first, second))
    }

    /// Returns `true` if `id` is waiting.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    /// Returns the number of waiting ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterates over the waiting ids, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionId> {
        self.queue.iter()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn id(n: u128) -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::from_u128(n))
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut pool = AvailablePool::new();
        assert!(pool.enqueue(id(1)));
        assert!(!pool.enqueue(id(1)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut pool = AvailablePool::new();
        pool.enqueue(id(1));
        assert!(pool.remove(id(1)));
        assert!(!pool.remove(id(1)));
        assert!(pool.is_empty());
        assert!(!pool.contains(id(1)));
    }

    #[test]
    fn dequeue_two_needs_two_waiting() {
        let mut pool = AvailablePool::new();
        assert_eq!(pool.dequeue_two(), None);

        pool.enqueue(id(1));
        assert_eq!(pool.dequeue_two(), None);
        assert!(pool.contains(id(1)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn dequeue_two_is_fifo() {
        let mut pool = AvailablePool::new();
        for n in 1..=4 {
            pool.enqueue(id(n));
        }
        assert_eq!(pool.dequeue_two(), Some((id(1), id(2))));
        assert_eq!(pool.dequeue_two(), Some((id(3), id(4))));
        assert!(pool.is_empty());
    }

    #[test]
    fn remove_from_middle_keeps_order() {
        let mut pool = AvailablePool::new();
        for n in 1..=3 {
            pool.enqueue(id(n));
        }
        pool.remove(id(2));
        let order: Vec<_> = pool.iter().copied().collect();
        assert_eq!(order, vec![id(1), id(3)]);
        assert_eq!(pool.dequeue_two(), Some((id(1), id(3))));
    }

    #[test]
    fn requeued_id_goes_to_the_back() {
        let mut pool = AvailablePool::new();
        pool.enqueue(id(1));
        pool.enqueue(id(2));
        pool.remove(id(1));
        pool.enqueue(id(1));
        assert_eq!(pool.dequeue_two(), Some((id(2), id(1))));
    }

    #[test]
    fn push_front_jumps_the_queue() {
        let mut pool = AvailablePool::new();
        pool.enqueue(id(1));
        pool.enqueue(id(2));
        assert!(pool.push_front(id(3)));
        assert!(!pool.push_front(id(2)));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.dequeue_two(), Some((id(3), id(1))));
    }
}
