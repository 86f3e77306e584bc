//! Slab Queue Module
//!
//! Fixed-capacity FIFO queue whose nodes live in a preallocated slab and are
//! addressed by slot index.
//!
//! ```text
//!   slots: [ Some(b) | None | Some(a) | Some(c) ]      free: [1]
//!
//!   head ─► [2: a] ◄──► [0: b] ◄──► [3: c] ◄── tail
//! ```
//!
//! Pushing returns the slot index of the new node. The caller keeps that
//! index and hands it back to [`SlabQueue::delete`] to unlink the node from
//! any position in O(1).

use std::time::Instant;

use tracing::trace;

// == Node ==
/// A queued value together with the instant it was pushed with.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// The queued value
    pub value: V,
    /// Timestamp supplied by the caller on push
    pub timestamp: Instant,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Slab Queue ==
/// Doubly linked queue over a fixed slab of slots.
///
/// - Head = oldest node (next to pop)
/// - Tail = newest node
#[derive(Debug, Clone)]
pub struct SlabQueue<V> {
    /// `None` marks a free slot
    slots: Vec<Option<Node<V>>>,
    /// Indices of every free slot, in no particular order
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> SlabQueue<V> {
    // == Constructor ==
    /// Creates an empty queue with room for `capacity` nodes.
    ///
    /// # Panics
    /// Panics if `capacity` is zero: a queue without slots cannot accept a push.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "slab queue capacity must be at least 1");

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            slots,
            // Reversed so slot 0 is handed out first; any order is valid.
            free: (0..capacity).rev().collect(),
            head: None,
            tail: None,
        }
    }

    // == Push ==
    /// Appends `value` at the tail and returns its slot index.
    ///
    /// When every slot is occupied the current head is evicted first, so a
    /// push never fails and never grows the slab.
    pub fn push(&mut self, value: V, timestamp: Instant) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                trace!(capacity = self.capacity(), "slab queue full, evicting head");
                self.pop();
                match self.free.pop() {
                    Some(idx) => idx,
                    None => unreachable!("popping a full slab queue freed no slot"),
                }
            }
        };

        self.slots[idx] = Some(Node {
            value,
            timestamp,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(old_tail) => self.node_mut(old_tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);

        idx
    }

    // == Pop ==
    /// Removes and returns the node at the head, or None if the queue is empty.
    pub fn pop(&mut self) -> Option<Node<V>> {
        let head = self.head?;
        self.take(head)
    }

    // == Delete ==
    /// Unlinks and frees the node at `idx`.
    ///
    /// Returns false if the slot is already free (or out of range), which makes
    /// a repeated delete a no-op.
    pub fn delete(&mut self, idx: usize) -> bool {
        self.take(idx).is_some()
    }

    // == Take ==
    /// Unlinks the node at `idx` and hands it back, freeing its slot.
    pub fn take(&mut self, idx: usize) -> Option<Node<V>> {
        let node = self.slots.get_mut(idx)?.take()?;

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(idx);
        Some(node)
    }

    // == Top ==
    /// Returns the node at the head without removing it.
    pub fn top(&self) -> Option<&Node<V>> {
        self.head.and_then(|idx| self.get(idx))
    }

    /// Returns the node at the tail without removing it.
    pub fn back(&self) -> Option<&Node<V>> {
        self.tail.and_then(|idx| self.get(idx))
    }

    /// Returns the node stored at `idx`, if that slot is occupied.
    pub fn get(&self, idx: usize) -> Option<&Node<V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Iterates over `(slot index, node)` pairs from head to tail.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            queue: self,
            current: self.head,
        }
    }

    // == Length ==
    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.capacity() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        match self.slots[idx].as_mut() {
            Some(node) => node,
            None => panic!("slab queue link points at free slot {}", idx),
        }
    }

    /// Walks the chain and the free list, panicking on any inconsistency.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            assert!(self.slots.iter().all(Option::is_none));
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;

        while let Some(idx) = current {
            let node = match self.get(idx) {
                Some(node) => node,
                None => panic!("chain reaches free slot {}", idx),
            };
            assert_eq!(node.prev, prev, "broken prev link at slot {}", idx);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(idx));
            }

            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.capacity(), "cycle in slab queue chain");
        }

        assert_eq!(count, self.len());
        for &idx in &self.free {
            assert!(self.slots[idx].is_none(), "free slot {} is occupied", idx);
        }
    }
}

// == Iterator ==
/// Head-to-tail iterator returned by [`SlabQueue::iter`].
#[derive(Debug)]
pub struct Iter<'a, V> {
    queue: &'a SlabQueue<V>,
    current: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a Node<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.queue.get(idx)?;
        self.current = node.next;
        Some((idx, node))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn values(queue: &SlabQueue<&'static str>) -> Vec<&'static str> {
        queue.iter().map(|(_, node)| node.value).collect()
    }

    #[test]
    fn test_queue_new() {
        let queue: SlabQueue<u32> = SlabQueue::new(4);
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.capacity(), 4);
        assert!(queue.top().is_none());
        queue.debug_validate_invariants();
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_queue_zero_capacity_panics() {
        let _ = SlabQueue::<u32>::new(0);
    }

    #[test]
    fn test_queue_push_pop_fifo() {
        let mut queue = SlabQueue::new(3);
        let now = Instant::now();

        queue.push("a", now);
        queue.push("b", now);
        queue.push("c", now);

        assert_eq!(queue.len(), 3);
        assert_eq!(values(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.pop().map(|n| n.value), Some("a"));
        assert_eq!(queue.pop().map(|n| n.value), Some("b"));
        assert_eq!(queue.pop().map(|n| n.value), Some("c"));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
        queue.debug_validate_invariants();
    }

    #[test]
    fn test_queue_top_does_not_remove() {
        let mut queue = SlabQueue::new(2);
        let now = Instant::now();
        queue.push("a", now);
        queue.push("b", now + Duration::from_secs(1));

        let top = queue.top().unwrap();
        assert_eq!(top.value, "a");
        assert_eq!(top.timestamp, now);
        assert_eq!(queue.back().map(|n| n.value), Some("b"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_queue_delete_head_tail_and_interior() {
        let mut queue = SlabQueue::new(5);
        let now = Instant::now();
        let ids: Vec<usize> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|v| queue.push(v, now))
            .collect();

        // interior
        assert!(queue.delete(ids[2]));
        assert_eq!(values(&queue), vec!["a", "b", "d", "e"]);
        queue.debug_validate_invariants();

        // head
        assert!(queue.delete(ids[0]));
        assert_eq!(values(&queue), vec!["b", "d", "e"]);
        assert_eq!(queue.top().map(|n| n.value), Some("b"));
        queue.debug_validate_invariants();

        // tail
        assert!(queue.delete(ids[4]));
        assert_eq!(values(&queue), vec!["b", "d"]);
        queue.debug_validate_invariants();

        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_queue_delete_is_idempotent() {
        let mut queue = SlabQueue::new(2);
        let idx = queue.push("a", Instant::now());

        assert!(queue.delete(idx));
        assert!(!queue.delete(idx));
        assert!(!queue.delete(99));
        assert!(queue.is_empty());
        queue.debug_validate_invariants();
    }

    #[test]
    fn test_queue_delete_only_node_clears_ends() {
        let mut queue = SlabQueue::new(1);
        let idx = queue.push("a", Instant::now());

        assert!(queue.delete(idx));
        assert!(queue.top().is_none());

        // The freed slot is reused and the queue links up again.
        let idx = queue.push("b", Instant::now());
        assert_eq!(queue.get(idx).map(|n| n.value), Some("b"));
        queue.debug_validate_invariants();
    }

    #[test]
    fn test_queue_full_push_evicts_head() {
        let mut queue = SlabQueue::new(2);
        let now = Instant::now();
        let first = queue.push("a", now);
        queue.push("b", now);

        let idx = queue.push("c", now);

        assert_eq!(queue.len(), 2);
        assert_eq!(values(&queue), vec!["b", "c"]);
        // Only one slot was free after evicting "a".
        assert_eq!(idx, first);
        queue.debug_validate_invariants();
    }

    #[test]
    fn test_queue_take_returns_node() {
        let mut queue = SlabQueue::new(3);
        let now = Instant::now();
        queue.push("a", now);
        let idx = queue.push("b", now + Duration::from_millis(5));

        let node = queue.take(idx).unwrap();
        assert_eq!(node.value, "b");
        assert_eq!(node.timestamp, now + Duration::from_millis(5));
        assert!(queue.take(idx).is_none());
        assert_eq!(values(&queue), vec!["a"]);
    }

    #[test]
    fn test_queue_slots_reused_after_churn() {
        let mut queue = SlabQueue::new(3);
        let now = Instant::now();

        for round in 0..50 {
            let idx = queue.push(round, now);
            assert!(idx < 3);
            if round % 2 == 0 {
                assert!(queue.delete(idx));
            }
            queue.debug_validate_invariants();
        }

        assert_eq!(queue.len(), 3);
        let remaining: Vec<i32> = queue.iter().map(|(_, n)| n.value).collect();
        assert_eq!(remaining, vec![45, 47, 49]);
    }
}
