//! Fixed-capacity FIFO ring buffer for commands and events.
//!
//! One slot is always kept free to tell "full" from "empty", so a queue of
//! `N` slots holds at most `N - 1` items. Pushing into a full queue drops
//! the new item and bumps an overflow counter; nothing is ever signalled to
//! the producer beyond the `false` return value.
//!
//! Each queue has exactly one producer and one consumer, and both run on
//! the caller's thread, so no synchronisation is needed.

/// Slot count of the engine's command and event queues.
pub const QUEUE_CAPACITY: usize = 8;

/// An arena-backed circular buffer with explicit head and tail indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingQueue<T, const N: usize = QUEUE_CAPACITY> {
    /// Backing storage. `None` marks a slot that has never been written.
    slots: [Option<T>; N],
    /// Next slot to write.
    head: usize,
    /// Next slot to read.
    tail: usize,
    /// Items dropped because the queue was full.
    dropped: u64,
}

impl<T: Copy, const N: usize> RingQueue<T, N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            slots: [None; N],
            head: 0,
            tail: 0,
            dropped: 0,
        }
    }

    /// Number of queued items.
    pub const fn len(&self) -> usize {
        if self.head >= self.tail {
            self.head.saturating_sub(self.tail)
        } else {
            N.saturating_sub(self.tail).saturating_add(self.head)
        }
    }

    /// Whether nothing is queued.
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Whether the next push would be dropped.
    pub const fn is_full(&self) -> bool {
        Self::advance(self.head) == self.tail
    }

    /// Total number of items dropped on overflow since creation.
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Append an item. Returns `false` (and counts a drop) when full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        let next = Self::advance(self.head);
        let Some(slot) = self.slots.get_mut(self.head) else {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        };
        *slot = Some(item);
        self.head = next;
        true
    }

    /// Remove and return the oldest item, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots.get_mut(self.tail).and_then(Option::take);
        self.tail = Self::advance(self.tail);
        item
    }

    /// Pop items oldest-first until the queue is empty.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        core::iter::from_fn(move || self.pop())
    }

    /// Index following `index`, wrapping at `N`.
    const fn advance(index: usize) -> usize {
        match index.saturating_add(1).checked_rem(N) {
            Some(next) => next,
            None => 0,
        }
    }
}

impl<T: Copy, const N: usize> Default for RingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut queue: RingQueue<u8> = RingQueue::new();
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert!(queue.push(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn nine_pushes_leave_seven_items() {
        let mut queue: RingQueue<u8> = RingQueue::new();
        let accepted = (1..=9).filter(|&item| queue.push(item)).count();
        assert_eq!(accepted, 7);
        assert_eq!(queue.len(), 7);
        assert_eq!(queue.dropped(), 2);

        let drained: Vec<u8> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn full_queue_drops_newest() {
        let mut queue: RingQueue<u8> = RingQueue::new();
        for item in 0..7 {
            assert!(queue.push(item));
        }
        assert!(queue.is_full());
        assert!(!queue.push(99));
        assert_eq!(queue.pop(), Some(0));
        assert!(queue.push(100));
        let drained: Vec<u8> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2, 3, 4, 5, 6, 100]);
    }

    #[test]
    fn indices_wrap_around_the_arena() {
        let mut queue: RingQueue<u32, 4> = RingQueue::new();
        for round in 0..10_u32 {
            assert!(queue.push(round));
            assert!(queue.push(round + 100));
            assert_eq!(queue.len(), 2);
            assert_eq!(queue.pop(), Some(round));
            assert_eq!(queue.pop(), Some(round + 100));
            assert!(queue.is_empty());
        }
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn len_counts_across_wrap() {
        let mut queue: RingQueue<u8, 4> = RingQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        queue.pop();
        queue.pop();
        queue.push(4);
        queue.push(5);
        assert_eq!(queue.len(), 3);
        assert!(queue.is_full());
    }

    #[test]
    fn two_slot_queue_holds_one_item() {
        let mut queue: RingQueue<u8, 2> = RingQueue::new();
        assert!(queue.push(1));
        assert!(queue.is_full());
        assert!(!queue.push(2));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.pop(), Some(1));
        assert!(queue.is_empty());
    }
}
