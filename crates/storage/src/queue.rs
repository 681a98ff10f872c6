//! Fixed-capacity circular queue for staging items before insertion.
//!
//! [`CircularQueue`] is a single-producer, single-consumer FIFO ring buffer.
//! It has no internal synchronization; mutation requires `&mut self`.
//!
//! # States
//!
//! | State | Condition | `push` | `pop` |
//! |-------|-----------|--------|-------|
//! | Empty | `len == 0` | stores the item | `None`, state unchanged |
//! | Partial | `0 < len < capacity` | stores the item | returns the oldest item |
//! | Full | `len == capacity` | [`QueueOverflow`], state unchanged | returns the oldest item |
//!
//! # Example
//!
//! ```
//! use ledger_bench_storage::CircularQueue;
//!
//! let mut queue = CircularQueue::new(2).unwrap();
//! queue.push("a").unwrap();
//! queue.push("b").unwrap();
//! assert!(queue.push("c").is_err());
//!
//! assert_eq!(queue.pop(), Some("a"));
//! assert_eq!(queue.size(), 1);
//! ```

use tracing::trace;

use crate::error::{ConfigError, QueueOverflow};

/// A bounded FIFO backed by a fixed array of slots.
///
/// Items enter at `tail` and leave at `head`; both indices advance modulo the
/// capacity. Invariants: `len <= capacity`, `head < capacity`,
/// `tail < capacity`, and exactly the `len` slots starting at `head` are
/// occupied.
pub struct CircularQueue<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> CircularQueue<T> {
    /// Creates an empty queue holding at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::below_minimum("capacity", 1, capacity));
        }
        Ok(Self { buf: (0..capacity).map(|_| None).collect(), head: 0, tail: 0, len: 0 })
    }

    /// Appends an item at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueOverflow`] carrying the item back if the queue is full.
    /// The queue is left untouched in that case.
    pub fn push(&mut self, item: T) -> Result<(), QueueOverflow<T>> {
        if self.is_full() {
            trace!(capacity = self.capacity(), "Queue overflow");
            return Err(QueueOverflow { item, capacity: self.capacity() });
        }

        self.buf[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the item at the head.
    ///
    /// Returns `None` on an empty queue without changing any state.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            trace!("Queue underflow");
            return None;
        }

        let item = self.buf[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// Returns a reference to the item at the head without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() { None } else { self.buf[self.head].as_ref() }
    }

    /// Returns the number of queued items.
    #[must_use]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Alias for [`size`](Self::size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the fixed capacity chosen at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no items are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if a push would overflow.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns an iterator that pops items in FIFO order until the queue is empty.
    ///
    /// Items not consumed by the iterator stay queued.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }
}

impl<T> std::fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircularQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

/// Draining iterator returned by [`CircularQueue::drain`].
pub struct Drain<'a, T> {
    queue: &'a mut CircularQueue<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.queue.is_empty() { None } else { self.queue.pop() }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}
