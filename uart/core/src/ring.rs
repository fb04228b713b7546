//! Single-producer / single-consumer byte ring
//!
//! The ring is shared between two execution contexts: one pushes bytes and
//! owns `head`, the other pops bytes and owns `tail`. Because each index has
//! exactly one writer, index updates need no lock. One slot is always left
//! empty so that `head == tail` means empty and `head + 1 == tail` means full.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::ATOMIC_INDEX_LIMIT;

/// Fixed-capacity circular byte buffer holding at most `N - 1` bytes.
pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    /// Next write index, written only by the producer
    head: AtomicUsize,
    /// Next read index, written only by the consumer
    tail: AtomicUsize,
}

impl<const N: usize> RingBuffer<N> {
    const VALID: () = assert!(N >= 2, "RingBuffer needs at least two slots");

    /// Whether index reads must be taken with interrupts masked
    pub const GUARDED: bool = N > ATOMIC_INDEX_LIMIT;

    /// Create a new empty ring
    pub const fn new() -> Self {
        let () = Self::VALID;
        #[allow(clippy::declare_interior_mutable_const)]
        const EMPTY: AtomicU8 = AtomicU8::new(0);
        Self {
            slots: [EMPTY; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Number of bytes the ring can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    #[inline]
    const fn next(index: usize) -> usize {
        (index + 1) % N
    }

    /// Run `f` with the indices protected from tearing.
    ///
    /// Rings no larger than [`ATOMIC_INDEX_LIMIT`] run `f` directly.
    #[inline]
    pub fn guarded<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        if Self::GUARDED {
            critical_section::with(|_| f(self))
        } else {
            f(self)
        }
    }

    /// Snapshot of `(head, tail)`
    pub fn indices(&self) -> (usize, usize) {
        self.guarded(|ring| {
            (
                ring.head.load(Ordering::Acquire),
                ring.tail.load(Ordering::Acquire),
            )
        })
    }

    /// Number of bytes waiting to be popped
    pub fn len(&self) -> usize {
        let (head, tail) = self.indices();
        (N + head - tail) % N
    }

    /// Number of bytes that can still be pushed
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Check if the ring is empty
    pub fn is_empty(&self) -> bool {
        let (head, tail) = self.indices();
        head == tail
    }

    /// Check if the ring is full
    pub fn is_full(&self) -> bool {
        let (head, tail) = self.indices();
        Self::next(head) == tail
    }

    /// Append a byte. Producer side only.
    ///
    /// Returns `false` and leaves the ring untouched when it is full.
    pub fn try_push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = Self::next(head);
        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }
        self.slots[head].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Remove the oldest byte. Consumer side only.
    pub fn try_pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store(Self::next(tail), Ordering::Release);
        Some(byte)
    }

    /// Look at the oldest byte without removing it. Consumer side only.
    pub fn peek(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        Some(self.slots[tail].load(Ordering::Relaxed))
    }

    /// Drop everything unread by moving `tail` up to `head`. Consumer side only.
    pub fn discard(&self) {
        let head = self.head.load(Ordering::Acquire);
        self.tail.store(head, Ordering::Release);
    }

    /// Return both indices to zero.
    ///
    /// Touches both the producer and the consumer index, so the caller must
    /// hold off the other context (interrupts masked) for the duration.
    pub fn reset(&self) {
        self.head.store(0, Ordering::Release);
        self.tail.store(0, Ordering::Release);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_capacity_is_one_less_than_slots() {
        let ring: RingBuffer<4> = RingBuffer::new();

        assert_eq!(ring.capacity(), 3);
        assert!(ring.try_push(1));
        assert!(ring.try_push(2));
        assert!(ring.try_push(3));
        assert!(ring.is_full());
        assert!(!ring.try_push(4));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.free_space(), 0);
    }

    #[test]
    fn test_push_on_full_leaves_contents() {
        let ring: RingBuffer<3> = RingBuffer::new();
        ring.try_push(10);
        ring.try_push(20);
        let before = ring.indices();

        assert!(!ring.try_push(30));
        assert_eq!(ring.indices(), before);
        assert_eq!(ring.try_pop(), Some(10));
        assert_eq!(ring.try_pop(), Some(20));
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn test_len_follows_indices_across_wrap() {
        let ring: RingBuffer<5> = RingBuffer::new();
        let mut expected = 0usize;

        for round in 0..23u8 {
            if round % 3 == 2 {
                if ring.try_pop().is_some() {
                    expected -= 1;
                }
            } else if ring.try_push(round) {
                expected += 1;
            }
            let (head, tail) = ring.indices();
            assert!(head < 5 && tail < 5);
            assert_eq!(ring.len(), (5 + head - tail) % 5);
            assert_eq!(ring.len(), expected);
            assert_eq!(ring.free_space(), 4 - expected);
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let ring: RingBuffer<4> = RingBuffer::new();
        assert_eq!(ring.peek(), None);

        ring.try_push(0xAB);
        assert_eq!(ring.peek(), Some(0xAB));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.try_pop(), Some(0xAB));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_discard_and_reset() {
        let ring: RingBuffer<8> = RingBuffer::new();
        for b in 0..5 {
            ring.try_push(b);
        }
        ring.try_pop();

        ring.discard();
        assert!(ring.is_empty());
        assert_ne!(ring.indices(), (0, 0));

        ring.reset();
        assert_eq!(ring.indices(), (0, 0));
    }

    #[test]
    fn test_guard_threshold() {
        assert!(!RingBuffer::<16>::GUARDED);
        assert!(!RingBuffer::<256>::GUARDED);
        assert!(RingBuffer::<257>::GUARDED);

        let ring: RingBuffer<512> = RingBuffer::new();
        assert!(ring.try_push(7));
        assert_eq!(ring.guarded(|r| r.len()), 1);
        assert_eq!(ring.try_pop(), Some(7));
    }
}
