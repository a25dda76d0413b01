//! Lock-free single-producer / single-consumer ring buffer.
//!
//! Fixed power-of-two capacity, allocated once on the heap (capacity x
//! slot size reaches megabytes at the default event-loop sizing, which
//! does not belong on a thread stack). Cursors are monotonic and masked
//! on slot access, so the full capacity is usable.
//!
//! Each end keeps its own cursor next to a cached copy of the far
//! cursor on a private cache line: the producer re-reads the consumer's
//! head only when the ring looks full, the consumer re-reads the tail
//! only when it looks empty. Pushes publish with a release store on the
//! tail; pops acquire it, so a successful pop observes every write the
//! producer made before the corresponding push.
//!
//! Contract: exactly one thread pushes and exactly one thread pops.
//! Nothing enforces this at compile time; violating it is a data race.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Producer-owned cache line: write cursor plus a cached view of the
/// consumer's read cursor.
#[repr(align(64))]
struct ProducerPos {
    tail: AtomicUsize,
    cached_head: UnsafeCell<usize>,
}

/// Consumer-owned cache line: read cursor plus a cached view of the
/// producer's write cursor.
#[repr(align(64))]
struct ConsumerPos {
    head: AtomicUsize,
    cached_tail: UnsafeCell<usize>,
}

/// Bounded SPSC queue.
pub struct RingBuffer<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: usize,
    producer: ProducerPos,
    consumer: ConsumerPos,
}

// A slot is only ever touched by whichever side currently owns it under
// the cursor protocol, so sharing the ring across two threads is sound
// whenever the payload itself may move between threads.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Allocate a ring with the given capacity.
    ///
    /// Panics if `capacity` is zero or not a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "ring capacity must be a power of two, got {capacity}"
        );
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        RingBuffer {
            slots,
            mask: capacity - 1,
            producer: ProducerPos {
                tail: AtomicUsize::new(0),
                cached_head: UnsafeCell::new(0),
            },
            consumer: ConsumerPos {
                head: AtomicUsize::new(0),
                cached_tail: UnsafeCell::new(0),
            },
        }
    }

    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Producer side: enqueue `value`, or hand it back if the ring is
    /// full. Never blocks, never allocates.
    pub fn push(&self, value: T) -> Result<(), T> {
        let tail = self.producer.tail.load(Ordering::Relaxed);

        let mut head = unsafe { *self.producer.cached_head.get() };
        if tail.wrapping_sub(head) == self.capacity() {
            head = self.consumer.head.load(Ordering::Acquire);
            unsafe { *self.producer.cached_head.get() = head };
            if tail.wrapping_sub(head) == self.capacity() {
                return Err(value);
            }
        }

        unsafe { (*self.slots[tail & self.mask].get()).write(value) };
        self.producer.tail.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Consumer side: dequeue the oldest value, if any. Never blocks.
    pub fn pop(&self) -> Option<T> {
        let head = self.consumer.head.load(Ordering::Relaxed);

        let mut tail = unsafe { *self.consumer.cached_tail.get() };
        if head == tail {
            tail = self.producer.tail.load(Ordering::Acquire);
            unsafe { *self.consumer.cached_tail.get() = tail };
            if head == tail {
                return None;
            }
        }

        let value = unsafe { (*self.slots[head & self.mask].get()).assume_init_read() };
        self.consumer.head.store(head.wrapping_add(1), Ordering::Release);
        Some(value)
    }

    /// Whether the ring is empty. Reads both cursors with acquire
    /// ordering, so either end gets a consistent snapshot; the producer
    /// uses this during shutdown to wait for the consumer to drain.
    pub fn is_empty(&self) -> bool {
        self.consumer.head.load(Ordering::Acquire) == self.producer.tail.load(Ordering::Acquire)
    }

    /// Number of enqueued values at a moment in time.
    pub fn len(&self) -> usize {
        let tail = self.producer.tail.load(Ordering::Acquire);
        let head = self.consumer.head.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // &mut self rules out concurrent pushes/pops; drop whatever was
        // pushed but never popped.
        let head = *self.consumer.head.get_mut();
        let tail = *self.producer.tail.get_mut();
        let mut i = head;
        while i != tail {
            unsafe { (*self.slots[i & self.mask].get()).assume_init_drop() };
            i = i.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn push_pop_and_full_empty() {
        let ring = RingBuffer::with_capacity(4);
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 4);

        for i in 0..4 {
            assert!(ring.push(i).is_ok());
        }
        assert_eq!(ring.push(99), Err(99));
        assert_eq!(ring.len(), 4);

        for i in 0..4 {
            assert_eq!(ring.pop(), Some(i));
        }
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn wraps_around_many_times() {
        let ring = RingBuffer::with_capacity(4);
        for round in 0..100 {
            for i in 0..3 {
                assert!(ring.push(round * 10 + i).is_ok());
            }
            for i in 0..3 {
                assert_eq!(ring.pop(), Some(round * 10 + i));
            }
        }
        assert!(ring.is_empty());
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two_capacity() {
        let _ = RingBuffer::<u64>::with_capacity(1000);
    }

    #[test]
    fn drops_unconsumed_values() {
        let payload = Arc::new(());
        {
            let ring = RingBuffer::with_capacity(8);
            for _ in 0..5 {
                assert!(ring.push(payload.clone()).is_ok());
            }
            let _ = ring.pop();
            assert_eq!(Arc::strong_count(&payload), 5);
        }
        assert_eq!(Arc::strong_count(&payload), 1);
    }

    #[test]
    fn cross_thread_fifo() {
        const COUNT: u64 = 100_000;

        let ring = Arc::new(RingBuffer::with_capacity(1024));

        let producer_ring = ring.clone();
        let producer = thread::spawn(move || {
            for i in 0..COUNT {
                let mut value = i;
                while let Err(back) = producer_ring.push(value) {
                    value = back;
                    thread::yield_now();
                }
            }
        });

        let consumer_ring = ring.clone();
        let consumer = thread::spawn(move || {
            let mut expected = 0;
            while expected < COUNT {
                if let Some(value) = consumer_ring.pop() {
                    assert_eq!(value, expected);
                    expected += 1;
                } else {
                    thread::yield_now();
                }
            }
        });

        producer.join().unwrap();
        consumer.join().unwrap();
        assert!(ring.is_empty());
    }
}
