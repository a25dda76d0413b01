//! Consumer-side event loop.
//!
//! Owns the [`MatchingEngine`] and drives it from an SPSC ring of
//! [`EngineEvent`]s on a dedicated thread. The loop busy-spins: the
//! inner loop drains the ring, the outer loop re-reads an atomic
//! shutdown flag between drains.
//!
//! Shutdown contract (producer side): stop pushing, wait until
//! [`RingBuffer::is_empty`] reads true, then call
//! [`EventLoopHandle::set_wait_for_done`] and join. The consumer drains
//! the ring once more after observing the flag, so every pushed event
//! is handled exactly once even if that ordering is violated by a late
//! final push.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::info;

use engine_core::{EngineEvent, MatchingEngine};

use crate::ring_buffer::RingBuffer;

/// The ring type the event loop consumes.
pub type EventRing = RingBuffer<EngineEvent>;

/// Drives a [`MatchingEngine`] from an [`EventRing`].
#[derive(Debug)]
pub struct EventLoop {
    engine: MatchingEngine,
    wait_for_done: Arc<AtomicBool>,
}

impl EventLoop {
    pub fn new(engine: MatchingEngine) -> Self {
        EventLoop {
            engine,
            wait_for_done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raise the shutdown flag. Usable before [`EventLoop::run`] to
    /// process a pre-filled ring to completion on the calling thread;
    /// after [`EventLoop::run_async`], use the handle's method instead.
    pub fn set_wait_for_done(&self) {
        self.wait_for_done.store(true, Ordering::Release);
    }

    /// Run on the calling thread until the shutdown flag is raised and
    /// the ring is drained. Returns the engine for post-run inspection.
    pub fn run(mut self, ring: &EventRing) -> MatchingEngine {
        while !self.wait_for_done.load(Ordering::Acquire) {
            self.drain(ring);
            std::hint::spin_loop();
        }
        // Final drain after the flag: closes the window where the
        // producer's last push lands between our drain and flag check.
        self.drain(ring);
        self.engine
    }

    /// Spawn the consumer thread and hand back a handle carrying the
    /// shutdown flag and the join point.
    pub fn run_async(self, ring: Arc<EventRing>) -> io::Result<EventLoopHandle> {
        let wait_for_done = self.wait_for_done.clone();
        let join = thread::Builder::new()
            .name("engine-event-loop".into())
            .spawn(move || {
                info!("event loop started");
                let engine = self.run(&ring);
                info!("event loop stopped");
                engine
            })?;
        Ok(EventLoopHandle {
            wait_for_done,
            join,
        })
    }

    fn drain(&mut self, ring: &EventRing) {
        while let Some(event) = ring.pop() {
            match event {
                EngineEvent::NewOrder { order, recv_ts_ns } => {
                    self.engine.handle_new_order(&order, recv_ts_ns);
                }
                EngineEvent::Cancel { cancel, .. } => {
                    self.engine.handle_cancel(&cancel);
                }
            }
        }
    }
}

/// Producer-side handle to a running event loop.
#[derive(Debug)]
pub struct EventLoopHandle {
    wait_for_done: Arc<AtomicBool>,
    join: JoinHandle<MatchingEngine>,
}

impl EventLoopHandle {
    /// Ask the consumer to exit once the ring is drained. Release store
    /// paired with the consumer's acquire load.
    pub fn set_wait_for_done(&self) {
        self.wait_for_done.store(true, Ordering::Release);
    }

    /// Wait for the consumer thread to exit and take the engine back.
    pub fn join(self) -> MatchingEngine {
        self.join.join().expect("event loop thread panicked")
    }
}
