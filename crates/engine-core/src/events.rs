//! Engine event envelope.
//!
//! This is the payload carried through the SPSC ring from the producer
//! to the consumer thread: a tagged union of the two instructions plus
//! the arrival timestamp assigned by the producer. The whole envelope is
//! an owned value so moving it between ring slots is trivial.

use crate::messages::{CancelOrder, NewOrder};
use crate::types::Timestamp;

/// One event handed to the matching thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    NewOrder {
        order: NewOrder,
        /// Arrival time; becomes the order's time-priority stamp and the
        /// match timestamp on any trades it produces.
        recv_ts_ns: Timestamp,
    },
    Cancel {
        cancel: CancelOrder,
        recv_ts_ns: Timestamp,
    },
}

impl EngineEvent {
    pub fn new_order(order: NewOrder, recv_ts_ns: Timestamp) -> Self {
        EngineEvent::NewOrder { order, recv_ts_ns }
    }

    pub fn cancel(cancel: CancelOrder, recv_ts_ns: Timestamp) -> Self {
        EngineEvent::Cancel { cancel, recv_ts_ns }
    }
}
