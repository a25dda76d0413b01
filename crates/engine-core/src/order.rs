//! Resting-order representation used inside the order book.

use crate::messages::NewOrder;
use crate::side::Side;
use crate::types::{OrderId, Price, Quantity, Timestamp, TraderId};

/// A single order as it sits in (or aggresses) the book.
///
/// `qty` is the *remaining* quantity; the book guarantees it stays
/// positive for every resting order (fully filled orders are removed
/// immediately).
#[derive(Debug, Clone)]
pub struct BookOrder {
    pub id: OrderId,
    pub trader: TraderId,
    pub qty: Quantity,
    pub price: Price,
    pub side: Side,
    /// Arrival time; establishes time priority within a price level.
    pub ts_ns: Timestamp,
}

impl BookOrder {
    /// Build the book-side view of a [`NewOrder`], stamping the arrival
    /// time supplied by the event envelope.
    pub fn from_new_order(msg: &NewOrder, ts_ns: Timestamp) -> Self {
        BookOrder {
            id: msg.id,
            trader: msg.trader,
            qty: msg.qty,
            price: msg.price,
            side: msg.side,
            ts_ns,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.qty == 0
    }
}
