//! Multi-symbol matching engine.
//!
//! Owns one [`OrderBook`] per registered symbol, a global
//! `order id -> symbol` map for cancel routing, and the market-data
//! publisher. Everything here runs on a single thread (the event-loop
//! consumer); no internal synchronization is needed or present.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::market_data::MarketDataPublisher;
use crate::messages::{CancelOrder, NewOrder, TopOfBook};
use crate::order::BookOrder;
use crate::order_book::OrderBook;
use crate::order_type::{OrderType, TimeInForce};
use crate::side::Side;
use crate::types::{OrderId, Price, SymbolId, Timestamp};

/// Multi-symbol matching engine.
#[derive(Debug)]
pub struct MatchingEngine {
    books: HashMap<SymbolId, OrderBook>,

    /// Symbol of every currently resting order, for cancel routing.
    /// Inserted when an order rests; erased on full fill or cancel.
    order_symbol_index: HashMap<OrderId, SymbolId>,

    publisher: MarketDataPublisher,
}

impl MatchingEngine {
    pub fn new(publisher: MarketDataPublisher) -> Self {
        MatchingEngine {
            books: HashMap::new(),
            order_symbol_index: HashMap::new(),
            publisher,
        }
    }

    /// Register a symbol, creating an empty book for it. Idempotent:
    /// re-adding an existing symbol leaves its book untouched.
    pub fn add_symbol(&mut self, symbol: impl Into<SymbolId>) {
        let symbol = symbol.into();
        self.books
            .entry(symbol)
            .or_insert_with_key(|key| OrderBook::new(key.clone()));
    }

    /// Process a new order that arrived at `recv_ts_ns`.
    ///
    /// Orders for unregistered symbols are dropped. Market orders cross
    /// at any resting level via a price sentinel that never appears in
    /// emitted trades. The residual of a `Limit`/`Day` order rests;
    /// `Ioc`/`Fok` residuals and market-order residuals are discarded.
    pub fn handle_new_order(&mut self, order: &NewOrder, recv_ts_ns: Timestamp) {
        let Some(book) = self.books.get_mut(&order.symbol) else {
            warn!(symbol = %order.symbol, id = order.id, "dropping order for unknown symbol");
            return;
        };

        let mut incoming = BookOrder::from_new_order(order, recv_ts_ns);
        if order.order_type == OrderType::Market {
            incoming.price = match order.side {
                Side::Buy => Price::MAX,
                Side::Sell => Price::MIN,
            };
        }

        let (trades, remaining) = book.match_incoming(&incoming, recv_ts_ns);

        for trade in &trades {
            // The book already dropped fully filled makers from its own
            // index; mirror that into the engine-level map.
            if !book.contains(trade.resting_id) {
                self.order_symbol_index.remove(&trade.resting_id);
            }
            self.publisher.publish_trade(trade);
        }

        let rests =
            order.order_type == OrderType::Limit && order.tif == TimeInForce::Day && remaining > 0;
        if rests {
            incoming.qty = remaining;
            book.add_order(incoming);
            self.order_symbol_index
                .insert(order.id, order.symbol.clone());
        }

        let tob = TopOfBook::new(order.symbol.clone(), book.best_bid(), book.best_ask());
        if tob.valid {
            self.publisher.publish_top_of_book(&tob);
        }
    }

    /// Process a cancel. Unknown ids are a no-op.
    pub fn handle_cancel(&mut self, cancel: &CancelOrder) {
        let Some(symbol) = self.order_symbol_index.remove(&cancel.id) else {
            debug!(id = cancel.id, "cancel for unknown order id ignored");
            return;
        };

        let Some(book) = self.books.get_mut(&symbol) else {
            return;
        };

        if book.cancel_order(cancel.id) {
            let tob = TopOfBook::new(symbol, book.best_bid(), book.best_ask());
            if tob.valid {
                self.publisher.publish_top_of_book(&tob);
            }
        } else {
            debug!(id = cancel.id, symbol = %symbol, "cancel found no resting order");
        }
    }

    /// Push a depth snapshot (up to `depth` levels per side) for one
    /// symbol through the depth sink. Unknown symbols are a no-op.
    pub fn publish_depth(&mut self, symbol: &str, depth: usize) {
        let Some(book) = self.books.get(symbol) else {
            return;
        };
        let bids = book.bids(depth);
        let asks = book.asks(depth);
        self.publisher.publish_depth(symbol, &bids, &asks);
    }

    /// Immutable access to a symbol's book, for queries and tests.
    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// Number of registered symbols.
    pub fn symbol_count(&self) -> usize {
        self.books.len()
    }

    /// Number of orders currently resting across all books.
    pub fn resting_order_count(&self) -> usize {
        self.order_symbol_index.len()
    }
}
