//! Random order-flow generator.
//!
//! Produces a reproducible stream of limit orders, market orders, and
//! cancels over a small price band, in roughly the proportions a busy
//! venue would see: mostly resting limit flow, occasional aggressive
//! market orders, and a steady trickle of cancels against ids that were
//! previously issued.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use engine_core::{
    CancelOrder, EngineEvent, NewOrder, OrderId, OrderType, Price, Quantity, Side, TimeInForce,
    Timestamp,
};

const PRICE_BAND: std::ops::RangeInclusive<Price> = 90..=110;
const QTY_BAND: std::ops::RangeInclusive<Quantity> = 1..=500;

pub struct EventGen {
    rng: StdRng,
    symbols: Vec<String>,
    /// Ids are never reused; duplicate ids corrupt the book index.
    next_id: OrderId,
    /// Ids issued as Limit/Day, candidates for a later cancel. Some will
    /// already be filled or canceled; the engine treats those as no-ops.
    restable_ids: Vec<OrderId>,
}

impl EventGen {
    pub fn new(seed: u64, symbols: Vec<String>) -> Self {
        EventGen {
            rng: StdRng::seed_from_u64(seed),
            symbols,
            next_id: 1,
            restable_ids: Vec::new(),
        }
    }

    pub fn next_event(&mut self, recv_ts_ns: Timestamp) -> EngineEvent {
        let roll = self.rng.gen_range(0..100);
        match roll {
            // 20%: cancel a previously issued id (falls back to limit
            // flow until something restable exists).
            0..=19 if !self.restable_ids.is_empty() => {
                let pick = self.rng.gen_range(0..self.restable_ids.len());
                let id = self.restable_ids[pick];
                EngineEvent::cancel(CancelOrder { id }, recv_ts_ns)
            }
            // 10%: market order, immediate-or-cancel by nature.
            20..=29 => {
                let order = self.new_order(OrderType::Market, TimeInForce::Ioc);
                EngineEvent::new_order(order, recv_ts_ns)
            }
            // 10%: limit IOC, takes liquidity or evaporates.
            30..=39 => {
                let order = self.new_order(OrderType::Limit, TimeInForce::Ioc);
                EngineEvent::new_order(order, recv_ts_ns)
            }
            // Remainder: limit Day, the flow that builds the book.
            _ => {
                let order = self.new_order(OrderType::Limit, TimeInForce::Day);
                self.restable_ids.push(order.id);
                EngineEvent::new_order(order, recv_ts_ns)
            }
        }
    }

    fn new_order(&mut self, order_type: OrderType, tif: TimeInForce) -> NewOrder {
        let id = self.next_id;
        self.next_id += 1;

        let symbol = self.symbols[self.rng.gen_range(0..self.symbols.len())].clone();
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        NewOrder {
            id,
            trader: self.rng.gen_range(1..=1_000),
            symbol,
            side,
            order_type,
            tif,
            price: self.rng.gen_range(PRICE_BAND),
            qty: self.rng.gen_range(QTY_BAND),
        }
    }
}
