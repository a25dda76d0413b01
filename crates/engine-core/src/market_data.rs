//! Market-data fan-out.
//!
//! The publisher holds up to three sinks (trade, top-of-book, depth
//! snapshot) and invokes them synchronously on the caller's thread —
//! in practice the matching thread. Sinks must therefore be
//! non-blocking; a sink that blocks stalls matching.

use std::fmt;

use crate::messages::{BookLevel, TopOfBook, Trade};

/// Callback invoked for every trade, in match order.
pub type TradeSink = Box<dyn FnMut(&Trade) + Send>;

/// Callback invoked for every valid top-of-book update.
pub type TopOfBookSink = Box<dyn FnMut(&TopOfBook) + Send>;

/// Callback invoked with `(symbol, bids, asks)` depth snapshots,
/// best level first on each side.
pub type DepthSink = Box<dyn FnMut(&str, &[BookLevel], &[BookLevel]) + Send>;

/// Owns the registered sinks. Registering a sink replaces any previous
/// one on that channel; publishing with no sink registered is a no-op.
#[derive(Default)]
pub struct MarketDataPublisher {
    trade_sink: Option<TradeSink>,
    tob_sink: Option<TopOfBookSink>,
    depth_sink: Option<DepthSink>,
}

impl MarketDataPublisher {
    pub fn new() -> Self {
        MarketDataPublisher::default()
    }

    pub fn on_trade(&mut self, sink: impl FnMut(&Trade) + Send + 'static) {
        self.trade_sink = Some(Box::new(sink));
    }

    pub fn on_top_of_book(&mut self, sink: impl FnMut(&TopOfBook) + Send + 'static) {
        self.tob_sink = Some(Box::new(sink));
    }

    pub fn on_depth_snapshot(&mut self, sink: impl FnMut(&str, &[BookLevel], &[BookLevel]) + Send + 'static) {
        self.depth_sink = Some(Box::new(sink));
    }

    pub fn publish_trade(&mut self, trade: &Trade) {
        if let Some(sink) = self.trade_sink.as_mut() {
            sink(trade);
        }
    }

    pub fn publish_top_of_book(&mut self, tob: &TopOfBook) {
        if let Some(sink) = self.tob_sink.as_mut() {
            sink(tob);
        }
    }

    pub fn publish_depth(&mut self, symbol: &str, bids: &[BookLevel], asks: &[BookLevel]) {
        if let Some(sink) = self.depth_sink.as_mut() {
            sink(symbol, bids, asks);
        }
    }
}

impl fmt::Debug for MarketDataPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataPublisher")
            .field("trade_sink", &self.trade_sink.is_some())
            .field("tob_sink", &self.tob_sink.is_some())
            .field("depth_sink", &self.depth_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::side::Side;

    fn sample_trade() -> Trade {
        Trade {
            resting_id: 1,
            incoming_id: 2,
            symbol: "FOO".to_string(),
            aggressor_side: Side::Buy,
            price: 100,
            qty: 5,
            match_ts_ns: 42,
        }
    }

    #[test]
    fn absent_sinks_are_a_no_op() {
        let mut publisher = MarketDataPublisher::new();
        publisher.publish_trade(&sample_trade());
        publisher.publish_depth("FOO", &[], &[]);
    }

    #[test]
    fn registration_replaces_prior_sink() {
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));

        let mut publisher = MarketDataPublisher::new();
        let counter = first.clone();
        publisher.on_trade(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let counter = second.clone();
        publisher.on_trade(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        publisher.publish_trade(&sample_trade());
        assert_eq!(first.load(Ordering::Relaxed), 0);
        assert_eq!(second.load(Ordering::Relaxed), 1);
    }
}
