//! engine-core
//!
//! Pure matching logic for a single-venue, multi-symbol limit order
//! book:
//! - scalar types and instruction/event messages
//! - per-symbol price-time-priority order book with O(1) cancel
//! - multi-symbol matching engine
//! - market-data publisher (trade / top-of-book / depth sinks)
//!
//! No I/O and no threads live here; the SPSC ring and the consumer
//! event loop are in `engine-runtime`.

pub mod events;
pub mod market_data;
pub mod matching_engine;
pub mod messages;
pub mod order;
pub mod order_book;
pub mod order_type;
pub mod side;
pub mod types;

pub use events::EngineEvent;
pub use market_data::{DepthSink, MarketDataPublisher, TopOfBookSink, TradeSink};
pub use matching_engine::MatchingEngine;
pub use messages::{BookLevel, CancelOrder, NewOrder, TopOfBook, Trade};
pub use order::BookOrder;
pub use order_book::OrderBook;
pub use order_type::{OrderType, TimeInForce};
pub use side::Side;
pub use types::{OrderId, Price, Quantity, SymbolId, Timestamp, TraderId};
