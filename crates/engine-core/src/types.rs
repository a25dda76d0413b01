//! Scalar aliases shared across the engine.
//!
//! Prices and quantities are integers (ticks / units); there are no
//! fractional prices anywhere in the core. Timestamps are nanoseconds.

/// Globally unique order identifier. Uniqueness is a producer contract.
pub type OrderId = u64;

/// Trader / account identifier.
pub type TraderId = u64;

/// Instrument symbol, e.g. `"XAUUSD"`. Used as a map key throughout.
pub type SymbolId = String;

/// Price in integer ticks. Signed so the full range is available for
/// the market-order crossing sentinels.
pub type Price = i64;

/// Quantity in units.
pub type Quantity = i64;

/// Nanoseconds since an arbitrary epoch; used for arrival ordering.
pub type Timestamp = u64;
