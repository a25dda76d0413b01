//! Order type and time-in-force.

/// Order execution type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OrderType {
    /// Execute at the given price or better; the remainder may rest.
    Limit,
    /// Execute immediately at the best available prices; never rests.
    Market,
}

/// Time-in-force instruction.
///
/// Only `Day` and `Ioc` are behaviorally distinct here: a `Limit`/`Day`
/// order rests its residual, everything else is discarded after matching.
/// `Fok` is accepted in the data model but handled like `Ioc`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimeInForce {
    /// Rest until canceled or end of session.
    Day,
    /// Immediate-or-cancel: any unfilled quantity is discarded.
    Ioc,
    /// Fill-or-kill; treated as `Ioc` by this engine.
    Fok,
}
