//! Simulation driver for the matching core.
//!
//! Generates a stream of random order events, pushes them through the
//! SPSC ring to the event-loop thread, and reports end-to-end
//! throughput plus market-data counters. This binary is the external
//! collaborator around the core: everything interesting happens in
//! `engine-core` and `engine-runtime`.

mod flow;
mod stats;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_core::{MarketDataPublisher, MatchingEngine};
use engine_runtime::{EventLoop, EventRing};

use crate::flow::EventGen;
use crate::stats::LatencyStats;

/// At most this many per-trade latency samples are kept.
const LATENCY_SAMPLE_CAP: usize = 1 << 20;

#[derive(Parser)]
#[clap(name = "engine-sim")]
#[clap(about = "Random-flow market simulation driving the matching core")]
struct Cli {
    /// Number of events to generate
    #[clap(short, long, default_value = "1000000")]
    events: u64,

    /// Ring buffer capacity in slots (must be a power of two)
    #[clap(short, long, default_value = "8192")]
    capacity: usize,

    /// Comma-separated symbols to trade
    #[clap(
        short,
        long,
        value_delimiter = ',',
        default_value = "XAUUSD,EURUSD,BTCUSD"
    )]
    symbols: Vec<String>,

    /// RNG seed; identical seeds replay identical event streams
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Depth levels per side in the final book report
    #[clap(short, long, default_value = "5")]
    depth: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Run clock; producer event stamps and sink-side latency samples
    // are both offsets from this instant.
    let clock = Instant::now();

    let trade_count = Arc::new(AtomicU64::new(0));
    let traded_volume = Arc::new(AtomicU64::new(0));
    let tob_count = Arc::new(AtomicU64::new(0));
    let latency = Arc::new(Mutex::new(LatencyStats::with_capacity(LATENCY_SAMPLE_CAP)));

    let mut publisher = MarketDataPublisher::new();
    {
        let trade_count = trade_count.clone();
        let traded_volume = traded_volume.clone();
        let latency = latency.clone();
        publisher.on_trade(move |trade| {
            trade_count.fetch_add(1, Ordering::Relaxed);
            traded_volume.fetch_add(trade.qty as u64, Ordering::Relaxed);
            let now_ns = clock.elapsed().as_nanos() as u64;
            latency
                .lock()
                .unwrap()
                .record(now_ns.saturating_sub(trade.match_ts_ns));
        });
    }
    {
        let tob_count = tob_count.clone();
        publisher.on_top_of_book(move |_| {
            tob_count.fetch_add(1, Ordering::Relaxed);
        });
    }
    publisher.on_depth_snapshot(|symbol, bids, asks| {
        info!(symbol, "final depth");
        for level in bids {
            info!("  bid {:>6} x {}", level.price, level.qty);
        }
        for level in asks {
            info!("  ask {:>6} x {}", level.price, level.qty);
        }
    });

    let mut engine = MatchingEngine::new(publisher);
    for symbol in &cli.symbols {
        engine.add_symbol(symbol.clone());
    }

    let ring = Arc::new(EventRing::with_capacity(cli.capacity));
    let handle = EventLoop::new(engine).run_async(ring.clone())?;

    info!(
        events = cli.events,
        capacity = cli.capacity,
        symbols = ?cli.symbols,
        seed = cli.seed,
        "starting simulation"
    );

    let mut flow = EventGen::new(cli.seed, cli.symbols.clone());
    let run_start = Instant::now();

    for _ in 0..cli.events {
        let mut event = flow.next_event(clock.elapsed().as_nanos() as u64);
        // Busy-retry while the consumer catches up.
        while let Err(back) = ring.push(event) {
            event = back;
            std::hint::spin_loop();
        }
    }

    // Shutdown contract: quiesce, wait for the drain, then raise the
    // flag and join.
    while !ring.is_empty() {
        std::hint::spin_loop();
    }
    handle.set_wait_for_done();
    let mut engine = handle.join();

    let elapsed = run_start.elapsed();
    let rate = cli.events as f64 / elapsed.as_secs_f64();
    info!(
        events = cli.events,
        elapsed_ms = elapsed.as_millis() as u64,
        events_per_sec = rate as u64,
        trades = trade_count.load(Ordering::Relaxed),
        traded_volume = traded_volume.load(Ordering::Relaxed),
        tob_updates = tob_count.load(Ordering::Relaxed),
        resting_orders = engine.resting_order_count(),
        "simulation complete"
    );

    if let Some(summary) = latency.lock().unwrap().summarize() {
        info!(
            samples = summary.count,
            mean_ns = summary.mean_ns,
            p50_ns = summary.p50_ns,
            p90_ns = summary.p90_ns,
            p99_ns = summary.p99_ns,
            max_ns = summary.max_ns,
            "event-to-trade latency"
        );
    }

    for symbol in &cli.symbols {
        engine.publish_depth(symbol, cli.depth);
    }

    Ok(())
}
