//! Latency accounting for a simulation run.
//!
//! The producer stamps every event with a nanosecond offset from the
//! run clock; the trade sink records, per trade, how far behind that
//! stamp the matching thread was when the fill happened. That captures
//! ring queueing plus matching work, end to end.

/// Sample collector. Bounded so a long run cannot grow without limit;
/// once full, later samples are dropped (the distribution is stable
/// well before that).
pub struct LatencyStats {
    samples: Vec<u64>,
    cap: usize,
}

#[derive(Debug)]
pub struct LatencySummary {
    pub count: usize,
    pub mean_ns: u64,
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
    pub max_ns: u64,
}

impl LatencyStats {
    pub fn with_capacity(cap: usize) -> Self {
        LatencyStats {
            samples: Vec::with_capacity(cap),
            cap,
        }
    }

    pub fn record(&mut self, latency_ns: u64) {
        if self.samples.len() < self.cap {
            self.samples.push(latency_ns);
        }
    }

    /// Sorts the samples and summarizes. Returns `None` for an empty run.
    pub fn summarize(&mut self) -> Option<LatencySummary> {
        if self.samples.is_empty() {
            return None;
        }
        self.samples.sort_unstable();
        let count = self.samples.len();
        let sum: u128 = self.samples.iter().map(|&v| v as u128).sum();
        Some(LatencySummary {
            count,
            mean_ns: (sum / count as u128) as u64,
            p50_ns: self.percentile(50),
            p90_ns: self.percentile(90),
            p99_ns: self.percentile(99),
            max_ns: *self.samples.last().unwrap(),
        })
    }

    fn percentile(&self, pct: usize) -> u64 {
        let idx = (self.samples.len() * pct / 100).min(self.samples.len() - 1);
        self.samples[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_has_no_summary() {
        let mut stats = LatencyStats::with_capacity(16);
        assert!(stats.summarize().is_none());
    }

    #[test]
    fn percentiles_on_a_known_distribution() {
        let mut stats = LatencyStats::with_capacity(1_000);
        // 1..=100 in scrambled order.
        for v in (1..=100u64).rev() {
            stats.record(v);
        }
        let summary = stats.summarize().unwrap();
        assert_eq!(summary.count, 100);
        assert_eq!(summary.p50_ns, 51);
        assert_eq!(summary.p99_ns, 100);
        assert_eq!(summary.max_ns, 100);
        assert_eq!(summary.mean_ns, 50);
    }

    #[test]
    fn capacity_bounds_the_sample_buffer() {
        let mut stats = LatencyStats::with_capacity(4);
        for v in 0..100 {
            stats.record(v);
        }
        let summary = stats.summarize().unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.max_ns, 3);
    }
}
