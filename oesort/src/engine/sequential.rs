use super::SortEngine;
use crate::error::SortError;
use crate::phase::{even_domain, odd_domain, sort_couples};
use crate::stats::{ScopedTimer, SortReport, WorkerStats};
use std::time::Instant;

/// Single-threaded odd-even transposition sort, the reference every parallel
/// engine is checked against.
#[derive(Clone, Debug, Default)]
pub struct SequentialEngine {
    collect_stats: bool,
}

impl SequentialEngine {
    pub fn new(collect_stats: bool) -> Self {
        Self { collect_stats }
    }
}

impl<T: Ord + Send> SortEngine<T> for SequentialEngine {
    fn name(&self) -> &str {
        "sequential"
    }

    fn sort(&self, data: &mut [T]) -> Result<SortReport, SortError> {
        let n = data.len();
        let mut report = SortReport::new("sequential", n, 1);
        report.stats_collected = self.collect_stats;
        if n <= 1 {
            return Ok(report);
        }

        let timing = self.collect_stats;
        let mut stats = WorkerStats::new(0);
        let start = Instant::now();
        loop {
            stats.iterations += 1;
            let even = {
                let _t = ScopedTimer::start(timing.then_some(&mut stats.even_ns));
                sort_couples(&mut data[even_domain(n)])
            };
            let odd = {
                let _t = ScopedTimer::start(timing.then_some(&mut stats.odd_ns));
                sort_couples(&mut data[odd_domain(n)])
            };
            stats.even_runs += 1;
            stats.odd_runs += 1;
            stats.even_swaps += even as u64;
            stats.odd_swaps += odd as u64;
            if even + odd == 0 {
                break;
            }
        }
        stats.even_phase_ns = stats.even_ns;
        stats.odd_phase_ns = stats.odd_ns;

        report.iterations = stats.iterations;
        report.elapsed = start.elapsed();
        report.worker_stats = vec![stats];
        Ok(report)
    }
}
