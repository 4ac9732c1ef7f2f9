//! Run statistics: scoped timers, per-worker counters and the final report.

use log::info;
use std::time::{Duration, Instant};

/// Adds the time elapsed between its creation and its drop to a counter.
/// A timer built from `None` measures nothing, so instrumented code keeps
/// the same control flow whether statistics are on or off.
pub struct ScopedTimer<'a> {
    start: Option<Instant>,
    slot: Option<&'a mut u64>,
}

impl<'a> ScopedTimer<'a> {
    pub fn start(slot: Option<&'a mut u64>) -> Self {
        Self {
            start: slot.as_ref().map(|_| Instant::now()),
            slot,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        if let (Some(start), Some(slot)) = (self.start, self.slot.as_mut()) {
            **slot += start.elapsed().as_nanos() as u64;
        }
    }
}

/// Counters kept by one worker over a whole run. Times are nanoseconds and
/// stay zero unless statistics were requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: usize,
    pub iterations: u64,
    // time spent comparing couples
    pub even_ns: u64,
    pub odd_ns: u64,
    // whole phase, including chunk claims
    pub even_phase_ns: u64,
    pub odd_phase_ns: u64,
    pub even_runs: u64,
    pub odd_runs: u64,
    pub even_swaps: u64,
    pub odd_swaps: u64,
    pub barrier1_ns: u64,
    pub barrier2_ns: u64,
    pub update_ns: u64,
}

fn per(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

impl WorkerStats {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn swaps(&self) -> u64 {
        self.even_swaps + self.odd_swaps
    }

    pub fn avg_even_run_us(&self) -> f64 {
        per(self.even_ns, self.even_runs) / 1000.0
    }

    pub fn avg_odd_run_us(&self) -> f64 {
        per(self.odd_ns, self.odd_runs) / 1000.0
    }

    pub fn avg_even_scheduling_us(&self) -> f64 {
        per(
            self.even_phase_ns.saturating_sub(self.even_ns),
            self.iterations,
        ) / 1000.0
    }

    pub fn avg_odd_scheduling_us(&self) -> f64 {
        per(self.odd_phase_ns.saturating_sub(self.odd_ns), self.iterations) / 1000.0
    }

    pub fn avg_even_phase_us(&self) -> f64 {
        per(self.even_ns, self.iterations) / 1000.0
    }

    pub fn avg_odd_phase_us(&self) -> f64 {
        per(self.odd_ns, self.iterations) / 1000.0
    }

    pub fn avg_barrier1_us(&self) -> f64 {
        per(self.barrier1_ns, self.iterations) / 1000.0
    }

    pub fn avg_barrier2_us(&self) -> f64 {
        per(self.barrier2_ns, self.iterations) / 1000.0
    }

    pub fn avg_update_us(&self) -> f64 {
        per(self.update_ns, self.iterations) / 1000.0
    }
}

/// Outcome of one sort.
#[derive(Clone, Debug)]
pub struct SortReport {
    pub engine: String,
    pub elements: usize,
    pub workers: usize,
    /// Full even+odd iterations, the final swap-free one included.
    pub iterations: u64,
    pub elapsed: Duration,
    pub stats_collected: bool,
    pub worker_stats: Vec<WorkerStats>,
}

impl SortReport {
    pub fn new(engine: &str, elements: usize, workers: usize) -> Self {
        Self {
            engine: engine.to_string(),
            elements,
            workers,
            iterations: 0,
            elapsed: Duration::ZERO,
            stats_collected: false,
            worker_stats: Vec::new(),
        }
    }

    pub fn total_swaps(&self) -> u64 {
        self.worker_stats.iter().map(|s| s.swaps()).sum()
    }

    pub fn usecs_per_iteration(&self) -> f64 {
        per(self.elapsed.as_micros() as u64, self.iterations)
    }

    pub fn log_summary(&self) {
        info!(
            "Total time with {} workers ({}): {:.3} msecs",
            self.workers,
            self.engine,
            self.elapsed.as_secs_f64() * 1000.0
        );
        info!(
            "Iterations: {} ({:.3} usecs per iteration)",
            self.iterations,
            self.usecs_per_iteration()
        );
        if !self.stats_collected {
            return;
        }
        for s in self.worker_stats.iter() {
            info!(
                "Worker {}: even run {:.3}us ({} runs, {} swaps), even sched {:.3}us, \
                 barrier1 {:.3}us, odd run {:.3}us ({} runs, {} swaps), odd sched {:.3}us, \
                 update {:.3}us, barrier2 {:.3}us",
                s.id,
                s.avg_even_run_us(),
                s.even_runs,
                s.even_swaps,
                s.avg_even_scheduling_us(),
                s.avg_barrier1_us(),
                s.avg_odd_run_us(),
                s.odd_runs,
                s.odd_swaps,
                s.avg_odd_scheduling_us(),
                s.avg_update_us(),
                s.avg_barrier2_us(),
            );
        }
    }

    /// Publishes the report through the `metrics` facade. Without an
    /// installed recorder this is a no-op.
    pub fn record_metrics(&self) {
        metrics::gauge!("oesort.elements").set(self.elements as f64);
        metrics::gauge!("oesort.workers").set(self.workers as f64);
        metrics::gauge!("oesort.iterations").set(self.iterations as f64);
        metrics::gauge!("oesort.duration_ms").set(self.elapsed.as_secs_f64() * 1000.0);
        metrics::gauge!("oesort.swaps").set(self.total_swaps() as f64);
        if !self.stats_collected {
            return;
        }
        for s in self.worker_stats.iter() {
            metrics::histogram!("oesort.worker.even_phase_us").record(s.avg_even_phase_us());
            metrics::histogram!("oesort.worker.odd_phase_us").record(s.avg_odd_phase_us());
            metrics::histogram!("oesort.worker.barrier1_us").record(s.avg_barrier1_us());
            metrics::histogram!("oesort.worker.barrier2_us").record(s.avg_barrier2_us());
            metrics::histogram!("oesort.worker.update_us").record(s.avg_update_us());
            metrics::histogram!("oesort.worker.swaps").record(s.swaps() as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_scoped_timer_accumulates() {
        let mut total = 0u64;
        {
            let _t = ScopedTimer::start(Some(&mut total));
            thread::sleep(Duration::from_millis(2));
        }
        let first = total;
        assert!(first >= 2_000_000);
        {
            let _t = ScopedTimer::start(Some(&mut total));
        }
        assert!(total >= first);
    }

    #[test]
    fn test_disabled_timer() {
        let _t = ScopedTimer::start(None);
        thread::sleep(Duration::from_millis(1));
    }

    #[test]
    fn test_worker_averages() {
        let s = WorkerStats {
            id: 1,
            iterations: 4,
            even_ns: 8000,
            even_phase_ns: 12000,
            even_runs: 2,
            barrier1_ns: 400,
            even_swaps: 3,
            odd_swaps: 2,
            ..Default::default()
        };
        assert_eq!(s.swaps(), 5);
        assert_eq!(s.avg_even_run_us(), 4.0);
        assert_eq!(s.avg_even_phase_us(), 2.0);
        assert_eq!(s.avg_even_scheduling_us(), 1.0);
        assert_eq!(s.avg_barrier1_us(), 0.1);
        assert_eq!(s.avg_odd_run_us(), 0.0);
    }

    #[test]
    fn test_report_totals() {
        let mut report = SortReport::new("static", 10, 2);
        report.iterations = 4;
        report.elapsed = Duration::from_micros(100);
        report.worker_stats = vec![
            WorkerStats {
                even_swaps: 3,
                ..WorkerStats::new(0)
            },
            WorkerStats {
                odd_swaps: 4,
                ..WorkerStats::new(1)
            },
        ];
        assert_eq!(report.total_swaps(), 7);
        assert_eq!(report.usecs_per_iteration(), 25.0);
        report.log_summary();
        report.record_metrics();
    }
}
