use super::SortEngine;
use crate::error::{ConfigError, SortError};
use crate::partition::block_range;
use crate::phase::{even_domain, odd_domain, sort_couples};
use crate::stats::{ScopedTimer, SortReport, WorkerStats};
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;

/// How a phase is split into parallel tasks. Chunk sizes count couples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayonSchedule {
    /// One contiguous balanced block per worker.
    Block,
    /// Chunks dealt round-robin to the workers.
    Cyclic(usize),
    /// Chunks taken by whichever thread is free.
    Dynamic(usize),
}

impl RayonSchedule {
    /// Maps the signed command-line chunk size: 0 is block, negative is
    /// cyclic and positive is dynamic.
    pub fn from_chunk_arg(chunk: i64) -> Self {
        match chunk {
            0 => RayonSchedule::Block,
            c if c < 0 => RayonSchedule::Cyclic(c.unsigned_abs() as usize),
            c => RayonSchedule::Dynamic(c as usize),
        }
    }
}

/// Odd-even sort where every phase is a parallel map over chunks of couples
/// followed by a reduction of the swap counts, on a dedicated rayon pool.
pub struct RayonEngine {
    workers: usize,
    schedule: RayonSchedule,
    collect_stats: bool,
    tpool: ThreadPool,
}

impl RayonEngine {
    pub fn new(
        workers: usize,
        schedule: RayonSchedule,
        collect_stats: bool,
    ) -> Result<Self, SortError> {
        if workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(workers).into());
        }
        if let RayonSchedule::Cyclic(0) | RayonSchedule::Dynamic(0) = schedule {
            return Err(ConfigError::InvalidChunkSize(0).into());
        }
        let tpool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("oesort-rayon-{}", i))
            .build()
            .map_err(|e| SortError::ThreadPool(e.to_string()))?;
        Ok(Self {
            workers,
            schedule,
            collect_stats,
            tpool,
        })
    }

    pub fn schedule(&self) -> RayonSchedule {
        self.schedule
    }

    // `phase` starts at the first couple of the phase
    fn run_phase<T: Ord + Send>(&self, phase: &mut [T]) -> usize {
        match self.schedule {
            RayonSchedule::Block => {
                let couples = phase.len() / 2;
                let mut rest = &mut phase[..2 * couples];
                let mut blocks = Vec::with_capacity(self.workers);
                for t in 0..self.workers {
                    let len = 2 * block_range(couples, self.workers, t).len();
                    let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
                    blocks.push(head);
                    rest = tail;
                }
                self.tpool
                    .install(|| blocks.into_par_iter().map(sort_couples).sum())
            }
            RayonSchedule::Cyclic(chunk) => {
                let mut lanes: Vec<Vec<&mut [T]>> =
                    (0..self.workers).map(|_| Vec::new()).collect();
                for (i, c) in phase.chunks_mut(2 * chunk).enumerate() {
                    lanes[i % self.workers].push(c);
                }
                self.tpool.install(|| {
                    lanes
                        .into_par_iter()
                        .map(|lane| lane.into_iter().map(sort_couples).sum::<usize>())
                        .sum()
                })
            }
            RayonSchedule::Dynamic(chunk) => self.tpool.install(|| {
                phase
                    .par_chunks_mut(2 * chunk)
                    .with_max_len(1)
                    .map(sort_couples)
                    .sum()
            }),
        }
    }
}

impl<T: Ord + Send> SortEngine<T> for RayonEngine {
    fn name(&self) -> &str {
        "rayon"
    }

    fn sort(&self, data: &mut [T]) -> Result<SortReport, SortError> {
        let n = data.len();
        let mut report = SortReport::new("rayon", n, self.workers);
        report.stats_collected = self.collect_stats;
        if n <= 1 {
            return Ok(report);
        }

        debug!(
            "rayon engine: {} threads, {:?}, {} elements",
            self.workers, self.schedule, n
        );
        let timing = self.collect_stats;
        let mut stats = WorkerStats::new(0);
        let start = Instant::now();
        loop {
            stats.iterations += 1;
            let even = {
                let _t = ScopedTimer::start(timing.then_some(&mut stats.even_phase_ns));
                self.run_phase(&mut data[even_domain(n)])
            };
            let odd = {
                let _t = ScopedTimer::start(timing.then_some(&mut stats.odd_phase_ns));
                self.run_phase(&mut data[odd_domain(n)])
            };
            stats.even_swaps += even as u64;
            stats.odd_swaps += odd as u64;
            if even + odd == 0 {
                break;
            }
        }
        stats.even_ns = stats.even_phase_ns;
        stats.odd_ns = stats.odd_phase_ns;
        stats.even_runs = stats.iterations;
        stats.odd_runs = stats.iterations;

        report.iterations = stats.iterations;
        report.elapsed = start.elapsed();
        report.worker_stats = vec![stats];
        Ok(report)
    }
}
