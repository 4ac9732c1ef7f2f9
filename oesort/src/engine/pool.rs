use super::coordinator::{coordinate_dynamic, coordinate_static};
use super::worker::run_worker;
use super::SortEngine;
use crate::config::{BarrierKind, Schedule, SortConfig};
use crate::def::SC;
use crate::error::SortError;
use crate::phase::{even_domain, sort_couples, SharedSlice};
use crate::stats::{ScopedTimer, SortReport, WorkerStats};
use crate::sync::{BlockingBarrier, ChunkDispenser, PhaseBarrier, SpinBarrier};
use log::debug;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::thread;
use std::time::Instant;

const NO_FAILURE: usize = usize::MAX;

pub(crate) enum PoolSchedule {
    Static,
    Dynamic(ChunkDispenser),
}

/// Everything the coordinator and the workers share during one sort. It is
/// built before the first worker starts and dropped after the last one has
/// been joined.
pub(crate) struct PoolState<'a, T, B> {
    pub data: SharedSlice<'a, T>,
    pub workers: usize,
    // any swap in the current iteration, OR-ed by every worker
    pub swapped: AtomicBool,
    // written once by the coordinator, read by workers at the loop top only
    pub terminate: AtomicBool,
    // id of the first worker whose phase panicked, NO_FAILURE otherwise
    pub failed: AtomicUsize,
    // crossed between the even and the odd phase
    pub mid_barrier: B,
    // crossed at the end of every iteration
    pub end_barrier: B,
    pub schedule: PoolSchedule,
    pub collect_stats: bool,
}

impl<T, B> PoolState<'_, T, B> {
    /// Records a panicked phase. Only the first failure is kept.
    pub fn mark_failed(&self, id: usize) {
        let _ = self.failed.compare_exchange(NO_FAILURE, id, SC, SC);
    }

    pub fn failed_worker(&self) -> Option<usize> {
        let id = self.failed.load(SC);
        (id != NO_FAILURE).then_some(id)
    }
}

impl<T: Ord + Send, B: PhaseBarrier> PoolState<'_, T, B> {
    /// Runs one phase for a worker. `own` is the worker's static block and is
    /// ignored under dynamic scheduling. Returns the swaps performed.
    pub fn run_phase(&self, own: &Range<usize>, run_ns: &mut u64, runs: &mut u64) -> usize {
        let timing = self.collect_stats;
        match &self.schedule {
            PoolSchedule::Static => {
                *runs += 1;
                let _t = ScopedTimer::start(timing.then_some(run_ns));
                // SAFETY: static blocks of distinct workers never overlap
                unsafe { sort_couples(self.data.range_mut(own.clone())) }
            }
            PoolSchedule::Dynamic(dispenser) => {
                let mut swaps = 0;
                while let Some(chunk) = dispenser.claim() {
                    *runs += 1;
                    let _t = ScopedTimer::start(timing.then_some(&mut *run_ns));
                    // SAFETY: every claim is handed out exactly once per phase
                    swaps += unsafe { sort_couples(self.data.range_mut(chunk)) };
                }
                swaps
            }
        }
    }

    pub fn mid_wait(&self) {
        match self.schedule {
            PoolSchedule::Static => self.mid_barrier.wait_all(),
            PoolSchedule::Dynamic(_) => self.mid_barrier.wait_for_reset(),
        }
    }
}

/// Odd-even sort on a pool of `config.workers` threads that live for the
/// whole sort and meet at two barriers per iteration.
pub struct PoolEngine {
    config: SortConfig,
    name: &'static str,
}

impl PoolEngine {
    pub fn new(config: SortConfig) -> Self {
        let name = match config.schedule {
            Schedule::Static => "static",
            Schedule::Dynamic { .. } => "dynamic",
        };
        Self { config, name }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    fn run<T, B, F>(&self, data: &mut [T], make_barrier: F) -> Result<SortReport, SortError>
    where
        T: Ord + Send,
        B: PhaseBarrier,
        F: Fn(usize) -> B,
    {
        let n = data.len();
        let nw = self.config.workers;
        let mut report = SortReport::new(self.name, n, nw);
        report.stats_collected = self.config.collect_stats;
        if n <= 1 {
            return Ok(report);
        }

        let start = Instant::now();
        let schedule = match self.config.schedule {
            Schedule::Static => PoolSchedule::Static,
            Schedule::Dynamic { chunk } => {
                // two elements per couple keeps every chunk aligned to its phase
                let dispenser = ChunkDispenser::new(chunk.saturating_mul(2), n);
                dispenser.set_start(even_domain(n).start);
                PoolSchedule::Dynamic(dispenser)
            }
        };
        let pool = PoolState {
            data: SharedSlice::new(data),
            workers: nw,
            swapped: AtomicBool::new(false),
            terminate: AtomicBool::new(false),
            failed: AtomicUsize::new(NO_FAILURE),
            mid_barrier: make_barrier(nw),
            end_barrier: make_barrier(nw),
            schedule,
            collect_stats: self.config.collect_stats,
        };

        debug!("starting {} pool: {} workers, {} elements", self.name, nw, n);
        let (iterations, worker_stats) = thread::scope(|s| {
            let handles: Vec<_> = (0..nw)
                .map(|id| {
                    let pool = &pool;
                    s.spawn(move || run_worker(pool, id))
                })
                .collect();
            let iterations = match pool.schedule {
                PoolSchedule::Static => coordinate_static(&pool),
                PoolSchedule::Dynamic(ref dispenser) => coordinate_dynamic(&pool, dispenser),
            };
            let worker_stats = handles
                .into_iter()
                .enumerate()
                .map(|(id, h)| h.join().map_err(|_| SortError::WorkerPanicked(id)))
                .collect::<Result<Vec<WorkerStats>, SortError>>()?;
            Ok::<_, SortError>((iterations, worker_stats))
        })?;
        debug_assert!(pool.terminate.load(SC));
        debug!("{} pool joined after {} iterations", self.name, iterations);
        if let Some(id) = pool.failed_worker() {
            return Err(SortError::WorkerPanicked(id));
        }

        report.iterations = iterations;
        report.elapsed = start.elapsed();
        report.worker_stats = worker_stats;
        Ok(report)
    }
}

impl<T: Ord + Send> SortEngine<T> for PoolEngine {
    fn name(&self) -> &str {
        self.name
    }

    fn sort(&self, data: &mut [T]) -> Result<SortReport, SortError> {
        self.config.validate()?;
        match self.config.barrier {
            BarrierKind::Spin(policy) => {
                self.run(data, |parties| SpinBarrier::with_policy(parties, policy))
            }
            BarrierKind::Blocking => self.run(data, BlockingBarrier::new),
        }
    }
}
