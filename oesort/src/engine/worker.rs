use super::pool::PoolState;
use crate::def::SC;
use crate::partition::WorkerRanges;
use crate::stats::{ScopedTimer, WorkerStats};
use crate::sync::PhaseBarrier;
use log::{error, trace};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

// Runs one phase, turning a panic (from a user `Ord` impl) into a recorded
// failure. The worker then carries on through the barriers so that the
// coordinator is never left waiting for a party that died.
fn guarded_phase<T: Ord + Send, B: PhaseBarrier>(
    pool: &PoolState<'_, T, B>,
    id: usize,
    own: &Range<usize>,
    run_ns: &mut u64,
    runs: &mut u64,
) -> usize {
    match panic::catch_unwind(AssertUnwindSafe(|| pool.run_phase(own, run_ns, runs))) {
        Ok(swaps) => swaps,
        Err(_) => {
            error!("worker {} panicked during a phase, stopping the pool", id);
            pool.mark_failed(id);
            0
        }
    }
}

// One persistent worker: even phase, mid barrier, odd phase, publish the
// swap bit, end barrier. Termination is only checked at the loop top, so a
// worker never leaves with a range half processed.
pub(crate) fn run_worker<T: Ord + Send, B: PhaseBarrier>(
    pool: &PoolState<'_, T, B>,
    id: usize,
) -> WorkerStats {
    let mut stats = WorkerStats::new(id);
    let ranges = WorkerRanges::new(pool.data.len(), pool.workers, id);
    let timing = pool.collect_stats;
    trace!("worker {} owns even {:?} odd {:?}", id, ranges.even, ranges.odd);

    while !pool.terminate.load(SC) {
        stats.iterations += 1;

        let even_swaps = {
            let _t = ScopedTimer::start(timing.then_some(&mut stats.even_phase_ns));
            guarded_phase(pool, id, &ranges.even, &mut stats.even_ns, &mut stats.even_runs)
        };
        stats.even_swaps += even_swaps as u64;

        {
            let _t = ScopedTimer::start(timing.then_some(&mut stats.barrier1_ns));
            pool.mid_wait();
        }

        let odd_swaps = {
            let _t = ScopedTimer::start(timing.then_some(&mut stats.odd_phase_ns));
            guarded_phase(pool, id, &ranges.odd, &mut stats.odd_ns, &mut stats.odd_runs)
        };
        stats.odd_swaps += odd_swaps as u64;

        {
            let _t = ScopedTimer::start(timing.then_some(&mut stats.update_ns));
            pool.swapped.fetch_or(even_swaps + odd_swaps > 0, SC);
        }

        {
            let _t = ScopedTimer::start(timing.then_some(&mut stats.barrier2_ns));
            pool.end_barrier.wait_for_reset();
        }
    }
    trace!("worker {} exits after {} iterations", id, stats.iterations);
    stats
}
