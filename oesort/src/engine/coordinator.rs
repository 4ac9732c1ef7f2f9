use super::pool::PoolState;
use crate::def::SC;
use crate::phase::{even_domain, odd_domain};
use crate::sync::{ChunkDispenser, PhaseBarrier};
use log::trace;

// Shared tail of both coordinators: every worker is parked in the end
// barrier, so raise the flag and release them once more to let them exit.
// A failed pool ends the same way, since workers whose phase panicked keep
// attending the barriers.
fn terminate<T, B: PhaseBarrier>(pool: &PoolState<'_, T, B>) {
    pool.terminate.store(true, SC);
    pool.end_barrier.reset();
}

/// Coordinator for static blocks. Workers meet among themselves in the mid
/// barrier (`wait_all`), so only the end of the iteration is observed here.
/// Returns the number of iterations, the final swap-free one included.
pub(crate) fn coordinate_static<T, B: PhaseBarrier>(pool: &PoolState<'_, T, B>) -> u64 {
    let mut iterations = 0u64;
    loop {
        iterations += 1;
        pool.end_barrier.wait_for_all_nomod();
        let swapped = pool.swapped.load(SC);
        trace!("iteration {} done, swapped={}", iterations, swapped);
        if !swapped || pool.failed_worker().is_some() {
            break;
        }
        // every worker is past the mid barrier: it is safe to rearm it
        pool.mid_barrier.reset();
        pool.swapped.store(false, SC);
        pool.end_barrier.reset();
    }
    terminate(pool);
    iterations
}

/// Coordinator for the chunk dispenser. Both barriers are released by the
/// coordinator, which repoints the cursor while every worker is parked.
pub(crate) fn coordinate_dynamic<T, B: PhaseBarrier>(
    pool: &PoolState<'_, T, B>,
    dispenser: &ChunkDispenser,
) -> u64 {
    let n = pool.data.len();
    let mut iterations = 0u64;
    loop {
        iterations += 1;

        pool.mid_barrier.wait_for_all_nomod();
        trace!("iteration {} even phase done", iterations);
        dispenser.set_start(odd_domain(n).start);
        pool.mid_barrier.reset();

        pool.end_barrier.wait_for_all_nomod();
        let swapped = pool.swapped.load(SC);
        trace!("iteration {} odd phase done, swapped={}", iterations, swapped);
        if !swapped || pool.failed_worker().is_some() {
            break;
        }
        dispenser.set_start(even_domain(n).start);
        pool.swapped.store(false, SC);
        pool.end_barrier.reset();
    }
    terminate(pool);
    iterations
}
