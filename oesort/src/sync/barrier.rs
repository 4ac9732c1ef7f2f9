//! Reusable barriers for a fixed set of parties.
//!
//! Both barriers keep a signed counter that starts at the party count `P`.
//! Participants lower it on arrival; a designated resetter (the coordinator)
//! restores it to `P` once every participant of the previous cycle has been
//! released. Two participant styles are offered:
//! - `wait_for_reset`: decrement, then wait until the counter is back to `P`
//!   (released by an external `reset`)
//! - `wait_all`: decrement, then wait until the counter is non-positive
//!   (the last arriver releases everyone)
//!
//! A non-participant can wait for full arrival through `wait_for_all_nomod`
//! without touching the counter.
//!
//! # Safety contract
//! `reset` must be called by exactly one actor and only at a quiescent point:
//! every participant of the previous cycle has already observed its release
//! or cannot race the new cycle. Skipped or concurrent resets, or a wrong
//! party count, stall the parties forever. This is a precondition, not a
//! runtime error.

use crate::def::SC;
use crossbeam::utils::Backoff;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::AtomicIsize;

/// The operations the engines need from a phase barrier.
pub trait PhaseBarrier: Send + Sync {
    /// Number of participants (the reset value).
    fn parties(&self) -> usize;
    /// Restores the counter to the party count, releasing `wait_for_reset` callers.
    fn reset(&self);
    /// Participant arrival that is released only by the next `reset`.
    fn wait_for_reset(&self);
    /// Participant arrival that is released once all parties have arrived.
    fn wait_all(&self);
    /// Observer wait: returns once all parties have arrived, counter untouched.
    fn wait_for_all_nomod(&self);
}

/// How a spinning waiter burns its time between polls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpinPolicy {
    /// Tight loop with a `spin_loop` hint.
    Spin,
    /// Exponential spinning that falls back to yielding the thread.
    #[default]
    Backoff,
    /// Yield to the scheduler on every poll.
    Yield,
}

impl SpinPolicy {
    #[inline]
    pub fn wait_until<F: Fn() -> bool>(self, cond: F) {
        match self {
            SpinPolicy::Spin => {
                while !cond() {
                    std::hint::spin_loop();
                }
            }
            SpinPolicy::Backoff => {
                let backoff = Backoff::new();
                while !cond() {
                    backoff.snooze();
                }
            }
            SpinPolicy::Yield => {
                while !cond() {
                    std::thread::yield_now();
                }
            }
        }
    }
}

/// Busy-waiting barrier over an atomic counter.
///
/// Every load and store is `SeqCst`, so crossing the barrier publishes all
/// writes made before arrival to everyone released from it.
pub struct SpinBarrier {
    count: AtomicIsize,
    reset_value: isize,
    policy: SpinPolicy,
}

impl SpinBarrier {
    pub fn new(parties: usize) -> Self {
        Self::with_policy(parties, SpinPolicy::default())
    }

    pub fn with_policy(parties: usize, policy: SpinPolicy) -> Self {
        let reset_value = parties as isize;
        Self {
            count: AtomicIsize::new(reset_value),
            reset_value,
            policy,
        }
    }

    pub fn policy(&self) -> SpinPolicy {
        self.policy
    }

    /// Current counter value, for diagnostics and tests.
    pub fn count(&self) -> isize {
        self.count.load(SC)
    }
}

impl PhaseBarrier for SpinBarrier {
    fn parties(&self) -> usize {
        self.reset_value as usize
    }

    fn reset(&self) {
        self.count.store(self.reset_value, SC);
    }

    fn wait_for_reset(&self) {
        self.count.fetch_sub(1, SC);
        self.policy
            .wait_until(|| self.count.load(SC) == self.reset_value);
    }

    fn wait_all(&self) {
        self.count.fetch_sub(1, SC);
        self.policy.wait_until(|| self.count.load(SC) <= 0);
    }

    fn wait_for_all_nomod(&self) {
        self.policy.wait_until(|| self.count.load(SC) <= 0);
    }
}

struct BlockingState {
    count: isize,
    // bumped by every reset so sleepers can tell a reset happened
    generation: u64,
}

/// Same contract as [`SpinBarrier`], but waiters sleep on a condition
/// variable instead of polling.
pub struct BlockingBarrier {
    state: Mutex<BlockingState>,
    cond: Condvar,
    reset_value: isize,
}

impl BlockingBarrier {
    pub fn new(parties: usize) -> Self {
        let reset_value = parties as isize;
        Self {
            state: Mutex::new(BlockingState {
                count: reset_value,
                generation: 0,
            }),
            cond: Condvar::new(),
            reset_value,
        }
    }

    pub fn count(&self) -> isize {
        self.state.lock().count
    }
}

impl PhaseBarrier for BlockingBarrier {
    fn parties(&self) -> usize {
        self.reset_value as usize
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.count = self.reset_value;
        state.generation = state.generation.wrapping_add(1);
        self.cond.notify_all();
    }

    fn wait_for_reset(&self) {
        let mut state = self.state.lock();
        state.count -= 1;
        if state.count <= 0 {
            self.cond.notify_all();
        }
        let generation = state.generation;
        while state.generation == generation {
            self.cond.wait(&mut state);
        }
    }

    fn wait_all(&self) {
        let mut state = self.state.lock();
        state.count -= 1;
        if state.count <= 0 {
            self.cond.notify_all();
            return;
        }
        while state.count > 0 {
            self.cond.wait(&mut state);
        }
    }

    fn wait_for_all_nomod(&self) {
        let mut state = self.state.lock();
        while state.count > 0 {
            self.cond.wait(&mut state);
        }
    }
}
