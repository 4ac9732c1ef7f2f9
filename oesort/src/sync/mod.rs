//! Synchronization primitives shared by the worker pools.

pub mod barrier;
pub mod dispenser;

pub use barrier::{BlockingBarrier, PhaseBarrier, SpinBarrier, SpinPolicy};
pub use dispenser::ChunkDispenser;
