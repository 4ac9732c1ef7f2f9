//! Sort engines.
//!
//! Every engine runs the same algorithm: alternate an even phase over the
//! couples `(0,1), (2,3), ...` and an odd phase over `(1,2), (3,4), ...`
//! until one full iteration swaps nothing. They differ in how the phases are
//! spread over threads:
//! - [`SequentialEngine`]: the caller's thread does everything
//! - [`PoolEngine`]: a persistent pool of workers synchronized on phase
//!   barriers, with static blocks or a shared chunk dispenser
//! - [`RayonEngine`]: each phase is a parallel map-reduce on a rayon pool

mod coordinator;
pub mod pool;
pub mod rayon_pool;
pub mod sequential;
mod worker;

pub use pool::PoolEngine;
pub use rayon_pool::{RayonEngine, RayonSchedule};
pub use sequential::SequentialEngine;

use crate::error::SortError;
use crate::stats::SortReport;

pub trait SortEngine<T>: Send + Sync {
    fn name(&self) -> &str;

    /// Sorts `data` in place and reports how the run went.
    fn sort(&self, data: &mut [T]) -> Result<SortReport, SortError>;
}
