//! Odd-even transposition sort on a persistent pool of worker threads.
//!
//! Each iteration runs an even phase over the couples `(0,1), (2,3), ...` and
//! an odd phase over `(1,2), (3,4), ...`; the sort stops at the first
//! iteration in which no couple was swapped. The parallel engines keep `nw`
//! threads alive for the whole run and hand them over from phase to phase
//! with reusable barriers, never with per-phase spawns or locks on the array.
//!
//! ```
//! use oesort::config::{Schedule, SortConfig};
//! use oesort::engine::{PoolEngine, SortEngine};
//!
//! let mut data = vec![4, 3, 2, 1, 0];
//! let engine = PoolEngine::new(SortConfig::new(2).with_schedule(Schedule::Static));
//! let report = engine.sort(&mut data).unwrap();
//! assert_eq!(data, vec![0, 1, 2, 3, 4]);
//! assert_eq!(report.iterations, 4);
//! ```

pub mod config;
pub mod def;
pub mod engine;
pub mod error;
pub mod partition;
pub mod phase;
pub mod stats;
pub mod sync;

pub use config::{BarrierKind, Schedule, SortConfig};
pub use engine::{PoolEngine, RayonEngine, RayonSchedule, SequentialEngine, SortEngine};
pub use error::{ConfigError, SortError};
pub use stats::{SortReport, WorkerStats};

/// True when `data` is in non-decreasing order.
pub fn is_sorted<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
