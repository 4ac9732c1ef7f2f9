//! Runtime configuration of the worker pools.
//!
//! The settings here replace what used to be build-time switches: the
//! barrier implementation, the spin policy and statistics collection are all
//! chosen when the engine is constructed.
//!
//! # Usage
//! ```
//! use oesort::config::{BarrierKind, Schedule, SortConfig};
//! use oesort::sync::SpinPolicy;
//!
//! let config = SortConfig::new(4)
//!     .with_schedule(Schedule::Dynamic { chunk: 256 })
//!     .with_barrier(BarrierKind::Spin(SpinPolicy::Yield))
//!     .with_stats(true);
//! assert!(config.validate().is_ok());
//! ```

use crate::def::{default_workers, DEFAULT_CHUNK_COUPLES};
use crate::error::ConfigError;
use crate::sync::SpinPolicy;

/// How the couples of a phase are assigned to the workers of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Every worker owns a fixed balanced block for the whole run.
    Static,
    /// Workers claim `chunk` couples at a time from a shared dispenser.
    Dynamic { chunk: usize },
}

/// Which barrier the pools synchronize on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarrierKind {
    Spin(SpinPolicy),
    Blocking,
}

impl Default for BarrierKind {
    fn default() -> Self {
        BarrierKind::Spin(SpinPolicy::default())
    }
}

#[derive(Clone, Debug)]
pub struct SortConfig {
    pub workers: usize,
    pub schedule: Schedule,
    pub barrier: BarrierKind,
    pub collect_stats: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

impl SortConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            schedule: Schedule::Dynamic {
                chunk: DEFAULT_CHUNK_COUPLES,
            },
            barrier: BarrierKind::default(),
            collect_stats: false,
        }
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_barrier(mut self, barrier: BarrierKind) -> Self {
        self.barrier = barrier;
        self
    }

    pub fn with_stats(mut self, collect_stats: bool) -> Self {
        self.collect_stats = collect_stats;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(self.workers));
        }
        if let Schedule::Dynamic { chunk: 0 } = self.schedule {
            return Err(ConfigError::InvalidChunkSize(0));
        }
        Ok(())
    }
}
