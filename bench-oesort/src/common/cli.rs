use clap::{Parser, Subcommand, ValueEnum};
use oesort::config::{BarrierKind, Schedule, SortConfig};
use oesort::def::{default_workers, DEFAULT_CHUNK_COUPLES};
use oesort::engine::{PoolEngine, RayonEngine, RayonSchedule, SequentialEngine, SortEngine};
use oesort::error::{ConfigError, SortError};
use oesort::sync::SpinPolicy;
use serde::Serialize;

#[derive(Subcommand, Debug, Serialize, Clone)]
pub enum Command {
    /// Single-threaded reference run
    Seq,
    /// Persistent pool, every worker owns a fixed block of couples
    Static,
    /// Persistent pool, workers claim chunks from a shared dispenser
    Dynamic {
        /// Couples per claim (must be > 0)
        #[arg(short, long, default_value_t = DEFAULT_CHUNK_COUPLES as i64, allow_negative_numbers = true)]
        chunk_size: i64,
    },
    /// Parallel map-reduce on a rayon pool
    Rayon {
        /// Couples per task: 0 => static block, < 0 => static cyclic, > 0 => dynamic
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        chunk_size: i64,
    },
}

#[derive(ValueEnum, Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum BarrierArg {
    Spin,
    Backoff,
    Yield,
    Blocking,
}

impl From<BarrierArg> for BarrierKind {
    fn from(arg: BarrierArg) -> Self {
        match arg {
            BarrierArg::Spin => BarrierKind::Spin(SpinPolicy::Spin),
            BarrierArg::Backoff => BarrierKind::Spin(SpinPolicy::Backoff),
            BarrierArg::Yield => BarrierKind::Spin(SpinPolicy::Yield),
            BarrierArg::Blocking => BarrierKind::Blocking,
        }
    }
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(about = "Odd-even transposition sort benchmark")]
pub struct BenchmarkCli {
    #[command(subcommand)]
    pub command: Command,

    /// Number of array elements
    #[arg(short = 'n', long)]
    pub elements: usize,

    /// Upper bound for the number of iterations (0 => unbounded random input)
    #[arg(long, default_value_t = 0)]
    pub niter: usize,

    /// Seed for the input generator (-1 => reversed input)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub seed: i64,

    /// Number of workers
    #[arg(short, long, default_value_t = default_workers())]
    pub workers: usize,

    /// Barrier used by the persistent pools
    #[arg(long, value_enum, default_value_t = BarrierArg::Backoff)]
    pub barrier: BarrierArg,

    /// Collect and print per-worker phase and barrier statistics
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Output filename for metrics (JSON); nothing is written when empty
    #[arg(long, default_value = "")]
    pub output: String,
}

impl BenchmarkCli {
    fn pool_config(&self, schedule: Schedule) -> SortConfig {
        SortConfig::new(self.workers)
            .with_schedule(schedule)
            .with_barrier(self.barrier.into())
            .with_stats(self.stats)
    }

    pub fn build_engine(&self) -> Result<Box<dyn SortEngine<u32>>, SortError> {
        let engine: Box<dyn SortEngine<u32>> = match self.command {
            Command::Seq => Box::new(SequentialEngine::new(self.stats)),
            Command::Static => {
                let config = self.pool_config(Schedule::Static);
                config.validate()?;
                Box::new(PoolEngine::new(config))
            }
            Command::Dynamic { chunk_size } => {
                if chunk_size <= 0 {
                    return Err(ConfigError::InvalidChunkSize(chunk_size).into());
                }
                let config = self.pool_config(Schedule::Dynamic {
                    chunk: chunk_size as usize,
                });
                config.validate()?;
                Box::new(PoolEngine::new(config))
            }
            Command::Rayon { chunk_size } => Box::new(RayonEngine::new(
                self.workers,
                RayonSchedule::from_chunk_arg(chunk_size),
                self.stats,
            )?),
        };
        Ok(engine)
    }
}
