use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),
    #[error("Invalid chunk size: {0} (must be positive for dynamic scheduling)")]
    InvalidChunkSize(i64),
}

#[derive(Error, Debug)]
pub enum SortError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Worker {0} panicked during a sort phase")]
    WorkerPanicked(usize),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl From<SortError> for String {
    fn from(error: SortError) -> Self {
        error.to_string()
    }
}
