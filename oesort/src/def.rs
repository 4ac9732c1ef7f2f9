use std::sync::atomic::Ordering;

pub const SC: Ordering = Ordering::SeqCst;

// couples handed out per claim by the dynamic engine when no chunk size is given
pub const DEFAULT_CHUNK_COUPLES: usize = 1024;

// fallback when the platform cannot report its parallelism
pub const FALLBACK_WORKERS: usize = 4;

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}
