use crate::def::SC;
use std::ops::Range;
use std::sync::atomic::AtomicUsize;

/// Hands out disjoint `[start, end)` ranges of a bounded domain to any number
/// of concurrent callers. Each claim is one fetch-and-add on the cursor, so
/// between two `set_start` calls the claimed ranges partition
/// `[start, domain_size)` exactly once.
///
/// `set_start` belongs to the coordinator and must only run while no worker
/// can still be claiming from the previous domain (the barrier handoff
/// guarantees this, the dispenser does not).
pub struct ChunkDispenser {
    cursor: AtomicUsize,
    chunk_size: usize,
    domain_size: usize,
}

impl ChunkDispenser {
    /// A chunk larger than the domain is clamped to the domain, so one claim
    /// can never step the cursor past `2 * domain_size`.
    pub fn new(chunk_size: usize, domain_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        Self {
            cursor: AtomicUsize::new(0),
            chunk_size: chunk_size.min(domain_size.max(1)),
            domain_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    pub fn set_start(&self, v: usize) {
        self.cursor.store(v, SC);
    }

    // returns None once the domain is exhausted; the cursor is left alone
    // after that so repeated claims cannot wrap it around
    pub fn claim(&self) -> Option<Range<usize>> {
        let domain_size = self.domain_size;
        let step = self.chunk_size;
        let start = self
            .cursor
            .fetch_update(SC, SC, |c| (c < domain_size).then(|| c.saturating_add(step)))
            .ok()?;
        Some(start..domain_size.min(start.saturating_add(step)))
    }
}
