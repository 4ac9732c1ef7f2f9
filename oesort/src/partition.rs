use crate::phase::{even_couples, odd_couples};
use std::ops::Range;

/// Balanced contiguous split of `couples` among `nw` workers: every worker
/// gets `couples / nw` couples and the first `couples % nw` workers one more.
/// The returned range is in couple indices.
pub fn block_range(couples: usize, nw: usize, t: usize) -> Range<usize> {
    assert!(nw > 0 && t < nw, "worker {} out of {}", t, nw);
    let base = couples / nw;
    let extra = couples % nw;
    let start = t * base + t.min(extra);
    let len = base + usize::from(t < extra);
    start..start + len
}

/// Element ranges a statically scheduled worker owns in each phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerRanges {
    pub even: Range<usize>,
    pub odd: Range<usize>,
}

impl WorkerRanges {
    pub fn new(n: usize, nw: usize, t: usize) -> Self {
        let even = block_range(even_couples(n), nw, t);
        let odd = block_range(odd_couples(n), nw, t);
        Self {
            even: 2 * even.start..2 * even.end,
            odd: 1 + 2 * odd.start..1 + 2 * odd.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_range_balance() {
        for couples in 0..40 {
            for nw in 1..12 {
                let mut next = 0;
                let mut sizes = Vec::new();
                for t in 0..nw {
                    let r = block_range(couples, nw, t);
                    assert_eq!(r.start, next);
                    next = r.end;
                    sizes.push(r.len());
                }
                assert_eq!(next, couples);
                assert_eq!(sizes.iter().sum::<usize>(), couples);
                let max = *sizes.iter().max().unwrap();
                let min = *sizes.iter().min().unwrap();
                assert!(max - min <= 1);
                // remainder goes to the lowest indices
                assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn test_worker_ranges() {
        // 11 elements: 5 even couples, 5 odd couples
        let r0 = WorkerRanges::new(11, 2, 0);
        let r1 = WorkerRanges::new(11, 2, 1);
        assert_eq!(r0.even, 0..6);
        assert_eq!(r1.even, 6..10);
        assert_eq!(r0.odd, 1..7);
        assert_eq!(r1.odd, 7..11);
    }

    #[test]
    fn test_more_workers_than_couples() {
        let ranges: Vec<_> = (0..4).map(|t| WorkerRanges::new(3, 4, t)).collect();
        assert_eq!(ranges[0].even, 0..2);
        assert_eq!(ranges[0].odd, 1..3);
        for r in &ranges[1..] {
            assert!(r.even.is_empty());
            assert!(r.odd.is_empty());
        }
    }
}
