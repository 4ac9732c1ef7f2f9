//! The per-range compare/swap step and the index domains of the two phases.

use std::marker::PhantomData;
use std::ops::Range;

/// Compares and orders the couples `(0,1), (2,3), ...` of `couples`, returning
/// how many were swapped. A trailing unpaired element is left alone.
///
/// Concurrent callers must work on disjoint slices; [`SharedSlice`] leaves
/// that obligation to its users.
#[inline]
pub fn sort_couples<T: Ord>(couples: &mut [T]) -> usize {
    let mut swapped = 0;
    for pair in couples.chunks_exact_mut(2) {
        if pair[0] > pair[1] {
            pair.swap(0, 1);
            swapped += 1;
        }
    }
    swapped
}

/// Number of couples compared by the even phase of an `n` element array.
pub fn even_couples(n: usize) -> usize {
    n / 2
}

/// Number of couples compared by the odd phase of an `n` element array.
pub fn odd_couples(n: usize) -> usize {
    n.saturating_sub(1) / 2
}

/// Element range covered by the even phase: pairs `(0,1), (2,3), ...`.
pub fn even_domain(n: usize) -> Range<usize> {
    0..2 * even_couples(n)
}

/// Element range covered by the odd phase: pairs `(1,2), (3,4), ...`.
pub fn odd_domain(n: usize) -> Range<usize> {
    1..1 + 2 * odd_couples(n)
}

/// A lock-free view of the array being sorted, shared by every worker of a
/// pool. The borrow it was built from outlives all workers, so the view can
/// never dangle; what it cannot check is that two workers never touch the
/// same index in the same phase.
pub struct SharedSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for SharedSlice<'_, T> {}
unsafe impl<T: Send> Sync for SharedSlice<'_, T> {}

impl<'a, T> SharedSlice<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            len: data.len(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mutable access to `range`.
    ///
    /// # Safety
    /// No other live reference obtained from this view may overlap `range`
    /// until the returned slice is dropped.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn range_mut(&self, range: Range<usize>) -> &mut [T] {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "range {:?} out of bounds for length {}",
            range,
            self.len
        );
        std::slice::from_raw_parts_mut(self.ptr.add(range.start), range.end - range.start)
    }
}
