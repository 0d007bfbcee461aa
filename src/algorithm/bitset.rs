use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of pool positions still available for assignment
///
/// Uses 0-based indexing into the tile pool. Provides O(1) membership testing
/// and removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    bits: BitVec,
}

impl CandidateSet {
    /// Create a set containing every position below `size`
    pub fn full(size: usize) -> Self {
        Self {
            bits: bitvec![1; size],
        }
    }

    /// Mark a position used
    ///
    /// Returns whether it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.contains(index) {
            self.bits.set(index, false);
            true
        } else {
            false
        }
    }

    /// Test membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Make every position available again
    pub fn refill(&mut self) {
        self.bits.fill(true);
    }

    /// Test if no candidates remain
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count remaining candidates
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Capacity the set was created with
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Remaining positions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CandidateSet({} of {} available)",
            self.count(),
            self.capacity()
        )
    }
}
