//! `TechSet`: a set of technologies stored as a `u32` bitmask.
//!
//! Two sets holding the same technologies are bit-identical no matter which
//! order they were built in, so `TechSet` is safe to use inside hashed
//! state keys.  Iteration always yields ascending `TechId`s.

use std::fmt;

use crate::{CoreError, CoreResult, TechId};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechSet(u32);

impl TechSet {
    /// Largest number of distinct technologies a set can hold.
    pub const CAPACITY: usize = 32;

    pub const EMPTY: TechSet = TechSet(0);

    /// `{0, 1, .., n-1}`.  `n` is clamped to [`CAPACITY`](Self::CAPACITY).
    pub fn first_n(n: usize) -> Self {
        match n {
            0 => Self::EMPTY,
            n if n >= Self::CAPACITY => TechSet(u32::MAX),
            n => TechSet((1u32 << n) - 1),
        }
    }

    /// Set containing only `tech`.
    pub fn single(tech: TechId) -> CoreResult<Self> {
        let mut s = Self::EMPTY;
        s.try_insert(tech)?;
        Ok(s)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Insert `tech`, failing if its index is beyond the set's capacity.
    pub fn try_insert(&mut self, tech: TechId) -> CoreResult<()> {
        if tech.index() >= Self::CAPACITY {
            return Err(CoreError::TechOutOfRange(tech));
        }
        self.0 |= 1 << tech.index();
        Ok(())
    }

    /// Insert `tech`.  Out-of-range ids are ignored; catalogs never hand
    /// them out.
    #[inline]
    pub fn insert(&mut self, tech: TechId) {
        let _ = self.try_insert(tech);
    }

    #[inline]
    pub fn remove(&mut self, tech: TechId) {
        if tech.index() < Self::CAPACITY {
            self.0 &= !(1 << tech.index());
        }
    }

    #[inline]
    pub fn contains(self, tech: TechId) -> bool {
        tech.index() < Self::CAPACITY && self.0 & (1 << tech.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: TechSet) -> TechSet {
        TechSet(self.0 | other.0)
    }

    pub fn intersection(self, other: TechSet) -> TechSet {
        TechSet(self.0 & other.0)
    }

    pub fn is_subset(self, other: TechSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// The `n`-th member in ascending order.
    pub fn nth(self, n: usize) -> Option<TechId> {
        self.iter().nth(n)
    }

    /// Members in ascending `TechId` order.
    pub fn iter(self) -> TechSetIter {
        TechSetIter(self.0)
    }
}

impl FromIterator<TechId> for TechSet {
    fn from_iter<I: IntoIterator<Item = TechId>>(iter: I) -> Self {
        let mut s = TechSet::EMPTY;
        for t in iter {
            s.insert(t);
        }
        s
    }
}

impl IntoIterator for TechSet {
    type Item = TechId;
    type IntoIter = TechSetIter;
    fn into_iter(self) -> TechSetIter {
        self.iter()
    }
}

/// Ascending iterator over a [`TechSet`].
pub struct TechSetIter(u32);

impl Iterator for TechSetIter {
    type Item = TechId;

    fn next(&mut self) -> Option<TechId> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros();
        self.0 &= self.0 - 1; // clear lowest set bit
        Some(TechId(idx as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TechSetIter {}

impl fmt::Debug for TechSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|t| t.0)).finish()
    }
}
