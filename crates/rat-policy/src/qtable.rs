//! The shared value table.
//!
//! Rows are created lazily the first time a state is learned from.  Each
//! row has one slot per catalog technology; unseen entries read as `0.0`.

#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;

use rat_core::{TechId, TechSet};

use crate::{PolicyError, PolicyResult, StateKey};

#[derive(Clone, Debug)]
pub struct QTable {
    width: usize,
    rows:  Map<StateKey, Vec<f64>>,
}

impl QTable {
    /// An empty table for `width` actions.
    pub fn new(width: usize) -> Self {
        Self { width, rows: Map::default() }
    }

    /// Number of actions per state.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of states learned so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Value of `action` in `state`; `0.0` if never learned.
    pub fn get(&self, state: &StateKey, action: TechId) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action.index()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Mutable slot for `(state, action)`, creating the row on first use.
    pub fn slot_mut(&mut self, state: StateKey, action: TechId) -> PolicyResult<&mut f64> {
        if action.index() >= self.width {
            return Err(PolicyError::UnknownAction { action, width: self.width });
        }
        let width = self.width;
        let row = self.rows.entry(state).or_insert_with(|| vec![0.0; width]);
        Ok(&mut row[action.index()])
    }

    /// Highest-valued action among `available`.  Ties go to the lowest
    /// `TechId`.  `None` only if `available` is empty.
    pub fn best(&self, state: &StateKey, available: TechSet) -> Option<TechId> {
        let row = self.rows.get(state);
        let mut best: Option<(TechId, f64)> = None;
        for action in available {
            let v = row
                .and_then(|r| r.get(action.index()))
                .copied()
                .unwrap_or(0.0);
            match best {
                Some((_, bv)) if v <= bv => {}
                _ => best = Some((action, v)),
            }
        }
        best.map(|(a, _)| a)
    }

    /// Every learned `(state, row)` pair, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64])> + '_ {
        self.rows.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
