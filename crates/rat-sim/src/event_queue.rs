//! `EventQueue`: deferred events keyed by simulated time.
//!
//! Link indicators and similar delayed effects are scheduled here instead of
//! on a wall-clock timer, so they fire deterministically in tests and never
//! influence learning.

use std::collections::BTreeMap;

use rat_core::{AgentId, SimTime, TechId};

/// Events the simulator schedules for itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// The visible link for `agent` on `tech`, opened by a transmission,
    /// has elapsed.
    Expired { agent: AgentId, tech: TechId },
}

impl LinkEvent {
    #[inline]
    pub fn agent(&self) -> AgentId {
        match *self {
            LinkEvent::Expired { agent, .. } => agent,
        }
    }
}

/// A sparse time → events queue.  Events sharing a due time keep their
/// insertion order.
#[derive(Clone, Debug)]
pub struct EventQueue<E> {
    inner: BTreeMap<SimTime, Vec<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at `at`.
    pub fn push(&mut self, at: SimTime, event: E) {
        self.inner.entry(at).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return every event due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<(SimTime, E)> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            let (at, events) = entry.remove_entry();
            self.total -= events.len();
            due.extend(events.into_iter().map(|e| (at, e)));
        }
        due
    }

    /// Keep only events for which `keep` returns `true`.  Returns the number
    /// removed.
    pub fn retain<F: FnMut(&E) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.total;
        self.inner.retain(|_, events| {
            events.retain(&mut keep);
            !events.is_empty()
        });
        self.total = self.inner.values().map(Vec::len).sum();
        before - self.total
    }

    /// The earliest time with at least one queued event.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
