//! Simulated time.
//!
//! Time is a monotonically increasing millisecond counter, `SimTime`.  The
//! external frame driver passes `now` into every update; `SimClock` exists
//! for drivers that step at a fixed resolution:
//!
//!   now = tick * tick_ms
//!
//! Integer milliseconds keep interval arithmetic (packet send intervals,
//! link-display expiry) exact.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute simulated timestamp in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * 1_000)
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-step clock.  Cheap to copy, holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per tick.
    pub tick_ms: u64,
    /// Ticks taken so far.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(tick_ms: u64) -> CoreResult<Self> {
        if tick_ms == 0 {
            return Err(CoreError::ZeroTickDuration);
        }
        Ok(Self { tick_ms, ticks: 0 })
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime(self.ticks * self.tick_ms)
    }

    /// Advance by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// How many ticks span `ms` milliseconds (rounds up).
    #[inline]
    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(self.tick_ms)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} ({:.3} s)", self.ticks, self.now().as_secs_f64())
    }
}
