//! Stochastic, distance-dependent transmission model.
//!
//! # Loss curve
//!
//! Rows are tried top to bottom; the first match wins.
//!
//! ```text
//!   L(d) = base                                       d <= range
//!   L(d) = 1                                          d >= max_total_range
//!   L(d) = base + (1 - base) * (d - range) / span     otherwise
//!
//!   span = max_total_range - range
//! ```
//!
//! The in-range row wins at the boundary, so a profile with
//! `range == max_total_range` keeps its base rate at exactly `max_total_range`
//! and saturates only past it.
//!
//! # Signal strength
//!
//! ```text
//!   S(d) = 1 - d / range                              d <= range
//!   S(d) = 1 - (d - range) / span                     range < d <= max_total_range
//!   S(d) = 0                                          beyond
//! ```
//!
//! `S` is 1 at the node and 0 at the edge of coverage.  Just past the edge
//! it jumps back toward 1 and fades out at the dead zone; only the in-range
//! branch matters for selection, since nothing out of range is available.
//!
//! # Latency
//!
//! `latency = base_latency * (1 + d / max_total_range)`, computed whether or
//! not the packet survives.

use rand::Rng;
use tracing::trace;

use rat_core::TechId;

use crate::{NetworkCatalog, NetworkProfile};

/// Effective packet-loss probability at `distance` metres.
pub fn effective_loss_rate(distance: f64, profile: &NetworkProfile, max_total_range: f64) -> f64 {
    if distance <= profile.range {
        return profile.base_loss_rate;
    }
    if distance >= max_total_range {
        return 1.0;
    }
    let span = max_total_range - profile.range;
    if span <= 0.0 {
        return 1.0;
    }
    let beyond = (distance - profile.range) / span;
    (profile.base_loss_rate + (1.0 - profile.base_loss_rate) * beyond).min(1.0)
}

/// Received signal strength in `[0, 1]` at `distance` metres.
pub fn signal_strength(distance: f64, profile: &NetworkProfile, max_total_range: f64) -> f64 {
    if distance <= profile.range {
        if profile.range <= 0.0 {
            return 1.0;
        }
        return 1.0 - distance / profile.range;
    }
    if distance > max_total_range {
        return 0.0;
    }
    let span = max_total_range - profile.range;
    if span <= 0.0 {
        return 0.0;
    }
    (1.0 - (distance - profile.range) / span).max(0.0)
}

/// One-way latency at `distance` metres.
#[inline]
pub fn latency_ms(distance: f64, profile: &NetworkProfile, max_total_range: f64) -> f64 {
    profile.base_latency_ms * (1.0 + distance / max_total_range)
}

/// The result of one packet transmission.  Consumed immediately by the
/// reward model and the statistics aggregator; never stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransmissionOutcome {
    pub tech:       TechId,
    pub distance:   f64,
    pub success:    bool,
    pub latency_ms: f64,
}

/// Draws transmission outcomes for a catalog.
///
/// Pure given the RNG: two simulators fed identically seeded RNGs produce
/// identical outcomes.
pub struct TransmissionSimulator<'a> {
    catalog: &'a NetworkCatalog,
}

impl<'a> TransmissionSimulator<'a> {
    pub fn new(catalog: &'a NetworkCatalog) -> Self {
        Self { catalog }
    }

    /// Loss probability for `tech` at `distance`.
    pub fn loss_rate(&self, tech: TechId, distance: f64) -> f64 {
        effective_loss_rate(distance, self.catalog.profile(tech), self.catalog.max_total_range())
    }

    /// Signal strength of `tech` at `distance`.
    pub fn signal_strength(&self, tech: TechId, distance: f64) -> f64 {
        signal_strength(distance, self.catalog.profile(tech), self.catalog.max_total_range())
    }

    /// Send one packet over `tech` across `distance` metres.
    ///
    /// A uniform draw in `[0, 1)` at or above the loss rate is a success, so
    /// the success probability is exactly `1 - L(d)`.
    ///
    /// # Panics
    /// Panics if `tech` was not issued by this simulator's catalog.
    pub fn transmit<R: Rng + ?Sized>(&self, tech: TechId, distance: f64, rng: &mut R) -> TransmissionOutcome {
        let profile = self.catalog.profile(tech);
        let max = self.catalog.max_total_range();
        let loss = effective_loss_rate(distance, profile, max);
        let draw: f64 = rng.r#gen();
        let success = draw >= loss;
        let latency = latency_ms(distance, profile, max);
        trace!(tech = %profile.name, distance, loss, success, latency, "transmit");
        TransmissionOutcome { tech, distance, success, latency_ms: latency }
    }
}
