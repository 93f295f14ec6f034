//! Non-learning reference policies, for comparison runs against the
//! learned one.

use rand::Rng;

use rat_core::TechId;
use rat_net::signal_strength;

use crate::{SelectionContext, SelectionPolicy};

/// Always the same technology when it is available; otherwise the lowest
/// available `TechId`.
#[derive(Copy, Clone, Debug)]
pub struct StaticPolicy(pub TechId);

impl SelectionPolicy for StaticPolicy {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, _rng: &mut R) -> Option<TechId> {
        let available = ctx.availability.techs;
        if available.contains(self.0) {
            Some(self.0)
        } else {
            available.iter().next()
        }
    }
}

/// Uniformly random among available technologies.
#[derive(Copy, Clone, Debug, Default)]
pub struct RandomPolicy;

impl SelectionPolicy for RandomPolicy {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, rng: &mut R) -> Option<TechId> {
        let available = ctx.availability.techs;
        if available.is_empty() {
            return None;
        }
        available.nth(rng.gen_range(0..available.len()))
    }
}

/// Strongest signal among available technologies; ties go to the lowest
/// `TechId`.
///
/// Signal is relative to each technology's own range (see
/// [`rat_net::signal_strength`]).  From a shared site the longest-range radio
/// always wins; with dedicated towers the nearest tower usually does.
#[derive(Copy, Clone, Debug, Default)]
pub struct SignalStrengthPolicy;

impl SelectionPolicy for SignalStrengthPolicy {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, _rng: &mut R) -> Option<TechId> {
        let max = ctx.catalog.max_total_range();
        let mut best: Option<(TechId, f64)> = None;
        for tech in ctx.availability.techs {
            let Some(distance) = ctx.availability.distance(tech) else { continue };
            let s = signal_strength(distance, ctx.catalog.profile(tech), max);
            if best.is_none_or(|(_, bs)| s > bs) {
                best = Some((tech, s));
            }
        }
        best.map(|(t, _)| t)
    }
}

/// Fixed scoring rule over the static profile:
///
/// ```text
/// score = −latency − 1000·loss − 100·(distance / range) + (same as previous ? stay_bonus : 0)
/// ```
///
/// Highest score wins; ties go to the lowest `TechId`.
#[derive(Copy, Clone, Debug)]
pub struct HeuristicPolicy {
    pub stay_bonus: f64,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self { stay_bonus: 50.0 }
    }
}

impl HeuristicPolicy {
    fn score(&self, ctx: &SelectionContext<'_>, tech: TechId) -> f64 {
        let profile = ctx.catalog.profile(tech);
        let distance = ctx.availability.distance(tech).unwrap_or(f64::INFINITY);
        let ratio = if profile.range > 0.0 { distance / profile.range } else { 1.0 };
        let mut score = -profile.base_latency_ms - profile.base_loss_rate * 1_000.0 - ratio * 100.0;
        if ctx.previous == Some(tech) {
            score += self.stay_bonus;
        }
        score
    }
}

impl SelectionPolicy for HeuristicPolicy {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, _rng: &mut R) -> Option<TechId> {
        let mut best: Option<(TechId, f64)> = None;
        for tech in ctx.availability.techs {
            let s = self.score(ctx, tech);
            if best.is_none_or(|(_, bs)| s > bs) {
                best = Some((tech, s));
            }
        }
        best.map(|(t, _)| t)
    }
}
