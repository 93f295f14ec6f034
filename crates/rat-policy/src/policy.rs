//! The `SelectionPolicy` trait: the pluggable decision seam used by the
//! simulator.

use rand::Rng;

use rat_core::TechId;
use rat_net::{Availability, NetworkCatalog};

use crate::{PolicyEngine, PolicyResult, StateKey};

/// Everything a policy may look at when choosing for one agent.
pub struct SelectionContext<'a> {
    pub state:        StateKey,
    pub availability: &'a Availability,
    pub catalog:      &'a NetworkCatalog,
    /// The technology this agent used on its previous update, if any.
    pub previous:     Option<TechId>,
}

/// Pluggable access-selection rule.
///
/// Only [`select`](Self::select) is required.  Non-learning policies keep
/// the no-op `learn` and report zero exploration.
pub trait SelectionPolicy {
    /// Pick a member of `ctx.availability.techs`, or `None` when it is empty.
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, rng: &mut R) -> Option<TechId>;

    /// Feed back the reward observed for `action` in `state`.
    fn learn(&mut self, _state: StateKey, _action: TechId, _reward: f64) -> PolicyResult<()> {
        Ok(())
    }

    /// Current exploration rate, for telemetry.
    fn exploration_rate(&self) -> f64 {
        0.0
    }

    /// Number of actions the policy was sized for, if it is sized at all.
    /// The simulator checks this against the catalog at build time.
    fn action_count(&self) -> Option<usize> {
        None
    }
}

impl SelectionPolicy for PolicyEngine {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, rng: &mut R) -> Option<TechId> {
        self.select_action(&ctx.state, ctx.availability.techs, rng)
    }

    fn learn(&mut self, state: StateKey, action: TechId, reward: f64) -> PolicyResult<()> {
        PolicyEngine::learn(self, state, action, reward)
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon()
    }

    fn action_count(&self) -> Option<usize> {
        Some(PolicyEngine::action_count(self))
    }
}
