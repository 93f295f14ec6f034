//! One policy type for every strategy the demo can run, so a comparison
//! batch is homogeneous.

use clap::ValueEnum;
use rand::Rng;

use rat_core::TechId;
use rat_policy::{
    HeuristicPolicy, LearningConfig, PolicyEngine, PolicyResult, RandomPolicy, SelectionContext,
    SelectionPolicy, SignalStrengthPolicy, StateKey, StaticPolicy,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Epsilon-greedy learner shared by the fleet.
    Learned,
    /// Always the first catalog technology when reachable.
    Static,
    Random,
    /// Strongest signal among reachable technologies.
    Signal,
    Heuristic,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Learned,
        Strategy::Static,
        Strategy::Random,
        Strategy::Signal,
        Strategy::Heuristic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Learned => "learned",
            Strategy::Static => "static",
            Strategy::Random => "random",
            Strategy::Signal => "signal",
            Strategy::Heuristic => "heuristic",
        }
    }
}

pub enum DemoPolicy {
    Learned(PolicyEngine),
    Static(StaticPolicy),
    Random(RandomPolicy),
    Signal(SignalStrengthPolicy),
    Heuristic(HeuristicPolicy),
}

impl DemoPolicy {
    pub fn new(strategy: Strategy, learning: LearningConfig, actions: usize) -> PolicyResult<Self> {
        Ok(match strategy {
            Strategy::Learned => DemoPolicy::Learned(PolicyEngine::new(learning, actions)?),
            Strategy::Static => DemoPolicy::Static(StaticPolicy(TechId(0))),
            Strategy::Random => DemoPolicy::Random(RandomPolicy),
            Strategy::Signal => DemoPolicy::Signal(SignalStrengthPolicy),
            Strategy::Heuristic => DemoPolicy::Heuristic(HeuristicPolicy::default()),
        })
    }

    /// Number of states the learner has seen; `None` for fixed rules.
    pub fn learned_states(&self) -> Option<usize> {
        match self {
            DemoPolicy::Learned(e) => Some(e.table().len()),
            _ => None,
        }
    }
}

impl SelectionPolicy for DemoPolicy {
    fn select<R: Rng + ?Sized>(&self, ctx: &SelectionContext<'_>, rng: &mut R) -> Option<TechId> {
        match self {
            DemoPolicy::Learned(p) => p.select(ctx, rng),
            DemoPolicy::Static(p) => p.select(ctx, rng),
            DemoPolicy::Random(p) => p.select(ctx, rng),
            DemoPolicy::Signal(p) => p.select(ctx, rng),
            DemoPolicy::Heuristic(p) => p.select(ctx, rng),
        }
    }

    fn learn(&mut self, state: StateKey, action: TechId, reward: f64) -> PolicyResult<()> {
        match self {
            DemoPolicy::Learned(p) => SelectionPolicy::learn(p, state, action, reward),
            _ => Ok(()),
        }
    }

    fn exploration_rate(&self) -> f64 {
        match self {
            DemoPolicy::Learned(p) => p.epsilon(),
            _ => 0.0,
        }
    }

    fn action_count(&self) -> Option<usize> {
        match self {
            DemoPolicy::Learned(p) => Some(p.action_count()),
            _ => None,
        }
    }
}
