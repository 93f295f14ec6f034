//! `PolicyEngine`: epsilon-greedy selection over the shared [`QTable`].
//!
//! One engine serves the whole fleet.  It is an ordinary value owned by the
//! simulator and passed by reference; tests build as many independent
//! engines as they like.

use rand::Rng;
use tracing::trace;

use rat_core::{TechId, TechSet};

use crate::{PolicyError, PolicyResult, QTable, StateKey};

// ── LearningConfig ────────────────────────────────────────────────────────────

/// Learning-rate and exploration schedule.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningConfig {
    /// Step size of the moving-average update, in `(0, 1]`.
    pub alpha:         f64,
    /// Initial exploration rate.
    pub epsilon:       f64,
    /// Multiplier applied to epsilon after every learning step.
    pub epsilon_decay: f64,
    /// Floor for epsilon.
    pub min_epsilon:   f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { alpha: 0.1, epsilon: 1.0, epsilon_decay: 0.995, min_epsilon: 0.01 }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> PolicyResult<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(PolicyError::InvalidLearningRate(self.alpha));
        }
        if !(0.0 <= self.min_epsilon && self.min_epsilon <= self.epsilon && self.epsilon <= 1.0) {
            return Err(PolicyError::InvalidEpsilon { start: self.epsilon, min: self.min_epsilon });
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(PolicyError::InvalidDecay(self.epsilon_decay));
        }
        Ok(())
    }
}

// ── PolicyTelemetry ───────────────────────────────────────────────────────────

/// Read-only learning counters for dashboards.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PolicyTelemetry {
    /// Number of `learn` calls since construction or the last reset.
    pub episodes:       u64,
    pub total_reward:   f64,
    pub average_reward: f64,
    pub epsilon:        f64,
    /// Number of distinct states in the Q-table.
    pub table_states:   usize,
}

// ── PolicyEngine ──────────────────────────────────────────────────────────────

pub struct PolicyEngine {
    config:       LearningConfig,
    table:        QTable,
    epsilon:      f64,
    episodes:     u64,
    total_reward: f64,
}

impl PolicyEngine {
    /// An engine choosing among `actions` technologies (the catalog size).
    pub fn new(config: LearningConfig, actions: usize) -> PolicyResult<Self> {
        config.validate()?;
        if actions == 0 {
            return Err(PolicyError::NoActions);
        }
        Ok(Self {
            epsilon: config.epsilon,
            config,
            table: QTable::new(actions),
            episodes: 0,
            total_reward: 0.0,
        })
    }

    /// Epsilon-greedy choice among `available`.
    ///
    /// With probability `epsilon` a uniformly random member is returned;
    /// otherwise the highest-valued one, ties to the lowest `TechId`.
    /// `None` iff `available` is empty.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        state:     &StateKey,
        available: TechSet,
        rng:       &mut R,
    ) -> Option<TechId> {
        if available.is_empty() {
            return None;
        }
        let roll: f64 = rng.r#gen();
        if roll < self.epsilon {
            let pick = rng.gen_range(0..available.len());
            available.nth(pick)
        } else {
            self.table.best(state, available)
        }
    }

    /// Move `Q[state][action]` toward `reward` by `alpha`, then decay epsilon.
    ///
    /// Fails only for an action outside the catalog width, which is a
    /// configuration bug.
    pub fn learn(&mut self, state: StateKey, action: TechId, reward: f64) -> PolicyResult<()> {
        let alpha = self.config.alpha;
        let slot = self.table.slot_mut(state, action)?;
        *slot += alpha * (reward - *slot);
        trace!(?state, %action, reward, value = *slot, "q update");

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        self.episodes += 1;
        self.total_reward += reward;
        Ok(())
    }

    /// Current exploration rate.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    #[inline]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    #[inline]
    pub fn q_value(&self, state: &StateKey, action: TechId) -> f64 {
        self.table.get(state, action)
    }

    /// Number of actions (catalog technologies) this engine was built for.
    #[inline]
    pub fn action_count(&self) -> usize {
        self.table.width()
    }

    pub fn telemetry(&self) -> PolicyTelemetry {
        PolicyTelemetry {
            episodes:       self.episodes,
            total_reward:   self.total_reward,
            average_reward: if self.episodes > 0 {
                self.total_reward / self.episodes as f64
            } else {
                0.0
            },
            epsilon:        self.epsilon,
            table_states:   self.table.len(),
        }
    }

    /// Forget everything learned and restart the exploration schedule.
    pub fn reset(&mut self) {
        self.table.clear();
        self.epsilon = self.config.epsilon;
        self.episodes = 0;
        self.total_reward = 0.0;
    }
}
