//! Scalar reward for one transmission outcome.
//!
//! ```text
//! reward = (success ? SUCCESS : FAILURE)
//!        − latency_ms · LATENCY_PENALTY
//!        − distance   · DISTANCE_PENALTY
//!        − (switched ? SWITCHING_COST : 0)
//! ```

use crate::{PolicyError, PolicyResult};

/// Reward-shaping constants.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub success:          f64,
    pub failure:          f64,
    pub latency_penalty:  f64,
    pub distance_penalty: f64,
    /// Charged when the chosen technology differs from the agent's previous
    /// one.  Zero means no hysteresis: every tick re-selects from scratch.
    pub switching_cost:   f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            success:          10.0,
            failure:          -5.0,
            latency_penalty:  0.1,
            distance_penalty: 0.01,
            switching_cost:   0.0,
        }
    }
}

impl Rewards {
    pub fn validate(&self) -> PolicyResult<()> {
        for (name, value) in [
            ("success", self.success),
            ("failure", self.failure),
            ("latency_penalty", self.latency_penalty),
            ("distance_penalty", self.distance_penalty),
            ("switching_cost", self.switching_cost),
        ] {
            if !value.is_finite() {
                return Err(PolicyError::InvalidReward { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RewardModel {
    pub rewards: Rewards,
}

impl RewardModel {
    pub fn new(rewards: Rewards) -> PolicyResult<Self> {
        rewards.validate()?;
        Ok(Self { rewards })
    }

    pub fn reward(&self, success: bool, latency_ms: f64, distance: f64) -> f64 {
        let r = &self.rewards;
        let base = if success { r.success } else { r.failure };
        base - latency_ms * r.latency_penalty - distance * r.distance_penalty
    }

    /// [`reward`](Self::reward) minus the switching cost when `switched`.
    pub fn reward_with_switch(&self, success: bool, latency_ms: f64, distance: f64, switched: bool) -> f64 {
        let cost = if switched { self.rewards.switching_cost } else { 0.0 };
        self.reward(success, latency_ms, distance) - cost
    }
}
