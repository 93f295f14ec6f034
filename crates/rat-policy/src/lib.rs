//! `rat-policy`: how an agent picks a radio.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`state`]    | `DistanceBucket`, `BucketThresholds`, `StateKey`               |
//! | [`qtable`]   | `QTable`: lazily grown `StateKey → [value per technology]`    |
//! | [`engine`]   | `PolicyEngine` (epsilon-greedy), `LearningConfig`, telemetry   |
//! | [`reward`]   | `Rewards`, `RewardModel`                                       |
//! | [`policy`]   | `SelectionPolicy` trait, `SelectionContext`                    |
//! | [`baseline`] | `StaticPolicy`, `RandomPolicy`, `SignalStrengthPolicy`, `HeuristicPolicy` |
//! | [`error`]    | `PolicyError`, `PolicyResult<T>`                               |
//!
//! # Learning rule
//!
//! The update is a single-step exponential moving average,
//! `v ← v + α (r − v)`, not a discounted Bellman backup.  The next state does
//! not depend on which radio was used, so this is a contextual bandit over
//! the discretized state space.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash for the Q-table instead of SipHash.                 |
//! | `serde`   | Serde derives on config types.                             |

pub mod baseline;
pub mod engine;
pub mod error;
pub mod policy;
pub mod qtable;
pub mod reward;
pub mod state;

#[cfg(test)]
mod tests;

pub use baseline::{HeuristicPolicy, RandomPolicy, SignalStrengthPolicy, StaticPolicy};
pub use engine::{LearningConfig, PolicyEngine, PolicyTelemetry};
pub use error::{PolicyError, PolicyResult};
pub use policy::{SelectionContext, SelectionPolicy};
pub use qtable::QTable;
pub use reward::{RewardModel, Rewards};
pub use state::{BucketThresholds, DistanceBucket, StateKey};
