//! `rat-sim`: per-update orchestrator for radio access selection.
//!
//! # Update flow
//!
//! ```text
//! update(agents, now):
//!   ① Events: drain link expiries due at or before `now`.
//!   ② Order: sort agents by AgentId, drop duplicate ids.
//!   ③ Per agent: availability → StateKey → policy.select
//!                → handover check
//!                → (if packet interval elapsed)
//!                  transmit → reward → policy.learn → stats.record
//! ```
//!
//! Nothing on this path returns an error.  An agent with nothing in range is
//! disconnected for the update; it neither transmits nor teaches the policy.
//! Configuration problems are caught by [`SimBuilder::build`].
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | [`run_batch`] runs jobs on Rayon's thread pool.        |
//! | `fx-hash`  | FxHash for per-agent tables and the Q-table.           |
//! | `serde`    | Serde derives on `SimConfig` and the stats types.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rat_policy::{LearningConfig, PolicyEngine};
//! use rat_sim::{NoopObserver, SimBuilder, SimConfig, Stationary};
//!
//! let engine  = PolicyEngine::new(LearningConfig::default(), catalog.len())?;
//! let mut sim = SimBuilder::new(SimConfig::default(), catalog, layout, engine).build()?;
//! sim.run(&mut Stationary(agents), 1_000, &mut NoopObserver);
//! println!("PRR {:.3}", sim.stats().packet_reception_ratio());
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod event_queue;
pub mod observer;
pub mod sim;
pub mod stats;
pub mod trajectory;


pub use batch::{BatchJob, run_batch};
pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use event_queue::{EventQueue, LinkEvent};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{AgentPosition, Sim};
pub use stats::{HandoverTracker, StatsAggregator, StatsSnapshot, TechCounters};
pub use trajectory::{Stationary, Trajectory};
