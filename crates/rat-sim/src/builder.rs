//! Fluent builder for constructing a [`Sim`].

use tracing::debug;

use rat_core::{SimClock, SimRng};
use rat_net::{InfrastructureLayout, NetworkCatalog};
use rat_policy::{BucketThresholds, RewardModel, Rewards, SelectionPolicy};

use crate::{EventQueue, HandoverTracker, Sim, SimConfig, SimError, SimResult, StatsAggregator};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, tick resolution, packet interval and size
/// - [`NetworkCatalog`]: the technologies on offer
/// - [`InfrastructureLayout`]: built against the same catalog
/// - `P: SelectionPolicy`: e.g. a [`rat_policy::PolicyEngine`]
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                  |
/// |--------------------|------------------------------------------|
/// | `.rewards(r)`      | `Rewards::default()`                     |
/// | `.thresholds(t)`   | `BucketThresholds::from_catalog(..)`     |
///
/// # Example
///
/// ```rust,ignore
/// let catalog = NetworkCatalog::default_v2x();
/// let layout  = layout_builder.build(&catalog)?;
/// let engine  = PolicyEngine::new(LearningConfig::default(), catalog.len())?;
/// let mut sim = SimBuilder::new(SimConfig::default(), catalog, layout, engine).build()?;
/// sim.update(&agents, SimTime(0));
/// ```
pub struct SimBuilder<P: SelectionPolicy> {
    config:     SimConfig,
    catalog:    NetworkCatalog,
    layout:     InfrastructureLayout,
    policy:     P,
    rewards:    Option<Rewards>,
    thresholds: Option<BucketThresholds>,
}

impl<P: SelectionPolicy> SimBuilder<P> {
    pub fn new(config: SimConfig, catalog: NetworkCatalog, layout: InfrastructureLayout, policy: P) -> Self {
        Self {
            config,
            catalog,
            layout,
            policy,
            rewards: None,
            thresholds: None,
        }
    }

    /// Reward-shaping constants.
    pub fn rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = Some(rewards);
        self
    }

    /// Distance-bucket bounds for the policy's state encoding.
    pub fn thresholds(mut self, thresholds: BucketThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Validate every input against the catalog and return a ready [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        if self.layout.tech_count() != self.catalog.len() {
            return Err(SimError::Config(format!(
                "layout indexes {} technologies but the catalog has {}",
                self.layout.tech_count(),
                self.catalog.len(),
            )));
        }

        if let Some(actions) = self.policy.action_count() {
            if actions != self.catalog.len() {
                return Err(SimError::ActionCountMismatch {
                    policy:  actions,
                    catalog: self.catalog.len(),
                });
            }
        }

        let rewards = RewardModel::new(self.rewards.unwrap_or_default())?;
        let thresholds = match self.thresholds {
            Some(t) => {
                t.validate()?;
                t
            }
            None => BucketThresholds::from_catalog(&self.catalog),
        };

        debug!(
            technologies = self.catalog.len(),
            nodes = self.layout.nodes().len(),
            close = thresholds.close,
            medium = thresholds.medium,
            seed = self.config.seed,
            "sim built",
        );

        Ok(Sim {
            clock:         SimClock::new(self.config.tick_ms)?,
            rng:           SimRng::new(self.config.seed),
            stats:         StatsAggregator::new(self.catalog.len(), self.config.packet_bytes),
            config:        self.config,
            catalog:       self.catalog,
            layout:        self.layout,
            policy:        self.policy,
            rewards,
            thresholds,
            handovers:     HandoverTracker::new(),
            last_transmit: Default::default(),
            events:        EventQueue::new(),
        })
    }
}
