//! The `Sim` struct and its per-update loop.

#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;

use tracing::{debug, error, warn};

use rat_core::{AgentId, Position, SimClock, SimRng, SimTime, TechId, TechSet};
use rat_net::{
    Availability, AvailabilityResolver, InfrastructureLayout, NetworkCatalog, TransmissionSimulator,
};
use rat_policy::{BucketThresholds, RewardModel, SelectionContext, SelectionPolicy, StateKey};

use crate::{
    EventQueue, HandoverTracker, LinkEvent, NoopObserver, SimConfig, SimObserver, StatsAggregator,
    StatsSnapshot, Trajectory,
};

/// One agent's position for one update, supplied by the kinematics layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentPosition {
    pub id:       AgentId,
    pub position: Position,
}

impl AgentPosition {
    #[inline]
    pub fn new(id: AgentId, position: Position) -> Self {
        Self { id, position }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The access-selection simulator.
///
/// Each update runs, for every agent in ascending `AgentId` order:
///
/// 1. **Availability**: technologies whose nearest serving node is in range.
/// 2. **Selection**: the policy picks one (or none when nothing is reachable).
/// 3. **Handover**: compared against the agent's previous technology.
/// 4. **Transmission** (when the agent's packet interval has elapsed):
///    draw an outcome, score it, feed the reward back, record counters.
///
/// The policy is shared by the whole fleet and updated in place, so later
/// agents in an update see what earlier agents taught it.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: SelectionPolicy> {
    pub config: SimConfig,

    /// Clock used by [`run`](Self::run).  External drivers calling
    /// [`update`](Self::update) directly supply their own timestamps.
    pub clock: SimClock,

    pub(crate) catalog:       NetworkCatalog,
    pub(crate) layout:        InfrastructureLayout,
    pub(crate) policy:        P,
    pub(crate) rewards:       RewardModel,
    pub(crate) thresholds:    BucketThresholds,
    pub(crate) rng:           SimRng,
    pub(crate) stats:         StatsAggregator,
    pub(crate) handovers:     HandoverTracker,
    pub(crate) last_transmit: Map<AgentId, SimTime>,
    pub(crate) events:        EventQueue<LinkEvent>,
}

impl<P: SelectionPolicy> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run one update for `agents` at simulated time `now`.
    pub fn update(&mut self, agents: &[AgentPosition], now: SimTime) {
        self.update_observed(agents, now, &mut NoopObserver);
    }

    /// [`update`](Self::update) with observer callbacks.
    pub fn update_observed<O: SimObserver>(
        &mut self,
        agents:   &[AgentPosition],
        now:      SimTime,
        observer: &mut O,
    ) {
        for (at, event) in self.events.drain_due(now) {
            match event {
                LinkEvent::Expired { agent, tech } => observer.on_link_expired(at, agent, tech),
            }
        }

        let ordered = dedup_sorted(agents);
        observer.on_update_start(now, ordered.len());
        for agent in &ordered {
            self.process_agent(agent, now, observer);
        }
        observer.on_update_end(now, &self.stats.snapshot());
    }

    /// Drive `ticks` updates from `trajectory`, advancing [`clock`](Self::clock)
    /// by one tick after each.
    pub fn run<T, O>(&mut self, trajectory: &mut T, ticks: u64, observer: &mut O)
    where
        T: Trajectory + ?Sized,
        O: SimObserver,
    {
        let mut positions = Vec::new();
        for _ in 0..ticks {
            let now = self.clock.now();
            positions.clear();
            trajectory.positions(now, &mut positions);
            self.update_observed(&positions, now, observer);
            self.clock.advance();
        }
        observer.on_run_end(self.clock.now());
    }

    /// The technology `agent` was given on its latest update, `None` if it
    /// had nothing in range or has never been seen.
    #[inline]
    pub fn select_network(&self, agent: AgentId) -> Option<TechId> {
        self.handovers.current(agent)
    }

    /// Drop everything held for `agent`: its serving technology, its
    /// packet-interval timer and any pending link events.
    ///
    /// Call when an agent leaves the simulation.  An id reused afterwards
    /// starts disconnected, so its first attachment is not a handover.
    /// Returns `true` if anything was held.
    pub fn remove_agent(&mut self, agent: AgentId) -> bool {
        let serving = self.handovers.forget(agent).is_some();
        let timer = self.last_transmit.remove(&agent).is_some();
        let events = self.events.retain(|e| e.agent() != agent);
        debug!(%agent, events, "agent removed");
        serving || timer || events > 0
    }

    /// Agents with per-agent state still held (connected or with a pending
    /// packet-interval timer).
    pub fn tracked_agents(&self) -> usize {
        self.last_transmit
            .keys()
            .filter(|a| self.handovers.current(**a).is_none())
            .count()
            + self.handovers.connected()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Zero the counters.  The policy, its exploration rate, and each
    /// agent's current technology are untouched.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Current exploration rate of the policy.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.policy.exploration_rate()
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    #[inline]
    pub fn catalog(&self) -> &NetworkCatalog {
        &self.catalog
    }

    #[inline]
    pub fn layout(&self) -> &InfrastructureLayout {
        &self.layout
    }

    #[inline]
    pub fn thresholds(&self) -> &BucketThresholds {
        &self.thresholds
    }

    /// Pending link-expiry events.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Availability of every technology at `position`, without side effects.
    pub fn availability(&self, position: Position) -> Availability {
        AvailabilityResolver::new(&self.catalog, &self.layout).available(position)
    }

    // ── Per-agent step ────────────────────────────────────────────────────

    fn process_agent<O: SimObserver>(&mut self, agent: &AgentPosition, now: SimTime, observer: &mut O) {
        let id = agent.id;
        let availability = if agent.position.is_finite() {
            self.availability(agent.position)
        } else {
            warn!(%id, "non-finite position, treating as out of coverage");
            Availability {
                techs:            TechSet::EMPTY,
                links:            vec![None; self.catalog.len()],
                nearest_distance: f64::INFINITY,
            }
        };
        let state = StateKey::from_availability(&availability, &self.thresholds);
        let previous = self.handovers.current(id);

        let ctx = SelectionContext {
            state,
            availability: &availability,
            catalog:      &self.catalog,
            previous,
        };
        let mut choice = self.policy.select(&ctx, self.rng.inner());
        if let Some(tech) = choice {
            if !availability.techs.contains(tech) {
                warn!(%id, %tech, "policy chose an unavailable technology, ignoring");
                choice = None;
            }
        }
        observer.on_selection(now, id, &availability, choice);

        if let Some((from, to)) = self.handovers.observe(id, choice) {
            self.stats.record_handover();
            debug!(
                %id,
                from = self.catalog.name_of(Some(from)),
                to = self.catalog.name_of(Some(to)),
                "handover",
            );
            observer.on_handover(now, id, from, to);
        }

        let Some(tech) = choice else { return };
        if !self.transmit_due(id, now) {
            return;
        }
        self.last_transmit.insert(id, now);

        let distance = availability.distance(tech).unwrap_or(f64::INFINITY);
        let outcome = TransmissionSimulator::new(&self.catalog).transmit(tech, distance, self.rng.inner());
        let switched = previous.is_some_and(|p| p != tech);
        let reward = self
            .rewards
            .reward_with_switch(outcome.success, outcome.latency_ms, distance, switched);

        if let Err(e) = self.policy.learn(state, tech, reward) {
            error!(%id, %tech, error = %e, "policy rejected update");
        }
        self.stats.record(&outcome);

        if self.config.link_display_ms > 0 {
            self.events
                .push(now + self.config.link_display_ms, LinkEvent::Expired { agent: id, tech });
        }
        observer.on_transmission(now, id, &outcome, reward);
    }

    fn transmit_due(&self, agent: AgentId, now: SimTime) -> bool {
        match self.last_transmit.get(&agent) {
            None => true,
            Some(&last) => now.since(last) >= self.config.packet_interval_ms,
        }
    }
}

/// `agents` sorted by id with later duplicates dropped.
fn dedup_sorted(agents: &[AgentPosition]) -> Vec<AgentPosition> {
    let mut ordered = agents.to_vec();
    // Stable: the first occurrence of each id stays in front.
    ordered.sort_by_key(|a| a.id);
    let before = ordered.len();
    ordered.dedup_by_key(|a| a.id);
    let dropped = before - ordered.len();
    if dropped > 0 {
        warn!(dropped, "duplicate agent ids in one update, keeping first occurrence");
    }
    ordered
}
