//! Simulation observer trait for progress reporting and data collection.

use rat_core::{AgentId, SimTime, TechId};
use rat_net::{Availability, TransmissionOutcome};

use crate::StatsSnapshot;

/// Callbacks invoked by [`Sim::update_observed`][crate::Sim::update_observed]
/// and [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: handover printer
///
/// ```rust,ignore
/// struct Handovers;
///
/// impl SimObserver for Handovers {
///     fn on_handover(&mut self, now: SimTime, agent: AgentId, from: TechId, to: TechId) {
///         println!("{now}: {agent} {from} -> {to}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each update, after due events are drained.
    /// `agents` counts distinct agents in this update.
    fn on_update_start(&mut self, _now: SimTime, _agents: usize) {}

    /// Called once per agent with its availability and the chosen technology
    /// (`None` when nothing is reachable).
    fn on_selection(
        &mut self,
        _now:          SimTime,
        _agent:        AgentId,
        _availability: &Availability,
        _choice:       Option<TechId>,
    ) {}

    fn on_handover(&mut self, _now: SimTime, _agent: AgentId, _from: TechId, _to: TechId) {}

    /// Called after each transmission with the reward fed to the policy.
    fn on_transmission(
        &mut self,
        _now:     SimTime,
        _agent:   AgentId,
        _outcome: &TransmissionOutcome,
        _reward:  f64,
    ) {}

    /// A link opened by an earlier transmission has elapsed.
    fn on_link_expired(&mut self, _now: SimTime, _agent: AgentId, _tech: TechId) {}

    /// Called at the end of each update with the current counters.
    fn on_update_end(&mut self, _now: SimTime, _stats: &StatsSnapshot) {}

    /// Called once after [`Sim::run`][crate::Sim::run] finishes its last tick.
    fn on_run_end(&mut self, _now: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every hook to both observers, first `A` then `B`.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_update_start(&mut self, now: SimTime, agents: usize) {
        self.0.on_update_start(now, agents);
        self.1.on_update_start(now, agents);
    }

    fn on_selection(
        &mut self,
        now:          SimTime,
        agent:        AgentId,
        availability: &Availability,
        choice:       Option<TechId>,
    ) {
        self.0.on_selection(now, agent, availability, choice);
        self.1.on_selection(now, agent, availability, choice);
    }

    fn on_handover(&mut self, now: SimTime, agent: AgentId, from: TechId, to: TechId) {
        self.0.on_handover(now, agent, from, to);
        self.1.on_handover(now, agent, from, to);
    }

    fn on_transmission(
        &mut self,
        now:     SimTime,
        agent:   AgentId,
        outcome: &TransmissionOutcome,
        reward:  f64,
    ) {
        self.0.on_transmission(now, agent, outcome, reward);
        self.1.on_transmission(now, agent, outcome, reward);
    }

    fn on_link_expired(&mut self, now: SimTime, agent: AgentId, tech: TechId) {
        self.0.on_link_expired(now, agent, tech);
        self.1.on_link_expired(now, agent, tech);
    }

    fn on_update_end(&mut self, now: SimTime, stats: &StatsSnapshot) {
        self.0.on_update_end(now, stats);
        self.1.on_update_end(now, stats);
    }

    fn on_run_end(&mut self, now: SimTime) {
        self.0.on_run_end(now);
        self.1.on_run_end(now);
    }
}
