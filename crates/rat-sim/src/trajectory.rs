//! The kinematics seam.
//!
//! Vehicle movement lives outside the simulator.  [`Sim::run`][crate::Sim::run]
//! asks a [`Trajectory`] for every agent's position once per tick and feeds
//! the result to [`Sim::update`][crate::Sim::update].

use rat_core::SimTime;

use crate::AgentPosition;

pub trait Trajectory {
    /// Append the position of every agent present at `now` to `out`.
    /// `out` is empty on entry.
    fn positions(&mut self, now: SimTime, out: &mut Vec<AgentPosition>);
}

impl<F> Trajectory for F
where
    F: FnMut(SimTime, &mut Vec<AgentPosition>),
{
    fn positions(&mut self, now: SimTime, out: &mut Vec<AgentPosition>) {
        self(now, out)
    }
}

/// Agents that never move.
#[derive(Clone, Debug, Default)]
pub struct Stationary(pub Vec<AgentPosition>);

impl Trajectory for Stationary {
    fn positions(&mut self, _now: SimTime, out: &mut Vec<AgentPosition>) {
        out.extend_from_slice(&self.0);
    }
}
