//! Independent runs side by side.
//!
//! Each job owns its own `Sim` (policy, RNG, counters) and trajectory, so
//! jobs share nothing and can run on any thread.  Results come back in job
//! order whether or not the `parallel` feature is on.

use rat_policy::SelectionPolicy;

use crate::{NoopObserver, Sim, Trajectory};

pub struct BatchJob<P: SelectionPolicy, T: Trajectory> {
    pub sim:        Sim<P>,
    pub trajectory: T,
}

impl<P: SelectionPolicy, T: Trajectory> BatchJob<P, T> {
    pub fn new(sim: Sim<P>, trajectory: T) -> Self {
        Self { sim, trajectory }
    }

    fn run(mut self, ticks: u64) -> Self {
        self.sim.run(&mut self.trajectory, ticks, &mut NoopObserver);
        self
    }
}

/// Run every job for `ticks` ticks and return them, finished, in order.
///
/// With the `parallel` feature, jobs run on Rayon's thread pool.
pub fn run_batch<P, T>(jobs: Vec<BatchJob<P, T>>, ticks: u64) -> Vec<BatchJob<P, T>>
where
    P: SelectionPolicy + Send,
    T: Trajectory + Send,
{
    #[cfg(not(feature = "parallel"))]
    {
        jobs.into_iter().map(|job| job.run(ticks)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        jobs.into_par_iter().map(|job| job.run(ticks)).collect()
    }
}
