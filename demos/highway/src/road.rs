//! Straight multi-lane road, vehicle kinematics, and roadside layouts.

use rat_core::{AgentId, Position, SimRng, SimTime};
use rat_net::{InfrastructureLayout, InfrastructureLayoutBuilder, NetResult, NetworkCatalog};
use rat_sim::{AgentPosition, Trajectory};

/// Road runs along x from `-ROAD_LENGTH / 2` to `+ROAD_LENGTH / 2`.
pub const ROAD_LENGTH: f64 = 200.0;
pub const LANE_WIDTH:  f64 = 4.0;
pub const NUM_LANES:   usize = 4;
/// Distance from the centre line to the edge of the outer lane plus a
/// shoulder.
const SHOULDER_Z: f64 = NUM_LANES as f64 / 2.0 * LANE_WIDTH + 2.0;

/// Speed bands in km/h for the three vehicle classes.
const SPEED_BANDS: [(f64, f64); 3] = [(20.0, 40.0), (10.0, 30.0), (15.0, 25.0)];

struct Vehicle {
    id:        AgentId,
    lane_z:    f64,
    start_x:   f64,
    /// Signed metres per second; lanes below the centre line drive toward -x.
    velocity:  f64,
}

/// Vehicles looping along the road at constant speed, wrapping at the ends.
pub struct Highway {
    vehicles: Vec<Vehicle>,
}

impl Highway {
    pub fn new(count: usize, rng: &mut SimRng) -> Self {
        let vehicles = (0..count)
            .map(|i| {
                let lane = i % NUM_LANES;
                let lane_z = (lane as f64 - (NUM_LANES as f64 - 1.0) / 2.0) * LANE_WIDTH;
                let (lo, hi) = SPEED_BANDS[i % SPEED_BANDS.len()];
                let speed = rng.gen_range(lo..hi) / 3.6;
                let direction = if lane < NUM_LANES / 2 { -1.0 } else { 1.0 };
                Vehicle {
                    id: AgentId(i as u32),
                    lane_z,
                    start_x: rng.gen_range(-ROAD_LENGTH / 2.0..ROAD_LENGTH / 2.0),
                    velocity: direction * speed,
                }
            })
            .collect();
        Self { vehicles }
    }
}

impl Trajectory for Highway {
    fn positions(&mut self, now: SimTime, out: &mut Vec<AgentPosition>) {
        let t = now.as_secs_f64();
        let half = ROAD_LENGTH / 2.0;
        out.extend(self.vehicles.iter().map(|v| {
            let x = (v.start_x + v.velocity * t + half).rem_euclid(ROAD_LENGTH) - half;
            AgentPosition::new(v.id, Position::ground(x, v.lane_z))
        }));
    }
}

/// One road-side unit at mid-road serving every technology.
pub fn shared_rsu(catalog: &NetworkCatalog) -> NetResult<InfrastructureLayout> {
    let mut b = InfrastructureLayoutBuilder::new();
    b.add_shared(Position::new(0.0, 5.0, SHOULDER_Z), catalog.all());
    b.build(catalog)
}

/// Dedicated towers per technology along the shoulder, spaced so that
/// neighbouring cells overlap (spacing = 1.6 × range).
pub fn per_tech_towers(catalog: &NetworkCatalog) -> NetResult<InfrastructureLayout> {
    let mut b = InfrastructureLayoutBuilder::new();
    for profile in catalog.iter() {
        let spacing = (profile.range * 1.6).max(1.0);
        let count = (ROAD_LENGTH / spacing).ceil().max(1.0) as usize;
        let segment = ROAD_LENGTH / count as f64;
        let z = SHOULDER_Z + 2.0 + 4.0 * profile.id.0 as f64;
        for k in 0..count {
            let x = -ROAD_LENGTH / 2.0 + segment * (k as f64 + 0.5);
            b.add_tower(Position::new(x, 6.0, z), profile.id)?;
        }
    }
    b.build(catalog)
}
