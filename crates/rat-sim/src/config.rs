use crate::{SimError, SimResult};

/// Run-level settings for a [`Sim`][crate::Sim].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seed for the simulator's RNG (exploration and packet-loss draws).
    pub seed:               u64,
    /// Clock resolution used by [`Sim::run`][crate::Sim::run].
    pub tick_ms:            u64,
    /// Minimum simulated time between two transmissions by one agent.
    /// `0` transmits on every update.
    pub packet_interval_ms: u64,
    /// Bytes credited to `total_data_bytes` per received packet.
    pub packet_bytes:       u64,
    /// How long a link stays visible after a transmission.  `0` schedules
    /// no expiry events.
    pub link_display_ms:    u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:               42,
            tick_ms:            100,
            packet_interval_ms: 0,
            packet_bytes:       512,
            link_display_ms:    500,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.tick_ms == 0 {
            return Err(SimError::Config("tick_ms must be positive".into()));
        }
        Ok(())
    }
}
