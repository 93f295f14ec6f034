//! Plain data row types written by output backends.

/// One packet sent by one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionRow {
    pub time_ms:    u64,
    pub agent_id:   u32,
    pub tech_id:    u8,
    pub distance_m: f64,
    pub success:    bool,
    pub latency_ms: f64,
    /// Reward fed back to the policy for this packet.
    pub reward:     f64,
}

/// Counters after one update.  Packet and handover counts are cumulative
/// since the last stats reset; `agents` and `transmissions` are per update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateSummaryRow {
    pub time_ms:                u64,
    pub agents:                 u64,
    pub transmissions:          u64,
    pub packets_sent:           u64,
    pub packets_received:       u64,
    pub packets_lost:           u64,
    pub handover_count:         u64,
    pub average_latency_ms:     f64,
    pub packet_reception_ratio: f64,
}
