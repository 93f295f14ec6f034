//! Transmission counters and handover detection.
//!
//! [`StatsAggregator`] is mutated once per transmission and read through
//! [`StatsSnapshot`].  [`HandoverTracker`] remembers each agent's serving
//! technology across updates; it is deliberately separate so that clearing
//! the counters does not make every connected agent look freshly attached.

#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;

use rat_core::{AgentId, TechId};
use rat_net::TransmissionOutcome;

// ── Counters ──────────────────────────────────────────────────────────────────

/// Per-technology packet counters.  `sent == received + lost` always.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechCounters {
    pub sent:     u64,
    pub received: u64,
    pub lost:     u64,
}

impl TechCounters {
    /// `received / sent`, or `0.0` before anything was sent.
    pub fn reception_ratio(&self) -> f64 {
        self.received as f64 / self.sent.max(1) as f64
    }
}

/// Read-only aggregate returned by [`StatsAggregator::snapshot`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub packets_sent:       u64,
    pub packets_received:   u64,
    pub packets_lost:       u64,
    /// Sum of latencies of received packets.
    pub total_latency_ms:   f64,
    pub total_data_bytes:   u64,
    pub handover_count:     u64,
    /// Indexed by `TechId`.
    pub per_tech:           Vec<TechCounters>,
    /// `total_latency_ms / max(1, packets_received)`.
    pub average_latency_ms: f64,
    /// `total_data_bytes / 1024`.
    pub total_data_kb:      f64,
}

impl StatsSnapshot {
    /// Counters for `tech`; zero for a technology never seen.
    pub fn tech(&self, tech: TechId) -> TechCounters {
        self.per_tech.get(tech.index()).copied().unwrap_or_default()
    }

    /// Packet reception ratio, `received / max(1, sent)`.
    pub fn packet_reception_ratio(&self) -> f64 {
        self.packets_received as f64 / self.packets_sent.max(1) as f64
    }

    /// Global totals equal the per-technology sums, and every technology
    /// balances sent against received plus lost.
    pub fn is_consistent(&self) -> bool {
        let (mut s, mut r, mut l) = (0u64, 0u64, 0u64);
        for c in &self.per_tech {
            if c.sent != c.received + c.lost {
                return false;
            }
            s += c.sent;
            r += c.received;
            l += c.lost;
        }
        s == self.packets_sent && r == self.packets_received && l == self.packets_lost
    }
}

// ── StatsAggregator ───────────────────────────────────────────────────────────

/// Running counters.  Only [`reset`](Self::reset) clears them; stopping or
/// pausing a run leaves them intact.
#[derive(Clone, Debug)]
pub struct StatsAggregator {
    packet_bytes:     u64,
    packets_sent:     u64,
    packets_received: u64,
    packets_lost:     u64,
    total_latency_ms: f64,
    total_data_bytes: u64,
    handover_count:   u64,
    per_tech:         Vec<TechCounters>,
}

impl StatsAggregator {
    /// Counters for `tech_count` technologies, crediting `packet_bytes` per
    /// received packet.
    pub fn new(tech_count: usize, packet_bytes: u64) -> Self {
        Self {
            packet_bytes,
            packets_sent: 0,
            packets_received: 0,
            packets_lost: 0,
            total_latency_ms: 0.0,
            total_data_bytes: 0,
            handover_count: 0,
            per_tech: vec![TechCounters::default(); tech_count],
        }
    }

    pub fn record(&mut self, outcome: &TransmissionOutcome) {
        let idx = outcome.tech.index();
        if idx >= self.per_tech.len() {
            self.per_tech.resize(idx + 1, TechCounters::default());
        }
        let tech = &mut self.per_tech[idx];

        self.packets_sent += 1;
        tech.sent += 1;
        if outcome.success {
            self.packets_received += 1;
            tech.received += 1;
            self.total_latency_ms += outcome.latency_ms;
            self.total_data_bytes += self.packet_bytes;
        } else {
            self.packets_lost += 1;
            tech.lost += 1;
        }
    }

    #[inline]
    pub fn record_handover(&mut self) {
        self.handover_count += 1;
    }

    #[inline]
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    #[inline]
    pub fn handover_count(&self) -> u64 {
        self.handover_count
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            packets_sent:       self.packets_sent,
            packets_received:   self.packets_received,
            packets_lost:       self.packets_lost,
            total_latency_ms:   self.total_latency_ms,
            total_data_bytes:   self.total_data_bytes,
            handover_count:     self.handover_count,
            per_tech:           self.per_tech.clone(),
            average_latency_ms: self.total_latency_ms / self.packets_received.max(1) as f64,
            total_data_kb:      self.total_data_bytes as f64 / 1024.0,
        }
    }

    /// Zero every counter.  The technology count and packet size are kept.
    pub fn reset(&mut self) {
        let width = self.per_tech.len();
        *self = Self::new(width, self.packet_bytes);
    }
}

// ── HandoverTracker ───────────────────────────────────────────────────────────

/// Last serving technology per agent.
///
/// An agent with no entry is disconnected.  A handover is a change between
/// two real technologies; attaching from the disconnected state is not one.
#[derive(Clone, Debug, Default)]
pub struct HandoverTracker {
    serving: Map<AgentId, TechId>,
}

impl HandoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `agent`'s technology for this update.
    ///
    /// Returns `Some((from, to))` iff the agent was connected to `from` and
    /// is now connected to a different `to`.  `None` disconnects the agent.
    pub fn observe(&mut self, agent: AgentId, new: Option<TechId>) -> Option<(TechId, TechId)> {
        let previous = match new {
            Some(tech) => self.serving.insert(agent, tech),
            None => self.serving.remove(&agent),
        };
        match (previous, new) {
            (Some(from), Some(to)) if from != to => Some((from, to)),
            _ => None,
        }
    }

    /// The technology `agent` used on its latest update.
    #[inline]
    pub fn current(&self, agent: AgentId) -> Option<TechId> {
        self.serving.get(&agent).copied()
    }

    /// Number of currently connected agents.
    #[inline]
    pub fn connected(&self) -> usize {
        self.serving.len()
    }

    /// Forget `agent`, e.g. when it leaves the simulation.  Returns the
    /// technology it was on, if any.
    pub fn forget(&mut self, agent: AgentId) -> Option<TechId> {
        self.serving.remove(&agent)
    }

    pub fn clear(&mut self) {
        self.serving.clear();
    }
}
