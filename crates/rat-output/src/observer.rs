//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use rat_core::{AgentId, SimTime};
use rat_net::TransmissionOutcome;
use rat_sim::{SimObserver, StatsSnapshot};

use crate::row::{TransmissionRow, UpdateSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes transmissions and update summaries to any
/// [`OutputWriter`] backend.
///
/// Transmissions are buffered for the duration of one update and written in
/// a single batch when it ends.  Errors from the writer are stored because
/// `SimObserver` methods have no return value; check them with
/// [`take_error`][Self::take_error] once the run is over.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<TransmissionRow>,
    agents:     usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            agents:     0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush and close the writer.  Called automatically at the end of
    /// `Sim::run`; drivers calling `update_observed` directly call it
    /// themselves.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_update_start(&mut self, _now: SimTime, agents: usize) {
        self.agents = agents;
        self.pending.clear();
    }

    fn on_transmission(
        &mut self,
        now:     SimTime,
        agent:   AgentId,
        outcome: &TransmissionOutcome,
        reward:  f64,
    ) {
        self.pending.push(TransmissionRow {
            time_ms:    now.0,
            agent_id:   agent.0,
            tech_id:    outcome.tech.0,
            distance_m: outcome.distance,
            success:    outcome.success,
            latency_ms: outcome.latency_ms,
            reward,
        });
    }

    fn on_update_end(&mut self, now: SimTime, stats: &StatsSnapshot) {
        if !self.pending.is_empty() {
            let result = self.writer.write_transmissions(&self.pending);
            self.store_err(result);
        }
        let row = UpdateSummaryRow {
            time_ms:                now.0,
            agents:                 self.agents as u64,
            transmissions:          self.pending.len() as u64,
            packets_sent:           stats.packets_sent,
            packets_received:       stats.packets_received,
            packets_lost:           stats.packets_lost,
            handover_count:         stats.handover_count,
            average_latency_ms:     stats.average_latency_ms,
            packet_reception_ratio: stats.packet_reception_ratio(),
        };
        let result = self.writer.write_update_summary(&row);
        self.store_err(result);
        self.pending.clear();
    }

    fn on_run_end(&mut self, _now: SimTime) {
        self.finish();
    }
}
