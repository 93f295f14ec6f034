//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `transmissions.csv`
//! - `update_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, TransmissionRow, UpdateSummaryRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    transmissions: Writer<File>,
    summaries:     Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut transmissions = Writer::from_path(dir.join("transmissions.csv"))?;
        transmissions.write_record([
            "time_ms", "agent_id", "tech_id", "distance_m", "success", "latency_ms", "reward",
        ])?;

        let mut summaries = Writer::from_path(dir.join("update_summaries.csv"))?;
        summaries.write_record([
            "time_ms",
            "agents",
            "transmissions",
            "packets_sent",
            "packets_received",
            "packets_lost",
            "handover_count",
            "average_latency_ms",
            "packet_reception_ratio",
        ])?;

        Ok(Self { transmissions, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_transmissions(&mut self, rows: &[TransmissionRow]) -> OutputResult<()> {
        for row in rows {
            self.transmissions.write_record(&[
                row.time_ms.to_string(),
                row.agent_id.to_string(),
                row.tech_id.to_string(),
                format!("{:.3}", row.distance_m),
                (row.success as u8).to_string(),
                format!("{:.3}", row.latency_ms),
                format!("{:.4}", row.reward),
            ])?;
        }
        Ok(())
    }

    fn write_update_summary(&mut self, row: &UpdateSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.time_ms.to_string(),
            row.agents.to_string(),
            row.transmissions.to_string(),
            row.packets_sent.to_string(),
            row.packets_received.to_string(),
            row.packets_lost.to_string(),
            row.handover_count.to_string(),
            format!("{:.3}", row.average_latency_ms),
            format!("{:.4}", row.packet_reception_ratio),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.transmissions.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
