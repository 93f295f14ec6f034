//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `transmissions` and `update_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, TransmissionRow, UpdateSummaryRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS transmissions (
                 time_ms    INTEGER NOT NULL,
                 agent_id   INTEGER NOT NULL,
                 tech_id    INTEGER NOT NULL,
                 distance_m REAL    NOT NULL,
                 success    INTEGER NOT NULL,
                 latency_ms REAL    NOT NULL,
                 reward     REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS update_summaries (
                 time_ms                INTEGER NOT NULL,
                 agents                 INTEGER NOT NULL,
                 transmissions          INTEGER NOT NULL,
                 packets_sent           INTEGER NOT NULL,
                 packets_received       INTEGER NOT NULL,
                 packets_lost           INTEGER NOT NULL,
                 handover_count         INTEGER NOT NULL,
                 average_latency_ms     REAL    NOT NULL,
                 packet_reception_ratio REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_transmissions(&mut self, rows: &[TransmissionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO transmissions \
                 (time_ms, agent_id, tech_id, distance_m, success, latency_ms, reward) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_ms as i64,
                    row.agent_id,
                    row.tech_id,
                    row.distance_m,
                    row.success as i64,
                    row.latency_ms,
                    row.reward,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_update_summary(&mut self, row: &UpdateSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO update_summaries \
             (time_ms, agents, transmissions, packets_sent, packets_received, packets_lost, \
              handover_count, average_latency_ms, packet_reception_ratio) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.time_ms as i64,
                row.agents as i64,
                row.transmissions as i64,
                row.packets_sent as i64,
                row.packets_received as i64,
                row.packets_lost as i64,
                row.handover_count as i64,
                row.average_latency_ms,
                row.packet_reception_ratio,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
