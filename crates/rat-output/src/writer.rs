//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, TransmissionRow, UpdateSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// The observer never propagates these errors; it keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write every transmission of one update.
    fn write_transmissions(&mut self, rows: &[TransmissionRow]) -> OutputResult<()>;

    /// Write one update summary row.
    fn write_update_summary(&mut self, row: &UpdateSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
